use biscotti::Expiration;
use biscotti::time::SignedDuration;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::errors::CookieError;

/// The `SameSite` attribute. Parses case-insensitively, renders capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// The `Priority` attribute. Parses case-insensitively, renders capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A cookie name prefix applied when a cookie is generated or looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// `__Secure-`, forces `Secure`
    Secure,
    /// `__Host-`, forces `Secure` and `Path=/`, drops `Domain`
    Host,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Secure => "__Secure-",
            Prefix::Host => "__Host-",
        }
    }

    /// The cookie name as it appears on the wire
    pub fn apply(&self, name: &str) -> String {
        format!("{}{}", self.as_str(), name)
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        })
    }
}

impl FromStr for SameSite {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            _ => Err(CookieError::validation(format!(
                "`{s}` is not a valid SameSite value"
            ))),
        }
    }
}

impl FromStr for Priority {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(CookieError::validation(format!(
                "`{s}` is not a valid Priority value"
            ))),
        }
    }
}

impl FromStr for Prefix {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secure" => Ok(Prefix::Secure),
            "host" => Ok(Prefix::Host),
            _ => Err(CookieError::validation(format!(
                "`{s}` is not a valid cookie prefix"
            ))),
        }
    }
}

/// Options applied to an outgoing cookie.
///
/// `Attributes::new()` sets nothing. `Attributes::default()` is `Path=/; HttpOnly; SameSite=Lax`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes<'c> {
    pub(crate) path: Option<Cow<'c, str>>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) secure: Option<bool>,
    pub(crate) http_only: Option<bool>,
    pub(crate) partitioned: Option<bool>,
    pub(crate) same_site: Option<SameSite>,
    pub(crate) priority: Option<Priority>,
    pub(crate) max_age: Option<SignedDuration>,
    pub(crate) expires: Option<Expiration>,
    pub(crate) prefix: Option<Prefix>,
    pub(crate) signed: Option<bool>,
}
impl<'c> Attributes<'c> {
    pub fn new() -> Self {
        Attributes {
            path: None,
            domain: None,
            secure: None,
            http_only: None,
            partitioned: None,
            same_site: None,
            priority: None,
            max_age: None,
            expires: None,
            prefix: None,
            signed: None,
        }
    }
    #[inline]
    pub fn path<T: Into<Cow<'c, str>>>(mut self, path: T) -> Self {
        self.path = Some(path.into());
        self
    }
    #[inline]
    pub fn domain<T: Into<Cow<'c, str>>>(mut self, domain: T) -> Self {
        self.domain = Some(domain.into());
        self
    }
    #[inline]
    pub fn secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }
    #[inline]
    pub fn http_only<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.http_only = value.into();
        self
    }
    #[inline]
    pub fn partitioned<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.partitioned = value.into();
        self
    }
    pub fn same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }
    pub fn priority<T: Into<Option<Priority>>>(mut self, value: T) -> Self {
        self.priority = value.into();
        self
    }
    /// Sub-second precision is truncated when rendered; a negative duration is not rendered.
    #[inline]
    pub fn max_age<T: Into<Option<SignedDuration>>>(mut self, value: T) -> Self {
        self.max_age = value.into();
        self
    }
    #[inline]
    pub fn expires<T: Into<Option<Expiration>>>(mut self, value: T) -> Self {
        self.expires = value.into();
        self
    }
    pub fn prefix<T: Into<Option<Prefix>>>(mut self, value: T) -> Self {
        self.prefix = value.into();
        self
    }
    /// Whether the adapter signs the value before sending it. Never rendered.
    pub fn signed<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.signed = value.into();
        self
    }

    pub fn is_signed(&self) -> bool {
        self.signed.unwrap_or(false)
    }

    pub fn get_prefix(&self) -> Option<Prefix> {
        self.prefix
    }

    pub(crate) fn into_owned(self) -> Attributes<'static> {
        Attributes {
            path: self.path.map(|path| Cow::Owned(path.into_owned())),
            domain: self.domain.map(|domain| Cow::Owned(domain.into_owned())),
            secure: self.secure,
            http_only: self.http_only,
            partitioned: self.partitioned,
            same_site: self.same_site,
            priority: self.priority,
            max_age: self.max_age,
            expires: self.expires,
            prefix: self.prefix,
            signed: self.signed,
        }
    }

    /// Attributes of a cookie that expires immediately, scoped like `self`
    pub(crate) fn removal(&self) -> Attributes<'c> {
        let partitioned = self.partitioned == Some(true);
        // Partitioned requires Secure
        let secure = if partitioned { Some(true) } else { self.secure };

        Attributes::new()
            .max_age(SignedDuration::ZERO)
            .secure(secure)
            .partitioned(self.partitioned)
            .prefix(self.prefix)
            .with_scope(self)
    }

    fn with_scope(mut self, scope: &Attributes<'c>) -> Self {
        self.path = scope.path.clone();
        self.domain = scope.domain.clone();
        self
    }
}
impl Default for Attributes<'_> {
    fn default() -> Self {
        Attributes::new()
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attributes, Prefix, Priority, SameSite};
    use biscotti::time::SignedDuration;

    #[test]
    fn same_site_and_priority_parse_case_insensitively() {
        assert_eq!("strict".parse::<SameSite>(), Ok(SameSite::Strict));
        assert_eq!("LAX".parse::<SameSite>(), Ok(SameSite::Lax));
        assert_eq!("None".parse::<SameSite>(), Ok(SameSite::None));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("MeDiUm".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("host".parse::<Prefix>(), Ok(Prefix::Host));
        assert!("sometimes".parse::<SameSite>().is_err());
        assert!("urgent".parse::<Priority>().is_err());
    }
    #[test]
    fn canonical_rendering() {
        assert_eq!(SameSite::None.to_string(), "None");
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Prefix::Secure.apply("id"), "__Secure-id");
        assert_eq!(Prefix::Host.apply("id"), "__Host-id");
    }
    #[test]
    fn removal_keeps_scope_only() {
        let attributes = Attributes::default()
            .domain("example.com")
            .secure(true)
            .prefix(Prefix::Secure)
            .priority(Priority::High)
            .signed(true);

        let removal = attributes.removal();

        assert_eq!(removal.path.as_deref(), Some("/"));
        assert_eq!(removal.domain.as_deref(), Some("example.com"));
        assert_eq!(removal.secure, Some(true));
        assert_eq!(removal.prefix, Some(Prefix::Secure));
        assert_eq!(removal.max_age, Some(SignedDuration::ZERO));
        assert_eq!(removal.priority, None);
        assert_eq!(removal.http_only, None);
        assert!(!removal.is_signed());
    }
    #[test]
    fn removal_keeps_partition() {
        let removal = Attributes::default().partitioned(true).removal();

        assert_eq!(removal.partitioned, Some(true));
        assert_eq!(removal.secure, Some(true));
        assert_eq!(Attributes::default().removal().partitioned, None);
    }
}
