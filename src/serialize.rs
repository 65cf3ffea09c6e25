//! `Set-Cookie` generation.
//!
//! Values are percent-encoded with the same set as JavaScript's `encodeURIComponent`,
//! so every generated value is a valid cookie value and parses back unchanged.
use biscotti::time::{SignedDuration, Timestamp};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::attributes::{Attributes, Prefix};
use crate::errors::CookieError;
use crate::parse::is_name_char;
use crate::signing::{Secret, compose_signed};

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 400 days, the upper bound browsers apply to Max-Age and Expires
const MAX_LIFETIME_SECS: i64 = 34_560_000;

/// Builds a single `Set-Cookie` value.
///
/// Attributes are rendered in a fixed order: `Max-Age`, `Domain`, `Path`, `Expires`,
/// `HttpOnly`, `Secure`, `SameSite`, `Priority`, `Partitioned`. The `prefix` and `signed`
/// options are ignored here, see [generate_cookie] for prefixes.
///
/// ```
/// use cookieseal::{serialize, Attributes, Priority};
///
/// let header = serialize("great_cookie", "banana", &Attributes::new().priority(Priority::Low));
/// assert_eq!(header.unwrap(), "great_cookie=banana; Priority=Low");
/// ```
///
/// # Errors
/// [CookieError::Validation] when the name is not a token, when `Path` or `Domain` contain
/// `;` or control characters, when `Partitioned` comes without `Secure`, when a `__Secure-`
/// or `__Host-` name breaks its prefix rules, or when Max-Age or Expires exceed 400 days.
pub fn serialize(
    name: &str,
    value: &str,
    attributes: &Attributes<'_>,
) -> Result<String, CookieError> {
    validate(name, attributes)?;

    let value = utf8_percent_encode(value, COMPONENT).to_string();
    Ok(render(name, &value, attributes))
}

/// Signs `value` with `secret`, then serializes `value.signature` like [serialize]
pub fn serialize_signed(
    name: &str,
    value: &str,
    secret: &Secret,
    attributes: &Attributes<'_>,
) -> Result<String, CookieError> {
    serialize(name, &compose_signed(value, secret), attributes)
}

/// Serializes a cookie after resolving the `prefix` option.
///
/// `Prefix::Secure` renames the cookie to `__Secure-<name>` and forces `Secure`.
/// `Prefix::Host` renames it to `__Host-<name>`, forces `Secure` and `Path=/` and drops `Domain`.
/// The forced values win over whatever the caller set.
pub fn generate_cookie(
    name: &str,
    value: &str,
    attributes: &Attributes<'_>,
) -> Result<String, CookieError> {
    match with_prefix(name, attributes) {
        Some((name, attributes)) => serialize(&name, value, &attributes),
        None => serialize(name, value, attributes),
    }
}

/// Signed counterpart of [generate_cookie]
pub fn generate_signed_cookie(
    name: &str,
    value: &str,
    secret: &Secret,
    attributes: &Attributes<'_>,
) -> Result<String, CookieError> {
    match with_prefix(name, attributes) {
        Some((name, attributes)) => serialize_signed(&name, value, secret, &attributes),
        None => serialize_signed(name, value, secret, attributes),
    }
}

fn with_prefix<'c>(name: &str, attributes: &Attributes<'c>) -> Option<(String, Attributes<'c>)> {
    let prefix = attributes.prefix?;
    let forced = match prefix {
        Prefix::Secure => attributes.clone().secure(true),
        Prefix::Host => {
            let mut attributes = attributes.clone().secure(true).path("/");
            attributes.domain = None;
            attributes
        }
    };

    Some((prefix.apply(name), forced))
}

fn is_attribute_char(c: char) -> bool {
    c != ';' && !c.is_control()
}

fn validate(name: &str, attributes: &Attributes<'_>) -> Result<(), CookieError> {
    let secure = attributes.secure == Some(true);

    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(CookieError::validation(format!(
            "Cookie name {name:?} contains invalid characters"
        )));
    }
    if let Some(path) = attributes.path.as_deref() {
        if !path.chars().all(is_attribute_char) {
            return Err(CookieError::validation(
                "Path attributes must not contain ';' or control characters",
            ));
        }
    }
    if let Some(domain) = attributes.domain.as_deref() {
        if !domain.chars().all(is_attribute_char) {
            return Err(CookieError::validation(
                "Domain attributes must not contain ';' or control characters",
            ));
        }
    }

    if attributes.partitioned == Some(true) && !secure {
        return Err(CookieError::validation(
            "Partitioned Cookie must have Secure attributes",
        ));
    }
    if name.starts_with(Prefix::Secure.as_str()) && !secure {
        return Err(CookieError::validation(
            "__Secure- Cookie must have Secure attributes",
        ));
    }
    if name.starts_with(Prefix::Host.as_str()) {
        if !secure {
            return Err(CookieError::validation(
                "__Host- Cookie must have Secure attributes",
            ));
        }
        if attributes.path.as_deref() != Some("/") {
            return Err(CookieError::validation(
                "__Host- Cookie must have Path attributes with \"/\"",
            ));
        }
        if attributes.domain.as_deref().is_some_and(|domain| !domain.is_empty()) {
            return Err(CookieError::validation(
                "__Host- Cookie must not have Domain attributes",
            ));
        }
    }
    if let Some(max_age) = attributes.max_age {
        if max_age > SignedDuration::from_secs(MAX_LIFETIME_SECS) {
            return Err(CookieError::validation(
                "Cookies Max-Age SHOULD NOT be greater than 400 days (34560000 seconds) in duration.",
            ));
        }
    }
    if let Some(expires) = attributes.expires.as_ref().and_then(|e| e.datetime()) {
        let ahead = expires.timestamp().as_millisecond() - Timestamp::now().as_millisecond();
        if ahead > MAX_LIFETIME_SECS * 1000 {
            return Err(CookieError::validation(
                "Cookies Expires SHOULD NOT be greater than 400 days (34560000 seconds) in the future.",
            ));
        }
    }

    Ok(())
}

fn render(name: &str, value: &str, attributes: &Attributes<'_>) -> String {
    let mut cookie = format!("{name}={value}");

    if let Some(max_age) = attributes.max_age.filter(|max_age| !max_age.is_negative()) {
        cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
    }
    if let Some(domain) = attributes.domain.as_deref().filter(|d| !d.is_empty()) {
        cookie.push_str(&format!("; Domain={domain}"));
    }
    if let Some(path) = attributes.path.as_deref().filter(|p| !p.is_empty()) {
        cookie.push_str(&format!("; Path={path}"));
    }
    if let Some(expires) = attributes.expires.as_ref().and_then(|e| e.datetime()) {
        let date = expires.timestamp().strftime("%a, %d %b %Y %H:%M:%S GMT");
        cookie.push_str(&format!("; Expires={date}"));
    }
    if attributes.http_only == Some(true) {
        cookie.push_str("; HttpOnly");
    }
    if attributes.secure == Some(true) {
        cookie.push_str("; Secure");
    }
    if let Some(same_site) = attributes.same_site {
        cookie.push_str(&format!("; SameSite={same_site}"));
    }
    if let Some(priority) = attributes.priority {
        cookie.push_str(&format!("; Priority={priority}"));
    }
    if attributes.partitioned == Some(true) {
        cookie.push_str("; Partitioned");
    }

    cookie
}
