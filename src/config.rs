//! Adapter configuration, validated once when it is built.
use biscotti::time::SignedDuration;

use crate::attributes::Attributes;
use crate::errors::{CookieError, SECRET_REQUIRED_WHEN_SIGNED};
use crate::signing::Secret;

/// Settings shared by every request handled by [CookieMiddleware](crate::CookieMiddleware)
#[derive(Debug, Clone)]
pub struct CookieConfig {
    secret: Option<Secret>,
    default_attributes: Attributes<'static>,
}

impl CookieConfig {
    pub fn builder() -> CookieConfigBuilder {
        CookieConfigBuilder {
            secret: None,
            signed: None,
            default_attributes: None,
        }
    }

    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    /// The secret, or the error reported when signing without one
    pub(crate) fn require_secret(&self) -> Result<&Secret, CookieError> {
        self.secret.as_ref().ok_or_else(CookieError::missing_secret)
    }

    /// Attributes used by `set` and `delete` when the caller provides none
    pub fn default_attributes(&self) -> &Attributes<'static> {
        &self.default_attributes
    }
}

/// `Path=/; Max-Age=604800; HttpOnly; SameSite=Lax`, unsigned, without a secret
impl Default for CookieConfig {
    fn default() -> Self {
        CookieConfig {
            secret: None,
            default_attributes: default_attributes(),
        }
    }
}

fn default_attributes() -> Attributes<'static> {
    Attributes::default()
        .secure(false)
        .max_age(SignedDuration::from_hours(7 * 24))
        .signed(false)
}

pub struct CookieConfigBuilder {
    secret: Option<Secret>,
    signed: Option<bool>,
    default_attributes: Option<Attributes<'static>>,
}

impl CookieConfigBuilder {
    pub fn secret<T: Into<Secret>>(mut self, secret: T) -> Self {
        self.secret = Some(secret.into());
        self
    }
    /// Sign cookies set without explicit attributes
    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = Some(signed);
        self
    }
    pub fn default_attributes(mut self, attributes: Attributes<'_>) -> Self {
        self.default_attributes = Some(attributes.into_owned());
        self
    }

    /// # Errors
    /// [CookieError::Configuration] when signing is requested without a secret
    pub fn build(self) -> Result<CookieConfig, CookieError> {
        let mut default_attributes = self.default_attributes.unwrap_or_else(default_attributes);
        if let Some(signed) = self.signed {
            default_attributes = default_attributes.signed(signed);
        }

        if default_attributes.is_signed() && self.secret.is_none() {
            return Err(CookieError::Configuration(
                SECRET_REQUIRED_WHEN_SIGNED.to_string(),
            ));
        }

        Ok(CookieConfig {
            secret: self.secret,
            default_attributes,
        })
    }
}
