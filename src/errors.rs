//! Errors raised while configuring the crate or generating cookies.
//!
//! Malformed incoming cookies are never an error: they are left out of the parsed mapping.
use thiserror::Error;

pub(crate) const SECRET_REQUIRED: &str = "secret is required to sign/verify cookies";
pub(crate) const SECRET_REQUIRED_WHEN_SIGNED: &str = "secret is required when signed is true";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// Signing or verification was requested without a configured secret
    #[error("{0}")]
    Configuration(String),
    /// A `Set-Cookie` value would break a prefix rule or an attribute bound
    #[error("{0}")]
    Validation(String),
}

impl CookieError {
    pub(crate) fn missing_secret() -> Self {
        CookieError::Configuration(SECRET_REQUIRED.to_string())
    }

    pub(crate) fn validation<T: Into<String>>(message: T) -> Self {
        CookieError::Validation(message.into())
    }
}
