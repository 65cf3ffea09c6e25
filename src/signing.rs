//! HMAC-SHA256 signatures for cookie values.
//!
//! A signed value is `value.signature`, where the signature is the standard base64
//! encoding (with padding) of `HMAC-SHA256(secret, value)`.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Length of a base64 encoded SHA-256 digest, padding included
const SIGNATURE_LEN: usize = 44;

/// Key material used to sign and verify cookies.
///
/// Accepts either UTF-8 text or raw bytes; text is used as its UTF-8 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new<T: Into<Vec<u8>>>(key: T) -> Self {
        Secret(key.into())
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.0).expect("HMAC can take key of any size")
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

impl From<&str> for Secret {
    fn from(key: &str) -> Self {
        Secret::new(key)
    }
}
impl From<String> for Secret {
    fn from(key: String) -> Self {
        Secret::new(key)
    }
}
impl From<&[u8]> for Secret {
    fn from(key: &[u8]) -> Self {
        Secret::new(key)
    }
}
impl From<Vec<u8>> for Secret {
    fn from(key: Vec<u8>) -> Self {
        Secret::new(key)
    }
}

/// Outcome of verifying a well-formed signed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedValue {
    /// The signature matches; holds the value without its signature
    Verified(String),
    /// The signature is well-formed but does not match the value
    Tampered,
}

impl SignedValue {
    pub fn verified(&self) -> Option<&str> {
        match self {
            SignedValue::Verified(value) => Some(value),
            SignedValue::Tampered => None,
        }
    }

    pub fn into_verified(self) -> Option<String> {
        match self {
            SignedValue::Verified(value) => Some(value),
            SignedValue::Tampered => None,
        }
    }
}

/// Computes the base64 encoded HMAC-SHA256 signature of `value`.
///
/// The same value and secret always produce the same signature.
pub fn sign(value: &str, secret: &Secret) -> String {
    let mut mac = secret.mac();
    mac.update(value.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Appends the signature of `value` to it, separated by `.`
///
/// ```
/// use cookieseal::{compose_signed, Secret};
///
/// let secret = Secret::from("123456");
/// assert_eq!(
///     compose_signed("z33WMw", &secret),
///     "z33WMw.+HQZYtat78aYvt5+6gmjdy7KPSigOJGhoR+tyvNoeyw="
/// );
/// ```
pub fn compose_signed(value: &str, secret: &Secret) -> String {
    format!("{}.{}", value, sign(value, secret))
}

/// Checks a `value.signature` string against `secret`.
///
/// The signature is whatever follows the last `.`, so values may contain dots themselves.
/// Returns `None` when the input does not have the shape of a signed value: no `.`,
/// an empty value, or a signature that is not 44 characters ending with `=`.
/// A well-formed signature is compared in constant time.
pub fn verify(signed_value: &str, secret: &Secret) -> Option<SignedValue> {
    let (value, signature) = signed_value.rsplit_once('.')?;

    if value.is_empty() || signature.len() != SIGNATURE_LEN || !signature.ends_with('=') {
        return None;
    }

    let Ok(signature) = STANDARD.decode(signature) else {
        return Some(SignedValue::Tampered);
    };

    let mut mac = secret.mac();
    mac.update(value.as_bytes());

    match mac.verify_slice(&signature) {
        Ok(()) => Some(SignedValue::Verified(value.to_string())),
        Err(_) => Some(SignedValue::Tampered),
    }
}
