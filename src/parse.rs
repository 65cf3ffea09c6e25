//! `Cookie` header parsing.
//!
//! Parsing never fails: segments with an invalid name or value are left out of the result.
use log::debug;
use std::collections::HashMap;

use crate::decode::decode;
use crate::signing::{Secret, SignedValue, verify};

/// Cookie name to decoded value
pub type CookieMap = HashMap<String, String>;

/// Cookie name to signature verification outcome
pub type SignedCookieMap = HashMap<String, SignedValue>;

const NAME_SYMBOLS: &str = "!#$%&'*+-.^_`|~";

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || NAME_SYMBOLS.contains(c)
}

/// Printable ASCII and space, without `"`, `;` and `\`
fn is_value_char(c: char) -> bool {
    matches!(c, ' ' | '!' | '#'..=':' | '<'..='[' | ']'..='~')
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parses a `Cookie` header into decoded name/value pairs.
///
/// When a name is given, only that cookie can appear in the result. A later occurrence
/// of a name replaces an earlier one. Values that look like signed values are returned
/// as they are, see [parse_signed] to verify them.
///
/// ```
/// use cookieseal::parse;
///
/// let cookies = parse("hoa_cookie=apple; user_name = \" strawberry \"", None);
/// assert_eq!(cookies["hoa_cookie"], "apple");
/// assert_eq!(cookies["user_name"], " strawberry ");
/// ```
pub fn parse(header: &str, name: Option<&str>) -> CookieMap {
    let mut cookies = CookieMap::new();

    if let Some(name) = name {
        if !header.contains(name) {
            return cookies;
        }
    }

    for pair in header.split(';') {
        let pair = pair.trim();
        let Some((cookie_name, value)) = pair.split_once('=') else {
            continue;
        };

        let cookie_name = cookie_name.trim();
        if name.is_some_and(|name| name != cookie_name) {
            continue;
        }
        if cookie_name.is_empty() || !cookie_name.chars().all(is_name_char) {
            debug!("Skipping a cookie with an invalid name");
            continue;
        }

        let value = unquote(value.trim());
        if !value.chars().all(is_value_char) {
            debug!("Skipping cookie `{cookie_name}`: invalid value");
            continue;
        }

        cookies.insert(cookie_name.to_string(), decode(value).into_owned());
    }

    cookies
}

/// Parses a `Cookie` header and verifies every value as a signed value.
///
/// Cookies whose value does not have the shape of a signed value are left out, so a
/// missing entry means "never signed" while [SignedValue::Tampered] means the signature
/// did not match.
pub fn parse_signed(header: &str, secret: &Secret, name: Option<&str>) -> SignedCookieMap {
    parse(header, name)
        .into_iter()
        .filter_map(|(cookie_name, value)| match verify(&value, secret) {
            Some(outcome) => Some((cookie_name, outcome)),
            None => {
                debug!("Skipping cookie `{cookie_name}`: not a signed value");
                None
            }
        })
        .collect()
}
