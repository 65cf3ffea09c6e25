//! cookieseal's request-scoped cookie access
use crate::attributes::{Attributes, Prefix};
use crate::errors::CookieError;
use crate::middleware::e500;
use crate::parse::{CookieMap, SignedCookieMap, parse, parse_signed};
use crate::serialize::{generate_cookie, generate_signed_cookie};
use crate::signing::SignedValue;
use crate::storage::Storage;
use actix_utils::future::{Ready, ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::any::type_name;
use thiserror::Error;

/// The error returned by typed [Cookie] methods
#[derive(Error, Debug, PartialEq)]
pub enum CookieBoxError {
    #[error("`{0}` does not exist")]
    NotFound(String),
    #[error("`{0}` has a signature that does not match its value")]
    Tampered(String),
    #[error("Failed to deserialize `{0}` to type `{1}`")]
    Deserialization(String, String),
    #[error(transparent)]
    Cookie(#[from] CookieError),
}

fn wire_name(name: &str, prefix: Option<Prefix>) -> String {
    match prefix {
        Some(prefix) => prefix.apply(name),
        None => name.to_string(),
    }
}

/// Reads the request `Cookie` header and queues `Set-Cookie` values for the response.
///
/// Extract it in a handler once [CookieMiddleware](crate::CookieMiddleware) is registered.
/// ```no_run
/// use actix_web::HttpResponse;
/// use cookieseal::{Attributes, Cookies, Prefix};
///
/// async fn visit(cookies: Cookies) -> actix_web::Result<HttpResponse> {
///     let visits: u32 = cookies
///         .get("visits", None)
///         .and_then(|v| v.parse().ok())
///         .unwrap_or(0);
///
///     cookies
///         .set("visits", &(visits + 1).to_string(), None)
///         .map_err(actix_web::error::ErrorBadRequest)?;
///     cookies
///         .set("session", "abc", Some(&Attributes::new().prefix(Prefix::Host)))
///         .map_err(actix_web::error::ErrorBadRequest)?;
///
///     Ok(HttpResponse::Ok().finish())
/// }
/// ```
#[derive(Clone)]
pub struct Cookies {
    storage: Storage,
}

impl Cookies {
    pub fn new(storage: &Storage) -> Self {
        Cookies {
            storage: storage.clone(),
        }
    }

    fn header(&self) -> Option<&str> {
        self.storage.request_header.as_deref()
    }

    /// The decoded value of the request cookie `name`, after applying `prefix` to it.
    ///
    /// `None` when the name is empty, the request has no `Cookie` header, or the cookie
    /// is missing or malformed.
    pub fn get<P: Into<Option<Prefix>>>(&self, name: &str, prefix: P) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        let name = wire_name(name, prefix.into());
        parse(self.header()?, Some(&name)).remove(&name)
    }

    /// Verifies the signed request cookie `name`, after applying `prefix` to it.
    ///
    /// `Ok(None)` when the cookie is missing or is not a signed value.
    ///
    /// # Errors
    /// [CookieError::Configuration] when no secret is configured
    pub fn get_signed<P: Into<Option<Prefix>>>(
        &self,
        name: &str,
        prefix: P,
    ) -> Result<Option<SignedValue>, CookieError> {
        let secret = self.storage.config.require_secret()?;
        if name.is_empty() {
            return Ok(None);
        }
        let Some(header) = self.header() else {
            return Ok(None);
        };

        let name = wire_name(name, prefix.into());
        Ok(parse_signed(header, secret, Some(&name)).remove(&name))
    }

    /// Every valid request cookie
    pub fn get_all(&self) -> CookieMap {
        self.header()
            .map(|header| parse(header, None))
            .unwrap_or_default()
    }

    /// Every request cookie holding a signed value
    ///
    /// # Errors
    /// [CookieError::Configuration] when no secret is configured
    pub fn get_all_signed(&self) -> Result<SignedCookieMap, CookieError> {
        let secret = self.storage.config.require_secret()?;
        Ok(self
            .header()
            .map(|header| parse_signed(header, secret, None))
            .unwrap_or_default())
    }

    /// Queues a `Set-Cookie` value for the response.
    ///
    /// Without attributes the configured defaults apply. The value is signed when the
    /// attributes say so. Nothing is queued for an empty name.
    ///
    /// # Errors
    /// [CookieError::Validation] when the attributes break a cookie rule,
    /// [CookieError::Configuration] when signing without a secret
    pub fn set(
        &self,
        name: &str,
        value: &str,
        attributes: Option<&Attributes<'_>>,
    ) -> Result<(), CookieError> {
        if name.is_empty() {
            return Ok(());
        }
        let config = &self.storage.config;
        let attributes = attributes.unwrap_or(config.default_attributes());

        let header = if attributes.is_signed() {
            generate_signed_cookie(name, value, config.require_secret()?, attributes)
        } else {
            generate_cookie(name, value, attributes)
        }
        .inspect_err(|e| warn!("Refusing to set cookie `{name}`: {e}"))?;

        self.storage
            .push(wire_name(name, attributes.get_prefix()), header);
        Ok(())
    }

    /// Queues a `Set-Cookie` value that expires the client's cookie right away.
    ///
    /// The removal keeps the path, domain, prefix and `Secure` flag of the given (or default)
    /// attributes, since the client identifies a cookie by name, path and domain.
    pub fn delete(&self, name: &str, attributes: Option<&Attributes<'_>>) -> Result<(), CookieError> {
        let attributes = attributes.unwrap_or(self.storage.config.default_attributes());
        self.set(name, "", Some(&attributes.removal()))
    }

    /// Drops cookies queued for the response under `name`. Returns how many were dropped.
    pub fn discard<P: Into<Option<Prefix>>>(&self, name: &str, prefix: P) -> usize {
        self.storage.discard(&wire_name(name, prefix.into()))
    }
}

fn storage(req: &HttpRequest) -> Result<Storage, actix_web::Error> {
    req.extensions()
        .get::<Storage>()
        .cloned()
        .ok_or_else(|| e500("Cookie storage is missing, is `CookieMiddleware` registered?"))
}

impl FromRequest for Cookies {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(storage(req).map(|storage| Cookies::new(&storage)))
    }
}

/// Typed access to a single cookie
pub struct Cookie<T> {
    cookies: Cookies,
    attributes: Option<Attributes<'static>>,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Cookie<T> {
    /// Create a cookie instance for any generic type parameter
    pub fn new(storage: &Storage) -> Self {
        Cookie {
            cookies: Cookies::new(storage),
            attributes: None,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: 'static> FromRequest for Cookie<T> {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(storage(req).map(|storage| Cookie::new(&storage)))
    }
}

/// Provide methods to `get` data from a cookie instance for any generic type parameter that implements [IncomingConfig]
impl<T: IncomingConfig> Cookie<T> {
    /// Reads the request cookie named by [CookieName] and deserializes its JSON value.
    ///
    /// The prefix and signature settings come from [IncomingConfig].
    /// # Example
    /// ```no_run
    /// use cookieseal::cookieseal_macros::cookie;
    /// use cookieseal::cookies::{Cookie, CookieName, IncomingConfig};
    /// use cookieseal::Prefix;
    /// use actix_web::HttpResponse;
    ///
    /// #[cookie(name = "session")]
    /// pub struct Session;
    ///
    /// impl IncomingConfig for Session {
    ///     type Get = String;
    ///     const PREFIX: Option<Prefix> = Some(Prefix::Host);
    ///     const SIGNED: bool = true;
    /// }
    ///
    /// async fn whoami(session: Cookie<Session>) -> HttpResponse {
    ///     match session.get() {
    ///         Ok(user) => HttpResponse::Ok().body(user),
    ///         Err(_) => HttpResponse::Unauthorized().finish(),
    ///     }
    /// }
    /// ```
    pub fn get(&self) -> Result<T::Get, CookieBoxError> {
        let value = if T::SIGNED {
            match self.cookies.get_signed(T::COOKIE_NAME, T::PREFIX)? {
                Some(SignedValue::Verified(value)) => value,
                Some(SignedValue::Tampered) => {
                    return Err(CookieBoxError::Tampered(T::COOKIE_NAME.to_string()));
                }
                None => return Err(CookieBoxError::NotFound(T::COOKIE_NAME.to_string())),
            }
        } else {
            self.cookies
                .get(T::COOKIE_NAME, T::PREFIX)
                .ok_or(CookieBoxError::NotFound(T::COOKIE_NAME.to_string()))?
        };

        serde_json::from_str(&value).map_err(|_| {
            CookieBoxError::Deserialization(value.clone(), type_name::<T::Get>().to_string())
        })
    }
}

/// Provide methods to `insert`, `remove` and `discard` a cookie instance for any generic type parameter that implements [OutgoingConfig]
impl<T: OutgoingConfig> Cookie<T> {
    /// Overrides [OutgoingConfig::attributes] for this instance
    pub fn set_attributes(&mut self, attributes: Attributes<'_>) {
        self.attributes = Some(attributes.into_owned());
    }

    fn attributes(&self) -> Attributes<'static> {
        self.attributes.clone().unwrap_or_else(|| T::attributes())
    }

    /// Queues the serialized value as a `Set-Cookie` header for the response.
    pub fn insert(&self, value: T::Insert) -> Result<(), CookieBoxError> {
        let data = T::serialize(value);
        self.cookies
            .set(T::COOKIE_NAME, &data.to_string(), Some(&self.attributes()))?;
        Ok(())
    }

    /// Queues a removal cookie, which expires the client's cookie with the same name, path and domain.
    pub fn remove(&self) -> Result<(), CookieBoxError> {
        self.cookies.delete(T::COOKIE_NAME, Some(&self.attributes()))?;
        Ok(())
    }

    /// Drops anything queued for this cookie in the response
    pub fn discard(&self) {
        self.cookies
            .discard(T::COOKIE_NAME, self.attributes().get_prefix());
    }
}

/// Provide internal customization for `insert` and `remove` methods in [Cookie].
///
/// ```no_run
/// use cookieseal::cookieseal_macros::cookie;
/// use cookieseal::cookies::{CookieName, OutgoingConfig};
/// use cookieseal::{Attributes, Prefix};
///
/// #[cookie(name = "cart")]
/// pub struct Cart;
///
/// impl OutgoingConfig for Cart {
///    type Insert = Vec<u32>;
///
///    fn attributes<'c>() -> Attributes<'c> {
///        Attributes::default().prefix(Prefix::Secure).signed(true)
///    }
/// }
/// ```
pub trait OutgoingConfig: CookieName {
    /// The serialization type when inserting a cookie
    type Insert: Serialize;

    /// Provides default serialization for a cookie. This can be overwriting
    fn serialize(values: Self::Insert) -> Value {
        json!(values)
    }

    /// Attributes for the outgoing cookie, including its prefix and whether it is signed.
    /// Defaults to `Path=/; HttpOnly; SameSite=Lax`.
    fn attributes<'c>() -> Attributes<'c> {
        Attributes::default()
    }
}

/// Provide internal customization for the `get` method in [Cookie].
pub trait IncomingConfig: CookieName {
    /// The deserialization type when getting a cookie
    type Get: DeserializeOwned;
    /// Prefix the request cookie name carries
    const PREFIX: Option<Prefix> = None;
    /// Whether the request cookie must carry a valid signature
    const SIGNED: bool = false;
}

/// This is the base implementation of a cookie type
///
/// This is either implemented manually or with macro `#[cookie(name = "...")]`
pub trait CookieName {
    const COOKIE_NAME: &'static str;
}
