//! Cookie parsing, `Set-Cookie` generation and HMAC-signed cookies for Actix Web.
//!
//! cookieseal reads the `Cookie` request header tolerantly and writes `Set-Cookie` values that
//! always respect the cookie name prefix rules (`__Secure-`, `__Host-`) and the 400 day
//! lifetime bound on `Max-Age` and `Expires`.
//!
//! # Features
//! - Malformed request cookies never fail a request, they are simply left out.
//! - Percent-decoding that keeps invalid escape sequences verbatim instead of failing.
//! - Signed cookies (`value.signature`, HMAC-SHA256) that tell a forged cookie apart from a missing one.
//! - `Priority` and `Partitioned` attributes on top of the usual ones.
//! - Typed cookies with JSON values, declared with `#[cookie(name = "...")]`.
//!
//! The building blocks ([parse], [parse_signed], [serialize], [generate_cookie], ...) work without
//! any web framework:
//! ```
//! use cookieseal::{Attributes, Secret, SignedValue, parse_signed, serialize_signed};
//!
//! let secret = Secret::from("123456");
//! let header = serialize_signed("last_path", "z33WMw", &secret, &Attributes::new()).unwrap();
//!
//! let cookies = parse_signed(&header, &secret, Some("last_path"));
//! assert_eq!(cookies["last_path"], SignedValue::Verified("z33WMw".to_string()));
//! ```
//!
//! # Usage
//! To use the extractors in your web application you must register [CookieMiddleware] in your App.
//! ```no_run
//!use actix_web::{App, HttpResponse, HttpServer, web};
//!use cookieseal::{CookieConfig, CookieMiddleware, Cookies};
//!
//!async fn index(cookies: Cookies) -> HttpResponse {
//!    let greeting = match cookies.get_signed("user", None) {
//!        Ok(Some(user)) => match user.verified() {
//!            Some(user) => format!("Hello {user}"),
//!            None => "Nice try".to_string(),
//!        },
//!        _ => "Hello stranger".to_string(),
//!    };
//!    HttpResponse::Ok().body(greeting)
//!}
//!
//!#[actix_web::main]
//!async fn main() -> std::io::Result<()> {
//!    let config = CookieConfig::builder()
//!        .secret("a long and random secret")
//!        .signed(true)
//!        .build()
//!        .expect("signed cookies need a secret");
//!
//!    HttpServer::new(move ||
//!            App::new()
//!            .wrap(CookieMiddleware::new(config.clone()))
//!            .default_service(web::to(index)))
//!        .bind(("127.0.0.1", 8080))?
//!        .run()
//!        .await
//!}
//! ```
mod attributes;
mod config;
pub mod cookies;
mod decode;
mod errors;
mod middleware;
mod parse;
mod serialize;
mod signing;
mod storage;

pub use attributes::{Attributes, Prefix, Priority, SameSite};
pub use biscotti::{Expiration, time};
pub use config::{CookieConfig, CookieConfigBuilder};
pub use cookies::{CookieBoxError, Cookies};
pub use cookieseal_macros;
pub use decode::decode;
pub use errors::CookieError;
pub use middleware::CookieMiddleware;
pub use parse::{CookieMap, SignedCookieMap, parse, parse_signed};
pub use serialize::{generate_cookie, generate_signed_cookie, serialize, serialize_signed};
pub use signing::{Secret, SignedValue, compose_signed, sign, verify};
pub use storage::Storage;
