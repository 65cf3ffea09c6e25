use actix_web::{App, HttpResponse, HttpServer, get};
use cookieseal::cookieseal_macros::cookie;
use cookieseal::cookies::{Cookie, CookieName, IncomingConfig, OutgoingConfig};
use cookieseal::{Attributes, CookieConfig, CookieMiddleware, Cookies, Prefix, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("debug"));

    let config = CookieConfig::builder()
        .secret("change me: a long random secret")
        .build()
        .expect("a secret is configured");

    HttpServer::new(move || {
        App::new()
            // The middleware reads the Cookie header and sends the Set-Cookie headers
            .wrap(CookieMiddleware::new(config.clone()))
            .service(visits)
            .service(get_profile)
            .service(add_profile)
            .service(remove_profile)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

// Data Types
#[derive(Serialize, Deserialize, Debug)]
pub struct Profile {
    pub data: String,
}

// A signed `__Host-` cookie holding JSON
#[cookie(name = "profile")]
pub struct ProfileCookie;

impl IncomingConfig for ProfileCookie {
    type Get = Profile;
    const PREFIX: Option<Prefix> = Some(Prefix::Host);
    const SIGNED: bool = true;
}
impl OutgoingConfig for ProfileCookie {
    type Insert = (String, i32);

    fn serialize(values: Self::Insert) -> serde_json::Value {
        json!({
            "data": format!("Name: {} - Age: {}", values.0, values.1)
        })
    }
    fn attributes<'c>() -> Attributes<'c> {
        Attributes::new()
            .prefix(Prefix::Host)
            .signed(true)
            .same_site(SameSite::Strict)
            .http_only(true)
    }
}

// Plain string cookies through the untyped handle
#[get("visits")]
async fn visits(cookies: Cookies) -> HttpResponse {
    let count: u32 = cookies
        .get("visits", None)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
        + 1;

    match cookies.set("visits", &count.to_string(), None) {
        Ok(()) => HttpResponse::Ok().body(format!("visit number {count}")),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[get("add_profile")]
async fn add_profile(profile: Cookie<ProfileCookie>) -> HttpResponse {
    match profile.insert(("Scarlet".to_string(), 27)) {
        Ok(()) => HttpResponse::Ok().body("Signed cookie added"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[get("get_profile")]
async fn get_profile(profile: Cookie<ProfileCookie>) -> HttpResponse {
    // Ok(Profile) when present and untouched, otherwise Err(CookieBoxError)
    match profile.get() {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

#[get("remove_profile")]
async fn remove_profile(profile: Cookie<ProfileCookie>) -> HttpResponse {
    match profile.remove() {
        Ok(()) => HttpResponse::Ok().body("__Host-profile removed"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
