use actix_web::dev::ServiceResponse;
use actix_web::http::header::{COOKIE, HeaderValue, SET_COOKIE};
use actix_web::{App, HttpResponse, Responder, test, web};
use cookieseal::{
    Attributes, CookieConfig, CookieMiddleware, Cookies, Prefix, Secret, SignedValue, parse,
    serialize_signed,
};

const SIGNED_LAST_PATH: &str =
    "signed_last_path=z33WMw.%2BHQZYtat78aYvt5%2B6gmjdy7KPSigOJGhoR%2BtyvNoeyw%3D";

fn signed_config() -> CookieConfig {
    CookieConfig::builder()
        .secret("123456")
        .signed(true)
        .build()
        .unwrap()
}

fn set_cookie_headers<B>(response: &ServiceResponse<B>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

async fn read_and_write(cookies: Cookies) -> impl Responder {
    assert_eq!(cookies.get("hoa-cookie", None), Some("hoa".to_string()));
    assert_eq!(
        cookies.get_signed("signed_last_path", None),
        Ok(Some(SignedValue::Verified("z33WMw".to_string())))
    );

    cookies
        .set("hoa-cookie", "hoa", Some(&Attributes::default()))
        .unwrap();
    cookies.set("signed_last_path", "z33WMw", None).unwrap();
    "hoa"
}

async fn delete(cookies: Cookies) -> impl Responder {
    cookies.delete("x", None).unwrap();
    HttpResponse::NoContent().finish()
}

async fn prefixed(cookies: Cookies) -> impl Responder {
    let signed = cookies.get_signed("pp", Prefix::Secure).unwrap();
    let unsigned = cookies.get("uu", Prefix::Host);
    HttpResponse::Ok().body(format!("{:?} {:?}", signed, unsigned))
}

async fn invalid(cookies: Cookies) -> impl Responder {
    match cookies.set("__Host-a", "v", Some(&Attributes::new().path("/abc").secure(true))) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

async fn session_id(cookies: Cookies) -> impl Responder {
    format!("{:?}", cookies.get("sid", None))
}

async fn bad_name(cookies: Cookies) -> impl Responder {
    match cookies.set("bad\tname", "v", None) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

#[actix_web::test]
async fn reads_request_cookies_and_sets_response_cookies() {
    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(signed_config()))
            .route("/", web::get().to(read_and_write)),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, format!("hoa-cookie=hoa;{SIGNED_LAST_PATH}")))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert!(response.status().is_success());
    let headers = set_cookie_headers(&response);
    assert_eq!(
        headers,
        vec![
            "hoa-cookie=hoa; Path=/; HttpOnly; SameSite=Lax".to_string(),
            format!("{SIGNED_LAST_PATH}; Max-Age=604800; Path=/; HttpOnly; SameSite=Lax"),
        ]
    );
    assert_eq!(
        parse(&headers[1], Some("signed_last_path"))["signed_last_path"],
        "z33WMw.+HQZYtat78aYvt5+6gmjdy7KPSigOJGhoR+tyvNoeyw="
    );
}

#[actix_web::test]
async fn delete_sets_max_age_zero() {
    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(CookieConfig::default()))
            .route("/", web::get().to(delete)),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, "x=1"))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(set_cookie_headers(&response), vec!["x=; Max-Age=0; Path=/"]);
}

#[actix_web::test]
async fn resolves_prefixed_names() {
    let secret = Secret::from("123456");
    let signed = serialize_signed(
        "__Secure-pp",
        "v",
        &secret,
        &Attributes::new().secure(true),
    )
    .unwrap();
    let pair = signed.split(';').next().unwrap().to_string();

    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(signed_config()))
            .route("/", web::get().to(prefixed)),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, format!("{pair}; __Host-uu=u")))
        .to_request();
    let body = test::call_and_read_body(&app, request).await;

    assert_eq!(body, r#"Some(Verified("v")) Some("u")"#);
}

#[actix_web::test]
async fn no_cookies_without_handler_calls() {
    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(CookieConfig::default()))
            .default_service(web::to(|| async { HttpResponse::NotFound().finish() })),
    )
    .await;

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 404);
    assert!(set_cookie_headers(&response).is_empty());
}

#[actix_web::test]
async fn validation_errors_reach_the_handler() {
    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(CookieConfig::default()))
            .route("/", web::get().to(invalid)),
    )
    .await;

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(set_cookie_headers(&response).is_empty());
    let body = test::read_body(response).await;
    assert_eq!(body, "__Host- Cookie must have Path attributes with \"/\"");
}

#[actix_web::test]
async fn non_ascii_pairs_do_not_hide_valid_ones() {
    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(CookieConfig::default()))
            .route("/", web::get().to(session_id)),
    )
    .await;

    let header = HeaderValue::from_bytes("sid=abc; other=café".as_bytes()).unwrap();
    let request = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, header))
        .to_request();
    let body = test::call_and_read_body(&app, request).await;
    assert_eq!(body, r#"Some("abc")"#);

    let header = HeaderValue::from_bytes(b"other=\xff\xfe; sid=abc").unwrap();
    let request = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, header))
        .to_request();
    let body = test::call_and_read_body(&app, request).await;
    assert_eq!(body, r#"Some("abc")"#);
}

#[actix_web::test]
async fn invalid_names_are_never_sent() {
    let app = test::init_service(
        App::new()
            .wrap(CookieMiddleware::new(CookieConfig::default()))
            .route("/", web::get().to(bad_name)),
    )
    .await;

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(set_cookie_headers(&response).is_empty());
}

#[actix_web::test]
async fn extractor_without_middleware_fails() {
    let app = test::init_service(App::new().route("/", web::get().to(delete))).await;

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 500);
}
