use actix_utils::future::{Ready, ready};
use actix_web::{
    HttpMessage,
    dev::{ResponseHead, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{COOKIE, HeaderValue, SET_COOKIE},
};
use anyhow::anyhow;
use std::{future::Future, pin::Pin, rc::Rc};

use crate::{CookieConfig, Storage};

/// Makes [Cookies](crate::Cookies) and typed [Cookie](crate::cookies::Cookie) extractors
/// available to handlers and sends the cookies they set as `Set-Cookie` headers.
pub struct CookieMiddleware {
    config: Rc<CookieConfig>,
}

impl CookieMiddleware {
    pub fn new(config: CookieConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = InnerCookieMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InnerCookieMiddleware {
            service: Rc::new(service),
            config: Rc::clone(&self.config),
        }))
    }
}

pub fn e500<T>(e: T) -> actix_web::Error
where
    T: std::fmt::Debug + std::fmt::Display + 'static,
{
    actix_web::error::ErrorInternalServerError(e)
}

pub struct InnerCookieMiddleware<S> {
    service: Rc<S>,
    config: Rc<CookieConfig>,
}

impl<S, B> Service<ServiceRequest> for InnerCookieMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let storage = Storage::new(Rc::clone(&self.config), cookie_header(&req));

        Box::pin(async move {
            //clone storage is cheap, since we are only coping the rc
            req.extensions_mut().insert(storage.clone());

            let mut response = service.call(req).await?;

            append_set_cookie_headers(response.response_mut().head_mut(), &storage).map_err(e500)?;

            Ok(response)
        })
    }
}

// Bytes outside visible ASCII only invalidate the pair they appear in, parsing drops it
fn cookie_header(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(COOKIE)?;

    Some(String::from_utf8_lossy(header.as_bytes()).into_owned())
}

// Each cookie gets its own header, they are never joined into one value
fn append_set_cookie_headers(
    response: &mut ResponseHead,
    storage: &Storage,
) -> Result<(), anyhow::Error> {
    for cookie in storage.take_headers() {
        let cookie = HeaderValue::from_str(&cookie).map_err(|e| {
            anyhow!("Failed to attached cookies to outgoing response: {}", e)
        })?;
        response.headers_mut().append(SET_COOKIE, cookie);
    }

    Ok(())
}
