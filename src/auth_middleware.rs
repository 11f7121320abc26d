use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header, Error,
};
use futures::future::{ok, Ready};
use futures::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

const PROTECTED_PREFIX: &str = "/mt5/";

/// Guards the signal polling endpoints with a shared token.
///
/// Accepts `Authorization: Bearer <token>` or `x-api-key: <token>`. With no token
/// configured every request passes.
#[derive(Clone)]
pub struct AuthMiddleware {
    token: Option<Arc<str>>,
}

impl AuthMiddleware {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            token: self.token.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    token: Option<Arc<str>>,
}

fn presented_token(req: &ServiceRequest) -> Option<&str> {
    let headers = req.headers();
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim());
    }
    headers.get("x-api-key").and_then(|v| v.to_str().ok())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let token = self.token.clone();

        Box::pin(async move {
            let open = req.method() == actix_web::http::Method::OPTIONS
                || !req.path().starts_with(PROTECTED_PREFIX);

            let authorized = match token.as_deref() {
                None => true,
                Some(expected) => presented_token(&req) == Some(expected),
            };

            if open || authorized {
                return srv.call(req).await;
            }

            Err(actix_web::error::ErrorUnauthorized("Invalid API token"))
        })
    }
}
