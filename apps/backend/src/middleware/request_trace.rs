//! Assigns each request its trace id.
//!
//! A well-formed UUID in an inbound `x-request-id` (set by the mobile apps and
//! the edge proxy) is kept so client and server logs line up; anything else
//! is replaced with a fresh v4. The id lands in request extensions as
//! [`RequestId`], scopes the task-local trace id, and is echoed back.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::HttpMessage;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Trace id of the request, readable by later middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a client-supplied UUID, normalised to lower-case hyphenated form.
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        let inbound = value
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .filter(|id| !id.is_nil());
        Self(inbound.unwrap_or_else(Uuid::new_v4).hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = RequestId::from_header(req.headers().get(REQUEST_ID_HEADER));
        let echoed = HeaderValue::from_str(id.as_str());
        let scoped = id.0.clone();
        req.extensions_mut().insert(id);

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = trace_ctx::with_trace_id(scoped, fut).await?;
            // a hyphenated UUID is always a valid header value
            if let Ok(value) = echoed {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}
