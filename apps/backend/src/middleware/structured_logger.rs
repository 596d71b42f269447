//! One access-log event per request.
//!
//! The event carries the matched route pattern instead of the raw path, so
//! order and restaurant ids do not explode log cardinality, plus the caller's
//! user id and role once `JwtExtract` has run. Health checks log at debug.

use std::future::{ready, Ready};
use std::time::{Duration, Instant};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

use super::request_trace::RequestId;
use crate::auth::claims::Claims;

/// Requests slower than this log at warn even when they succeed.
pub const SLOW_REQUEST: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

fn severity(status: StatusCode, elapsed: Duration, route: &str) -> Severity {
    if status.is_server_error() {
        Severity::Error
    } else if status.is_client_error() || elapsed >= SLOW_REQUEST {
        Severity::Warn
    } else if route.starts_with("/health") {
        Severity::Debug
    } else {
        Severity::Info
    }
}

macro_rules! access_log {
    ($level:ident, $method:ident, $route:ident, $status:ident, $duration_ms:ident, $trace_id:ident, $user:ident, $role:ident) => {
        $level!(
            http.method = %$method,
            http.route = %$route,
            http.status_code = $status,
            duration_ms = $duration_ms,
            trace_id = %$trace_id,
            user_id = ?$user,
            role = ?$role,
            "request_completed"
        )
    };
}

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let raw_path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let elapsed = start.elapsed();

            let (status, route, user, role) = match &result {
                Ok(res) => {
                    let http_req = res.request();
                    let route = http_req.match_pattern().unwrap_or_else(|| raw_path.clone());
                    let claims = http_req.extensions().get::<Claims>().cloned();
                    (
                        res.status(),
                        route,
                        claims.as_ref().map(|c| c.sub.clone()),
                        claims.map(|c| c.role),
                    )
                }
                Err(err) => (err.as_response_error().status_code(), raw_path.clone(), None, None),
            };

            let level = severity(status, elapsed, &route);
            let code = status.as_u16();
            let ms = elapsed.as_millis() as u64;
            match level {
                Severity::Error => access_log!(error, method, route, code, ms, trace_id, user, role),
                Severity::Warn => access_log!(warn, method, route, code, ms, trace_id, user, role),
                Severity::Info => access_log!(info, method, route, code, ms, trace_id, user, role),
                Severity::Debug => access_log!(debug, method, route, code, ms, trace_id, user, role),
            }

            result
        })
    }
}
