pub mod error_shape;
pub mod healthcheck;
pub mod openapi;
pub mod rate_limiting;
pub mod security_headers;
