//! Rate limit settings:
//! - `/api/v1/auth/*`: 5 requests per minute per IP
//! - rest of the API: 100 requests per minute per IP
//! - `/health` is not limited

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

pub fn auth_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 5).real_ip_key()
}

pub fn api_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 100).real_ip_key()
}
