use actix_web::{error, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::JwtExtract;

pub mod admin;
pub mod auth;
pub mod customer;
pub mod health;
pub mod openapi;
pub mod rbac;
pub mod restaurant;
pub mod rider;
pub mod staff;

/// `?limit&offset` paging. Limits are clamped by the services.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size, default 20, clamped to 1..=100
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

fn query_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query string: {err}")).into()
}

fn path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::bad_request(ErrorCode::BadRequest, format!("Invalid path parameter: {err}")).into()
}

/// Everything under `/api/v1` except `/auth`.
///
/// Role scopes run behind `JwtExtract`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(openapi::configure_routes)
        .service(
            web::scope("/customer")
                .wrap(JwtExtract)
                .configure(customer::configure_routes),
        )
        .service(
            web::scope("/restaurant")
                .wrap(JwtExtract)
                .configure(restaurant::configure_routes),
        )
        .service(
            web::scope("/rider")
                .wrap(JwtExtract)
                .configure(rider::configure_routes),
        )
        .service(
            web::scope("/admin")
                .wrap(JwtExtract)
                .configure(admin::configure_routes),
        )
        .service(
            web::scope("/staff")
                .wrap(JwtExtract)
                .configure(staff::configure_routes),
        )
        .service(
            web::scope("/rbac")
                .wrap(JwtExtract)
                .configure(rbac::configure_routes),
        );
}

/// Shared extractor settings so query and path failures render as problem
/// details.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));
}

/// Full route table without rate limiting, for tests and tools.
///
/// `main.rs` mounts the same pieces with per-scope rate limiters.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_extractors)
        .configure(health::configure_routes)
        .service(
            web::scope("/api/v1")
                .service(web::scope("/auth").configure(auth::configure_routes))
                .configure(configure_api),
        );
}
