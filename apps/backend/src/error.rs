use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::infra::db_errors::map_db_err;
use crate::trace_ctx;

/// RFC 7807 problem body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Timeout: {detail}")]
    Timeout { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Unauthorized { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::DbUnavailable { .. } => ErrorCode::DbUnavailable,
            AppError::Timeout { .. } => ErrorCode::DbTimeout,
        }
    }

    fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Unauthorized { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail }
            | AppError::Db { detail }
            | AppError::DbUnavailable { detail }
            | AppError::Timeout { detail } => detail,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } | AppError::Config { .. } | AppError::Db { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::DbUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable(detail: impl Into<String>) -> Self {
        Self::DbUnavailable {
            detail: detail.into(),
        }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedMissingBearer,
            detail: "Missing or malformed Bearer token".to_string(),
        }
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedInvalidJwt,
            detail: "Invalid JWT".to_string(),
        }
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedExpiredJwt,
            detail: "Token expired".to_string(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized {
            code: ErrorCode::InvalidCredentials,
            detail: "Invalid credentials".to_string(),
        }
    }

    pub fn account_disabled() -> Self {
        Self::Forbidden {
            code: ErrorCode::AccountDisabled,
            detail: "Account is disabled".to_string(),
        }
    }

    pub fn insufficient_role(required: &str) -> Self {
        Self::Forbidden {
            code: ErrorCode::InsufficientRole,
            detail: format!("Role '{required}' required"),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code: ErrorCode::Forbidden,
            detail: detail.into(),
        }
    }

    pub fn forbidden_user_not_found() -> Self {
        Self::Forbidden {
            code: ErrorCode::ForbiddenUserNotFound,
            detail: "User not found in database".to_string(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn validation_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::InvalidEmail => ErrorCode::InvalidEmail,
        ValidationKind::InvalidPhone => ErrorCode::InvalidPhone,
        ValidationKind::InvalidPassword => ErrorCode::InvalidPassword,
        ValidationKind::InvalidRole => ErrorCode::InvalidRole,
        ValidationKind::InvalidQuantity => ErrorCode::InvalidQuantity,
        ValidationKind::InvalidPrice => ErrorCode::InvalidPrice,
        ValidationKind::InvalidCoordinates => ErrorCode::InvalidCoordinates,
        ValidationKind::InvalidBusinessHours => ErrorCode::InvalidBusinessHours,
        ValidationKind::InvalidTimeWindow => ErrorCode::InvalidTimeWindow,
        ValidationKind::InvalidRefundAmount => ErrorCode::InvalidRefundAmount,
        ValidationKind::EmptyOrder => ErrorCode::EmptyOrder,
        ValidationKind::MenuItemUnavailable => ErrorCode::MenuItemUnavailable,
        ValidationKind::DistanceExceeded => ErrorCode::DistanceExceeded,
        ValidationKind::OutsideServiceArea => ErrorCode::OutsideServiceArea,
        ValidationKind::DriverUnavailable => ErrorCode::DriverUnavailable,
        ValidationKind::PaymentsDisabled => ErrorCode::PaymentsDisabled,
        ValidationKind::InvalidRoleScope => ErrorCode::InvalidRoleScope,
        ValidationKind::InvalidShiftLimits => ErrorCode::InvalidShiftLimits,
        ValidationKind::Other(_) => ErrorCode::ValidationError,
    }
}

fn conflict_code(kind: &ConflictKind) -> ErrorCode {
    match kind {
        ConflictKind::UniqueEmail => ErrorCode::UniqueEmail,
        ConflictKind::UniquePhone => ErrorCode::UniquePhone,
        ConflictKind::DriverProfileExists => ErrorCode::DriverProfileExists,
        ConflictKind::BusinessHoursExists => ErrorCode::BusinessHoursExists,
        ConflictKind::ShiftAlreadyActive => ErrorCode::ShiftAlreadyActive,
        ConflictKind::InvalidStatusTransition => ErrorCode::InvalidStatusTransition,
        ConflictKind::AlreadyRefunded => ErrorCode::AlreadyRefunded,
        ConflictKind::PaymentExists => ErrorCode::PaymentExists,
        ConflictKind::PaymentNotCaptured => ErrorCode::PaymentNotCaptured,
        ConflictKind::CartRestaurantMismatch => ErrorCode::CartRestaurantMismatch,
        ConflictKind::DeliveryAlreadyAssigned => ErrorCode::DeliveryAlreadyAssigned,
        ConflictKind::CityExists => ErrorCode::CityExists,
        ConflictKind::RoleExists => ErrorCode::RoleExists,
        ConflictKind::RoleAlreadyAssigned => ErrorCode::RoleAlreadyAssigned,
        ConflictKind::ShiftLeadExists => ErrorCode::ShiftLeadExists,
        ConflictKind::Other(_) => ErrorCode::Conflict,
    }
}

fn not_found_code(kind: &NotFoundKind) -> ErrorCode {
    match kind {
        NotFoundKind::User => ErrorCode::UserNotFound,
        NotFoundKind::Restaurant => ErrorCode::RestaurantNotFound,
        NotFoundKind::MenuItem => ErrorCode::MenuItemNotFound,
        NotFoundKind::Order => ErrorCode::OrderNotFound,
        NotFoundKind::Driver => ErrorCode::DriverNotFound,
        NotFoundKind::Shift => ErrorCode::ShiftNotFound,
        NotFoundKind::Delivery => ErrorCode::DeliveryNotFound,
        NotFoundKind::Payment => ErrorCode::PaymentNotFound,
        NotFoundKind::BusinessHours => ErrorCode::BusinessHoursNotFound,
        NotFoundKind::Geofence => ErrorCode::GeofenceNotFound,
        NotFoundKind::City => ErrorCode::CityNotFound,
        NotFoundKind::Role => ErrorCode::RoleNotFound,
        NotFoundKind::RoleAssignment => ErrorCode::RoleAssignmentNotFound,
        NotFoundKind::Other(_) => ErrorCode::NotFound,
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => AppError::invalid(validation_code(&kind), detail),
            DomainError::Conflict(kind, detail) => AppError::conflict(conflict_code(&kind), detail),
            DomainError::NotFound(kind, detail) => AppError::not_found(not_found_code(&kind), detail),
            DomainError::Forbidden(detail) => AppError::forbidden(detail),
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::Timeout => AppError::Timeout { detail },
                InfraErrorKind::DbUnavailable => AppError::DbUnavailable { detail },
                InfraErrorKind::DataCorruption => AppError::Internal {
                    code: ErrorCode::DataCorruption,
                    detail,
                },
                InfraErrorKind::Other(_) => AppError::internal(detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(map_db_err(e))
    }
}

impl From<db_infra::DbInfraError> for AppError {
    fn from(e: db_infra::DbInfraError) -> Self {
        match e {
            db_infra::DbInfraError::Config { message } => AppError::config(message),
            db_infra::DbInfraError::Connect { message } => AppError::db_unavailable(message),
            db_infra::DbInfraError::Migration { message } => AppError::internal(message),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://food-backend.dev/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail().to_string(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
