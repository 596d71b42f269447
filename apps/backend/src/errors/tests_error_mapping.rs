use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_422() {
    let app: AppError = DomainError::validation_other("bad field").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);

    let app: AppError =
        DomainError::validation(ValidationKind::DistanceExceeded, "too far").into();
    assert_eq!(app.code(), ErrorCode::DistanceExceeded);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::UniquePhone, "phone").into();
    assert_eq!(app.code().as_str(), "UNIQUE_PHONE");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError =
        DomainError::conflict(ConflictKind::InvalidStatusTransition, "no").into();
    assert_eq!(app.code().as_str(), "INVALID_STATUS_TRANSITION");

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("x".into()), "generic").into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Restaurant, "gone").into();
    assert_eq!(app.code().as_str(), "RESTAURANT_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError =
        DomainError::not_found(NotFoundKind::Other("Record".into()), "gone").into();
    assert_eq!(app.code().as_str(), "NOT_FOUND");
}

#[test]
fn maps_forbidden() {
    let app: AppError = DomainError::forbidden("not yours").into();
    assert_eq!(app.code(), ErrorCode::Forbidden);
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::corrupt("bad role").into();
    assert_eq!(app.code().as_str(), "DATA_CORRUPTION");
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError =
        DomainError::infra(InfraErrorKind::Other("x".into()), "other").into();
    assert_eq!(app.code().as_str(), "INTERNAL_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}
