//! Centralized error codes for the food delivery backend.
//!
//! Every code that can appear in a problem-details response lives here so
//! the set stays closed and consistent across handlers.

use std::fmt;

/// Error codes returned in HTTP problem responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    InvalidCredentials,
    AccountDisabled,
    Forbidden,
    ForbiddenUserNotFound,
    InsufficientRole,

    // Request Validation
    ValidationError,
    BadRequest,
    InvalidEmail,
    InvalidPhone,
    InvalidPassword,
    InvalidRole,
    InvalidQuantity,
    InvalidPrice,
    InvalidCoordinates,
    InvalidBusinessHours,
    InvalidTimeWindow,
    InvalidRefundAmount,
    EmptyOrder,
    MenuItemUnavailable,
    DistanceExceeded,
    OutsideServiceArea,
    DriverUnavailable,
    PaymentsDisabled,
    InvalidRoleScope,
    InvalidShiftLimits,

    // Resource Not Found
    NotFound,
    UserNotFound,
    RestaurantNotFound,
    MenuItemNotFound,
    OrderNotFound,
    DriverNotFound,
    ShiftNotFound,
    DeliveryNotFound,
    PaymentNotFound,
    BusinessHoursNotFound,
    GeofenceNotFound,
    CityNotFound,
    RoleNotFound,
    RoleAssignmentNotFound,

    // Business Logic Conflicts
    Conflict,
    UniqueEmail,
    UniquePhone,
    DriverProfileExists,
    BusinessHoursExists,
    ShiftAlreadyActive,
    InvalidStatusTransition,
    AlreadyRefunded,
    PaymentExists,
    PaymentNotCaptured,
    CartRestaurantMismatch,
    DeliveryAlreadyAssigned,
    CityExists,
    RoleExists,
    RoleAlreadyAssigned,
    ShiftLeadExists,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    InternalError,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Authentication & Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",

            // Request Validation
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidCoordinates => "INVALID_COORDINATES",
            Self::InvalidBusinessHours => "INVALID_BUSINESS_HOURS",
            Self::InvalidTimeWindow => "INVALID_TIME_WINDOW",
            Self::InvalidRefundAmount => "INVALID_REFUND_AMOUNT",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::MenuItemUnavailable => "MENU_ITEM_UNAVAILABLE",
            Self::DistanceExceeded => "DISTANCE_EXCEEDED",
            Self::OutsideServiceArea => "OUTSIDE_SERVICE_AREA",
            Self::DriverUnavailable => "DRIVER_UNAVAILABLE",
            Self::PaymentsDisabled => "PAYMENTS_DISABLED",
            Self::InvalidRoleScope => "INVALID_ROLE_SCOPE",
            Self::InvalidShiftLimits => "INVALID_SHIFT_LIMITS",

            // Resource Not Found
            Self::NotFound => "NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RestaurantNotFound => "RESTAURANT_NOT_FOUND",
            Self::MenuItemNotFound => "MENU_ITEM_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::DriverNotFound => "DRIVER_NOT_FOUND",
            Self::ShiftNotFound => "SHIFT_NOT_FOUND",
            Self::DeliveryNotFound => "DELIVERY_NOT_FOUND",
            Self::PaymentNotFound => "PAYMENT_NOT_FOUND",
            Self::BusinessHoursNotFound => "BUSINESS_HOURS_NOT_FOUND",
            Self::GeofenceNotFound => "GEOFENCE_NOT_FOUND",
            Self::CityNotFound => "CITY_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::RoleAssignmentNotFound => "ROLE_ASSIGNMENT_NOT_FOUND",

            // Business Logic Conflicts
            Self::Conflict => "CONFLICT",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::UniquePhone => "UNIQUE_PHONE",
            Self::DriverProfileExists => "DRIVER_PROFILE_EXISTS",
            Self::BusinessHoursExists => "BUSINESS_HOURS_EXISTS",
            Self::ShiftAlreadyActive => "SHIFT_ALREADY_ACTIVE",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::AlreadyRefunded => "ALREADY_REFUNDED",
            Self::PaymentExists => "PAYMENT_EXISTS",
            Self::PaymentNotCaptured => "PAYMENT_NOT_CAPTURED",
            Self::CartRestaurantMismatch => "CART_RESTAURANT_MISMATCH",
            Self::DeliveryAlreadyAssigned => "DELIVERY_ALREADY_ASSIGNED",
            Self::CityExists => "CITY_EXISTS",
            Self::RoleExists => "ROLE_EXISTS",
            Self::RoleAlreadyAssigned => "ROLE_ALREADY_ASSIGNED",
            Self::ShiftLeadExists => "SHIFT_LEAD_EXISTS",

            // System Errors
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
