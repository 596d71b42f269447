use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a failed login attempt. The identifier is redacted.
pub fn login_failed(reason: &str, identifier: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        identifier = %Redacted(identifier),
        reason,
        "Authentication failure"
    );
}

/// Log a request rejected by a role guard.
pub fn role_denied(user_id: i64, required: &str, actual: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ROLE_DENIED",
        %trace_id,
        user_id,
        required,
        actual,
        "Insufficient role"
    );
}
