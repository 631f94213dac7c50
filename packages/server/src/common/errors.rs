use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Domain errors for the order and membership services.
///
/// Each variant is an explicit error kind; the HTTP layer switches on the
/// variant, never on message substrings.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    /// Entity exists but is not in a usable state (e.g. unpublished event).
    #[error("{0}")]
    NotAvailable(String),

    /// Entity is not configured for the requested operation (e.g. wrong
    /// ticketing type).
    #[error("{0}")]
    NotConfigured(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    SaleWindowClosed(String),

    /// Requested quantity exceeds remaining capacity. The message always
    /// reports how many remain.
    #[error("{message}")]
    CapacityExceeded { remaining: i64, message: String },

    /// A priced ticket was submitted to the free registration path.
    #[error("{0}")]
    NotFree(String),

    /// A state machine edge that does not exist.
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("payment gateway error: {0}")]
    Gateway(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::NotAvailable(_)
            | ServiceError::NotConfigured(_)
            | ServiceError::SaleWindowClosed(_)
            | ServiceError::CapacityExceeded { .. }
            | ServiceError::NotFree(_)
            | ServiceError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Gateway(_)
            | ServiceError::Database(_)
            | ServiceError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller should see the real message. Internal failures get
    /// a generic body; the detail goes to the logs only.
    fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "An unexpected error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<stripe::StripeError> for ServiceError {
    fn from(err: stripe::StripeError) -> Self {
        ServiceError::Gateway(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_expected_status_codes() {
        assert_eq!(
            ServiceError::Validation("quantity must be at least 1".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::CapacityExceeded {
                remaining: 2,
                message: "only 2 remaining".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("no such event".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Gateway("card declined".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_transition_names_both_endpoints() {
        let err = ServiceError::InvalidTransition {
            entity: "order",
            from: "refunded".into(),
            to: "confirmed".into(),
        };
        let message = err.to_string();
        assert!(message.contains("refunded"));
        assert!(message.contains("confirmed"));
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ServiceError::Gateway("secret key sk_live_123 rejected".into());
        assert_eq!(err.public_message(), "An unexpected error occurred");
    }
}
