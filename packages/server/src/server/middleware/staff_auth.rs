use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::server::app::AppState;

/// Authenticated staff identity, inserted into request extensions once the
/// bearer token checks out. Used as the audit actor id for staff actions.
#[derive(Clone, Debug)]
pub struct StaffUser {
    pub actor_id: String,
}

/// Staff API authentication middleware.
///
/// Compares the Authorization bearer token against STAFF_API_TOKEN. When no
/// token is configured the staff surface is disabled entirely.
pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.staff_api_token.as_deref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "Staff API is not configured" })),
        )
            .into_response();
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => {
            request.extensions_mut().insert(StaffUser {
                actor_id: "staff-api".to_string(),
            });
            next.run(request).await
        }
        _ => {
            warn!(path = %request.uri().path(), "staff auth rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Unauthorized" })),
            )
                .into_response()
        }
    }
}

// Length leaks, byte contents do not.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_tokens_match() {
        assert!(constant_time_eq(b"staff_secret", b"staff_secret"));
    }

    #[test]
    fn different_tokens_do_not_match() {
        assert!(!constant_time_eq(b"staff_secret", b"staff_secreT"));
        assert!(!constant_time_eq(b"staff_secret", b"staff"));
        assert!(!constant_time_eq(b"", b"x"));
    }
}
