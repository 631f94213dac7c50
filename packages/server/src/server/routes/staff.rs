// Staff order and membership management routes.

use std::str::FromStr;

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::common::{ActorType, ServiceError};
use crate::domains::members::models::member::MemberStatus;
use crate::domains::members::MembershipService;
use crate::domains::orders::OrderService;
use crate::server::app::AppState;
use crate::server::middleware::StaffUser;

#[derive(Debug, Default, Deserialize)]
pub struct RefundRequest {
    pub reason: Option<String>,
}

/// POST /api/staff/orders/:id/refund
pub async fn refund_order_handler(
    Extension(state): Extension<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(order_id): Path<Uuid>,
    body: Option<Json<RefundRequest>>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let Json(body) = body.unwrap_or_default();

    let order = OrderService::new(&state.deps)
        .refund(
            order_id,
            &staff.actor_id,
            ActorType::Staff,
            body.reason.as_deref(),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "orderId": order.id,
        "status": order.status,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub to_status: String,
    pub reason: Option<String>,
}

/// POST /api/staff/members/:id/transition
pub async fn member_transition_handler(
    Extension(state): Extension<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(member_id): Path<Uuid>,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let to_status = MemberStatus::from_str(&body.to_status)
        .map_err(|_| ServiceError::Validation(format!("Unknown status: {}", body.to_status)))?;

    let member = MembershipService::new(&state.deps)
        .transition_status(
            member_id,
            to_status,
            &staff.actor_id,
            ActorType::Staff,
            body.reason.as_deref(),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "memberId": member.id,
        "status": member.status,
    })))
}
