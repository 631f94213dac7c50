use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, warn};

use crate::common::ActorType;
use crate::domains::orders::OrderService;
use crate::server::app::AppState;

/// POST /api/webhooks/stripe
///
/// Verifies the `stripe-signature` header before touching the payload, then
/// dispatches by event type. Unhandled event types are acknowledged so
/// Stripe stops redelivering them.
pub async fn stripe_webhook_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    else {
        return bad_request("Missing stripe-signature header");
    };

    let event = match stripe::webhook::construct_event(
        &body,
        signature,
        &state.stripe_webhook_secret,
    ) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "webhook signature verification failed");
            return bad_request("Invalid signature");
        }
    };

    let service = OrderService::new(&state.deps);

    match event.event_type.as_str() {
        "payment_intent.succeeded" => {
            let Some(intent_id) = event.object_id() else {
                return bad_request("Event payload has no object id");
            };
            match service.confirm_from_webhook(intent_id).await {
                Ok(order) => {
                    info!(order_id = %order.id, intent_id, "webhook confirmed order");
                    (StatusCode::OK, "ok").into_response()
                }
                Err(err) => err.into_response(),
            }
        }
        "charge.refunded" => {
            let Some(intent_id) = refund_intent_id(&event) else {
                return bad_request("Refund payload has no payment_intent");
            };
            match refund_by_intent(&service, &state, intent_id).await {
                Ok(()) => (StatusCode::OK, "ok").into_response(),
                Err(err) => err.into_response(),
            }
        }
        other => {
            debug!(event_type = other, "ignoring unhandled webhook event");
            (StatusCode::OK, "ok").into_response()
        }
    }
}

fn refund_intent_id(event: &stripe::WebhookEvent) -> Option<&str> {
    event.data.object.get("payment_intent")?.as_str()
}

async fn refund_by_intent(
    service: &OrderService,
    state: &AppState,
    intent_id: &str,
) -> Result<(), crate::common::ServiceError> {
    let order = state
        .deps
        .orders
        .find_by_intent_id(intent_id)
        .await?
        .ok_or_else(|| {
            crate::common::ServiceError::NotFound(format!(
                "No order found for Payment Intent: {}",
                intent_id
            ))
        })?;

    service
        .refund(
            order.id,
            &ActorType::Webhook.to_string(),
            ActorType::Webhook,
            Some("gateway refund"),
        )
        .await?;
    Ok(())
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
