use std::sync::Arc;

use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use crate::common::{ActorType, EntityType, ServiceError, ServiceResult};
use crate::domains::audit::models::audit_log::NewAuditEntry;
use crate::domains::audit::AuditLogger;
use crate::domains::orders::models::order::{NewOrder, Order, OrderStatus};
use crate::kernel::{OrderStore, ServerDeps};

/// Input for creating a new order when a Payment Intent is created.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub event_id: i64,
    pub ticket_type: String,
    pub quantity: i32,
    pub contact_id: Option<Uuid>,
    pub stripe_payment_intent_id: String,
    /// Total charged amount in minor units.
    pub total_amount: i64,
    /// Service fee in minor units, tracked separately for reporting.
    pub service_fee_amount: i64,
    pub tax_amount: i64,
}

/// Service for order lifecycle management.
///
/// All status transitions go through this service so that:
/// 1. Only valid transitions happen (pending -> confirmed -> refunded)
/// 2. Webhook processing is idempotent (no duplicate orders or tokens)
/// 3. The qr token is generated exactly once, on confirmation
/// 4. Every transition is audit-logged
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    audit: AuditLogger,
}

impl OrderService {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            orders: deps.orders.clone(),
            audit: AuditLogger::new(deps.audit.clone()),
        }
    }

    /// Create a new order in pending status, idempotent by the gateway
    /// intent id: a second call with the same id returns the existing
    /// order untouched.
    pub async fn create_order(&self, input: CreateOrderInput) -> ServiceResult<Order> {
        if let Some(existing) = self
            .orders
            .find_by_intent_id(&input.stripe_payment_intent_id)
            .await?
        {
            return Ok(existing);
        }

        let order = self
            .orders
            .insert(NewOrder {
                purchaser_name: input.purchaser_name,
                purchaser_email: input.purchaser_email,
                event_id: input.event_id,
                ticket_type: input.ticket_type,
                quantity: input.quantity,
                contact_id: input.contact_id,
                stripe_payment_intent_id: Some(input.stripe_payment_intent_id.clone()),
                total_amount: input.total_amount,
                service_fee_amount: input.service_fee_amount,
                tax_amount: input.tax_amount,
                status: OrderStatus::Pending,
                qr_token: None,
            })
            .await?;

        self.audit
            .log(NewAuditEntry {
                entity_type: EntityType::Order,
                entity_id: order.id.to_string(),
                action: "created".to_string(),
                from_state: None,
                to_state: Some(OrderStatus::Pending.to_string()),
                actor_id: ActorType::System.to_string(),
                actor_type: ActorType::System,
                metadata: Some(serde_json::json!({
                    "stripePaymentIntentId": input.stripe_payment_intent_id,
                    "eventId": order.event_id.to_string(),
                })),
            })
            .await?;

        Ok(order)
    }

    /// Confirm an order after successful payment (webhook callback).
    ///
    /// Idempotent: a webhook redelivered for an already-confirmed order is
    /// a pure no-op returning the order with its original token.
    pub async fn confirm_from_webhook(&self, intent_id: &str) -> ServiceResult<Order> {
        let order = self
            .orders
            .find_by_intent_id(intent_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No order found for Payment Intent: {}", intent_id))
            })?;

        if order.status == OrderStatus::Confirmed {
            return Ok(order);
        }

        validate_transition(&order, OrderStatus::Confirmed)?;

        let qr_token = generate_qr_token();
        let updated = self
            .orders
            .update_status(order.id, OrderStatus::Confirmed, Some(qr_token))
            .await?;

        self.audit
            .log(NewAuditEntry {
                entity_type: EntityType::Order,
                entity_id: order.id.to_string(),
                action: "status_changed".to_string(),
                from_state: Some(OrderStatus::Pending.to_string()),
                to_state: Some(OrderStatus::Confirmed.to_string()),
                actor_id: ActorType::Webhook.to_string(),
                actor_type: ActorType::Webhook,
                metadata: Some(serde_json::json!({
                    "stripePaymentIntentId": intent_id,
                })),
            })
            .await?;

        info!(order_id = %order.id, intent_id, "order confirmed");
        Ok(updated)
    }

    /// Refund a confirmed order. Called by staff or a gateway refund
    /// webhook. Refund is terminal; a second attempt is rejected.
    pub async fn refund(
        &self,
        order_id: Uuid,
        actor_id: &str,
        actor_type: ActorType,
        reason: Option<&str>,
    ) -> ServiceResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        validate_transition(&order, OrderStatus::Refunded)?;

        let updated = self
            .orders
            .update_status(order.id, OrderStatus::Refunded, None)
            .await?;

        self.audit
            .log(NewAuditEntry {
                entity_type: EntityType::Order,
                entity_id: order.id.to_string(),
                action: "status_changed".to_string(),
                from_state: Some(order.status.to_string()),
                to_state: Some(OrderStatus::Refunded.to_string()),
                actor_id: actor_id.to_string(),
                actor_type,
                metadata: reason.map(|r| serde_json::json!({ "reason": r })),
            })
            .await?;

        info!(order_id = %order.id, "order refunded");
        Ok(updated)
    }
}

fn validate_transition(order: &Order, to: OrderStatus) -> ServiceResult<()> {
    if !order.status.can_transition_to(to) {
        return Err(ServiceError::InvalidTransition {
            entity: "order",
            from: order.status.to_string(),
            to: to.to_string(),
        });
    }
    Ok(())
}

/// Generate a cryptographically random access token for ticket validation:
/// 32 bytes of entropy as 64 lowercase hex characters.
pub fn generate_qr_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_token_is_64_lowercase_hex() {
        let token = generate_qr_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn qr_tokens_do_not_repeat() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_qr_token()));
        }
    }
}
