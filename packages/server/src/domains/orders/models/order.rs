use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Order lifecycle states. The only edges are
/// `pending -> confirmed -> refunded`; refunded is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Refunded,
}

impl OrderStatus {
    /// The order state machine, as data.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Refunded)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket order. Never hard-deleted; refund is a terminal status.
///
/// All monetary fields are integer minor units.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub event_id: i64,
    /// Name key of the ticket type on the event, not a foreign key.
    pub ticket_type: String,
    pub quantity: i32,
    pub contact_id: Option<Uuid>,
    /// Unique gateway intent id; the idempotency key for confirmation.
    pub stripe_payment_intent_id: Option<String>,
    pub total_amount: i64,
    pub service_fee_amount: i64,
    pub tax_amount: i64,
    pub status: OrderStatus,
    /// 64-char lowercase hex access token, set exactly once on confirmation.
    pub qr_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub event_id: i64,
    pub ticket_type: String,
    pub quantity: i32,
    pub contact_id: Option<Uuid>,
    pub stripe_payment_intent_id: Option<String>,
    pub total_amount: i64,
    pub service_fee_amount: i64,
    pub tax_amount: i64,
    pub status: OrderStatus,
    pub qr_token: Option<String>,
}

impl Order {
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_intent_id(
        intent_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM orders WHERE stripe_payment_intent_id = $1")
            .bind(intent_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn insert(new: &NewOrder, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO orders (
                purchaser_name,
                purchaser_email,
                event_id,
                ticket_type,
                quantity,
                contact_id,
                stripe_payment_intent_id,
                total_amount,
                service_fee_amount,
                tax_amount,
                status,
                qr_token
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(&new.purchaser_name)
        .bind(&new.purchaser_email)
        .bind(new.event_id)
        .bind(&new.ticket_type)
        .bind(new.quantity)
        .bind(new.contact_id)
        .bind(&new.stripe_payment_intent_id)
        .bind(new.total_amount)
        .bind(new.service_fee_amount)
        .bind(new.tax_amount)
        .bind(new.status)
        .bind(&new.qr_token)
        .fetch_one(pool)
        .await
    }

    /// Update an order's status, setting the qr token if one is supplied.
    /// An existing token is never overwritten or cleared.
    pub async fn update_status(
        id: Uuid,
        status: OrderStatus,
        qr_token: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE orders
             SET status = $2, qr_token = COALESCE(qr_token, $3)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(qr_token)
        .fetch_one(pool)
        .await
    }

    /// Total quantity committed against an event's capacity: the sum over
    /// orders in pending or confirmed status. Refunded orders release their
    /// spots. A `None` ticket type scopes the sum to the whole event.
    pub async fn committed_quantity(
        event_id: i64,
        ticket_type: Option<&str>,
        pool: &PgPool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)
             FROM orders
             WHERE event_id = $1
               AND ($2::text IS NULL OR ticket_type = $2)
               AND status IN ('pending', 'confirmed')",
        )
        .bind(event_id)
        .bind(ticket_type)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_edges_are_allowed() {
        use OrderStatus::*;

        let all = [Pending, Confirmed, Refunded];
        for from in all {
            for to in all {
                let allowed = matches!((from, to), (Pending, Confirmed) | (Confirmed, Refunded));
                assert_eq!(
                    from.can_transition_to(to),
                    allowed,
                    "unexpected result for {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn refunded_is_terminal() {
        assert!(!OrderStatus::Refunded.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Refunded.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Refunded.can_transition_to(OrderStatus::Refunded));
    }
}
