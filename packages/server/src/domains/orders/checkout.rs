use std::collections::HashMap;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::common::{ServiceError, ServiceResult};
use crate::domains::events::models::event::{EventStatus, TicketingType};
use crate::domains::orders::fee::calculate_service_fee;
use crate::domains::orders::models::order::{NewOrder, OrderStatus};
use crate::kernel::{PaymentIntentRequest, ServerDeps};

/// Input for creating a payment intent for gateway-managed event tickets.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentInput {
    pub event_id: i64,
    pub ticket_type: String,
    pub quantity: i32,
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub contact_id: Option<Uuid>,
}

/// Result returned to the checkout route (and ultimately the frontend).
/// All amounts in minor units.
#[derive(Debug, Clone)]
pub struct PaymentIntentResult {
    pub client_secret: String,
    pub payment_intent_id: String,
    /// price x quantity, before fee or tax
    pub base_amount: i64,
    pub service_fee_amount: i64,
    /// 0 when no tax is configured
    pub tax_amount: i64,
    /// Tax display name from site settings, empty string if none
    pub tax_name: String,
    pub total_amount: i64,
}

/// The core checkout operation:
///
/// 1. Validates the event is published and gateway-managed
/// 2. Resolves the ticket type and its sale window
/// 3. Enforces capacity under the per-(event, ticket-type) lock
/// 4. Computes base + service fee + tax
/// 5. Creates the gateway Payment Intent
/// 6. Inserts a pending order carrying the intent id
///
/// The pending order is not audited; the audit trail for a paid order
/// starts at webhook confirmation.
pub async fn create_payment_intent(
    input: CreatePaymentIntentInput,
    deps: &ServerDeps,
) -> ServiceResult<PaymentIntentResult> {
    if input.quantity < 1 {
        return Err(ServiceError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let event = deps
        .events
        .find_by_id(input.event_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Event {} not found", input.event_id)))?;

    if event.status != EventStatus::Published {
        return Err(ServiceError::NotAvailable(format!(
            "Event \"{}\" is not available for ticket sales",
            event.title
        )));
    }

    if event.ticketing_type != TicketingType::GatewayManaged {
        return Err(ServiceError::NotConfigured(format!(
            "Event \"{}\" is not set up for gateway-managed ticketing",
            event.title
        )));
    }

    let ticket = event.find_ticket(&input.ticket_type).ok_or_else(|| {
        ServiceError::NotFound(format!(
            "Ticket type \"{}\" not found on event \"{}\"",
            input.ticket_type, event.title
        ))
    })?;

    let now = Utc::now();
    if ticket.sale_start.map_or(false, |start| start > now) {
        return Err(ServiceError::SaleWindowClosed(format!(
            "Ticket sales for \"{}\" have not started yet",
            input.ticket_type
        )));
    }
    if ticket.sale_end.map_or(false, |end| end < now) {
        return Err(ServiceError::SaleWindowClosed(format!(
            "Ticket sales for \"{}\" have ended",
            input.ticket_type
        )));
    }

    // Capacity check and order insert must be atomic as a pair, otherwise
    // two concurrent requests can both pass the check and oversell.
    let _guard = deps
        .capacity
        .acquire(input.event_id, Some(&input.ticket_type))
        .await;

    let committed = deps
        .orders
        .committed_quantity(input.event_id, Some(&input.ticket_type))
        .await?;
    // Clamped: capacity edited below committed sales must not surface a
    // negative count to the buyer
    let remaining = (ticket.capacity as i64 - committed).max(0);

    if input.quantity as i64 > remaining {
        return Err(ServiceError::CapacityExceeded {
            remaining,
            message: format!(
                "Cannot purchase {} \"{}\" tickets, only {} remaining",
                input.quantity, input.ticket_type, remaining
            ),
        });
    }

    let base_amount = ticket.price * input.quantity as i64;
    let service_fee_amount = calculate_service_fee(base_amount, event.service_fee());

    let settings = deps.settings.get().await?;
    let tax_amount = if settings.tax_rate > 0 {
        (base_amount + service_fee_amount) * settings.tax_rate / 100
    } else {
        0
    };
    let total_amount = base_amount + service_fee_amount + tax_amount;

    let mut metadata = HashMap::new();
    metadata.insert("eventId".to_string(), input.event_id.to_string());
    metadata.insert("eventTitle".to_string(), event.title.clone());
    metadata.insert("ticketType".to_string(), input.ticket_type.clone());
    metadata.insert("quantity".to_string(), input.quantity.to_string());
    metadata.insert("purchaserEmail".to_string(), input.purchaser_email.clone());

    let intent = deps
        .gateway
        .create_payment_intent(PaymentIntentRequest {
            amount: total_amount,
            currency: "cad".to_string(),
            receipt_email: Some(input.purchaser_email.clone()),
            description: Some(format!(
                "{} - {}x {}",
                event.title, input.quantity, input.ticket_type
            )),
            metadata,
        })
        .await?;

    deps.orders
        .insert(NewOrder {
            purchaser_name: input.purchaser_name,
            purchaser_email: input.purchaser_email,
            event_id: input.event_id,
            ticket_type: input.ticket_type,
            quantity: input.quantity,
            contact_id: input.contact_id,
            stripe_payment_intent_id: Some(intent.id.clone()),
            total_amount,
            service_fee_amount,
            tax_amount,
            status: OrderStatus::Pending,
            qr_token: None,
        })
        .await?;

    info!(
        event_id = input.event_id,
        intent_id = %intent.id,
        total_amount,
        "payment intent created"
    );

    Ok(PaymentIntentResult {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
        base_amount,
        service_fee_amount,
        tax_amount,
        tax_name: settings.tax_name,
        total_amount,
    })
}
