use tracing::info;
use uuid::Uuid;

use crate::common::{ActorType, EntityType, ServiceError, ServiceResult};
use crate::domains::audit::models::audit_log::NewAuditEntry;
use crate::domains::audit::AuditLogger;
use crate::domains::events::models::event::{EventStatus, TicketingType};
use crate::domains::orders::models::order::{NewOrder, OrderStatus};
use crate::domains::orders::service::generate_qr_token;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone)]
pub struct CreateFreeRegistrationInput {
    pub event_id: i64,
    /// Ticket type name to store on the order (e.g. "General Registration").
    pub ticket_type: String,
    pub quantity: i32,
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub contact_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct FreeRegistrationResult {
    pub order_id: Uuid,
    /// 64-char hex access token for ticket validation.
    pub qr_token: String,
}

/// Create a confirmed registration for a free event ticket.
///
/// Handles two ticketing variants:
/// - free-registration: single implicit ticket, event-level capacity
/// - gateway-managed with a price-0 ticket: the ticket's own capacity
///
/// Unlike paid checkout this creates the order directly in confirmed
/// status with a token, and the creation itself is audited.
pub async fn create_free_registration(
    input: CreateFreeRegistrationInput,
    deps: &ServerDeps,
) -> ServiceResult<FreeRegistrationResult> {
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
            "Event \"{}\" is not available for registration",
            event.title
        )));
    }

    let gateway_managed = match event.ticketing_type {
        TicketingType::FreeRegistration => false,
        TicketingType::GatewayManaged => true,
        _ => {
            return Err(ServiceError::NotConfigured(format!(
                "Event \"{}\" is not set up for registration",
                event.title
            )))
        }
    };

    // Capacity and its scope differ by variant: the ticket type's own
    // capacity for gateway-managed, the event's registration capacity
    // (NULL = unlimited) for free-registration.
    let capacity: Option<i64> = if gateway_managed {
        let ticket = event.find_ticket(&input.ticket_type).ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Ticket type \"{}\" not found on event \"{}\"",
                input.ticket_type, event.title
            ))
        })?;
        if ticket.price > 0 {
            return Err(ServiceError::NotFree(format!(
                "Ticket type \"{}\" is not a free ticket, use the checkout flow for paid tickets",
                input.ticket_type
            )));
        }
        Some(ticket.capacity as i64)
    } else {
        event.registration_capacity.map(|c| c as i64)
    };

    let scope = gateway_managed.then_some(input.ticket_type.as_str());
    let _guard = deps.capacity.acquire(input.event_id, scope).await;

    if let Some(capacity) = capacity {
        let committed = deps
            .orders
            .committed_quantity(input.event_id, scope)
            .await?;
        let remaining = (capacity - committed).max(0);

        if input.quantity as i64 > remaining {
            return Err(ServiceError::CapacityExceeded {
                remaining,
                message: format!(
                    "Cannot register {}, only {} remaining",
                    input.quantity, remaining
                ),
            });
        }
    }

    let qr_token = generate_qr_token();

    let order = deps
        .orders
        .insert(NewOrder {
            purchaser_name: input.purchaser_name,
            purchaser_email: input.purchaser_email,
            event_id: input.event_id,
            ticket_type: input.ticket_type,
            quantity: input.quantity,
            contact_id: input.contact_id,
            stripe_payment_intent_id: None,
            total_amount: 0,
            service_fee_amount: 0,
            tax_amount: 0,
            status: OrderStatus::Confirmed,
            qr_token: Some(qr_token.clone()),
        })
        .await?;

    AuditLogger::new(deps.audit.clone())
        .log(NewAuditEntry {
            entity_type: EntityType::Order,
            entity_id: order.id.to_string(),
            action: "created".to_string(),
            from_state: None,
            to_state: Some(OrderStatus::Confirmed.to_string()),
            actor_id: ActorType::System.to_string(),
            actor_type: ActorType::System,
            metadata: Some(serde_json::json!({
                "eventId": input.event_id.to_string(),
                "free": "true",
            })),
        })
        .await?;

    info!(order_id = %order.id, event_id = input.event_id, "free registration created");

    Ok(FreeRegistrationResult {
        order_id: order.id,
        qr_token,
    })
}
