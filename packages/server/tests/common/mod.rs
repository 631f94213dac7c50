// Shared fixtures for the integration suites.
#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use server_core::domains::events::models::event::{
    Event, EventStatus, TicketType, TicketingType,
};
use server_core::domains::members::models::member::{Member, MemberStatus};
use server_core::domains::orders::fee::{FeeType, ServiceFee};

pub const GA_TICKET: &str = "General Admission";

/// A published gateway-managed event with one $25.00 ticket type,
/// capacity 100, and a 5% service fee.
pub fn gala_event(id: i64) -> Event {
    Event {
        id,
        title: "Annual Gala".to_string(),
        status: EventStatus::Published,
        ticketing_type: TicketingType::GatewayManaged,
        ticket_types: Json(vec![TicketType {
            name: GA_TICKET.to_string(),
            description: None,
            price: 2500,
            capacity: 100,
            sale_start: None,
            sale_end: None,
        }]),
        service_fee: Some(Json(ServiceFee {
            fee_type: FeeType::Percentage,
            fee_amount: Some(5),
        })),
        registration_capacity: None,
        start_date: Some(Utc::now() + Duration::days(30)),
        created_at: Utc::now(),
    }
}

/// A published free-registration event with the given overall capacity
/// (None = unlimited).
pub fn workshop_event(id: i64, capacity: Option<i32>) -> Event {
    Event {
        id,
        title: "Networking Workshop".to_string(),
        status: EventStatus::Published,
        ticketing_type: TicketingType::FreeRegistration,
        ticket_types: Json(vec![]),
        service_fee: None,
        registration_capacity: capacity,
        start_date: Some(Utc::now() + Duration::days(7)),
        created_at: Utc::now(),
    }
}

pub fn with_ticket(mut event: Event, ticket: TicketType) -> Event {
    event.ticket_types.0.push(ticket);
    event
}

pub fn ticket(name: &str, price: i64, capacity: i32) -> TicketType {
    TicketType {
        name: name.to_string(),
        description: None,
        price,
        capacity,
        sale_start: None,
        sale_end: None,
    }
}

/// A member row seeded directly in the given status.
pub fn member_in_status(status: MemberStatus) -> Member {
    Member {
        id: Uuid::new_v4(),
        contact_id: Uuid::new_v4(),
        primary_contact_id: None,
        membership_tier_id: None,
        status,
        joined_date: Utc::now(),
        renewal_date: None,
        stripe_customer_id: None,
        xero_contact_id: None,
        created_at: Utc::now(),
    }
}
