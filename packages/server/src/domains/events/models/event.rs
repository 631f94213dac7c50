use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domains::orders::fee::ServiceFee;

/// Publication status of an event. Only published events sell tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
}

/// How tickets are handled for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticketing_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TicketingType {
    /// No ticketing at all.
    None,
    /// Sales happen on another platform; we only link out.
    ExternalLink,
    /// Sales go through the payment gateway with per-ticket-type pricing.
    GatewayManaged,
    /// Free sign-up with a single implicit ticket and event-level capacity.
    FreeRegistration,
}

/// A sellable ticket type on a gateway-managed event.
///
/// Stored as JSONB on the event row; ticket types are event configuration
/// authored in the CMS, not rows this core owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in minor units (cents).
    pub price: i64,
    pub capacity: i32,
    #[serde(default)]
    pub sale_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sale_end: Option<DateTime<Utc>>,
}

/// Event document, read-only from this core's perspective.
///
/// The CMS owns events; we only load them to validate and price purchases.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub status: EventStatus,
    pub ticketing_type: TicketingType,
    pub ticket_types: Json<Vec<TicketType>>,
    pub service_fee: Option<Json<ServiceFee>>,
    /// Overall capacity for free-registration events. NULL = unlimited.
    pub registration_capacity: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a ticket type by its name key.
    pub fn find_ticket(&self, name: &str) -> Option<&TicketType> {
        self.ticket_types.iter().find(|t| t.name == name)
    }

    pub fn service_fee(&self) -> Option<&ServiceFee> {
        self.service_fee.as_deref()
    }
}

/// Site-wide settings singleton (tax configuration).
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct SiteSettings {
    /// Tax rate in whole percent (e.g. 13 for HST). 0 = no tax.
    pub tax_rate: i64,
    /// Display name for the tax line (e.g. "HST"). Empty if none.
    pub tax_name: String,
}

impl SiteSettings {
    pub async fn get(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, Self>(
            "SELECT tax_rate, tax_name FROM site_settings LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;
        Ok(row.unwrap_or_default())
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            tax_rate: 0,
            tax_name: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_ticket_matches_by_exact_name() {
        let event = Event {
            id: 1,
            title: "Annual Gala".to_string(),
            status: EventStatus::Published,
            ticketing_type: TicketingType::GatewayManaged,
            ticket_types: Json(vec![TicketType {
                name: "General Admission".to_string(),
                description: None,
                price: 2500,
                capacity: 100,
                sale_start: None,
                sale_end: None,
            }]),
            service_fee: None,
            registration_capacity: None,
            start_date: None,
            created_at: Utc::now(),
        };

        assert!(event.find_ticket("General Admission").is_some());
        assert!(event.find_ticket("general admission").is_none());
        assert!(event.find_ticket("VIP").is_none());
    }

    #[test]
    fn ticket_type_json_round_trips_cms_shape() {
        let json = r#"{
            "name": "Early Bird",
            "price": 1500,
            "capacity": 25,
            "saleStart": "2026-01-01T00:00:00Z"
        }"#;
        let ticket: TicketType = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.price, 1500);
        assert!(ticket.sale_start.is_some());
        assert!(ticket.sale_end.is_none());
    }
}
