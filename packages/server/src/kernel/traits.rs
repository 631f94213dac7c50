// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Each store
// exposes exactly the operations the services need, nothing more; the
// audit store in particular has no read, update, or delete methods.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::ServiceResult;
use crate::domains::audit::models::audit_log::NewAuditEntry;
use crate::domains::contacts::models::contact::{Contact, NewContact};
use crate::domains::events::models::event::{Event, SiteSettings};
use crate::domains::members::models::member::{Member, MemberStatus, NewMember};
use crate::domains::orders::models::order::{NewOrder, Order, OrderStatus};

// =============================================================================
// Document stores
// =============================================================================

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Event>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Order>>;

    /// Look up by the unique gateway intent id (the confirmation
    /// idempotency key).
    async fn find_by_intent_id(&self, intent_id: &str) -> ServiceResult<Option<Order>>;

    async fn insert(&self, order: NewOrder) -> ServiceResult<Order>;

    /// Persist a status change; a supplied qr token is set only if the
    /// order has none yet.
    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        qr_token: Option<String>,
    ) -> ServiceResult<Order>;

    /// Sum of `quantity` over pending and confirmed orders for an event,
    /// optionally scoped to one ticket type.
    async fn committed_quantity(
        &self,
        event_id: i64,
        ticket_type: Option<&str>,
    ) -> ServiceResult<i64>;
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Member>>;
    async fn insert(&self, member: NewMember) -> ServiceResult<Member>;
    async fn update_status(&self, id: Uuid, status: MemberStatus) -> ServiceResult<Member>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Contact>>;
    async fn insert(&self, contact: NewContact) -> ServiceResult<Contact>;
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry. Deliberately the only method: the audit trail is
    /// write-once from this core's point of view.
    async fn insert(&self, entry: NewAuditEntry) -> ServiceResult<()>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self) -> ServiceResult<SiteSettings>;
}

// =============================================================================
// Onboarding intake
// =============================================================================

/// The member's billable contact for an intake: create a new row, or
/// reference one that already exists.
#[derive(Debug, Clone)]
pub enum BillableContact {
    Create(NewContact),
    Existing(Uuid),
}

/// The primary contact person for an intake. On `Create` the store fills
/// `organization_id` with the billable contact's id.
#[derive(Debug, Clone)]
pub enum PrimaryContact {
    Create(NewContact),
    Existing(Uuid),
}

/// All writes for one onboarding intake.
#[derive(Debug, Clone)]
pub struct IntakeWrites {
    pub billable: BillableContact,
    pub primary: Option<PrimaryContact>,
    pub membership_tier_id: Option<Uuid>,
    pub status: MemberStatus,
    pub joined_date: DateTime<Utc>,
}

/// The rows an intake produced or reused.
#[derive(Debug, Clone)]
pub struct IntakeRecords {
    pub contact_id: Uuid,
    pub primary_contact_id: Option<Uuid>,
    pub member: Member,
}

#[async_trait]
pub trait IntakeStore: Send + Sync {
    /// Apply an intake's contact and member inserts as one unit: either
    /// every row lands or none do. No partial intake may leave a contact
    /// without its member.
    async fn onboard(&self, intake: IntakeWrites) -> ServiceResult<IntakeRecords>;
}

// =============================================================================
// Payment gateway
// =============================================================================

/// Request to authorize a charge with the payment gateway.
#[derive(Debug, Clone, Default)]
pub struct PaymentIntentRequest {
    /// Total amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub receipt_email: Option<String>,
    pub description: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// The gateway's handle for an authorized-but-unconfirmed charge.
#[derive(Debug, Clone)]
pub struct GatewayIntent {
    pub id: String,
    /// Secret the frontend needs to complete payment.
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> ServiceResult<GatewayIntent>;
}
