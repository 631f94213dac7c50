// In-memory store implementations and a recording payment gateway for
// tests. Not cfg(test)-gated so integration suites under tests/ can use
// them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::common::{ServiceError, ServiceResult};
use crate::domains::audit::models::audit_log::{AuditLog, NewAuditEntry};
use crate::domains::contacts::models::contact::{Contact, NewContact};
use crate::domains::events::models::event::{Event, SiteSettings};
use crate::domains::members::models::member::{Member, MemberStatus, NewMember};
use crate::domains::orders::models::order::{NewOrder, Order, OrderStatus};
use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::{
    AuditStore, BillableContact, ContactStore, EventStore, GatewayIntent, IntakeRecords,
    IntakeStore, IntakeWrites, MemberStore, OrderStore, PaymentGateway, PaymentIntentRequest,
    PrimaryContact, SettingsStore,
};

// =============================================================================
// In-memory stores
// =============================================================================

#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<HashMap<i64, Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, event: Event) {
        self.events.lock().unwrap().insert(event.id, event);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Event>> {
        Ok(self.events.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> ServiceResult<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.stripe_payment_intent_id.as_deref() == Some(intent_id))
            .cloned())
    }

    async fn insert(&self, new: NewOrder) -> ServiceResult<Order> {
        let mut orders = self.orders.lock().unwrap();

        // Mirror the unique index on stripe_payment_intent_id
        if let Some(intent_id) = &new.stripe_payment_intent_id {
            if orders
                .iter()
                .any(|o| o.stripe_payment_intent_id.as_deref() == Some(intent_id))
            {
                return Err(ServiceError::Unexpected(anyhow!(
                    "duplicate payment intent id: {}",
                    intent_id
                )));
            }
        }

        let order = Order {
            id: Uuid::new_v4(),
            purchaser_name: new.purchaser_name,
            purchaser_email: new.purchaser_email,
            event_id: new.event_id,
            ticket_type: new.ticket_type,
            quantity: new.quantity,
            contact_id: new.contact_id,
            stripe_payment_intent_id: new.stripe_payment_intent_id,
            total_amount: new.total_amount,
            service_fee_amount: new.service_fee_amount,
            tax_amount: new.tax_amount,
            status: new.status,
            qr_token: new.qr_token,
            created_at: Utc::now(),
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        qr_token: Option<String>,
    ) -> ServiceResult<Order> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?;

        order.status = status;
        if order.qr_token.is_none() {
            order.qr_token = qr_token;
        }
        Ok(order.clone())
    }

    async fn committed_quantity(
        &self,
        event_id: i64,
        ticket_type: Option<&str>,
    ) -> ServiceResult<i64> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .iter()
            .filter(|o| o.event_id == event_id)
            .filter(|o| ticket_type.map_or(true, |t| o.ticket_type == t))
            .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::Confirmed))
            .map(|o| o.quantity as i64)
            .sum())
    }
}

#[derive(Default)]
pub struct InMemoryMemberStore {
    members: Mutex<Vec<Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Member> {
        self.members.lock().unwrap().clone()
    }

    /// Seed a member directly in a given status.
    pub fn put(&self, member: Member) {
        self.members.lock().unwrap().push(member);
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Member>> {
        Ok(self.members.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn insert(&self, new: NewMember) -> ServiceResult<Member> {
        let member = Member {
            id: Uuid::new_v4(),
            contact_id: new.contact_id,
            primary_contact_id: new.primary_contact_id,
            membership_tier_id: new.membership_tier_id,
            status: new.status,
            joined_date: new.joined_date,
            renewal_date: None,
            stripe_customer_id: None,
            xero_contact_id: None,
            created_at: Utc::now(),
        };
        self.members.lock().unwrap().push(member.clone());
        Ok(member)
    }

    async fn update_status(&self, id: Uuid, status: MemberStatus) -> ServiceResult<Member> {
        let mut members = self.members.lock().unwrap();
        let member = members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("member {} not found", id)))?;
        member.status = status;
        Ok(member.clone())
    }
}

#[derive(Default)]
pub struct InMemoryContactStore {
    contacts: Mutex<Vec<Contact>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Contact> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn put(&self, contact: Contact) {
        self.contacts.lock().unwrap().push(contact);
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Contact>> {
        Ok(self.contacts.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, new: NewContact) -> ServiceResult<Contact> {
        let contact = Contact {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            contact_type: new.contact_type,
            organization_id: new.organization_id,
            created_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(contact.clone());
        Ok(contact)
    }
}

#[derive(Default)]
pub struct InMemoryAuditStore {
    entries: Mutex<Vec<AuditLog>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditLog> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries about one entity, in write order.
    pub fn entries_for(&self, entity_id: &str) -> Vec<AuditLog> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn insert(&self, entry: NewAuditEntry) -> ServiceResult<()> {
        self.entries.lock().unwrap().push(AuditLog {
            id: Uuid::new_v4(),
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            from_state: entry.from_state,
            to_state: entry.to_state,
            actor_id: entry.actor_id,
            actor_type: entry.actor_type,
            metadata: entry.metadata,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettingsStore {
    settings: Mutex<SiteSettings>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, tax_rate: i64, tax_name: &str) {
        *self.settings.lock().unwrap() = SiteSettings {
            tax_rate,
            tax_name: tax_name.to_string(),
        };
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self) -> ServiceResult<SiteSettings> {
        Ok(self.settings.lock().unwrap().clone())
    }
}

/// Intake double backed by the in-memory contact and member stores.
///
/// Mirrors the transactional contract: when the member insert is set to
/// fail, no contact rows land either.
pub struct InMemoryIntakeStore {
    contacts: Arc<InMemoryContactStore>,
    members: Arc<InMemoryMemberStore>,
    failure: Mutex<Option<String>>,
}

impl InMemoryIntakeStore {
    pub fn new(contacts: Arc<InMemoryContactStore>, members: Arc<InMemoryMemberStore>) -> Self {
        Self {
            contacts,
            members,
            failure: Mutex::new(None),
        }
    }

    /// Make the intake's member insert fail with the given message.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl IntakeStore for InMemoryIntakeStore {
    async fn onboard(&self, intake: IntakeWrites) -> ServiceResult<IntakeRecords> {
        // A real transaction would roll the contact inserts back, so the
        // double writes nothing at all on failure
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ServiceError::Unexpected(anyhow!(message)));
        }

        let contact_id = match intake.billable {
            BillableContact::Create(new) => self.contacts.insert(new).await?.id,
            BillableContact::Existing(id) => id,
        };

        let primary_contact_id = match intake.primary {
            Some(PrimaryContact::Create(mut new)) => {
                new.organization_id = Some(contact_id);
                Some(self.contacts.insert(new).await?.id)
            }
            Some(PrimaryContact::Existing(id)) => Some(id),
            None => None,
        };

        let member = self
            .members
            .insert(NewMember {
                contact_id,
                primary_contact_id,
                membership_tier_id: intake.membership_tier_id,
                status: intake.status,
                joined_date: intake.joined_date,
            })
            .await?;

        Ok(IntakeRecords {
            contact_id,
            primary_contact_id,
            member,
        })
    }
}

// =============================================================================
// Mock payment gateway
// =============================================================================

/// Recording gateway double. Hands out sequential intent ids and keeps
/// every request for assertions.
#[derive(Default)]
pub struct MockPaymentGateway {
    calls: Mutex<Vec<PaymentIntentRequest>>,
    counter: AtomicU64,
    failure: Mutex<Option<String>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create call fail with the given message.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<PaymentIntentRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> ServiceResult<GatewayIntent> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ServiceError::Gateway(message));
        }

        self.calls.lock().unwrap().push(request);
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let id = format!("pi_test_{:03}", n);
        Ok(GatewayIntent {
            client_secret: format!("{}_secret", id),
            id,
        })
    }
}

// =============================================================================
// Assembled test dependencies
// =============================================================================

/// ServerDeps wired entirely to in-memory doubles, with the concrete
/// handles kept alongside for seeding and assertions.
pub struct TestDependencies {
    pub deps: ServerDeps,
    pub events: Arc<InMemoryEventStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub members: Arc<InMemoryMemberStore>,
    pub contacts: Arc<InMemoryContactStore>,
    pub audit: Arc<InMemoryAuditStore>,
    pub settings: Arc<InMemorySettingsStore>,
    pub gateway: Arc<MockPaymentGateway>,
    pub intake: Arc<InMemoryIntakeStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        let events = Arc::new(InMemoryEventStore::new());
        let orders = Arc::new(InMemoryOrderStore::new());
        let members = Arc::new(InMemoryMemberStore::new());
        let contacts = Arc::new(InMemoryContactStore::new());
        let audit = Arc::new(InMemoryAuditStore::new());
        let settings = Arc::new(InMemorySettingsStore::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let intake = Arc::new(InMemoryIntakeStore::new(contacts.clone(), members.clone()));

        let deps = ServerDeps::new(
            events.clone(),
            orders.clone(),
            members.clone(),
            contacts.clone(),
            audit.clone(),
            settings.clone(),
            gateway.clone(),
            intake.clone(),
        );

        Self {
            deps,
            events,
            orders,
            members,
            contacts,
            audit,
            settings,
            gateway,
            intake,
        }
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
