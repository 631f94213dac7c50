// Postgres-backed store implementations. SQL lives on the domain models;
// these adapters only satisfy the store traits.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::ServiceResult;
use crate::domains::audit::models::audit_log::{AuditLog, NewAuditEntry};
use crate::domains::contacts::models::contact::{Contact, NewContact};
use crate::domains::events::models::event::{Event, SiteSettings};
use crate::domains::members::models::member::{Member, MemberStatus, NewMember};
use crate::domains::orders::models::order::{NewOrder, Order, OrderStatus};
use crate::kernel::traits::{
    AuditStore, BillableContact, ContactStore, EventStore, IntakeRecords, IntakeStore,
    IntakeWrites, MemberStore, OrderStore, PrimaryContact, SettingsStore,
};

macro_rules! pg_store {
    ($name:ident) => {
        pub struct $name {
            pool: PgPool,
        }

        impl $name {
            pub fn new(pool: PgPool) -> Self {
                Self { pool }
            }
        }
    };
}

pg_store!(PgEventStore);
pg_store!(PgOrderStore);
pg_store!(PgMemberStore);
pg_store!(PgContactStore);
pg_store!(PgAuditStore);
pg_store!(PgSettingsStore);
pg_store!(PgIntakeStore);

#[async_trait]
impl EventStore for PgEventStore {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Event>> {
        Ok(Event::find_by_id(id, &self.pool).await?)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Order>> {
        Ok(Order::find_by_id(id, &self.pool).await?)
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> ServiceResult<Option<Order>> {
        Ok(Order::find_by_intent_id(intent_id, &self.pool).await?)
    }

    async fn insert(&self, order: NewOrder) -> ServiceResult<Order> {
        Ok(Order::insert(&order, &self.pool).await?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        qr_token: Option<String>,
    ) -> ServiceResult<Order> {
        Ok(Order::update_status(id, status, qr_token.as_deref(), &self.pool).await?)
    }

    async fn committed_quantity(
        &self,
        event_id: i64,
        ticket_type: Option<&str>,
    ) -> ServiceResult<i64> {
        Ok(Order::committed_quantity(event_id, ticket_type, &self.pool).await?)
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Member>> {
        Ok(Member::find_by_id(id, &self.pool).await?)
    }

    async fn insert(&self, member: NewMember) -> ServiceResult<Member> {
        Ok(Member::insert(&member, &self.pool).await?)
    }

    async fn update_status(&self, id: Uuid, status: MemberStatus) -> ServiceResult<Member> {
        Ok(Member::update_status(id, status, &self.pool).await?)
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Contact>> {
        Ok(Contact::find_by_id(id, &self.pool).await?)
    }

    async fn insert(&self, contact: NewContact) -> ServiceResult<Contact> {
        Ok(Contact::insert(&contact, &self.pool).await?)
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn insert(&self, entry: NewAuditEntry) -> ServiceResult<()> {
        Ok(AuditLog::insert(&entry, &self.pool).await?)
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self) -> ServiceResult<SiteSettings> {
        Ok(SiteSettings::get(&self.pool).await?)
    }
}

#[async_trait]
impl IntakeStore for PgIntakeStore {
    /// All intake inserts share one transaction; a failed member insert
    /// rolls the contact rows back with it.
    async fn onboard(&self, intake: IntakeWrites) -> ServiceResult<IntakeRecords> {
        let mut tx = self.pool.begin().await?;

        let contact_id = match &intake.billable {
            BillableContact::Create(new) => Contact::insert(new, &mut *tx).await?.id,
            BillableContact::Existing(id) => *id,
        };

        let primary_contact_id = match intake.primary {
            Some(PrimaryContact::Create(mut new)) => {
                new.organization_id = Some(contact_id);
                Some(Contact::insert(&new, &mut *tx).await?.id)
            }
            Some(PrimaryContact::Existing(id)) => Some(id),
            None => None,
        };

        let member = Member::insert(
            &NewMember {
                contact_id,
                primary_contact_id,
                membership_tier_id: intake.membership_tier_id,
                status: intake.status,
                joined_date: intake.joined_date,
            },
            &mut *tx,
        )
        .await?;

        tx.commit().await?;

        Ok(IntakeRecords {
            contact_id,
            primary_contact_id,
            member,
        })
    }
}
