//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to services and routes. Every
//! external collaborator sits behind a trait so tests can swap in the
//! in-memory doubles from `test_dependencies`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use stripe::{CreatePaymentIntentParams, StripeService};

use crate::common::ServiceResult;
use crate::kernel::capacity::CapacityLocks;
use crate::kernel::postgres::{
    PgAuditStore, PgContactStore, PgEventStore, PgIntakeStore, PgMemberStore, PgOrderStore,
    PgSettingsStore,
};
use crate::kernel::traits::{
    AuditStore, ContactStore, EventStore, GatewayIntent, IntakeStore, MemberStore, OrderStore,
    PaymentGateway, PaymentIntentRequest, SettingsStore,
};

// =============================================================================
// StripeService adapter (implements PaymentGateway trait)
// =============================================================================

/// Wrapper around the stripe client that implements the PaymentGateway trait
pub struct StripeGateway(pub Arc<StripeService>);

impl StripeGateway {
    pub fn new(service: Arc<StripeService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> ServiceResult<GatewayIntent> {
        let intent = self
            .0
            .create_payment_intent(CreatePaymentIntentParams {
                amount: request.amount,
                currency: request.currency,
                receipt_email: request.receipt_email,
                description: request.description,
                metadata: request.metadata,
            })
            .await?;

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            crate::common::ServiceError::Gateway(format!(
                "payment intent {} returned no client secret",
                intent.id
            ))
        })?;

        Ok(GatewayIntent {
            id: intent.id,
            client_secret,
        })
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to services (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub events: Arc<dyn EventStore>,
    pub orders: Arc<dyn OrderStore>,
    pub members: Arc<dyn MemberStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub audit: Arc<dyn AuditStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    /// Atomic multi-row writes for onboarding intakes.
    pub intake: Arc<dyn IntakeStore>,
    /// Per-(event, ticket-type) locks closing the capacity check-then-insert
    /// gap under concurrent requests.
    pub capacity: CapacityLocks,
}

impl ServerDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events: Arc<dyn EventStore>,
        orders: Arc<dyn OrderStore>,
        members: Arc<dyn MemberStore>,
        contacts: Arc<dyn ContactStore>,
        audit: Arc<dyn AuditStore>,
        settings: Arc<dyn SettingsStore>,
        gateway: Arc<dyn PaymentGateway>,
        intake: Arc<dyn IntakeStore>,
    ) -> Self {
        Self {
            events,
            orders,
            members,
            contacts,
            audit,
            settings,
            gateway,
            intake,
            capacity: CapacityLocks::new(),
        }
    }

    /// Production wiring: every store backed by Postgres, the gateway by
    /// the Stripe client.
    pub fn postgres(pool: PgPool, stripe: Arc<StripeService>) -> Self {
        Self::new(
            Arc::new(PgEventStore::new(pool.clone())),
            Arc::new(PgOrderStore::new(pool.clone())),
            Arc::new(PgMemberStore::new(pool.clone())),
            Arc::new(PgContactStore::new(pool.clone())),
            Arc::new(PgAuditStore::new(pool.clone())),
            Arc::new(PgSettingsStore::new(pool.clone())),
            Arc::new(StripeGateway::new(stripe)),
            Arc::new(PgIntakeStore::new(pool)),
        )
    }
}
