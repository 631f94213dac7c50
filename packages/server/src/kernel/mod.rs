// Infrastructure layer: store traits, the dependency container, Postgres
// implementations, and in-memory doubles for tests.

pub mod capacity;
pub mod deps;
pub mod postgres;
pub mod test_dependencies;
pub mod traits;

pub use capacity::CapacityLocks;
pub use deps::{ServerDeps, StripeGateway};
pub use postgres::{
    PgAuditStore, PgContactStore, PgEventStore, PgIntakeStore, PgMemberStore, PgOrderStore,
    PgSettingsStore,
};
pub use traits::{
    AuditStore, BillableContact, ContactStore, EventStore, GatewayIntent, IntakeRecords,
    IntakeStore, IntakeWrites, MemberStore, OrderStore, PaymentGateway, PaymentIntentRequest,
    PrimaryContact, SettingsStore,
};
