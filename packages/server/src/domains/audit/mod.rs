//! Append-only audit trail for state-changing actions.
//!
//! Every order and member status transition writes exactly one entry here.
//! There is deliberately no update or delete path.

pub mod logger;
pub mod models;

pub use logger::AuditLogger;
pub use models::audit_log::{AuditLog, NewAuditEntry};
