use std::sync::Arc;

use tracing::debug;

use crate::common::ServiceResult;
use crate::domains::audit::models::audit_log::NewAuditEntry;
use crate::kernel::AuditStore;

/// Writer for the append-only audit trail.
///
/// A failed write propagates to the caller and fails the enclosing
/// operation; audit entries are never dropped silently.
#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub async fn log(&self, entry: NewAuditEntry) -> ServiceResult<()> {
        debug!(
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            action = %entry.action,
            "writing audit entry"
        );
        self.store.insert(entry).await
    }
}
