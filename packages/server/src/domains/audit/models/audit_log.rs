use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{ActorType, EntityType};

/// Input for one audit entry. Built by services at the point of transition.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub entity_type: EntityType,
    pub entity_id: String,
    /// Free-text action, e.g. "created", "status_changed", "onboarded".
    pub action: String,
    pub from_state: Option<String>,
    pub to_state: Option<String>,
    pub actor_id: String,
    pub actor_type: ActorType,
    pub metadata: Option<serde_json::Value>,
}

/// A persisted audit row. Rows are written once and never touched again.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AuditLog {
    pub id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: String,
    pub from_state: Option<String>,
    pub to_state: Option<String>,
    pub actor_id: String,
    pub actor_type: ActorType,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Insert one entry. The only write the audit table ever sees.
    pub async fn insert(entry: &NewAuditEntry, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO audit_log (
                entity_type,
                entity_id,
                action,
                from_state,
                to_state,
                actor_id,
                actor_type,
                metadata
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(entry.entity_type)
        .bind(&entry.entity_id)
        .bind(&entry.action)
        .bind(&entry.from_state)
        .bind(&entry.to_state)
        .bind(&entry.actor_id)
        .bind(entry.actor_type)
        .bind(&entry.metadata)
        .execute(pool)
        .await?;

        Ok(())
    }
}
