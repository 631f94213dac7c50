use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::common::{ActorType, EntityType, ServiceError, ServiceResult};
use crate::domains::audit::models::audit_log::NewAuditEntry;
use crate::domains::audit::AuditLogger;
use crate::domains::members::models::member::{Member, MemberStatus};
use crate::kernel::{MemberStore, ServerDeps};

/// Service for membership lifecycle management.
///
/// All status changes go through `transition_status` so that only edges in
/// the transition table are applied and every change lands in the audit
/// trail exactly once.
#[derive(Clone)]
pub struct MembershipService {
    members: Arc<dyn MemberStore>,
    audit: AuditLogger,
}

impl MembershipService {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            members: deps.members.clone(),
            audit: AuditLogger::new(deps.audit.clone()),
        }
    }

    /// Transition a member's status with validation and audit logging.
    pub async fn transition_status(
        &self,
        member_id: Uuid,
        to_status: MemberStatus,
        actor_id: &str,
        actor_type: ActorType,
        reason: Option<&str>,
    ) -> ServiceResult<Member> {
        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {} not found", member_id)))?;

        let from_status = member.status;
        if !from_status.can_transition_to(to_status) {
            return Err(ServiceError::InvalidTransition {
                entity: "membership",
                from: from_status.to_string(),
                to: to_status.to_string(),
            });
        }

        let updated = self.members.update_status(member_id, to_status).await?;

        self.audit
            .log(NewAuditEntry {
                entity_type: EntityType::Member,
                entity_id: member_id.to_string(),
                action: "status_changed".to_string(),
                from_state: Some(from_status.to_string()),
                to_state: Some(to_status.to_string()),
                actor_id: actor_id.to_string(),
                actor_type,
                metadata: reason.map(|r| serde_json::json!({ "reason": r })),
            })
            .await?;

        info!(member_id = %member_id, from = %from_status, to = %to_status, "member status changed");
        Ok(updated)
    }

    /// Activate a pending, lapsed or reinstated member.
    pub async fn activate(
        &self,
        member_id: Uuid,
        actor_id: &str,
        actor_type: ActorType,
    ) -> ServiceResult<Member> {
        self.transition_status(member_id, MemberStatus::Active, actor_id, actor_type, None)
            .await
    }

    /// Mark a member as lapsed (e.g. renewal date passed without payment).
    pub async fn lapse(
        &self,
        member_id: Uuid,
        actor_id: &str,
        actor_type: ActorType,
        reason: Option<&str>,
    ) -> ServiceResult<Member> {
        self.transition_status(member_id, MemberStatus::Lapsed, actor_id, actor_type, reason)
            .await
    }

    pub async fn cancel(
        &self,
        member_id: Uuid,
        actor_id: &str,
        actor_type: ActorType,
        reason: Option<&str>,
    ) -> ServiceResult<Member> {
        self.transition_status(
            member_id,
            MemberStatus::Cancelled,
            actor_id,
            actor_type,
            reason,
        )
        .await
    }

    /// Reinstate a cancelled or lapsed membership.
    pub async fn reinstate(
        &self,
        member_id: Uuid,
        actor_id: &str,
        actor_type: ActorType,
        reason: Option<&str>,
    ) -> ServiceResult<Member> {
        self.transition_status(
            member_id,
            MemberStatus::Reinstated,
            actor_id,
            actor_type,
            reason,
        )
        .await
    }
}
