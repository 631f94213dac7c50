// Membership lifecycle through the service: the transition table, the
// audit trail, and rejection of edges that do not exist.

mod common;

use common::*;
use server_core::common::{ActorType, ServiceError};
use server_core::domains::members::{MemberStatus, MembershipService};
use server_core::kernel::test_dependencies::TestDependencies;

#[tokio::test]
async fn pending_member_activates_with_audit() {
    let t = TestDependencies::new();
    let member = member_in_status(MemberStatus::Pending);
    let member_id = member.id;
    t.members.put(member);

    let updated = MembershipService::new(&t.deps)
        .activate(member_id, "staff-api", ActorType::Staff)
        .await
        .unwrap();
    assert_eq!(updated.status, MemberStatus::Active);

    let entries = t.audit.entries_for(&member_id.to_string());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "status_changed");
    assert_eq!(entries[0].from_state.as_deref(), Some("pending"));
    assert_eq!(entries[0].to_state.as_deref(), Some("active"));
    assert_eq!(entries[0].actor_type, ActorType::Staff);
}

#[tokio::test]
async fn lapse_records_the_reason() {
    let t = TestDependencies::new();
    let member = member_in_status(MemberStatus::Active);
    let member_id = member.id;
    t.members.put(member);

    MembershipService::new(&t.deps)
        .lapse(
            member_id,
            "renewal-job",
            ActorType::System,
            Some("renewal date passed"),
        )
        .await
        .unwrap();

    let entries = t.audit.entries_for(&member_id.to_string());
    let metadata = entries[0].metadata.as_ref().unwrap();
    assert_eq!(
        metadata.get("reason").and_then(|v| v.as_str()),
        Some("renewal date passed")
    );
}

#[tokio::test]
async fn cancelled_member_can_only_be_reinstated() {
    let t = TestDependencies::new();
    let member = member_in_status(MemberStatus::Cancelled);
    let member_id = member.id;
    t.members.put(member);

    let service = MembershipService::new(&t.deps);

    let err = service
        .activate(member_id, "staff-api", ActorType::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    let updated = service
        .reinstate(member_id, "staff-api", ActorType::Staff, Some("dues settled"))
        .await
        .unwrap();
    assert_eq!(updated.status, MemberStatus::Reinstated);

    // And a reinstated member can then become active
    let updated = service
        .activate(member_id, "staff-api", ActorType::Staff)
        .await
        .unwrap();
    assert_eq!(updated.status, MemberStatus::Active);
}

#[tokio::test]
async fn invalid_transition_changes_nothing() {
    let t = TestDependencies::new();
    let member = member_in_status(MemberStatus::Pending);
    let member_id = member.id;
    t.members.put(member);

    let err = MembershipService::new(&t.deps)
        .lapse(member_id, "staff-api", ActorType::Staff, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    assert_eq!(t.members.all()[0].status, MemberStatus::Pending);
    assert!(t.audit.entries_for(&member_id.to_string()).is_empty());
}

#[tokio::test]
async fn unknown_member_is_not_found() {
    let t = TestDependencies::new();
    let err = MembershipService::new(&t.deps)
        .activate(uuid::Uuid::new_v4(), "staff-api", ActorType::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
