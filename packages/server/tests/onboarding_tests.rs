// Onboarding intake shapes: new organization, individual, and membership
// against an existing organization contact.

use chrono::Utc;
use uuid::Uuid;

use server_core::common::ServiceError;
use server_core::domains::contacts::models::contact::{Contact, ContactType};
use server_core::domains::members::{
    ExistingOrgMemberInput, MemberStatus, NewIndividualMemberInput, NewOrgMemberInput,
    OnboardingService,
};
use server_core::kernel::test_dependencies::TestDependencies;

fn seeded_contact(contact_type: ContactType) -> Contact {
    Contact {
        id: Uuid::new_v4(),
        name: "Lakeside Supply Co.".to_string(),
        email: Some("hello@lakeside.example".to_string()),
        phone: None,
        contact_type,
        organization_id: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn organization_onboarding_creates_contact_pair_and_pending_member() {
    let t = TestDependencies::new();
    let result = OnboardingService::new(&t.deps)
        .onboard_organization(
            NewOrgMemberInput {
                org_name: "Harbor Books".to_string(),
                org_email: Some("info@harborbooks.example".to_string()),
                org_phone: None,
                primary_contact_name: "Maya Ortiz".to_string(),
                primary_contact_email: Some("maya@harborbooks.example".to_string()),
                primary_contact_phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap();

    let contacts = t.contacts.all();
    assert_eq!(contacts.len(), 2);

    let org = contacts.iter().find(|c| c.id == result.contact_id).unwrap();
    assert_eq!(org.contact_type, ContactType::Organization);

    let primary = contacts
        .iter()
        .find(|c| Some(c.id) == result.primary_contact_id)
        .unwrap();
    assert_eq!(primary.contact_type, ContactType::Person);
    assert_eq!(primary.organization_id, Some(org.id));

    let members = t.members.all();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].status, MemberStatus::Pending);
    assert_eq!(members[0].contact_id, org.id);

    let entries = t.audit.entries_for(&result.member_id.to_string());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "onboarded");
    assert_eq!(
        entries[0]
            .metadata
            .as_ref()
            .unwrap()
            .get("type")
            .and_then(|v| v.as_str()),
        Some("organization")
    );
}

#[tokio::test]
async fn individual_onboarding_creates_single_contact() {
    let t = TestDependencies::new();
    let result = OnboardingService::new(&t.deps)
        .onboard_individual(
            NewIndividualMemberInput {
                name: "Sam Ito".to_string(),
                email: Some("sam@example.com".to_string()),
                phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap();

    assert!(result.primary_contact_id.is_none());
    assert_eq!(t.contacts.all().len(), 1);
    assert_eq!(t.contacts.all()[0].contact_type, ContactType::Person);

    let entries = t.audit.entries_for(&result.member_id.to_string());
    assert_eq!(
        entries[0]
            .metadata
            .as_ref()
            .unwrap()
            .get("type")
            .and_then(|v| v.as_str()),
        Some("individual")
    );
}

#[tokio::test]
async fn failed_intake_leaves_no_orphan_contacts() {
    let t = TestDependencies::new();
    t.intake.fail_with("connection reset");

    let err = OnboardingService::new(&t.deps)
        .onboard_organization(
            NewOrgMemberInput {
                org_name: "Harbor Books".to_string(),
                org_email: None,
                org_phone: None,
                primary_contact_name: "Maya Ortiz".to_string(),
                primary_contact_email: None,
                primary_contact_phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unexpected(_)));

    // The contact and member writes share one transaction, so a failure
    // mid-intake must leave neither behind
    assert!(t.contacts.all().is_empty());
    assert!(t.members.all().is_empty());
    assert!(t.audit.entries().is_empty());
}

#[tokio::test]
async fn existing_organization_reuses_the_contact() {
    let t = TestDependencies::new();
    let org = seeded_contact(ContactType::Organization);
    let org_id = org.id;
    t.contacts.put(org);

    let result = OnboardingService::new(&t.deps)
        .onboard_organization_from_existing(
            ExistingOrgMemberInput {
                org_contact_id: org_id,
                primary_contact_id: None,
                primary_contact_name: Some("Devon Park".to_string()),
                primary_contact_email: None,
                primary_contact_phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap();

    assert_eq!(result.contact_id, org_id);
    // Only the new primary contact was created
    assert_eq!(t.contacts.all().len(), 2);
    let primary = t
        .contacts
        .all()
        .into_iter()
        .find(|c| Some(c.id) == result.primary_contact_id)
        .unwrap();
    assert_eq!(primary.organization_id, Some(org_id));
}

#[tokio::test]
async fn existing_organization_may_skip_the_primary_contact() {
    let t = TestDependencies::new();
    let org = seeded_contact(ContactType::Organization);
    let org_id = org.id;
    t.contacts.put(org);

    let result = OnboardingService::new(&t.deps)
        .onboard_organization_from_existing(
            ExistingOrgMemberInput {
                org_contact_id: org_id,
                primary_contact_id: None,
                primary_contact_name: None,
                primary_contact_email: None,
                primary_contact_phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap();

    assert!(result.primary_contact_id.is_none());
    assert_eq!(t.contacts.all().len(), 1);
}

#[tokio::test]
async fn person_contacts_are_rejected_as_organizations() {
    let t = TestDependencies::new();
    let person = seeded_contact(ContactType::Person);
    let person_id = person.id;
    t.contacts.put(person);

    let err = OnboardingService::new(&t.deps)
        .onboard_organization_from_existing(
            ExistingOrgMemberInput {
                org_contact_id: person_id,
                primary_contact_id: None,
                primary_contact_name: None,
                primary_contact_email: None,
                primary_contact_phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(t.members.all().is_empty());
}

#[tokio::test]
async fn missing_organization_contact_is_not_found() {
    let t = TestDependencies::new();
    let err = OnboardingService::new(&t.deps)
        .onboard_organization_from_existing(
            ExistingOrgMemberInput {
                org_contact_id: Uuid::new_v4(),
                primary_contact_id: None,
                primary_contact_name: None,
                primary_contact_email: None,
                primary_contact_phone: None,
                membership_tier_id: None,
            },
            "staff-api",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
