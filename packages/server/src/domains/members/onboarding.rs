use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::common::{ActorType, EntityType, ServiceError, ServiceResult};
use crate::domains::audit::models::audit_log::NewAuditEntry;
use crate::domains::audit::AuditLogger;
use crate::domains::contacts::models::contact::{ContactType, NewContact};
use crate::domains::members::models::member::MemberStatus;
use crate::kernel::{
    BillableContact, ContactStore, IntakeRecords, IntakeStore, IntakeWrites, PrimaryContact,
    ServerDeps,
};

/// Input for onboarding a brand-new organization member.
#[derive(Debug, Clone)]
pub struct NewOrgMemberInput {
    pub org_name: String,
    pub org_email: Option<String>,
    pub org_phone: Option<String>,
    pub primary_contact_name: String,
    pub primary_contact_email: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub membership_tier_id: Option<Uuid>,
}

/// Input for onboarding an individual (person) member.
#[derive(Debug, Clone)]
pub struct NewIndividualMemberInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_tier_id: Option<Uuid>,
}

/// Input for onboarding against an organization contact that already
/// exists. The primary contact is either reused by id or created fresh.
#[derive(Debug, Clone)]
pub struct ExistingOrgMemberInput {
    pub org_contact_id: Uuid,
    pub primary_contact_id: Option<Uuid>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_email: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub membership_tier_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct OnboardingResult {
    pub contact_id: Uuid,
    pub member_id: Uuid,
    pub primary_contact_id: Option<Uuid>,
}

/// Centralized onboarding for new members.
///
/// Used by staff-assisted onboarding today and any future self-serve flow.
/// Every intake shape creates (or reuses) a contact, creates the member in
/// pending status, and writes one audit entry tagged with the shape. The
/// contact and member rows go through the intake store as a single unit,
/// so a failed member insert cannot strand a contact.
#[derive(Clone)]
pub struct OnboardingService {
    contacts: Arc<dyn ContactStore>,
    intake: Arc<dyn IntakeStore>,
    audit: AuditLogger,
}

impl OnboardingService {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            contacts: deps.contacts.clone(),
            intake: deps.intake.clone(),
            audit: AuditLogger::new(deps.audit.clone()),
        }
    }

    /// Onboard a new organization: organization contact, primary contact
    /// person linked to it, member referencing both.
    pub async fn onboard_organization(
        &self,
        input: NewOrgMemberInput,
        actor_id: &str,
    ) -> ServiceResult<OnboardingResult> {
        let records = self
            .intake
            .onboard(IntakeWrites {
                billable: BillableContact::Create(NewContact {
                    name: input.org_name,
                    email: input.org_email,
                    phone: input.org_phone,
                    contact_type: ContactType::Organization,
                    organization_id: None,
                }),
                primary: Some(PrimaryContact::Create(NewContact {
                    name: input.primary_contact_name,
                    email: input.primary_contact_email,
                    phone: input.primary_contact_phone,
                    contact_type: ContactType::Person,
                    // Linked to the organization row by the intake store once
                    // that row exists.
                    organization_id: None,
                })),
                membership_tier_id: input.membership_tier_id,
                status: MemberStatus::Pending,
                joined_date: Utc::now(),
            })
            .await?;

        self.audit_onboarded(
            &records,
            actor_id,
            serde_json::json!({
                "type": "organization",
                "orgContactId": records.contact_id.to_string(),
                "primaryContactId": records.primary_contact_id.map(|id| id.to_string()),
            }),
        )
        .await?;

        info!(member_id = %records.member.id, "organization member onboarded");
        Ok(records.into())
    }

    /// Onboard an individual member: one person contact plus the member,
    /// no primary contact.
    pub async fn onboard_individual(
        &self,
        input: NewIndividualMemberInput,
        actor_id: &str,
    ) -> ServiceResult<OnboardingResult> {
        let records = self
            .intake
            .onboard(IntakeWrites {
                billable: BillableContact::Create(NewContact {
                    name: input.name,
                    email: input.email,
                    phone: input.phone,
                    contact_type: ContactType::Person,
                    organization_id: None,
                }),
                primary: None,
                membership_tier_id: input.membership_tier_id,
                status: MemberStatus::Pending,
                joined_date: Utc::now(),
            })
            .await?;

        self.audit_onboarded(
            &records,
            actor_id,
            serde_json::json!({
                "type": "individual",
                "contactId": records.contact_id.to_string(),
            }),
        )
        .await?;

        info!(member_id = %records.member.id, "individual member onboarded");
        Ok(records.into())
    }

    /// Onboard a member against an existing organization contact. The
    /// supplied contact must actually be an organization.
    pub async fn onboard_organization_from_existing(
        &self,
        input: ExistingOrgMemberInput,
        actor_id: &str,
    ) -> ServiceResult<OnboardingResult> {
        let org_contact = self
            .contacts
            .find_by_id(input.org_contact_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Contact {} not found", input.org_contact_id))
            })?;

        if org_contact.contact_type != ContactType::Organization {
            return Err(ServiceError::Validation(
                "Selected contact is not an organization".to_string(),
            ));
        }

        let primary = match (input.primary_contact_id, input.primary_contact_name) {
            (Some(id), _) => Some(PrimaryContact::Existing(id)),
            (None, Some(name)) => Some(PrimaryContact::Create(NewContact {
                name,
                email: input.primary_contact_email,
                phone: input.primary_contact_phone,
                contact_type: ContactType::Person,
                organization_id: None,
            })),
            (None, None) => None,
        };

        let records = self
            .intake
            .onboard(IntakeWrites {
                billable: BillableContact::Existing(org_contact.id),
                primary,
                membership_tier_id: input.membership_tier_id,
                status: MemberStatus::Pending,
                joined_date: Utc::now(),
            })
            .await?;

        self.audit_onboarded(
            &records,
            actor_id,
            serde_json::json!({
                "type": "organization-existing",
                "orgContactId": records.contact_id.to_string(),
                "primaryContactId": records.primary_contact_id.map(|id| id.to_string()),
            }),
        )
        .await?;

        info!(member_id = %records.member.id, "member onboarded for existing organization");
        Ok(records.into())
    }

    async fn audit_onboarded(
        &self,
        records: &IntakeRecords,
        actor_id: &str,
        metadata: serde_json::Value,
    ) -> ServiceResult<()> {
        self.audit
            .log(NewAuditEntry {
                entity_type: EntityType::Member,
                entity_id: records.member.id.to_string(),
                action: "onboarded".to_string(),
                from_state: None,
                to_state: Some(MemberStatus::Pending.to_string()),
                actor_id: actor_id.to_string(),
                actor_type: ActorType::Staff,
                metadata: Some(metadata),
            })
            .await
    }
}

impl From<IntakeRecords> for OnboardingResult {
    fn from(records: IntakeRecords) -> Self {
        Self {
            contact_id: records.contact_id,
            member_id: records.member.id,
            primary_contact_id: records.primary_contact_id,
        }
    }
}
