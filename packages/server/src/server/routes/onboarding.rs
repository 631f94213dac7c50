use axum::{extract::Extension, Json};

use crate::common::{ServiceError, ServiceResult};
use crate::domains::members::data::{
    OnboardingRequest, OnboardingResponse, OrgMode, OrganizationOnboardingBody, PrimaryMode,
};
use crate::domains::members::onboarding::{
    ExistingOrgMemberInput, NewIndividualMemberInput, NewOrgMemberInput, OnboardingResult,
    OnboardingService,
};
use crate::server::app::AppState;
use crate::server::middleware::StaffUser;

/// POST /api/staff/onboarding
///
/// Staff-assisted member intake. The body's `mode` picks the shape:
/// a brand-new organization, an individual, or a membership against an
/// organization contact that already exists.
pub async fn onboarding_handler(
    Extension(state): Extension<AppState>,
    Extension(staff): Extension<StaffUser>,
    Json(body): Json<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>, ServiceError> {
    let service = OnboardingService::new(&state.deps);

    let result = match body {
        OnboardingRequest::Individual(body) => {
            service
                .onboard_individual(
                    NewIndividualMemberInput {
                        name: body.name,
                        email: body.email,
                        phone: body.phone,
                        membership_tier_id: body.membership_tier_id,
                    },
                    &staff.actor_id,
                )
                .await?
        }
        OnboardingRequest::Organization(body) => {
            onboard_organization(&service, body, &staff.actor_id).await?
        }
    };

    Ok(Json(OnboardingResponse {
        ok: true,
        result: result.into(),
    }))
}

async fn onboard_organization(
    service: &OnboardingService,
    body: OrganizationOnboardingBody,
    actor_id: &str,
) -> ServiceResult<OnboardingResult> {
    match body.org_mode {
        OrgMode::Create => {
            let org_name = require(body.org_name, "orgName is required when orgMode=create")?;
            // A freshly created organization always gets a fresh primary
            // contact; selecting one would have nothing to select from.
            if body.primary_mode != PrimaryMode::Create {
                return Err(ServiceError::Validation(
                    "primaryMode must be create when creating a new organization".to_string(),
                ));
            }
            let primary_contact_name = require(
                body.primary_contact_name,
                "primaryContactName is required when primaryMode=create",
            )?;
            service
                .onboard_organization(
                    NewOrgMemberInput {
                        org_name,
                        org_email: body.org_email,
                        org_phone: body.org_phone,
                        primary_contact_name,
                        primary_contact_email: body.primary_contact_email,
                        primary_contact_phone: body.primary_contact_phone,
                        membership_tier_id: body.membership_tier_id,
                    },
                    actor_id,
                )
                .await
        }
        OrgMode::Select => {
            let org_contact_id = body.org_contact_id.ok_or_else(|| {
                ServiceError::Validation("orgContactId is required when orgMode=select".to_string())
            })?;
            let input = match body.primary_mode {
                PrimaryMode::Select => ExistingOrgMemberInput {
                    org_contact_id,
                    primary_contact_id: Some(body.primary_contact_id.ok_or_else(|| {
                        ServiceError::Validation(
                            "primaryContactId is required when primaryMode=select".to_string(),
                        )
                    })?),
                    primary_contact_name: None,
                    primary_contact_email: None,
                    primary_contact_phone: None,
                    membership_tier_id: body.membership_tier_id,
                },
                PrimaryMode::Create => ExistingOrgMemberInput {
                    org_contact_id,
                    primary_contact_id: None,
                    primary_contact_name: Some(require(
                        body.primary_contact_name,
                        "primaryContactName is required when primaryMode=create",
                    )?),
                    primary_contact_email: body.primary_contact_email,
                    primary_contact_phone: body.primary_contact_phone,
                    membership_tier_id: body.membership_tier_id,
                },
                PrimaryMode::None => ExistingOrgMemberInput {
                    org_contact_id,
                    primary_contact_id: None,
                    primary_contact_name: None,
                    primary_contact_email: None,
                    primary_contact_phone: None,
                    membership_tier_id: body.membership_tier_id,
                },
            };
            service.onboard_organization_from_existing(input, actor_id).await
        }
    }
}

fn require(value: Option<String>, message: &str) -> ServiceResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(message.to_string())),
    }
}
