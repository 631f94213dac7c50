// Request/response DTOs for the staff onboarding route.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::members::onboarding::OnboardingResult;

/// Body of POST /api/staff/onboarding, discriminated on `mode`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OnboardingRequest {
    Organization(OrganizationOnboardingBody),
    Individual(IndividualOnboardingBody),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgMode {
    Create,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryMode {
    Create,
    Select,
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationOnboardingBody {
    pub org_mode: OrgMode,
    /// Required when orgMode=select.
    pub org_contact_id: Option<Uuid>,
    /// Required when orgMode=create.
    pub org_name: Option<String>,
    pub org_email: Option<String>,
    pub org_phone: Option<String>,
    pub primary_mode: PrimaryMode,
    pub primary_contact_id: Option<Uuid>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_email: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub membership_tier_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualOnboardingBody {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_tier_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResultData {
    pub contact_id: Uuid,
    pub member_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_id: Option<Uuid>,
}

impl From<OnboardingResult> for OnboardingResultData {
    fn from(result: OnboardingResult) -> Self {
        Self {
            contact_id: result.contact_id,
            member_id: result.member_id,
            primary_contact_id: result.primary_contact_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardingResponse {
    pub ok: bool,
    pub result: OnboardingResultData,
}
