//! Membership lifecycle: status transitions under an explicit table, and
//! onboarding intake flows that create contact + member pairs.

pub mod data;
pub mod models;
pub mod onboarding;
pub mod service;

pub use models::member::{Member, MemberStatus, NewMember};
pub use onboarding::{
    ExistingOrgMemberInput, NewIndividualMemberInput, NewOrgMemberInput, OnboardingResult,
    OnboardingService,
};
pub use service::MembershipService;
