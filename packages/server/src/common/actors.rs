use std::fmt;

use serde::{Deserialize, Serialize};

/// Who triggered an audited action.
///
/// Closed enum rather than free-form strings so call sites cannot invent
/// actor identities the audit trail does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "actor_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Staff,
    Member,
    System,
    Webhook,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Staff => "staff",
            ActorType::Member => "member",
            ActorType::System => "system",
            ActorType::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of entity an audit entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_entity_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Member,
    Order,
    Payment,
    Contact,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Member => "member",
            EntityType::Order => "order",
            EntityType::Payment => "payment",
            EntityType::Contact => "contact",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
