use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Whether a contact is a person or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contact_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Person,
    Organization,
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactType::Person => "person",
            ContactType::Organization => "organization",
        })
    }
}

/// A contact record: any person or organization the platform knows about.
/// Members reference contacts as their billable entity.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_type: ContactType,
    /// For a person: the organization they belong to, if any.
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_type: ContactType,
    pub organization_id: Option<Uuid>,
}

impl Contact {
    // Queries take any executor so intake can run them inside one
    // transaction.
    pub async fn find_by_id(
        id: Uuid,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn insert(
        new: &NewContact,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO contacts (name, email, phone, contact_type, organization_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.contact_type)
        .bind(new.organization_id)
        .fetch_one(executor)
        .await
    }
}
