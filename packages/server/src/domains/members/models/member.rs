use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Membership lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Active,
    Lapsed,
    Cancelled,
    Reinstated,
}

impl MemberStatus {
    /// The membership state machine, as data. Key is the current status,
    /// values are the statuses it may move to.
    pub fn can_transition_to(self, to: MemberStatus) -> bool {
        use MemberStatus::*;
        let allowed: &[MemberStatus] = match self {
            Pending => &[Active, Cancelled],
            Active => &[Lapsed, Cancelled],
            Lapsed => &[Active, Reinstated, Cancelled],
            Cancelled => &[Reinstated],
            Reinstated => &[Active, Lapsed, Cancelled],
        };
        allowed.contains(&to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Active => "active",
            MemberStatus::Lapsed => "lapsed",
            MemberStatus::Cancelled => "cancelled",
            MemberStatus::Reinstated => "reinstated",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MemberStatus::Pending),
            "active" => Ok(MemberStatus::Active),
            "lapsed" => Ok(MemberStatus::Lapsed),
            "cancelled" => Ok(MemberStatus::Cancelled),
            "reinstated" => Ok(MemberStatus::Reinstated),
            other => Err(format!("unknown member status: {}", other)),
        }
    }
}

/// A membership record. The billable entity is the referenced contact
/// (organization or person); for organizations `primary_contact_id` names
/// the person we talk to.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Member {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub primary_contact_id: Option<Uuid>,
    pub membership_tier_id: Option<Uuid>,
    pub status: MemberStatus,
    pub joined_date: DateTime<Utc>,
    pub renewal_date: Option<DateTime<Utc>>,
    // External billing identifiers, stored but not interpreted here
    pub stripe_customer_id: Option<String>,
    pub xero_contact_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub contact_id: Uuid,
    pub primary_contact_id: Option<Uuid>,
    pub membership_tier_id: Option<Uuid>,
    pub status: MemberStatus,
    pub joined_date: DateTime<Utc>,
}

impl Member {
    pub async fn find_by_id(
        id: Uuid,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn insert(
        new: &NewMember,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO members (
                contact_id,
                primary_contact_id,
                membership_tier_id,
                status,
                joined_date
             )
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(new.contact_id)
        .bind(new.primary_contact_id)
        .bind(new.membership_tier_id)
        .bind(new.status)
        .bind(new.joined_date)
        .fetch_one(executor)
        .await
    }

    pub async fn update_status(
        id: Uuid,
        status: MemberStatus,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_matches_lifecycle() {
        use MemberStatus::*;

        let table: &[(MemberStatus, &[MemberStatus])] = &[
            (Pending, &[Active, Cancelled]),
            (Active, &[Lapsed, Cancelled]),
            (Lapsed, &[Active, Reinstated, Cancelled]),
            (Cancelled, &[Reinstated]),
            (Reinstated, &[Active, Lapsed, Cancelled]),
        ];

        let all = [Pending, Active, Lapsed, Cancelled, Reinstated];
        for (from, allowed) in table {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&to),
                    "unexpected result for {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        use MemberStatus::*;
        for status in [Pending, Active, Lapsed, Cancelled, Reinstated] {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn status_parses_from_wire_strings() {
        assert_eq!("active".parse::<MemberStatus>().unwrap(), MemberStatus::Active);
        assert!("deleted".parse::<MemberStatus>().is_err());
    }
}
