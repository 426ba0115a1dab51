use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::identity::Identity;

/// What a user is allowed to do in the application.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Production,
    Driver,
    Sales,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Production => "production",
            Role::Driver => "driver",
            Role::Sales => "sales",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "production" => Ok(Role::Production),
            "driver" => Ok(Role::Driver),
            "sales" => Ok(Role::Sales),
            "customer" => Ok(Role::Customer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// A row of the `users` table.
///
/// `id` is the id of the identity the record belongs to. Both `id` and
/// `email` are unique in the store.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub active: bool,
    /// Assigned by the store, never sent on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The reduced view of a user returned after sign-up.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            name: record.name.clone(),
            role: record.role,
        }
    }
}

/// A user view built from the identity alone, used when the user record
/// couldn't be read or written.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct MinimalUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// `None` if the identity carries no role or one we don't know.
    pub role: Option<Role>,
}

impl From<&Identity> for MinimalUser {
    fn from(identity: &Identity) -> Self {
        let metadata = &identity.user_metadata;
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            name: metadata.name.clone(),
            role: metadata.role.as_deref().and_then(|r| r.parse().ok()),
        }
    }
}

/// The user behind a verified session.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(tag = "kind", content = "user", rename_all = "snake_case")]
pub enum ResolvedUser {
    /// The stored user record.
    Record(UserRecord),
    /// The record is unavailable, only the identity could be verified.
    Minimal(MinimalUser),
}

impl ResolvedUser {
    pub fn id(&self) -> &str {
        match self {
            ResolvedUser::Record(r) => &r.id,
            ResolvedUser::Minimal(m) => &m.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            ResolvedUser::Record(r) => &r.email,
            ResolvedUser::Minimal(m) => &m.email,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            ResolvedUser::Record(r) => Some(r.role),
            ResolvedUser::Minimal(m) => m.role,
        }
    }

    /// Returns the stored record, if this isn't a degraded view.
    pub fn record(&self) -> Option<&UserRecord> {
        match self {
            ResolvedUser::Record(r) => Some(r),
            ResolvedUser::Minimal(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ResolvedUser::Minimal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Metadata;

    #[test]
    fn test_role_from_str() {
        assert_eq!("Driver".parse::<Role>(), Ok(Role::Driver));
        assert_eq!(" customer ".parse::<Role>(), Ok(Role::Customer));
        assert_eq!(
            "farmer".parse::<Role>(),
            Err(UnknownRole("farmer".to_string()))
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Production).unwrap(), "production");
    }

    #[test]
    fn test_minimal_user_ignores_unknown_role() {
        let identity = Identity {
            id: "4f1c".to_string(),
            email: "grower@example.com".to_string(),
            user_metadata: Metadata {
                name: Some("Grower".to_string()),
                phone: None,
                role: Some("mycologist".to_string()),
            },
        };
        let minimal = MinimalUser::from(&identity);
        assert_eq!(minimal.name.as_deref(), Some("Grower"));
        assert_eq!(minimal.role, None);

        let resolved = ResolvedUser::Minimal(minimal);
        assert!(resolved.is_degraded());
        assert_eq!(resolved.record(), None);
        assert_eq!(resolved.email(), "grower@example.com");
    }
}
