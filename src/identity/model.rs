use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_blank_none, deserialize_null_default};

/// An identity managed by the platform's auth service.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Identity {
    /// The identity's unique identifier.
    pub id: String,
    /// The identity's email address.
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub email: String,
    /// Profile data attached at sign-up.
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub user_metadata: Metadata,
}

/// Free-form profile data stored alongside an identity.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Metadata {
    #[serde(
        default,
        deserialize_with = "deserialize_blank_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_blank_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    /// Kept as a string, the auth service doesn't validate it.
    #[serde(
        default,
        deserialize_with = "deserialize_blank_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
}

/// Request body for creating an identity through the admin API.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    /// Marks the email as confirmed so no verification mail is sent.
    pub email_confirm: bool,
    pub user_metadata: Metadata,
}

impl NewIdentity {
    /// An identity whose email is confirmed on creation.
    pub fn confirmed<E, P>(email: E, password: P, user_metadata: Metadata) -> Self
    where
        E: Into<String>,
        P: Into<String>,
    {
        Self {
            email: email.into(),
            password: password.into(),
            email_confirm: true,
            user_metadata,
        }
    }
}
