use serde::{Deserialize, Serialize};

use crate::users::ResolvedUser;

/// The outcome of verifying a session token.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum Verification {
    Unauthenticated,
    Authenticated(ResolvedUser),
}

impl Verification {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Verification::Authenticated(_))
    }

    pub fn user(&self) -> Option<&ResolvedUser> {
        match self {
            Verification::Authenticated(user) => Some(user),
            Verification::Unauthenticated => None,
        }
    }

    pub fn into_user(self) -> Option<ResolvedUser> {
        match self {
            Verification::Authenticated(user) => Some(user),
            Verification::Unauthenticated => None,
        }
    }
}
