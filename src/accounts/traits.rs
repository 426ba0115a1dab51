use async_trait::async_trait;

use crate::{
    error::{ProviderError, StoreError},
    identity::{Identity, NewIdentity},
    users::UserRecord,
};

/// The identity provider operations account provisioning relies on.
///
/// Implemented by [`identity::Client`](crate::identity::Client).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, req: &NewIdentity) -> Result<Identity, ProviderError>;

    async fn delete_user(&self, id: &str) -> Result<(), ProviderError>;

    /// Resolves a session token to its identity. Fails for invalid or
    /// expired tokens.
    async fn validate_token(&self, token: &str) -> Result<Identity, ProviderError>;
}

/// Storage for user records.
///
/// Implemented by [`store::Client`](crate::store::Client). Implementations
/// must report a write that violates the uniqueness of `id` or `email` as
/// [`StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, record: &UserRecord) -> Result<UserRecord, StoreError>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
}
