use async_trait::async_trait;
use std::fmt;
use tracing::instrument;

use crate::{
    accounts::IdentityProvider,
    error::{ProviderError, Result},
    http,
    identity::{Identity, NewIdentity},
};

/// Provides methods to work with identities on the platform's auth API.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: http::Client,
}

impl Client {
    pub(crate) fn new(http_client: http::Client) -> Self {
        Self { http_client }
    }

    /// Creates an identity.
    ///
    /// # Errors
    /// If the API call fails, e.g. because the email is already registered.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: &NewIdentity) -> Result<Identity> {
        self.http_client
            .post("/auth/v1/admin/users", req, None)
            .await?
            .json()
            .await
    }

    /// Deletes an identity.
    ///
    /// # Errors
    /// If the API call fails
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: impl fmt::Display + fmt::Debug) -> Result<()> {
        self.http_client
            .delete(format!("/auth/v1/admin/users/{id}"))
            .await
    }

    /// Resolves a session token to the identity it was issued for.
    ///
    /// # Errors
    /// If the token is invalid or expired, or the API call fails
    #[instrument(skip(self, token))]
    pub async fn get_user(&self, token: &str) -> Result<Identity> {
        let headers = http::Client::bearer_headers(token)?;
        self.http_client
            .get("/auth/v1/user", headers)
            .await?
            .json()
            .await
    }
}

#[async_trait]
impl IdentityProvider for Client {
    async fn create_user(&self, req: &NewIdentity) -> std::result::Result<Identity, ProviderError> {
        Ok(Client::create_user(self, req).await?)
    }

    async fn delete_user(&self, id: &str) -> std::result::Result<(), ProviderError> {
        Ok(Client::delete_user(self, id).await?)
    }

    async fn validate_token(&self, token: &str) -> std::result::Result<Identity, ProviderError> {
        Ok(self.get_user(token).await?)
    }
}
