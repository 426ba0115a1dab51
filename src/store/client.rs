use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::{
    accounts::UserStore,
    error::{Error, Result, StoreError},
    http::{self, HeaderMap, HeaderValue},
    store::Filter,
    users::UserRecord,
};

/// The table holding application user records.
pub const USERS_TABLE: &str = "users";

/// Provides methods to read and write rows on the platform's table API.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: http::Client,
}

impl Client {
    pub(crate) fn new(http_client: http::Client) -> Self {
        Self { http_client }
    }

    /// Insert a row into the given table and return it as stored.
    ///
    /// # Errors
    /// If the API call fails. A unique key violation surfaces as an
    /// [`Error::Platform`] for which
    /// [`is_unique_violation`](crate::error::Platform::is_unique_violation)
    /// is true.
    #[instrument(skip(self, row))]
    pub async fn insert<T, R>(&self, table: &str, row: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let res = self
            .http_client
            .post(format!("/rest/v1/{table}"), row, headers)
            .await?;
        let path = res.path().to_string();
        let mut rows: Vec<R> = res.json().await?;
        if rows.is_empty() {
            return Err(Error::EmptyResponse(path));
        }
        Ok(rows.swap_remove(0))
    }

    /// Select the first row of the given table matching the filter.
    ///
    /// # Errors
    /// If the API call fails
    #[instrument(skip(self))]
    pub async fn select_one<R>(&self, table: &str, filter: &Filter) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        let query_params = serde_qs::to_string(&filter.to_params(1))?;
        let rows: Vec<R> = self
            .http_client
            .get(format!("/rest/v1/{table}?{query_params}"), None)
            .await?
            .json()
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_user(&self, column: &str, value: &str) -> Result<Option<UserRecord>> {
        self.select_one(USERS_TABLE, &Filter::eq(column, value))
            .await
    }
}

#[async_trait]
impl UserStore for Client {
    async fn insert_user(&self, record: &UserRecord) -> std::result::Result<UserRecord, StoreError> {
        Ok(self.insert(USERS_TABLE, record).await?)
    }

    async fn find_user_by_id(&self, id: &str) -> std::result::Result<Option<UserRecord>, StoreError> {
        Ok(self.find_user("id", id).await?)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> std::result::Result<Option<UserRecord>, StoreError> {
        Ok(self.find_user("email", email).await?)
    }
}
