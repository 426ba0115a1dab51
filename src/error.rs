//! Error type definitions.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// A `Result` alias where the `Err` case is `mycel_auth::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Postgres error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// The error type for the platform clients.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Missing platform URL (set MYCEL_URL or use Builder::with_url)")]
    MissingUrl,
    #[error("Missing service key (set MYCEL_SERVICE_KEY or use Builder::with_service_key)")]
    MissingServiceKey,
    #[error("Invalid service key (make sure there are no invalid characters)")]
    InvalidServiceKey,
    #[error("Invalid session token (make sure there are no invalid characters)")]
    InvalidSessionToken,
    #[error("Failed to setup HTTP client: {0}")]
    HttpClientSetup(reqwest::Error),
    #[error("Failed to deserialize response: {0}")]
    Deserialize(reqwest::Error),
    #[error("Http error: {0}")]
    Http(reqwest::Error),
    #[error(transparent)]
    Platform(Platform),
    #[error("Expected one row in response to {0}, got none")]
    EmptyResponse(String),
    #[error(transparent)]
    InvalidParams(#[from] serde_qs::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(url::ParseError),
}

/// An error returned by the platform.
///
/// The auth API and the table API use different error bodies, both are
/// decoded into the same shape. The auth API reports `msg` or
/// `error_description` and a numeric or string `code`, the table API reports
/// `message` and a Postgres error `code`.
#[derive(Debug, Clone)]
pub struct Platform {
    pub status: u16,
    pub method: http::Method,
    pub path: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct PlatformBody {
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl Platform {
    pub(crate) fn new(
        status: u16,
        method: http::Method,
        path: String,
        body: Option<PlatformBody>,
    ) -> Self {
        let PlatformBody {
            code,
            error_code,
            message,
            msg,
            error_description,
            error,
        } = body.unwrap_or_default();
        let code = error_code.or_else(|| match code {
            Some(serde_json::Value::String(code)) => Some(code),
            Some(serde_json::Value::Number(code)) => Some(code.to_string()),
            _ => None,
        });
        let message = message.or(msg).or(error_description).or(error);
        Self {
            status,
            method,
            path,
            code,
            message,
        }
    }

    /// Returns true if the platform rejected a write because a row with the
    /// same unique key already exists. The table API also answers 409 for
    /// foreign key violations, so the status only decides without a code.
    pub fn is_unique_violation(&self) -> bool {
        match self.code.as_deref() {
            Some(code) => code == UNIQUE_VIOLATION,
            None => self.status == 409,
        }
    }
}

impl std::error::Error for Platform {}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code.as_ref(), self.message.as_ref()) {
            (Some(code), Some(msg)) => write!(
                f,
                "Received {} on {} {}: {} ({})",
                self.status, self.method, self.path, msg, code
            ),
            (None, Some(msg)) => write!(
                f,
                "Received {} on {} {}: {}",
                self.status, self.method, self.path, msg
            ),
            (Some(code), None) => write!(
                f,
                "Received {} on {} {} ({})",
                self.status, self.method, self.path, code
            ),
            (None, None) => write!(
                f,
                "Received {} on {} {}",
                self.status, self.method, self.path
            ),
        }
    }
}

/// The identity provider failed to create, delete or validate an identity.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Identity provider rejected the request: {0}")]
    Rejected(Platform),
    #[error("Identity provider request failed: {0}")]
    Request(Error),
}

impl From<Error> for ProviderError {
    fn from(err: Error) -> Self {
        match err {
            Error::Platform(e) => ProviderError::Rejected(e),
            err => ProviderError::Request(err),
        }
    }
}

/// A persistence store operation failed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A row with the same id or email already exists.
    #[error("Unique key conflict: {0}")]
    Conflict(Platform),
    #[error("Store rejected the request: {0}")]
    Rejected(Platform),
    #[error("Store request failed: {0}")]
    Request(Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Platform(e) if e.is_unique_violation() => StoreError::Conflict(e),
            Error::Platform(e) => StoreError::Rejected(e),
            err => StoreError::Request(err),
        }
    }
}

/// Returned by the authentication guard when no valid session is present.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Authentication required")]
    Unauthenticated,
}

/// Why a sign-up did not produce an account.
#[derive(Error, Debug)]
pub enum SignUpError {
    #[error("Invalid sign-up request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Provider(ProviderError),
    /// The user record could not be written. The identity created for it has
    /// been deleted again unless `orphaned_identity` is set.
    #[error("Failed to create user record: {source}")]
    Store {
        source: StoreError,
        orphaned_identity: Option<String>,
    },
}
