//! The top-level client for the platform.
use std::{env, time::Duration};

use crate::{
    accounts::Accounts,
    error::{Error, Result},
    http, identity, store,
};

/// Environment variable holding the platform URL.
pub const ENV_URL: &str = "MYCEL_URL";
/// Environment variable holding the service key.
pub const ENV_SERVICE_KEY: &str = "MYCEL_SERVICE_KEY";

/// Request timeout used unless [`Builder::with_timeout`] is set.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The client is the entrypoint of the whole crate. Build it once at startup
/// and pass it (or clones of it) to whatever handles requests.
///
/// You can create it using [`Client::builder`] or [`Client::new`].
///
/// # Examples
/// ```
/// use mycel_auth::{Client, Error};
///
/// fn main() -> Result<(), Error> {
///     // Set all available options. Unset options fall back to the
///     // environment variables MYCEL_URL and MYCEL_SERVICE_KEY.
///     let client = Client::builder()
///         .with_url("https://project.example.com")
///         .with_service_key("my-service-key")
///         .build()?;
///
///     assert_eq!(client.url(), "https://project.example.com");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    identity: identity::Client,
    store: store::Client,
}

impl Client {
    /// Creates a new client from the environment. If you want to configure
    /// it, use [`Client::builder`].
    ///
    /// # Errors
    /// If the URL or service key are missing or invalid.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client using a builder.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Get the url (cloned).
    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Identity operations on the auth API.
    pub fn identity(&self) -> &identity::Client {
        &self.identity
    }

    /// Row operations on the table API.
    pub fn store(&self) -> &store::Client {
        &self.store
    }

    /// Sign-up and session verification backed by this client.
    pub fn accounts(&self) -> Accounts<identity::Client, store::Client> {
        Accounts::new(self.identity.clone(), self.store.clone())
    }
}

/// This builder is used to create a new client.
pub struct Builder {
    env_fallback: bool,
    url: Option<String>,
    service_key: Option<String>,
    timeout: Option<Duration>,
}

impl Builder {
    /// Create a new builder.
    fn new() -> Self {
        Self {
            env_fallback: true,
            url: None,
            service_key: None,
            timeout: None,
        }
    }

    /// Don't fall back to environment variables.
    pub fn no_env(mut self) -> Self {
        self.env_fallback = false;
        self
    }

    /// Set the platform URL. If this is not set, the URL will be read from
    /// the environment variable `MYCEL_URL`.
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the service key. If this is not set, the key will be read from the
    /// environment variable `MYCEL_SERVICE_KEY`.
    pub fn with_service_key<S: Into<String>>(mut self, service_key: S) -> Self {
        self.service_key = Some(service_key.into());
        self
    }

    /// Set the timeout for a single request. Defaults to 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn resolve(&self, value: &Option<String>, var: &str) -> Option<String> {
        let mut value = value.clone().unwrap_or_default();
        if value.trim().is_empty() && self.env_fallback {
            value = env::var(var).unwrap_or_default();
        }
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Build the client.
    ///
    /// # Errors
    /// If the URL or service key are missing, or either is invalid.
    pub fn build(self) -> Result<Client> {
        let url = self.resolve(&self.url, ENV_URL).ok_or(Error::MissingUrl)?;
        let service_key = self
            .resolve(&self.service_key, ENV_SERVICE_KEY)
            .ok_or(Error::MissingServiceKey)?;

        let http_client = http::Client::new(
            &url,
            service_key,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;

        Ok(Client {
            url,
            identity: identity::Client::new(http_client.clone()),
            store: store::Client::new(http_client),
        })
    }
}
