use backoff::{future::retry, ExponentialBackoffBuilder};
use http::header;
pub use http::HeaderMap;
pub(crate) use http::header::HeaderValue;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Platform, PlatformBody, Result};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Client is a wrapper around `reqwest::Client` which provides automatically
/// prepending the base url and authenticating with the service key.
#[derive(Debug, Clone)]
pub(crate) struct Client {
    base_url: Url,
    inner: reqwest::Client,
}

#[derive(Clone)]
pub(crate) enum Body {
    Empty,
    Json(serde_json::Value),
}

impl Client {
    /// Creates a new client.
    pub(crate) fn new<U, K>(base_url: U, service_key: K, timeout: Duration) -> Result<Self>
    where
        U: AsRef<str>,
        K: AsRef<str>,
    {
        let base_url = Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?;
        let service_key = service_key.as_ref();

        let mut default_headers = header::HeaderMap::new();
        let key_header_value =
            header::HeaderValue::from_str(service_key).map_err(|_e| Error::InvalidServiceKey)?;
        default_headers.insert("apikey", key_header_value);
        let auth_header_value = header::HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|_e| Error::InvalidServiceKey)?;
        default_headers.insert(header::AUTHORIZATION, auth_header_value);

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(Error::HttpClientSetup)?;

        Ok(Self {
            base_url,
            inner: http_client,
        })
    }

    /// Builds the headers for a request made on behalf of a session token
    /// instead of the service key.
    pub(crate) fn bearer_headers(token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_e| Error::InvalidSessionToken)?;
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    async fn execute<P, H>(
        &self,
        method: http::Method,
        path: P,
        body: Body,
        headers: H,
    ) -> Result<Response>
    where
        P: AsRef<str>,
        H: Into<Option<HeaderMap>>,
    {
        let url = self
            .base_url
            .join(path.as_ref().trim_start_matches('/'))
            .map_err(Error::InvalidUrl)?;

        let headers = headers.into();
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500)) // first retry after 500ms
            .with_multiplier(2.0) // all following retries are twice as long as the previous one
            .with_max_elapsed_time(Some(Duration::from_secs(30))) // try up to 30s
            .build();
        // A POST that timed out may still have been committed, sending it
        // again would create a duplicate.
        let idempotent = method != http::Method::POST;

        let res = retry(backoff, || async {
            let mut req = self.inner.request(method.clone(), url.clone());
            if let Some(headers) = headers.clone() {
                req = req.headers(headers);
            }
            match body.clone() {
                Body::Empty => {}
                Body::Json(value) => req = req.json(&value),
            }
            self.inner.execute(req.build()?).await.map_err(|e| {
                if idempotent {
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        })
        .await
        .map(|res| Response::new(res, method, path.as_ref().to_string()))
        .map_err(Error::Http)?;

        Ok(res)
    }

    pub(crate) async fn get<S, H>(&self, path: S, headers: H) -> Result<Response>
    where
        S: AsRef<str>,
        H: Into<Option<HeaderMap>>,
    {
        self.execute(http::Method::GET, path.as_ref(), Body::Empty, headers)
            .await
    }

    pub(crate) async fn post<S, P, H>(&self, path: S, payload: P, headers: H) -> Result<Response>
    where
        S: AsRef<str>,
        P: Serialize,
        H: Into<Option<HeaderMap>>,
    {
        self.execute(
            http::Method::POST,
            path,
            Body::Json(serde_json::to_value(payload).map_err(Error::Serialize)?),
            headers,
        )
        .await
    }

    pub(crate) async fn delete<S>(&self, path: S) -> Result<()>
    where
        S: AsRef<str>,
    {
        self.execute(http::Method::DELETE, path, Body::Empty, None)
            .await?
            .check_error()
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct Response {
    inner: reqwest::Response,
    method: http::Method,
    path: String,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response, method: http::Method, path: String) -> Self {
        Self {
            inner,
            method,
            path,
        }
    }

    pub(crate) async fn json<T: DeserializeOwned>(self) -> Result<T> {
        self.check_error()
            .await?
            .inner
            .json::<T>()
            .await
            .map_err(Error::Deserialize)
    }

    pub(crate) async fn check_error(self) -> Result<Response> {
        let status = self.inner.status();
        if !status.is_success() {
            // Decoding may fail (e.g. an HTML page from a proxy), we still
            // want a platform error then.
            let body = self.inner.json::<PlatformBody>().await.ok();
            return Err(Error::Platform(Platform::new(
                status.as_u16(),
                self.method,
                self.path,
                body,
            )));
        }

        Ok(self)
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }
}
