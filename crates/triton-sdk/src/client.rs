//! Signed HTTP transport shared by the service clients.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION, DATE, HeaderMap};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::auth::{RequestSigner, http_date};
use crate::error::{ApiError, Result, SdkError};

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// CloudAPI version requested via `accept-version`.
pub const API_VERSION: &str = "~9";

/// Connection settings for a Triton service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service endpoint, e.g. `https://us-east-1.api.joyent.com`.
    pub url: String,
    /// Account login.
    pub account: String,
    /// Key fingerprint registered with the account.
    pub key_id: String,
    /// PKCS#8 PEM private key, inline or as a file path.
    pub key_material: String,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        account: impl Into<String>,
        key_id: impl Into<String>,
        key_material: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            account: account.into(),
            key_id: key_id.into(),
            key_material: key_material.into(),
            user_agent: String::new(),
        }
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Signed JSON-over-HTTPS client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base: String,
    signer: RequestSigner,
}

impl HttpClient {
    /// Validates `config`, loads the signing key and builds the client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(SdkError::config("endpoint URL is required"));
        }
        let signer = RequestSigner::new(&config.account, &config.key_id, &config.key_material)?;
        let mut builder = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT);
        if !config.user_agent.is_empty() {
            builder = builder.user_agent(config.user_agent.clone());
        }
        Ok(Self {
            http: builder.build()?,
            base: config.url.trim_end_matches('/').to_string(),
            signer,
        })
    }

    /// Account the client acts for.
    #[must_use]
    pub fn account(&self) -> &str {
        self.signer.account()
    }

    /// Endpoint without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Sends a signed request and maps non-2xx answers to [`ApiError`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
        accept: &str,
    ) -> Result<Response> {
        let url = format!("{}{path}", self.base);
        let date = http_date(Utc::now());
        trace!(method = method.as_str(), %url, "sending request");

        let mut request = self
            .http
            .request(method, &url)
            .header(DATE, &date)
            .header(AUTHORIZATION, self.signer.authorization(&date))
            .header(ACCEPT, accept)
            .header("accept-version", API_VERSION);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &text).into())
    }

    /// `GET` decoding a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let response = self
            .send(Method::GET, path, query, None, "application/json")
            .await?;
        decode(response, path).await
    }

    /// `POST` a JSON body and decode the JSON answer.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .send(Method::POST, path, query, Some(body), "application/json")
            .await?;
        decode(response, path).await
    }

    /// `POST` ignoring any answer body.
    pub async fn post_empty(&self, path: &str, query: &[(String, String)]) -> Result<()> {
        self.send(Method::POST, path, query, None, "application/json")
            .await?;
        Ok(())
    }

    /// `DELETE` a resource.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None, "application/json")
            .await?;
        Ok(())
    }

    /// `HEAD` returning the response headers.
    pub async fn head(&self, path: &str, query: &[(String, String)]) -> Result<HeaderMap> {
        let response = self
            .send(Method::HEAD, path, query, None, "application/json")
            .await?;
        Ok(response.headers().clone())
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| SdkError::decode(what, e))
}

/// Reads an integer header, treating absence or garbage as zero.
#[must_use]
pub fn header_count(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn missing_url_is_a_config_error() {
        let config = ClientConfig::new("", "acme", "ab:cd", "x");
        assert!(matches!(HttpClient::new(&config), Err(SdkError::Config(_))));
    }

    #[test]
    fn user_agent_is_recorded() {
        let config = ClientConfig::new("https://api", "acme", "k", "m").with_user_agent("triton/1.0");
        assert_eq!(config.user_agent, "triton/1.0");
    }

    #[test]
    fn count_header_parses() {
        let mut headers = HeaderMap::new();
        headers.insert("x-resource-count", HeaderValue::from_static("7"));
        assert_eq!(header_count(&headers, "x-resource-count"), 7);
        assert_eq!(header_count(&headers, "result-set-size"), 0);
    }
}
