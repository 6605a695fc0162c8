//! HTTP transport for the Consul agent API
//!
//! Thin wrapper over `reqwest` that applies the ACL token, the target
//! datacenter and the read consistency mode to every request.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::{
    config::ConsulConfig,
    constants::TOKEN_HEADER,
    error::{ClientError, Result},
};

/// Query parameters as `(name, value)` pairs; flags carry an empty value
pub type Query<'a> = [(&'a str, String)];

/// Base used only to borrow `Url`'s path-segment encoding
const PATH_BASE: &str = "http://consul.invalid";

/// Append `segments` to an API path prefix, percent-encoding each one.
///
/// A `/` inside a segment is encoded, so callers split hierarchical names
/// (KV keys) themselves and pass service or check IDs as a single segment.
pub fn api_path<'a>(prefix: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let mut url = Url::parse(PATH_BASE).map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
    url.set_path(prefix);
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidConfig(format!("{} cannot take segments", prefix)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.path().to_string())
}

/// HTTP client bound to a single Consul agent
pub struct ConsulHttpClient {
    client: Client,
    config: ConsulConfig,
}

impl ConsulHttpClient {
    /// Create a new HTTP client
    pub fn new(config: ConsulConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ConsulConfig {
        &self.config
    }

    /// Build full URL for an API path
    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Attach token and datacenter, plus the consistency flag for reads
    fn decorate(&self, mut request: RequestBuilder, read: bool) -> RequestBuilder {
        if let Some(token) = &self.config.token {
            request = request.header(TOKEN_HEADER, token);
        }
        if let Some(dc) = &self.config.datacenter {
            request = request.query(&[("dc", dc)]);
        }
        if read {
            if let Some(flag) = self.config.consistency.query_flag() {
                request = request.query(&[(flag, "")]);
            }
        }
        request
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .decorate(self.client.get(&url), true)
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Make a GET request, mapping 404 to `None`
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<Option<T>> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .decorate(self.client.get(&url), true)
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} not found", url);
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Make a PUT request with a raw string body
    pub async fn put_body<T: DeserializeOwned>(
        &self,
        path: &str,
        body: String,
        query: &Query<'_>,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!("PUT {} ({} bytes)", url, body.len());

        let response = self
            .decorate(self.client.put(&url), false)
            .query(query)
            .body(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a PUT request with JSON body, ignoring the response body
    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.build_url(path);
        debug!("PUT {}", url);

        let response = self
            .decorate(self.client.put(&url), false)
            .json(body)
            .send()
            .await?;
        self.handle_empty(response).await
    }

    /// Make a PUT request with query parameters only, ignoring the response body
    pub async fn put_with_query(&self, path: &str, query: &Query<'_>) -> Result<()> {
        let url = self.build_url(path);
        debug!("PUT {}", url);

        let response = self
            .decorate(self.client.put(&url), false)
            .query(query)
            .send()
            .await?;
        self.handle_empty(response).await
    }

    /// Make a DELETE request with query parameters
    pub async fn delete_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self
            .decorate(self.client.delete(&url), false)
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle response and parse JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(Self::failure(status, response).await)
        }
    }

    /// Handle response whose body carries no data
    async fn handle_empty(&self, response: Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::failure(status, response).await)
        }
    }

    async fn failure(status: StatusCode, response: Response) -> ClientError {
        let body = response.text().await.unwrap_or_default();
        error!("Request failed with status {}: {}", status, body);
        ClientError::RequestFailed {
            status: status.as_u16(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let client = ConsulHttpClient::new(ConsulConfig::default()).unwrap();
        assert_eq!(
            client.build_url("/v1/kv/foo"),
            "http://localhost:8500/v1/kv/foo"
        );
    }

    #[test]
    fn test_build_url_https() {
        let config = ConsulConfig::new("consul.service", 8501).with_scheme("https");
        let client = ConsulHttpClient::new(config).unwrap();
        assert_eq!(
            client.build_url("/v1/agent/services"),
            "https://consul.service:8501/v1/agent/services"
        );
    }

    #[test]
    fn test_api_path_encodes_segments() {
        assert_eq!(api_path("/v1/kv/", ["app", "db"]).unwrap(), "/v1/kv/app/db");
        assert_eq!(
            api_path("/v1/kv/", ["app#fragment"]).unwrap(),
            "/v1/kv/app%23fragment"
        );
        assert_eq!(api_path("/v1/kv/", ["a?b c"]).unwrap(), "/v1/kv/a%3Fb%20c");
        assert_eq!(
            api_path("/v1/agent/check/pass/", ["service:db"]).unwrap(),
            "/v1/agent/check/pass/service:db"
        );
        assert_eq!(
            api_path("/v1/agent/service/deregister/", ["web/1"]).unwrap(),
            "/v1/agent/service/deregister/web%2F1"
        );
    }

    #[test]
    fn test_api_path_keeps_trailing_slash() {
        assert_eq!(api_path("/v1/kv/", ["app", ""]).unwrap(), "/v1/kv/app/");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = ConsulHttpClient::new(ConsulConfig::new("localhost", 0));
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }
}
