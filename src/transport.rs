//! HTTP transport for the speedrun.com API.
//!
//! [`Transport`] owns the immutable header set (User-Agent and optional API
//! key), issues GET/POST/PUT/DELETE calls against the API base URL, maps
//! responses with status 400 or above into [`Kind::Status`](crate::error::Kind::Status)
//! errors, unwraps the `data` field of the response envelope, and drains
//! pagination on GET.
//!
//! # Example
//!
//! ```no_run
//! use srcom_client_sdk::{Config, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Transport::new(srcom_client_sdk::API_URL, Config::from_env())?;
//!
//! let platforms = transport
//!     .get("platforms", &[("orderby", "released")], false)
//!     .await?;
//! println!("{} platforms", platforms.as_array().map_or(0, Vec::len));
//! # Ok(())
//! # }
//! ```

use bon::Builder;
use futures::Stream;
use reqwest::{Client as ReqwestClient, Method, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::auth::{self, ApiKey};
use crate::error::Error;
use crate::pagination::{self, Pagination};
use crate::{API_KEY_VAR, API_URL, Result, ToQueryParams as _, serde_helpers};

const DEFAULT_USER_AGENT: &str = "srcom_client_sdk";

/// Configuration for [`Transport`].
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Sent as `User-Agent` on every request.
    #[builder(into, default = DEFAULT_USER_AGENT.to_owned())]
    user_agent: String,
    /// Sent as `X-API-Key` on every request when present.
    #[builder(into)]
    api_key: Option<ApiKey>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Default configuration with the API key taken from [`API_KEY_VAR`], if set and non-empty.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .map(ApiKey::from);

        Self::builder().maybe_api_key(api_key).build()
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }
}

/// The top-level object of every API response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[non_exhaustive]
pub struct Envelope {
    pub data: Value,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Low-level HTTP transport.
///
/// Cheap to clone; clones share the underlying connection pool. Independent
/// instances (for example with different API keys) can coexist freely.
#[derive(Clone, Debug)]
pub struct Transport {
    host: Url,
    client: ReqwestClient,
    authenticated: bool,
}

impl Default for Transport {
    fn default() -> Self {
        Transport::new(API_URL, Config::default())
            .expect("Transport with default endpoint should succeed")
    }
}

impl Transport {
    /// Creates a transport against `host` (normally [`API_URL`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid, or the HTTP
    /// client cannot be created.
    pub fn new(host: &str, config: Config) -> Result<Transport> {
        let mut host = Url::parse(host)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        let headers = auth::default_headers(config.user_agent(), config.api_key())?;
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            host,
            client,
            authenticated: config.api_key().is_some(),
        })
    }

    /// Returns the base URL every relative path is resolved against.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Whether requests carry an API key.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Issues a GET against `path` and returns the response `data`.
    ///
    /// When `query` serializes to at least one parameter, the page size `max`
    /// is set to 200, or 1000 in `bulk` mode. A paginated response is drained
    /// completely and its pages concatenated before returning.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        bulk: bool,
    ) -> Result<Value> {
        let request = self.request(Method::GET, path, query.query_params(bulk))?;
        let envelope = self.execute(request).await?;
        pagination::drain(self, envelope).await
    }

    /// Like [`Self::get`], deserializing the assembled `data` into `Res`.
    pub async fn get_as<Q: Serialize + ?Sized, Res: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
        bulk: bool,
    ) -> Result<Res> {
        let data = self.get(path, query, bulk).await?;
        serde_helpers::deserialize_with_warnings(data)
    }

    /// Returns a stream of the items of a paginated collection.
    ///
    /// Pages are requested one at a time as the stream is polled.
    pub fn stream<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        bulk: bool,
    ) -> Result<impl Stream<Item = Result<Value>> + '_> {
        let request = self.request(Method::GET, path, query.query_params(bulk))?;
        Ok(pagination::stream(self, request))
    }

    /// Issues a POST with a JSON body. Mutation endpoints are never paginated.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send_json(Method::POST, path, body).await
    }

    /// Issues a PUT with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send_json(Method::PUT, path, body).await
    }

    /// Issues a DELETE.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        let request = self.request(Method::DELETE, path, String::new())?;
        Ok(self.execute(request).await?.data)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let request = self
            .client
            .request(method, format!("{}{path}", self.host))
            .json(body)
            .build()?;
        Ok(self.execute(request).await?.data)
    }

    fn request(&self, method: Method, path: &str, query: String) -> Result<Request> {
        Ok(self
            .client
            .request(method, format!("{}{path}{query}", self.host))
            .build()?)
    }

    /// Builds a plain GET against an absolute pagination link.
    pub(crate) fn follow_request(&self, link: &str) -> Result<Request> {
        Ok(self.client.get(Url::parse(link)?).build()?)
    }

    /// Path of `url` relative to the API base, as reported in errors.
    fn relative_path(&self, url: &Url) -> String {
        let path = url.path();
        path.strip_prefix(self.host.path())
            .unwrap_or(path)
            .to_owned()
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, request),
            fields(
                method = %request.method(),
                path = request.url().path(),
                status_code
            )
        )
    )]
    pub(crate) async fn execute(&self, request: Request) -> Result<Envelope> {
        let method = request.method().clone();
        let path = self.relative_path(request.url());

        let response = self.client.execute(request).await?;
        let status_code = response.status();

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("status_code", status_code.as_u16());

        if status_code.is_client_error() || status_code.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));

            #[cfg(feature = "tracing")]
            tracing::warn!(
                status = %status_code,
                method = %method,
                path = %path,
                body = %body,
                "API request failed"
            );

            return Err(Error::status(status_code, method, path, body));
        }

        let json_value = response.json::<Value>().await?;
        serde_helpers::deserialize_with_warnings(json_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_should_point_at_api() {
        let transport = Transport::default();
        assert_eq!(transport.host().as_str(), API_URL);
        assert!(!transport.is_authenticated());
    }

    #[test]
    fn missing_trailing_slash_should_be_added() {
        let transport = Transport::new("http://localhost:8080/api/v1", Config::default()).unwrap();
        assert_eq!(transport.host().as_str(), "http://localhost:8080/api/v1/");
    }

    #[test]
    fn invalid_host_should_fail() {
        let err = Transport::new("not a url", Config::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::Internal);
    }

    #[test]
    fn relative_path_should_strip_base() {
        let transport = Transport::default();
        let url = Url::parse("https://www.speedrun.com/api/v1/games/xyz?embed=levels").unwrap();
        assert_eq!(transport.relative_path(&url), "games/xyz");
    }

    #[test]
    fn relative_path_outside_base_should_be_kept() {
        let transport = Transport::default();
        let url = Url::parse("https://www.speedrun.com/other/thing").unwrap();
        assert_eq!(transport.relative_path(&url), "/other/thing");
    }

    #[test]
    fn encoded_segments_should_survive_request_building() {
        let transport = Transport::default();

        let request = transport
            .request(Method::GET, "guests/a%3Fb%23c", "?max=200".to_owned())
            .unwrap();

        assert_eq!(request.url().path(), "/api/v1/guests/a%3Fb%23c");
        assert_eq!(request.url().query(), Some("max=200"));
        assert_eq!(request.url().fragment(), None);
    }

    #[test]
    fn config_with_key_should_authenticate() {
        let config = Config::builder()
            .user_agent("tester/1.0")
            .api_key("secret-key")
            .build();
        assert_eq!(config.user_agent(), "tester/1.0");

        let transport = Transport::new(API_URL, config).unwrap();
        assert!(transport.is_authenticated());
    }

    #[test]
    fn envelope_without_pagination_should_deserialize() {
        let envelope: Envelope =
            serde_json::from_value(serde_json::json!({"data": {"id": "abc"}})).unwrap();
        assert!(envelope.pagination.is_none());
        assert_eq!(envelope.data["id"], "abc");
    }
}
