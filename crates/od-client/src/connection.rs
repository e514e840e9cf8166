//! Connection to a 1C OData service host.

use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::ODataRequest;
use crate::response::Response;

/// Basic-auth credentials for the 1C publication.
///
/// The password is redacted in Debug output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A connection to one service host: a reqwest client plus base URL and
/// credentials. Cloning is cheap and shares the underlying client.
#[derive(Debug, Clone)]
pub struct Connection {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    config: ClientConfig,
}

impl Connection {
    /// Create a connection with default configuration.
    ///
    /// `host` may carry a port (`"1c.example.com"`, `"127.0.0.1:8080"`);
    /// `protocol` is `"http"` or `"https"`.
    pub fn new(
        host: impl AsRef<str>,
        protocol: impl AsRef<str>,
        credentials: Credentials,
    ) -> Result<Self> {
        Self::with_config(host, protocol, credentials, ClientConfig::default())
    }

    /// Create a connection with custom configuration.
    pub fn with_config(
        host: impl AsRef<str>,
        protocol: impl AsRef<str>,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let protocol = protocol.as_ref();
        if protocol != "http" && protocol != "https" {
            return Err(Error::new(ErrorKind::Config(format!(
                "unsupported protocol '{protocol}'"
            ))));
        }

        let base_url = format!("{}://{}/", protocol, host.as_ref());
        url::Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            http,
            base_url,
            credentials,
            config,
        })
    }

    /// Get the base URL (always ends with `/`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the absolute URL for a relative one.
    pub fn url(&self, relative_url: &str) -> String {
        format!("{}{}", self.base_url, relative_url.trim_start_matches('/'))
    }

    /// Send a request and buffer the response.
    ///
    /// Transport failures map to `ErrorKind::Timeout` /
    /// `ErrorKind::Connection`; any response, success or not, comes back as
    /// a `Response` for the caller to check against its expected status.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.relative_url))]
    pub async fn send(&self, request: ODataRequest) -> Result<Response> {
        let url = self.url(&request.relative_url);
        let mut req = self
            .http
            .request(request.method.to_reqwest(), &url)
            .basic_auth(self.credentials.username(), Some(self.credentials.password()));

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if !request.query_params.is_empty() {
            req = req.query(&request.query_params);
        }
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        if self.config.enable_tracing {
            debug!(method = ?request.method, url = %url, "sending request");
        }

        let response = req.send().await?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = response.text().await?;

        if self.config.enable_tracing {
            debug!(status = status.as_u16(), bytes = body.len(), "response received");
        }

        Ok(Response::new(status.as_u16(), reason, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Credentials {
        Credentials::new("user", "secret")
    }

    fn host_of(server: &MockServer) -> String {
        server
            .uri()
            .strip_prefix("http://")
            .expect("mock server uri is http")
            .to_string()
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let debug = format!("{:?}", test_credentials());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_unsupported_protocol() {
        let err = Connection::new("host", "ftp", test_credentials()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[test]
    fn test_url_building() {
        let conn = Connection::new("1c.example.com", "https", test_credentials()).unwrap();
        assert_eq!(
            conn.url("zup-demo/odata/standard.odata/$metadata"),
            "https://1c.example.com/zup-demo/odata/standard.odata/$metadata"
        );
        assert_eq!(conn.url("/leading-slash"), "https://1c.example.com/leading-slash");
    }

    #[tokio::test]
    async fn test_send_with_auth_and_query_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/db/odata/standard.odata/Catalog_Items"))
            .and(query_param("$top", "3"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
            )
            .mount(&mock_server)
            .await;

        let conn = Connection::new(host_of(&mock_server), "http", test_credentials()).unwrap();
        let response = conn
            .send(ODataRequest::get("db/odata/standard.odata/Catalog_Items").query("$top", "3"))
            .await
            .unwrap();

        assert!(response.is_success());
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["value"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_non_success_status_is_still_a_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("X"))
            .mount(&mock_server)
            .await;

        let conn = Connection::new(host_of(&mock_server), "http", test_credentials()).unwrap();
        let response = conn.send(ODataRequest::get("missing")).await.unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(response.reason(), "Not Found");
        assert_eq!(response.text(), "X");

        let err = response.expect_status(200).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("Not Found"));
        assert!(message.contains("X"));
    }

    #[tokio::test]
    async fn test_network_failure_maps_to_connection_error() {
        // Port 1 is never listening.
        let conn = Connection::new("127.0.0.1:1", "http", test_credentials()).unwrap();
        let err = conn.send(ODataRequest::get("anything")).await.unwrap_err();
        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/entity"))
            .and(wiremock::matchers::body_json(
                serde_json::json!({"Description": "Test"}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "Description": "Test"
            })))
            .mount(&mock_server)
            .await;

        let conn = Connection::new(host_of(&mock_server), "http", test_credentials()).unwrap();
        let response = conn
            .send(
                ODataRequest::post("entity")
                    .json(&serde_json::json!({"Description": "Test"}))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
    }
}
