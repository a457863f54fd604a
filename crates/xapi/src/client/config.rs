//! LRS connection settings.
//!
//! Embedders either build an [`LrsConfig`] in code with
//! [`LrsConfig::builder`] or deserialize it from their own configuration
//! files. The endpoint is normalized to end with `/` so that resource paths
//! join underneath it.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use url::Url;

use crate::client::transport::DEFAULT_TIMEOUT_SECS;
use crate::error::ClientError;
use crate::model::Version;

pub const DEFAULT_USER_AGENT: &str = concat!("xapi-rs/", env!("CARGO_PKG_VERSION"));

/// An opaque credential sent as the `Authorization` header.
///
/// The client never inspects it. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "AuthConfig")]
pub struct Auth(String);

impl Auth {
    /// HTTP basic credentials.
    pub fn basic(username: &str, password: &str) -> Self {
        Auth(format!("Basic {}", BASE64.encode(format!("{username}:{password}"))))
    }

    pub fn bearer(token: &str) -> Self {
        Auth(format!("Bearer {token}"))
    }

    /// A preformatted `Authorization` header value.
    pub fn raw(header: impl Into<String>) -> Self {
        Auth(header.into())
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = self.0.split_whitespace().next().filter(|s| self.0.len() > s.len());
        match scheme {
            Some(scheme) => write!(f, "Auth({scheme} <redacted>)"),
            None => f.write_str("Auth(<redacted>)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum AuthConfig {
    Basic { username: String, password: String },
    Bearer { token: String },
    Raw { header: String },
}

impl From<AuthConfig> for Auth {
    fn from(config: AuthConfig) -> Self {
        match config {
            AuthConfig::Basic { username, password } => Auth::basic(&username, &password),
            AuthConfig::Bearer { token } => Auth::bearer(&token),
            AuthConfig::Raw { header } => Auth::raw(header),
        }
    }
}

/// Settings for an [`LrsClient`](crate::client::LrsClient).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LrsConfig {
    /// Base URL of the xAPI endpoint, e.g. `https://lrs.example.com/xapi/`.
    pub endpoint: Url,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub auth: Option<Auth>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl LrsConfig {
    /// Start building a new configuration.
    pub fn builder() -> LrsConfigBuilder {
        LrsConfigBuilder::default()
    }

    /// Request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// Builder for [`LrsConfig`].
#[derive(Debug, Clone)]
pub struct LrsConfigBuilder {
    endpoint: Option<String>,
    version: Version,
    auth: Option<Auth>,
    timeout_secs: u64,
    user_agent: Option<String>,
}

impl Default for LrsConfigBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            version: Version::LATEST,
            auth: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl LrsConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<LrsConfig, ClientError> {
        let endpoint = self.endpoint.ok_or(ClientError::MissingEndpoint)?;
        let endpoint = Url::parse(&endpoint).map_err(|err| ClientError::InvalidEndpoint {
            url: endpoint.clone(),
            message: err.to_string(),
        })?;
        Ok(LrsConfig {
            endpoint: normalize_endpoint(endpoint)?,
            version: self.version,
            auth: self.auth,
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent,
        })
    }
}

/// Ensures the endpoint can serve as a base URL and ends with `/`.
pub fn normalize_endpoint(mut endpoint: Url) -> Result<Url, ClientError> {
    if endpoint.cannot_be_a_base() || !matches!(endpoint.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint {
            url: endpoint.to_string(),
            message: "endpoint must be an http(s) base URL".to_string(),
        });
    }
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    Ok(endpoint)
}
