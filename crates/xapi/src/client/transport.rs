//! The HTTP capability the client is built on.
//!
//! The client only needs "send a request, get status, headers and body".
//! [`Transport`] is that seam; [`ReqwestTransport`] is the default
//! implementation and tests substitute their own.

use std::sync::Arc;

use url::Url;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Looks up a header by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Performs one HTTP exchange.
///
/// Implementations own timeouts and connection management. Any failure to
/// obtain a response is a [`TransportError`]; non-2xx responses are not
/// errors at this level.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

// =============================================================================
// REQWEST
// =============================================================================

#[cfg(feature = "reqwest")]
pub use self::reqwest_impl::{ReqwestTransport, ReqwestTransportBuilder};

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use tracing::debug;

    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::error::TransportError;

    /// Blocking transport backed by `reqwest`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        /// Start building a new transport.
        pub fn builder() -> ReqwestTransportBuilder {
            ReqwestTransportBuilder::default()
        }

        /// Transport with default settings.
        pub fn new() -> Result<Self, TransportError> {
            Self::builder().build()
        }

        /// Wraps an existing client.
        pub fn from_client(client: Client) -> Self {
            Self { client }
        }
    }

    impl Transport for ReqwestTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };
            let url = request.url;
            debug!(%method, %url, "sending HTTP request");

            let mut builder = self.client.request(method.clone(), url.clone());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if !request.body.is_empty() {
                builder = builder.body(request.body);
            }

            let response = builder.send().map_err(|err| {
                debug!(%method, %url, error = %err, "HTTP request failed");
                TransportError::new(err.to_string())
            })?;

            let status = response.status();
            debug!(%method, %url, %status, "received HTTP response");

            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .bytes()
                .map_err(|err| TransportError::new(format!("failed to read response body: {err}")))?
                .to_vec();

            Ok(HttpResponse {
                status: status.as_u16(),
                headers,
                body,
            })
        }
    }

    /// Builder for [`ReqwestTransport`].
    #[derive(Debug)]
    pub struct ReqwestTransportBuilder {
        timeout: Duration,
        user_agent: Option<String>,
    }

    impl Default for ReqwestTransportBuilder {
        fn default() -> Self {
            Self {
                timeout: Duration::from_secs(super::DEFAULT_TIMEOUT_SECS),
                user_agent: None,
            }
        }
    }

    impl ReqwestTransportBuilder {
        pub fn timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
            self.user_agent = Some(agent.into());
            self
        }

        pub fn build(self) -> Result<ReqwestTransport, TransportError> {
            let mut builder = Client::builder().timeout(self.timeout);
            if let Some(agent) = self.user_agent {
                builder = builder.user_agent(agent);
            }
            let client = builder
                .build()
                .map_err(|err| TransportError::new(format!("failed to build HTTP client: {err}")))?;
            Ok(ReqwestTransport { client })
        }
    }
}

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
