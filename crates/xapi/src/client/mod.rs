//! Learning Record Store client.
//!
//! - [`transport`]: the HTTP seam and the default `reqwest` implementation
//! - [`config`]: endpoint, version, credentials and timeouts
//! - [`query`]: statement filters
//! - [`multipart`]: attachment payload bodies
//! - [`lrs`]: the client itself

pub mod config;
pub mod lrs;
pub mod multipart;
pub mod query;
pub mod transport;

pub use config::{Auth, LrsConfig, LrsConfigBuilder, DEFAULT_USER_AGENT};
pub use lrs::{LrsClient, VERSION_HEADER};
pub use multipart::{encode_multipart, AttachmentPayloads, MultipartBody};
pub use query::{QueryFormat, StatementQuery};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, DEFAULT_TIMEOUT_SECS};
#[cfg(feature = "reqwest")]
pub use transport::{ReqwestTransport, ReqwestTransportBuilder};
