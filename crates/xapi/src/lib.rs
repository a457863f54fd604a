//! xAPI: statements, documents and a Learning Record Store client.
//!
//! This crate provides a typed model of Experience API (xAPI) entities, a
//! JSON codec that resolves the polymorphic `objectType` slots, and a
//! synchronous client for the LRS REST resources.
//!
//! # Overview
//!
//! xAPI records learning experiences as statements ("actor verb object"):
//! - **Statements** are immutable records stored by an LRS
//! - **Documents** are mutable key/value blobs scoped to activities and
//!   agents, guarded by ETags
//! - **Attachments** travel alongside statements as `multipart/mixed` parts
//!
//! # Quick Start
//!
//! ```rust
//! use xapi::{Activity, Agent, Verb};
//! use xapi::codec::{decode_statement_str, encode_statement_string};
//! use xapi::model::builder::StatementBuilder;
//!
//! let statement = StatementBuilder::new(
//!     Agent::with_mbox("mailto:learner@example.com").unwrap(),
//!     Verb::from_id("http://adlnet.gov/expapi/verbs/completed").unwrap(),
//!     Activity::from_id("http://example.com/activities/quiz").unwrap(),
//! )
//! .result(|r| r.success(true))
//! .build();
//!
//! // Encode to JSON
//! let json = encode_statement_string(&statement);
//!
//! // Decode back
//! let decoded = decode_statement_str(&json).unwrap();
//! assert_eq!(statement, decoded);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Entity types (Statement, Actor, Activity, Document, ...)
//! - [`codec`]: JSON encoding/decoding with discriminant resolution
//! - [`client`]: LRS client, configuration and HTTP transport
//! - [`validate`]: Cross-field statement validation
//! - [`util`]: Durations and timestamps
//! - [`error`]: Error types
//!
//! # Cargo features
//!
//! - `reqwest` (default): [`client::ReqwestTransport`], a blocking transport
//!   backed by `reqwest`. Without it, supply your own [`client::Transport`].

pub mod client;
pub mod codec;
pub mod error;
pub mod model;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use client::{Auth, AttachmentPayloads, LrsClient, LrsConfig, StatementQuery, Transport};
pub use codec::{decode_statement, decode_statement_str, encode_statement, encode_statement_string};
pub use error::{ClientError, DecodeError, RecursionViolation, TransportError, ValidationError};
pub use model::{
    About, Activity, ActivityDefinition, ActivityProfileDocument, ActivityResult, Actor, Agent,
    AgentProfileDocument, Attachment, Context, ContextActivities, Document, Group, Ifi, Iri, IsoDuration,
    LanguageMap, ObjectType, Score, StateDocument, Statement, StatementBuilder, StatementObject, StatementRef,
    StatementResult, SubStatement, Verb, Version,
};
pub use validate::{validate_attachment_payload, validate_statement};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Latest xAPI protocol version this crate speaks.
pub const XAPI_VERSION: &str = "1.0.3";
