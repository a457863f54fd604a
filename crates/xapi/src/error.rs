//! Error types for xAPI validation, decoding and LRS communication.

use thiserror::Error;

use crate::model::ObjectType;

/// A field was given a value that is not valid for its type.
///
/// Raised at the point where the value is assigned or decoded, never later.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid UUID: {value:?}")]
    InvalidUuid { value: String },

    #[error("UUID {value:?} is version {version}, expected 1 through 5")]
    UnsupportedUuidVersion { value: String, version: usize },

    #[error("invalid IRI: {value:?}")]
    InvalidIri { value: String },

    #[error("mbox must be a mailto IRI, found {value:?}")]
    InvalidMbox { value: String },

    #[error("invalid RFC 5646 language tag: {value:?}")]
    InvalidLanguageTag { value: String },

    #[error("language map value for {tag:?} is not a string")]
    NonStringLanguageValue { tag: String },

    #[error("{what} must not be empty")]
    Empty { what: &'static str },

    #[error("{field} value {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} is not a finite number")]
    NotANumber { field: &'static str },

    #[error("score min {min} is greater than max {max}")]
    ScoreBoundsInverted { min: f64, max: f64 },

    #[error("more than one inverse functional identifier present: {found:?}")]
    MultipleIdentifiers { found: Vec<&'static str> },

    #[error("invalid ISO 8601 duration: {value:?}")]
    InvalidDuration { value: String },

    #[error("invalid RFC 3339 timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    #[error("invalid SHA-2 hash (expected 64 hex characters): {value:?}")]
    InvalidSha2 { value: String },

    #[error("invalid attachment content type (control characters are not allowed): {value:?}")]
    InvalidContentType { value: String },

    #[error("attachment payload hashes to {actual}, declared {declared}")]
    AttachmentHashMismatch { declared: String, actual: String },

    #[error("attachment payload is {actual} bytes, declared {declared}")]
    AttachmentLengthMismatch { declared: u64, actual: u64 },

    #[error("context {field} is only allowed when the statement object is an Activity")]
    ContextRequiresActivity { field: &'static str },

    #[error("{what} has no inverse functional identifier")]
    MissingIdentifier { what: &'static str },

    #[error("a voiding statement must target a StatementRef, found {found}")]
    VoidingRequiresStatementRef { found: ObjectType },

    #[error("unknown interaction type: {value:?}")]
    UnknownInteractionType { value: String },

    #[error("unsupported xAPI version: {value:?}")]
    UnsupportedVersion { value: String },
}

/// A statement-shaped object was placed in a slot that forbids it.
///
/// Sub-statements may only point at agents, groups or activities, and a
/// statement may never embed a full statement as its object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{object_type} is not allowed as the object of a {container}")]
pub struct RecursionViolation {
    /// The variant that was rejected.
    pub object_type: ObjectType,
    /// The kind of statement whose object slot rejected it.
    pub container: &'static str,
}

/// Error while decoding wire JSON into the entity model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {message}")]
    InvalidJson { message: String },

    #[error("{context}: missing required field {field:?}")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },

    #[error("{context}: field {field:?} must be {expected}")]
    WrongType {
        context: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown objectType {object_type:?} in {position} position")]
    UnknownVariant {
        object_type: String,
        position: &'static str,
    },

    #[error("{context}: invalid {field}: {source}")]
    Invalid {
        context: &'static str,
        field: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Recursion(#[from] RecursionViolation),
}

impl DecodeError {
    pub(crate) fn invalid(context: &'static str, field: &'static str, source: ValidationError) -> Self {
        DecodeError::Invalid { context, field, source }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::InvalidJson {
            message: err.to_string(),
        }
    }
}

/// A transport could not complete an HTTP exchange.
///
/// Connection failures, timeouts and TLS errors all collapse into this one
/// type; the client reports them uniformly as communication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error returned by LRS client operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("LRS responded with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("LRS rejected the write: the supplied ETag is stale ({body})")]
    PreconditionFailed { body: String },

    #[error("statement references attachment {sha2} but no payload was supplied")]
    MissingAttachmentData { sha2: String },

    #[error("failed to decode LRS response: {0}")]
    Decode(#[from] DecodeError),

    #[error("invalid endpoint URL {url:?}: {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("no LRS endpoint configured")]
    MissingEndpoint,

    #[error("LRS returned {actual} statement ids for {expected} statements")]
    IdCountMismatch { expected: usize, actual: usize },

    #[error("statement cannot be sent: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Returns the HTTP status for errors that came from the LRS.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::PreconditionFailed { .. } => Some(412),
            _ => None,
        }
    }
}
