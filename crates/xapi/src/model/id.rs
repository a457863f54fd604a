//! Statement identifiers and attachment content hashes.
//!
//! Statement ids are RFC 4122 UUIDs of version 1 through 5, written in the
//! hyphenated form. Attachments are identified by the hex SHA-256 of their
//! payload (the `sha2` field).

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::ValidationError;

lazy_static! {
    static ref HYPHENATED_UUID: Regex =
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("static regex");
    static ref SHA2_HEX: Regex = Regex::new(r"^[0-9a-fA-F]{64}$").expect("static regex");
}

/// Parses a statement-style UUID.
///
/// Only the 36-character hyphenated form is accepted, and the version nibble
/// must be 1 through 5.
pub fn parse_uuid(s: &str) -> Result<Uuid, ValidationError> {
    if !HYPHENATED_UUID.is_match(s) {
        return Err(ValidationError::InvalidUuid { value: s.to_string() });
    }
    let id = Uuid::try_parse(s).map_err(|_| ValidationError::InvalidUuid { value: s.to_string() })?;
    let version = id.get_version_num();
    if !(1..=5).contains(&version) {
        return Err(ValidationError::UnsupportedUuidVersion {
            value: s.to_string(),
            version,
        });
    }
    Ok(id)
}

/// Formats a UUID in the lowercase hyphenated form used on the wire.
pub fn format_uuid(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

/// Generates a fresh random (version 4) statement id.
pub fn new_statement_id() -> Uuid {
    Uuid::new_v4()
}

/// Computes the `sha2` attachment hash: lowercase hex SHA-256 of the payload.
pub fn sha2_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Validates that `s` looks like a SHA-256 hex digest and lowercases it.
pub fn parse_sha2(s: &str) -> Result<String, ValidationError> {
    if SHA2_HEX.is_match(s) {
        Ok(s.to_ascii_lowercase())
    } else {
        Err(ValidationError::InvalidSha2 { value: s.to_string() })
    }
}
