//! JSON encoding and decoding for xAPI entities.
//!
//! The codec maps between `serde_json::Value` and the entity model,
//! resolving `objectType` discriminants per slot (see [`object::Slot`]).
//! Entry points exist for values, JSON text and raw bytes; the main entities
//! also implement `serde::Serialize`/`Deserialize` through the same code.

pub mod activity;
pub mod actor;
pub mod object;
pub mod primitives;
pub mod statement;
pub mod value;

use serde_json::Value as JsonValue;

use crate::error::DecodeError;
use crate::model::{About, Activity, Actor, Agent, Statement, StatementResult};

pub use activity::{decode_activity, encode_activity};
pub use actor::{decode_actor, decode_agent, encode_actor, encode_agent, encode_group};
pub use object::{decode_statement_object, encode_statement_object, Slot};
pub use statement::{
    decode_about, decode_context, decode_statement, decode_statement_result, decode_statements, encode_about,
    encode_context, encode_statement, encode_statement_result, encode_statements,
};
pub use value::{decode_attachment, decode_result, decode_verb, encode_attachment, encode_result, encode_verb};

/// Parses JSON text and decodes a statement.
pub fn decode_statement_str(text: &str) -> Result<Statement, DecodeError> {
    decode_statement(&serde_json::from_str(text)?)
}

/// Parses a JSON byte buffer and decodes a statement.
pub fn decode_statement_bytes(bytes: &[u8]) -> Result<Statement, DecodeError> {
    decode_statement(&serde_json::from_slice(bytes)?)
}

/// Encodes a statement as compact JSON text.
pub fn encode_statement_string(statement: &Statement) -> String {
    encode_statement(statement).to_string()
}

/// Decodes a single statement or an array of statements from bytes.
pub fn decode_statements_bytes(bytes: &[u8]) -> Result<Vec<Statement>, DecodeError> {
    decode_statements(&serde_json::from_slice(bytes)?)
}

pub fn decode_statement_result_bytes(bytes: &[u8]) -> Result<StatementResult, DecodeError> {
    decode_statement_result(&serde_json::from_slice(bytes)?)
}

pub fn decode_about_bytes(bytes: &[u8]) -> Result<About, DecodeError> {
    decode_about(&serde_json::from_slice(bytes)?)
}

/// Decodes the id array returned by a statement POST.
pub fn decode_statement_ids(bytes: &[u8]) -> Result<Vec<uuid::Uuid>, DecodeError> {
    let value: JsonValue = serde_json::from_slice(bytes)?;
    let JsonValue::Array(items) = value else {
        return Err(DecodeError::WrongType {
            context: "statement ids",
            field: "(root)",
            expected: "an array of statement ids",
        });
    };
    items
        .iter()
        .map(|item| match item {
            JsonValue::String(s) => {
                crate::model::parse_uuid(s).map_err(|e| DecodeError::invalid("statement ids", "id", e))
            }
            _ => Err(DecodeError::WrongType {
                context: "statement ids",
                field: "id",
                expected: "a string",
            }),
        })
        .collect()
}

/// JSON text for an agent, as used in `agent` query parameters.
pub fn agent_to_json_string(agent: &Agent) -> String {
    encode_agent(agent).to_string()
}

/// JSON text for an agent or group query parameter.
pub fn actor_to_json_string(actor: &Actor) -> String {
    encode_actor(actor).to_string()
}

/// Implements serde traits by routing through the codec functions.
macro_rules! serde_via_codec {
    ($ty:ty, $encode:expr, $decode:expr) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&$encode(self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <JsonValue as serde::Deserialize>::deserialize(deserializer)?;
                $decode(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_via_codec!(Statement, encode_statement, decode_statement);
serde_via_codec!(StatementResult, encode_statement_result, decode_statement_result);
serde_via_codec!(About, encode_about, decode_about);
serde_via_codec!(Actor, encode_actor, decode_actor);
serde_via_codec!(Agent, encode_agent, decode_agent);
serde_via_codec!(Activity, |a| encode_activity(a, true), decode_activity);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_invalid_json_text() {
        assert!(matches!(decode_statement_str("{not json"), Err(DecodeError::InvalidJson { .. })));
    }

    #[test]
    fn test_statement_ids() {
        let ids = decode_statement_ids(br#"["7ccd3322-e1a5-411a-a67d-6a735c76f119"]"#).unwrap();
        assert_eq!(ids[0].to_string(), "7ccd3322-e1a5-411a-a67d-6a735c76f119");
        assert!(decode_statement_ids(br#"{"id": 1}"#).is_err());
        assert!(decode_statement_ids(br#"["foo"]"#).is_err());
    }

    #[test]
    fn test_serde_routes_through_codec() {
        let value = json!({
            "actor": {"objectType": "Agent", "mbox": "mailto:a@b.com"},
            "verb": {"id": "http://adlnet.gov/expapi/verbs/attempted"},
            "object": {"objectType": "Activity", "id": "http://example.com/a"}
        });
        let statement: Statement = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&statement).unwrap(), value);

        let err = serde_json::from_value::<Actor>(json!({"objectType": "Robot"})).unwrap_err();
        assert!(err.to_string().contains("Robot"));
    }
}
