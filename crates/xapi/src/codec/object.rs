//! Discriminant resolution for polymorphic slots.
//!
//! Each position in a statement that can hold more than one kind of object is
//! a [`Slot`]. A slot knows which `objectType` to assume when the field is
//! missing and which discriminants it admits. Resolution is a static table
//! lookup; there is no runtime registry.

use serde_json::Value as JsonValue;

use crate::codec::activity::{decode_activity_fields, encode_activity};
use crate::codec::actor::{decode_agent_fields, decode_group_fields, encode_agent, encode_group};
use crate::codec::primitives::{ObjectReader, ObjectWriter};
use crate::codec::statement::{decode_sub_statement_fields, encode_sub_statement};
use crate::error::{DecodeError, RecursionViolation};
use crate::model::{ObjectType, StatementObject, StatementRef, SubStatementObject};

/// A polymorphic position in the statement tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Actor,
    Authority,
    Instructor,
    Team,
    Member,
    /// The object of a top-level statement.
    Object,
    /// The object of a sub-statement.
    SubObject,
    /// An entry of `contextActivities`.
    ContextActivity,
    /// `context.statement`.
    ContextStatement,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Actor => "actor",
            Slot::Authority => "authority",
            Slot::Instructor => "instructor",
            Slot::Team => "team",
            Slot::Member => "member",
            Slot::Object | Slot::SubObject => "object",
            Slot::ContextActivity => "contextActivities",
            Slot::ContextStatement => "context statement",
        }
    }

    /// The variant assumed when `objectType` is absent.
    pub fn default_type(self) -> ObjectType {
        match self {
            Slot::Actor | Slot::Authority | Slot::Instructor | Slot::Member => ObjectType::Agent,
            Slot::Team => ObjectType::Group,
            Slot::Object | Slot::SubObject | Slot::ContextActivity => ObjectType::Activity,
            Slot::ContextStatement => ObjectType::StatementRef,
        }
    }

    pub fn allows(self, object_type: ObjectType) -> bool {
        match self {
            Slot::Actor | Slot::Authority | Slot::Instructor => {
                matches!(object_type, ObjectType::Agent | ObjectType::Group)
            }
            Slot::Team => object_type == ObjectType::Group,
            Slot::Member => object_type == ObjectType::Agent,
            Slot::Object => object_type != ObjectType::Statement,
            Slot::SubObject => matches!(
                object_type,
                ObjectType::Activity | ObjectType::Agent | ObjectType::Group
            ),
            Slot::ContextActivity => object_type == ObjectType::Activity,
            Slot::ContextStatement => object_type == ObjectType::StatementRef,
        }
    }

    pub(crate) fn unknown(self, object_type: &str) -> DecodeError {
        DecodeError::UnknownVariant {
            object_type: object_type.to_string(),
            position: self.name(),
        }
    }

    /// Resolves a discriminant for this slot.
    ///
    /// A statement-shaped variant in an object slot that forbids it is a
    /// [`RecursionViolation`]; any other disallowed or unrecognized value is
    /// an unknown variant for the slot.
    pub fn resolve(self, tag: Option<&str>) -> Result<ObjectType, DecodeError> {
        let object_type = match tag {
            None => return Ok(self.default_type()),
            Some(tag) => ObjectType::from_discriminant(tag).ok_or_else(|| self.unknown(tag))?,
        };
        if self.allows(object_type) {
            return Ok(object_type);
        }
        let statement_like = matches!(
            object_type,
            ObjectType::Statement | ObjectType::SubStatement | ObjectType::StatementRef
        );
        match self {
            Slot::Object | Slot::SubObject if statement_like => Err(RecursionViolation {
                object_type,
                container: if self == Slot::Object { "Statement" } else { "SubStatement" },
            }
            .into()),
            _ => Err(self.unknown(object_type.as_str())),
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

pub(crate) fn decode_statement_ref_fields(reader: &ObjectReader<'_>) -> Result<StatementRef, DecodeError> {
    Ok(StatementRef::new(reader.uuid("id")?))
}

/// Decodes the object of a top-level statement.
pub fn decode_statement_object(value: &JsonValue) -> Result<StatementObject, DecodeError> {
    let reader = ObjectReader::new(value, "object")?;
    Ok(match Slot::Object.resolve(reader.object_type()?)? {
        ObjectType::Activity => StatementObject::Activity(decode_activity_fields(&reader)?),
        ObjectType::Agent => StatementObject::Agent(decode_agent_fields(&reader)?),
        ObjectType::Group => StatementObject::Group(decode_group_fields(&reader)?),
        ObjectType::StatementRef => StatementObject::StatementRef(decode_statement_ref_fields(&reader)?),
        ObjectType::SubStatement => {
            StatementObject::SubStatement(Box::new(decode_sub_statement_fields(&reader)?))
        }
        other => return Err(Slot::Object.unknown(other.as_str())),
    })
}

/// Decodes the object of a sub-statement.
pub fn decode_sub_statement_object(value: &JsonValue) -> Result<SubStatementObject, DecodeError> {
    let reader = ObjectReader::new(value, "object")?;
    Ok(match Slot::SubObject.resolve(reader.object_type()?)? {
        ObjectType::Activity => SubStatementObject::Activity(decode_activity_fields(&reader)?),
        ObjectType::Agent => SubStatementObject::Agent(decode_agent_fields(&reader)?),
        ObjectType::Group => SubStatementObject::Group(decode_group_fields(&reader)?),
        other => return Err(Slot::SubObject.unknown(other.as_str())),
    })
}

/// Decodes `context.statement`.
pub(crate) fn decode_statement_ref(value: &JsonValue) -> Result<StatementRef, DecodeError> {
    let reader = ObjectReader::new(value, "statement ref")?;
    Slot::ContextStatement.resolve(reader.object_type()?)?;
    decode_statement_ref_fields(&reader)
}

// =============================================================================
// ENCODING
// =============================================================================

pub fn encode_statement_ref(reference: &StatementRef) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer.object_type(ObjectType::StatementRef).uuid("id", &reference.id);
    writer.finish()
}

/// Encodes a statement object; the discriminant is always written.
pub fn encode_statement_object(object: &StatementObject) -> JsonValue {
    match object {
        StatementObject::Activity(a) => encode_activity(a, true),
        StatementObject::Agent(a) => encode_agent(a),
        StatementObject::Group(g) => encode_group(g),
        StatementObject::StatementRef(r) => encode_statement_ref(r),
        StatementObject::SubStatement(s) => encode_sub_statement(s),
    }
}

pub fn encode_sub_statement_object(object: &SubStatementObject) -> JsonValue {
    match object {
        SubStatementObject::Activity(a) => encode_activity(a, true),
        SubStatementObject::Agent(a) => encode_agent(a),
        SubStatementObject::Group(g) => encode_group(g),
    }
}
