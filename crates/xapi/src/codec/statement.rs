//! Statement, sub-statement and context encoding, plus the LRS response
//! envelopes (statement pages and `about`).

use serde_json::Value as JsonValue;

use crate::codec::activity::{decode_activity, encode_activity};
use crate::codec::actor::{decode_actor_in, decode_group_in, encode_actor, encode_group};
use crate::codec::object::{
    decode_statement_object, decode_statement_ref, decode_sub_statement_object, encode_statement_object,
    encode_statement_ref, encode_sub_statement_object, Slot,
};
use crate::codec::primitives::{ObjectReader, ObjectWriter};
use crate::codec::value::{
    decode_attachments, decode_result, decode_verb, encode_attachment, encode_result, encode_verb,
};
use crate::error::DecodeError;
use crate::model::{
    About, Activity, Context, ContextActivities, ObjectType, Statement, StatementResult, SubStatement,
};

// =============================================================================
// CONTEXT
// =============================================================================

/// Reads one `contextActivities` list, which may be a single object.
fn decode_activity_list(reader: &ObjectReader<'_>, field: &'static str) -> Result<Vec<Activity>, DecodeError> {
    match reader.get(field) {
        None => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items.iter().map(decode_activity).collect(),
        Some(single @ JsonValue::Object(_)) => Ok(vec![decode_activity(single)?]),
        Some(_) => Err(DecodeError::WrongType {
            context: "contextActivities",
            field,
            expected: "an activity or an array of activities",
        }),
    }
}

fn decode_context_activities(reader: &ObjectReader<'_>) -> Result<ContextActivities, DecodeError> {
    Ok(ContextActivities {
        parent: decode_activity_list(reader, "parent")?,
        grouping: decode_activity_list(reader, "grouping")?,
        category: decode_activity_list(reader, "category")?,
        other: decode_activity_list(reader, "other")?,
    })
}

pub fn decode_context(value: &JsonValue) -> Result<Context, DecodeError> {
    let reader = ObjectReader::new(value, "context")?;
    let context_activities = match reader.opt_object("contextActivities", "contextActivities")? {
        Some(inner) => decode_context_activities(&inner)?,
        None => ContextActivities::default(),
    };
    Ok(Context {
        registration: reader.opt_uuid("registration")?,
        instructor: reader
            .get("instructor")
            .map(|v| decode_actor_in(v, Slot::Instructor))
            .transpose()?,
        team: reader.get("team").map(|v| decode_group_in(v, Slot::Team)).transpose()?,
        context_activities,
        revision: reader.opt_string("revision")?,
        platform: reader.opt_string("platform")?,
        language: reader.opt_language_tag("language")?,
        statement: reader.get("statement").map(decode_statement_ref).transpose()?,
        extensions: reader.extensions("extensions")?,
    })
}

fn encode_context_activities(activities: &ContextActivities) -> JsonValue {
    let mut writer = ObjectWriter::new();
    for (field, list) in [
        ("parent", &activities.parent),
        ("grouping", &activities.grouping),
        ("category", &activities.category),
        ("other", &activities.other),
    ] {
        writer.array(field, list.iter().map(|a| encode_activity(a, true)).collect());
    }
    writer.finish()
}

pub fn encode_context(context: &Context) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer.opt_uuid("registration", context.registration.as_ref());
    if let Some(instructor) = &context.instructor {
        writer.value("instructor", encode_actor(instructor));
    }
    if let Some(team) = &context.team {
        writer.value("team", encode_group(team));
    }
    writer
        .object("contextActivities", encode_context_activities(&context.context_activities))
        .opt_str("revision", context.revision.as_deref())
        .opt_str("platform", context.platform.as_deref())
        .opt_str("language", context.language.as_ref().map(|l| l.as_str()));
    if let Some(reference) = &context.statement {
        writer.value("statement", encode_statement_ref(reference));
    }
    writer.extensions("extensions", &context.extensions);
    writer.finish()
}

// =============================================================================
// SUB-STATEMENT
// =============================================================================

/// Decodes a sub-statement whose discriminant has already been checked.
pub(crate) fn decode_sub_statement_fields(reader: &ObjectReader<'_>) -> Result<SubStatement, DecodeError> {
    let actor = decode_actor_in(required(reader, "actor")?, Slot::Actor)?;
    let verb = decode_verb(required(reader, "verb")?)?;
    let object = decode_sub_statement_object(required(reader, "object")?)?;
    let mut sub = SubStatement::new(actor, verb, object)?;
    sub.result = reader.get("result").map(decode_result).transpose()?;
    sub.context = reader.get("context").map(decode_context).transpose()?;
    sub.timestamp = reader.opt_timestamp("timestamp")?;
    sub.attachments = decode_attachments(reader)?;
    Ok(sub)
}

pub fn encode_sub_statement(sub: &SubStatement) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .object_type(ObjectType::SubStatement)
        .value("actor", encode_actor(&sub.actor))
        .value("verb", encode_verb(&sub.verb))
        .value("object", encode_sub_statement_object(sub.object()));
    write_outcome(
        &mut writer,
        sub.result.as_ref().map(encode_result),
        sub.context.as_ref().map(encode_context),
    );
    writer
        .opt_timestamp("timestamp", sub.timestamp.as_ref())
        .array("attachments", sub.attachments.iter().map(encode_attachment).collect());
    writer.finish()
}

// =============================================================================
// STATEMENT
// =============================================================================

fn required<'a>(reader: &ObjectReader<'a>, field: &'static str) -> Result<&'a JsonValue, DecodeError> {
    reader.get(field).ok_or(DecodeError::MissingField {
        context: reader.context(),
        field,
    })
}

fn write_outcome(writer: &mut ObjectWriter, result: Option<JsonValue>, context: Option<JsonValue>) {
    if let Some(result) = result {
        writer.object("result", result);
    }
    if let Some(context) = context {
        writer.object("context", context);
    }
}

/// Decodes a statement. `objectType`, when present, must be `Statement`.
pub fn decode_statement(value: &JsonValue) -> Result<Statement, DecodeError> {
    let reader = ObjectReader::new(value, "statement")?;
    match reader.object_type()? {
        None | Some("Statement") => {}
        Some(other) => {
            return Err(DecodeError::UnknownVariant {
                object_type: other.to_string(),
                position: "statement",
            });
        }
    }

    let actor = decode_actor_in(required(&reader, "actor")?, Slot::Actor)?;
    let verb = decode_verb(required(&reader, "verb")?)?;
    let object = decode_statement_object(required(&reader, "object")?)?;

    let mut statement = Statement::new(actor, verb, object);
    statement.id = reader.opt_uuid("id")?;
    statement.result = reader.get("result").map(decode_result).transpose()?;
    statement.context = reader.get("context").map(decode_context).transpose()?;
    statement.timestamp = reader.opt_timestamp("timestamp")?;
    statement.stored = reader.opt_timestamp("stored")?;
    statement.authority = reader
        .get("authority")
        .map(|v| decode_actor_in(v, Slot::Authority))
        .transpose()?;
    statement.version = reader.opt_string("version")?;
    statement.attachments = decode_attachments(&reader)?;
    Ok(statement)
}

/// Encodes a statement. The top-level `objectType` is omitted.
pub fn encode_statement(statement: &Statement) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .opt_uuid("id", statement.id.as_ref())
        .value("actor", encode_actor(&statement.actor))
        .value("verb", encode_verb(&statement.verb))
        .value("object", encode_statement_object(&statement.object));
    write_outcome(
        &mut writer,
        statement.result.as_ref().map(encode_result),
        statement.context.as_ref().map(encode_context),
    );
    writer
        .opt_timestamp("timestamp", statement.timestamp.as_ref())
        .opt_timestamp("stored", statement.stored());
    if let Some(authority) = &statement.authority {
        writer.value("authority", encode_actor(authority));
    }
    writer
        .opt_str("version", statement.version.as_deref())
        .array("attachments", statement.attachments.iter().map(encode_attachment).collect());
    writer.finish()
}

/// Decodes either a single statement or an array of them.
pub fn decode_statements(value: &JsonValue) -> Result<Vec<Statement>, DecodeError> {
    match value {
        JsonValue::Array(items) => items.iter().map(decode_statement).collect(),
        single => Ok(vec![decode_statement(single)?]),
    }
}

pub fn encode_statements(statements: &[Statement]) -> JsonValue {
    JsonValue::Array(statements.iter().map(encode_statement).collect())
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

/// Decodes a page of query results. An empty `more` means no further pages.
pub fn decode_statement_result(value: &JsonValue) -> Result<StatementResult, DecodeError> {
    let reader = ObjectReader::new(value, "statement result")?;
    let statements = match reader.opt_array("statements")? {
        None => Vec::new(),
        Some(items) => items.iter().map(decode_statement).collect::<Result<_, _>>()?,
    };
    let more = reader.opt_string("more")?.filter(|m| !m.is_empty());
    Ok(StatementResult { statements, more })
}

pub fn encode_statement_result(result: &StatementResult) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .value("statements", encode_statements(&result.statements))
        .opt_str("more", result.more.as_deref());
    writer.finish()
}

pub fn decode_about(value: &JsonValue) -> Result<About, DecodeError> {
    let reader = ObjectReader::new(value, "about")?;
    let version = reader.string_list("version")?;
    if version.is_empty() {
        return Err(DecodeError::MissingField {
            context: "about",
            field: "version",
        });
    }
    Ok(About {
        version,
        extensions: reader.extensions("extensions")?,
    })
}

pub fn encode_about(about: &About) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .value(
            "version",
            JsonValue::Array(about.version.iter().cloned().map(JsonValue::String).collect()),
        )
        .extensions("extensions", &about.extensions);
    writer.finish()
}
