//! Semantic validation for xAPI statements.
//!
//! Value-level rules (IRIs, UUIDs, score ranges, sub-statement objects) are
//! enforced when a value is constructed or decoded. This module checks the
//! rules that span several fields of a statement, which a decoder accepts
//! but an LRS would reject.

use crate::error::ValidationError;
use crate::model::{
    parse_content_type, parse_sha2, sha2_hex, Actor, Agent, Attachment, Context, Group, ObjectType,
    Statement, StatementObject, SubStatementObject,
};

/// Validates a statement before it is sent.
///
/// Checks:
/// - every agent carries an identifier and anonymous groups have members
/// - context `revision` and `platform` only appear when the object is an
///   Activity
/// - a voiding statement targets a StatementRef
/// - attachments declare a well-formed `sha2`, a content type and a display
pub fn validate_statement(statement: &Statement) -> Result<(), ValidationError> {
    validate_actor(&statement.actor)?;
    if let Some(authority) = &statement.authority {
        validate_actor(authority)?;
    }
    if statement.verb.is_voiding() && statement.object.object_type() != ObjectType::StatementRef {
        return Err(ValidationError::VoidingRequiresStatementRef {
            found: statement.object.object_type(),
        });
    }

    let object_is_activity = matches!(statement.object, StatementObject::Activity(_));
    match &statement.object {
        StatementObject::Agent(agent) => validate_agent(agent)?,
        StatementObject::Group(group) => validate_group(group)?,
        StatementObject::SubStatement(sub) => {
            validate_actor(&sub.actor)?;
            match sub.object() {
                SubStatementObject::Agent(agent) => validate_agent(agent)?,
                SubStatementObject::Group(group) => validate_group(group)?,
                SubStatementObject::Activity(_) => {}
            }
            if let Some(context) = &sub.context {
                let activity = matches!(sub.object(), SubStatementObject::Activity(_));
                validate_context(context, activity)?;
            }
            validate_attachments(&sub.attachments)?;
        }
        StatementObject::Activity(_) | StatementObject::StatementRef(_) => {}
    }

    if let Some(context) = &statement.context {
        validate_context(context, object_is_activity)?;
    }
    validate_attachments(&statement.attachments)
}

/// Checks a payload against the length and hash its attachment declares.
pub fn validate_attachment_payload(attachment: &Attachment, payload: &[u8]) -> Result<(), ValidationError> {
    let actual_len = payload.len() as u64;
    if actual_len != attachment.length {
        return Err(ValidationError::AttachmentLengthMismatch {
            declared: attachment.length,
            actual: actual_len,
        });
    }
    let actual = sha2_hex(payload);
    if !actual.eq_ignore_ascii_case(&attachment.sha2) {
        return Err(ValidationError::AttachmentHashMismatch {
            declared: attachment.sha2.clone(),
            actual,
        });
    }
    Ok(())
}

fn validate_actor(actor: &Actor) -> Result<(), ValidationError> {
    match actor {
        Actor::Agent(agent) => validate_agent(agent),
        Actor::Group(group) => validate_group(group),
    }
}

fn validate_agent(agent: &Agent) -> Result<(), ValidationError> {
    if agent.ifi.is_none() {
        return Err(ValidationError::MissingIdentifier { what: "agent" });
    }
    Ok(())
}

fn validate_group(group: &Group) -> Result<(), ValidationError> {
    if let Group::Anonymous(anonymous) = group {
        if anonymous.member.is_empty() {
            return Err(ValidationError::Empty {
                what: "anonymous group member list",
            });
        }
    }
    group.members().iter().try_for_each(validate_agent)
}

fn validate_context(context: &Context, object_is_activity: bool) -> Result<(), ValidationError> {
    if !object_is_activity {
        if context.revision.is_some() {
            return Err(ValidationError::ContextRequiresActivity { field: "revision" });
        }
        if context.platform.is_some() {
            return Err(ValidationError::ContextRequiresActivity { field: "platform" });
        }
    }
    if let Some(instructor) = &context.instructor {
        validate_actor(instructor)?;
    }
    if let Some(team) = &context.team {
        validate_group(team)?;
    }
    Ok(())
}

fn validate_attachments(attachments: &[Attachment]) -> Result<(), ValidationError> {
    for attachment in attachments {
        parse_sha2(&attachment.sha2)?;
        parse_content_type(attachment.content_type.as_str())?;
        if attachment.content_type.is_empty() {
            return Err(ValidationError::Empty {
                what: "attachment contentType",
            });
        }
        if attachment.display.is_empty() {
            return Err(ValidationError::Empty {
                what: "attachment display",
            });
        }
    }
    Ok(())
}
