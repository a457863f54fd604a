//! Statements, sub-statements and the polymorphic object slot.
//!
//! The object of a [`Statement`] may be any of five variants. The object of a
//! [`SubStatement`] is restricted to agents, groups and activities; the
//! restriction is carried by the [`SubStatementObject`] type and checked on
//! every assignment, so a sub-statement can never nest another statement.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::error::{RecursionViolation, ValidationError};
use crate::model::activity::Activity;
use crate::model::actor::{Actor, Agent, Group};
use crate::model::context::Context;
use crate::model::id::sha2_hex;
use crate::model::object_type::ObjectType;
use crate::model::result::ActivityResult;
use crate::model::value::{Iri, LanguageMap, LanguageTag};

/// Verb id used to void an earlier statement.
pub const VOIDED_VERB_ID: &str = "http://adlnet.gov/expapi/verbs/voided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verb {
    pub id: Iri,
    pub display: LanguageMap,
}

impl Verb {
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            display: LanguageMap::new(),
        }
    }

    pub fn from_id(id: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Iri::new(id)?))
    }

    /// Adds a display string for a language tag.
    pub fn display(mut self, tag: &str, text: impl Into<String>) -> Result<Self, ValidationError> {
        self.display.insert(tag, text)?;
        Ok(self)
    }

    /// The ADL `voided` verb.
    pub fn voided() -> Self {
        let mut display = LanguageMap::new();
        display.insert_tag(LanguageTag("en-US".to_string()), "voided");
        Verb {
            id: Iri(VOIDED_VERB_ID.to_string()),
            display,
        }
    }

    pub fn is_voiding(&self) -> bool {
        self.id.as_str() == VOIDED_VERB_ID
    }
}

/// Points at another statement by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementRef {
    pub id: Uuid,
}

impl StatementRef {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Metadata for a file attached to a statement.
///
/// The payload itself travels separately, in a multipart request, matched to
/// this record by `sha2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub usage_type: Iri,
    pub display: LanguageMap,
    pub description: LanguageMap,
    pub content_type: String,
    pub length: u64,
    /// Lowercase hex SHA-256 of the payload.
    pub sha2: String,
    pub file_url: Option<Iri>,
}

impl Attachment {
    /// Describes `payload`, computing its length and hash.
    pub fn for_payload(
        usage_type: Iri,
        display: LanguageMap,
        content_type: impl Into<String>,
        payload: &[u8],
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            usage_type,
            display,
            description: LanguageMap::new(),
            content_type: parse_content_type(content_type)?,
            length: payload.len() as u64,
            sha2: sha2_hex(payload),
            file_url: None,
        })
    }
}

/// Checks an attachment `contentType`.
///
/// The value becomes a multipart header line, so control characters
/// (CR and LF in particular) are rejected.
pub fn parse_content_type(value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidContentType { value });
    }
    Ok(value)
}

/// The object of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementObject {
    Activity(Activity),
    Agent(Agent),
    Group(Group),
    StatementRef(StatementRef),
    SubStatement(Box<SubStatement>),
}

impl StatementObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            StatementObject::Activity(_) => ObjectType::Activity,
            StatementObject::Agent(_) => ObjectType::Agent,
            StatementObject::Group(_) => ObjectType::Group,
            StatementObject::StatementRef(_) => ObjectType::StatementRef,
            StatementObject::SubStatement(_) => ObjectType::SubStatement,
        }
    }

    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            StatementObject::Activity(a) => Some(a),
            _ => None,
        }
    }
}

impl From<Activity> for StatementObject {
    fn from(a: Activity) -> Self {
        StatementObject::Activity(a)
    }
}

impl From<Agent> for StatementObject {
    fn from(a: Agent) -> Self {
        StatementObject::Agent(a)
    }
}

impl From<Group> for StatementObject {
    fn from(g: Group) -> Self {
        StatementObject::Group(g)
    }
}

impl From<Actor> for StatementObject {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::Agent(a) => StatementObject::Agent(a),
            Actor::Group(g) => StatementObject::Group(g),
        }
    }
}

impl From<StatementRef> for StatementObject {
    fn from(r: StatementRef) -> Self {
        StatementObject::StatementRef(r)
    }
}

impl From<SubStatement> for StatementObject {
    fn from(s: SubStatement) -> Self {
        StatementObject::SubStatement(Box::new(s))
    }
}

impl From<SubStatementObject> for StatementObject {
    fn from(o: SubStatementObject) -> Self {
        match o {
            SubStatementObject::Activity(a) => StatementObject::Activity(a),
            SubStatementObject::Agent(a) => StatementObject::Agent(a),
            SubStatementObject::Group(g) => StatementObject::Group(g),
        }
    }
}

/// The object of a sub-statement: an agent, a group or an activity.
#[derive(Debug, Clone, PartialEq)]
pub enum SubStatementObject {
    Activity(Activity),
    Agent(Agent),
    Group(Group),
}

impl SubStatementObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            SubStatementObject::Activity(_) => ObjectType::Activity,
            SubStatementObject::Agent(_) => ObjectType::Agent,
            SubStatementObject::Group(_) => ObjectType::Group,
        }
    }
}

impl TryFrom<StatementObject> for SubStatementObject {
    type Error = RecursionViolation;

    fn try_from(object: StatementObject) -> Result<Self, Self::Error> {
        match object {
            StatementObject::Activity(a) => Ok(SubStatementObject::Activity(a)),
            StatementObject::Agent(a) => Ok(SubStatementObject::Agent(a)),
            StatementObject::Group(g) => Ok(SubStatementObject::Group(g)),
            other => Err(RecursionViolation {
                object_type: other.object_type(),
                container: "SubStatement",
            }),
        }
    }
}

/// A statement embedded as the object of another statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SubStatement {
    pub actor: Actor,
    pub verb: Verb,
    object: SubStatementObject,
    pub result: Option<ActivityResult>,
    pub context: Option<Context>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub attachments: Vec<Attachment>,
}

impl SubStatement {
    /// Fails with [`RecursionViolation`] when `object` is a statement
    /// reference or another sub-statement.
    pub fn new(
        actor: impl Into<Actor>,
        verb: Verb,
        object: impl Into<StatementObject>,
    ) -> Result<Self, RecursionViolation> {
        Ok(Self {
            actor: actor.into(),
            verb,
            object: SubStatementObject::try_from(object.into())?,
            result: None,
            context: None,
            timestamp: None,
            attachments: Vec::new(),
        })
    }

    pub fn object(&self) -> &SubStatementObject {
        &self.object
    }

    /// Replaces the object. On failure the previous object is kept.
    pub fn set_object(&mut self, object: impl Into<StatementObject>) -> Result<(), RecursionViolation> {
        self.object = SubStatementObject::try_from(object.into())?;
        Ok(())
    }
}

/// An xAPI statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Assigned by the LRS when absent.
    pub id: Option<Uuid>,
    pub actor: Actor,
    pub verb: Verb,
    pub object: StatementObject,
    pub result: Option<ActivityResult>,
    pub context: Option<Context>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub authority: Option<Actor>,
    /// Set by the LRS on stored statements.
    pub version: Option<String>,
    pub attachments: Vec<Attachment>,
    pub(crate) stored: Option<DateTime<FixedOffset>>,
}

impl Statement {
    pub fn new(actor: impl Into<Actor>, verb: Verb, object: impl Into<StatementObject>) -> Self {
        Self {
            id: None,
            actor: actor.into(),
            verb,
            object: object.into(),
            result: None,
            context: None,
            timestamp: None,
            authority: None,
            version: None,
            attachments: Vec::new(),
            stored: None,
        }
    }

    /// A statement voiding the statement `target`.
    pub fn voiding(actor: impl Into<Actor>, target: Uuid) -> Self {
        Self::new(actor, Verb::voided(), StatementRef::new(target))
    }

    /// When the LRS stored the statement. Never sent by clients.
    pub fn stored(&self) -> Option<&DateTime<FixedOffset>> {
        self.stored.as_ref()
    }

    /// Hashes of every attachment the statement declares, including those
    /// of a sub-statement object.
    pub fn attachment_hashes(&self) -> impl Iterator<Item = &str> {
        let nested: &[Attachment] = match &self.object {
            StatementObject::SubStatement(sub) => sub.attachments.as_slice(),
            _ => &[],
        };
        self.attachments.iter().chain(nested).map(|a| a.sha2.as_str())
    }
}

/// One page of a statement query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementResult {
    pub statements: Vec<Statement>,
    /// Relative or absolute URL of the next page.
    pub more: Option<String>,
}

impl StatementResult {
    pub fn has_more(&self) -> bool {
        self.more.is_some()
    }
}
