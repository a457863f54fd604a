//! Data model types for xAPI.
//!
//! This module contains the entities exchanged with a Learning Record Store:
//! - Validated scalars (IRIs, language tags, UUIDs, hashes)
//! - Actors (agents and groups)
//! - Activities, verbs and statements
//! - Results and contexts
//! - Documents (state, activity profile, agent profile)
//! - Builders (ergonomic construction)

pub mod about;
pub mod activity;
pub mod actor;
pub mod builder;
pub mod context;
pub mod document;
pub mod id;
pub mod object_type;
pub mod result;
pub mod statement;
pub mod value;

pub use about::{About, Version};
pub use activity::{Activity, ActivityDefinition, InteractionComponent, InteractionType};
pub use actor::{Account, Actor, Agent, AnonymousGroup, Group, IdentifiedGroup, Ifi, Mbox};
pub use builder::{ContextBuilder, ResultBuilder, StatementBuilder};
pub use context::{Context, ContextActivities};
pub use document::{
    ActivityProfileDocument, ActivityProfileScope, AgentProfileDocument, AgentProfileScope, Document,
    DocumentScope, StateDocument, StateScope,
};
pub use id::{format_uuid, new_statement_id, parse_sha2, parse_uuid, sha2_hex};
pub use object_type::ObjectType;
pub use result::{ActivityResult, Score};
pub use statement::{
    parse_content_type, Attachment, Statement, StatementObject, StatementRef, StatementResult, SubStatement,
    SubStatementObject, Verb, VOIDED_VERB_ID,
};
pub use value::{Extensions, Iri, LanguageMap, LanguageTag};

pub use crate::util::IsoDuration;
