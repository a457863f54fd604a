//! Builder API for statement construction.
//!
//! # Example
//!
//! ```rust
//! use xapi::model::builder::StatementBuilder;
//! use xapi::{Activity, Agent, Score, Verb};
//!
//! let statement = StatementBuilder::new(
//!     Agent::with_mbox("mailto:learner@example.com").unwrap(),
//!     Verb::from_id("http://adlnet.gov/expapi/verbs/completed").unwrap(),
//!     Activity::from_id("http://example.com/activities/quiz").unwrap(),
//! )
//! .generated_id()
//! .result(|r| r
//!     .score(Score::scaled(0.9).unwrap())
//!     .completion(true)
//! )
//! .context(|c| c.platform("Example LMS"))
//! .build();
//!
//! assert!(statement.id.is_some());
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::model::{
    new_statement_id, Activity, ActivityResult, Actor, Attachment, Context, Group, Iri, IsoDuration,
    LanguageTag, Score, Statement, StatementObject, StatementRef, Verb,
};

/// Builder for a [`Statement`].
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    statement: Statement,
}

impl StatementBuilder {
    pub fn new(actor: impl Into<Actor>, verb: Verb, object: impl Into<StatementObject>) -> Self {
        Self {
            statement: Statement::new(actor, verb, object),
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.statement.id = Some(id);
        self
    }

    /// Assigns a fresh random id so the statement is sent with PUT.
    pub fn generated_id(mut self) -> Self {
        self.statement.id = Some(new_statement_id());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.statement.timestamp = Some(timestamp);
        self
    }

    /// Sets the timestamp to the current UTC time.
    pub fn timestamp_now(mut self) -> Self {
        self.statement.timestamp = Some(Utc::now().fixed_offset());
        self
    }

    pub fn authority(mut self, authority: impl Into<Actor>) -> Self {
        self.statement.authority = Some(authority.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.statement.attachments.push(attachment);
        self
    }

    /// Sets the result using a builder function.
    pub fn result<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ResultBuilder) -> ResultBuilder,
    {
        let seed = self.statement.result.take().unwrap_or_default();
        self.statement.result = Some(f(ResultBuilder { result: seed }).result);
        self
    }

    /// Sets the context using a builder function.
    pub fn context<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ContextBuilder) -> ContextBuilder,
    {
        let seed = self.statement.context.take().unwrap_or_default();
        self.statement.context = Some(f(ContextBuilder { context: seed }).context);
        self
    }

    pub fn build(self) -> Statement {
        self.statement
    }
}

/// Builder for an [`ActivityResult`].
#[derive(Debug, Clone, Default)]
pub struct ResultBuilder {
    result: ActivityResult,
}

impl ResultBuilder {
    pub fn score(mut self, score: Score) -> Self {
        self.result.score = Some(score);
        self
    }

    pub fn success(mut self, success: bool) -> Self {
        self.result.success = Some(success);
        self
    }

    pub fn completion(mut self, completion: bool) -> Self {
        self.result.completion = Some(completion);
        self
    }

    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.result.response = Some(response.into());
        self
    }

    pub fn duration(mut self, duration: IsoDuration) -> Self {
        self.result.duration = Some(duration);
        self
    }

    pub fn extension(mut self, key: Iri, value: impl Into<JsonValue>) -> Self {
        self.result.extensions.insert_iri(key, value);
        self
    }
}

/// Builder for a [`Context`].
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    context: Context,
}

impl ContextBuilder {
    pub fn registration(mut self, registration: Uuid) -> Self {
        self.context.registration = Some(registration);
        self
    }

    pub fn instructor(mut self, instructor: impl Into<Actor>) -> Self {
        self.context.instructor = Some(instructor.into());
        self
    }

    pub fn team(mut self, team: Group) -> Self {
        self.context.team = Some(team);
        self
    }

    pub fn parent(mut self, activity: Activity) -> Self {
        self.context.context_activities.parent.push(activity);
        self
    }

    pub fn grouping(mut self, activity: Activity) -> Self {
        self.context.context_activities.grouping.push(activity);
        self
    }

    pub fn category(mut self, activity: Activity) -> Self {
        self.context.context_activities.category.push(activity);
        self
    }

    pub fn other(mut self, activity: Activity) -> Self {
        self.context.context_activities.other.push(activity);
        self
    }

    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.context.revision = Some(revision.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.context.platform = Some(platform.into());
        self
    }

    pub fn language(mut self, language: LanguageTag) -> Self {
        self.context.language = Some(language);
        self
    }

    pub fn statement(mut self, statement: StatementRef) -> Self {
        self.context.statement = Some(statement);
        self
    }

    pub fn extension(mut self, key: Iri, value: impl Into<JsonValue>) -> Self {
        self.context.extensions.insert_iri(key, value);
        self
    }
}
