//! Documents: opaque payloads stored by the LRS per activity or agent.
//!
//! A document is addressed by an id plus a scope. The three scopes differ
//! only in which query parameters identify them, so the document type is
//! generic over a [`DocumentScope`].

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::warn;
use uuid::Uuid;

use crate::client::HttpResponse;
use crate::codec;
use crate::error::DecodeError;
use crate::model::actor::Agent;
use crate::model::value::Iri;
use crate::util::parse_http_date;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Identifies where a document lives on the LRS.
pub trait DocumentScope {
    /// Path of the resource relative to the endpoint.
    const RESOURCE: &'static str;
    /// Query parameter naming the document id.
    const ID_PARAM: &'static str;

    /// Query parameters locating the scope (without the document id).
    fn query_params(&self) -> Vec<(&'static str, String)>;
}

/// Scope of a state document: an activity, an agent and an optional
/// registration.
#[derive(Debug, Clone, PartialEq)]
pub struct StateScope {
    pub activity: Iri,
    pub agent: Agent,
    pub registration: Option<Uuid>,
}

impl DocumentScope for StateScope {
    const RESOURCE: &'static str = "activities/state";
    const ID_PARAM: &'static str = "stateId";

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("activityId", self.activity.to_string()),
            ("agent", codec::agent_to_json_string(&self.agent)),
        ];
        if let Some(registration) = &self.registration {
            params.push(("registration", registration.hyphenated().to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityProfileScope {
    pub activity: Iri,
}

impl DocumentScope for ActivityProfileScope {
    const RESOURCE: &'static str = "activities/profile";
    const ID_PARAM: &'static str = "profileId";

    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("activityId", self.activity.to_string())]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfileScope {
    pub agent: Agent,
}

impl DocumentScope for AgentProfileScope {
    const RESOURCE: &'static str = "agents/profile";
    const ID_PARAM: &'static str = "profileId";

    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("agent", codec::agent_to_json_string(&self.agent))]
    }
}

/// A document and its HTTP metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<S> {
    pub id: String,
    pub scope: S,
    pub content: Vec<u8>,
    pub content_type: Option<String>,
    /// Sent as `If-Match` on writes when present.
    pub etag: Option<String>,
    /// `Last-Modified` of a retrieved document.
    pub timestamp: Option<DateTime<Utc>>,
}

pub type StateDocument = Document<StateScope>;
pub type ActivityProfileDocument = Document<ActivityProfileScope>;
pub type AgentProfileDocument = Document<AgentProfileScope>;

impl<S: DocumentScope> Document<S> {
    pub fn new(id: impl Into<String>, scope: S, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            scope,
            content: content.into(),
            content_type: None,
            etag: None,
            timestamp: None,
        }
    }

    /// A document holding serialized JSON, typed `application/json`.
    pub fn json(id: impl Into<String>, scope: S, value: &JsonValue) -> Self {
        let mut doc = Self::new(id, scope, value.to_string());
        doc.content_type = Some("application/json".to_string());
        doc
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Builds a document from a successful retrieval.
    ///
    /// An unparseable `Last-Modified` leaves `timestamp` unset.
    pub fn from_response(id: impl Into<String>, scope: S, response: &HttpResponse) -> Self {
        let timestamp = response.header("Last-Modified").and_then(|value| {
            let parsed = parse_http_date(value);
            if parsed.is_none() {
                warn!(value, "ignoring unparseable Last-Modified header");
            }
            parsed
        });
        Self {
            id: id.into(),
            scope,
            content: response.body.clone(),
            content_type: response.header("Content-Type").map(str::to_string),
            etag: response.header("ETag").map(str::to_string),
            timestamp,
        }
    }

    /// Content type for writes, falling back to `application/octet-stream`.
    pub fn effective_content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Parses the content as JSON.
    pub fn content_json(&self) -> Result<JsonValue, DecodeError> {
        Ok(serde_json::from_slice(&self.content)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn scope() -> StateScope {
        StateScope {
            activity: Iri::new("http://example.com/activities/quiz").unwrap(),
            agent: Agent::with_mbox("mailto:learner@example.com").unwrap(),
            registration: None,
        }
    }

    fn response(headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: b"{\"bookmark\":3}".to_vec(),
        }
    }

    #[test]
    fn test_from_response_maps_headers_case_insensitively() {
        let res = response(&[
            ("last-modified", "Fri, 18 Jun 2021 22:21:11 GMT"),
            ("etag", "\"abc\""),
            ("content-type", "application/json"),
        ]);
        let doc = StateDocument::from_response("bookmark", scope(), &res);
        assert_eq!(doc.timestamp, Some(Utc.with_ymd_and_hms(2021, 6, 18, 22, 21, 11).unwrap()));
        assert_eq!(doc.etag.as_deref(), Some("\"abc\""));
        assert_eq!(doc.content_type.as_deref(), Some("application/json"));
        assert_eq!(doc.content_json().unwrap(), json!({"bookmark": 3}));
    }

    #[test]
    fn test_invalid_last_modified_is_absent() {
        let res = response(&[("Last-Modified", "invalid_date")]);
        let doc = StateDocument::from_response("bookmark", scope(), &res);
        assert_eq!(doc.timestamp, None);
        assert_eq!(doc.effective_content_type(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_state_scope_params() {
        let mut scope = scope();
        scope.registration = Some(Uuid::parse_str("e05aa883-acaf-40ad-bf54-02c8ce485fb0").unwrap());
        let params = scope.query_params();
        assert_eq!(params[0], ("activityId", "http://example.com/activities/quiz".to_string()));
        assert_eq!(params[1].0, "agent");
        let agent: JsonValue = serde_json::from_str(&params[1].1).unwrap();
        assert_eq!(
            agent,
            json!({"objectType": "Agent", "mbox": "mailto:learner@example.com"})
        );
        assert_eq!(params[2], ("registration", "e05aa883-acaf-40ad-bf54-02c8ce485fb0".to_string()));
    }
}
