//! Statement query filters.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::codec::actor_to_json_string;
use crate::model::{Actor, Iri};
use crate::util::format_query_time;

/// How much detail the LRS includes for agents, groups and activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryFormat {
    Ids,
    #[default]
    Exact,
    Canonical,
}

impl QueryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryFormat::Ids => "ids",
            QueryFormat::Exact => "exact",
            QueryFormat::Canonical => "canonical",
        }
    }
}

impl fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for `GET statements`. Unset fields are not sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementQuery {
    pub agent: Option<Actor>,
    pub verb: Option<Iri>,
    pub activity: Option<Iri>,
    pub registration: Option<Uuid>,
    pub related_activities: Option<bool>,
    pub related_agents: Option<bool>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub format: Option<QueryFormat>,
    pub attachments: Option<bool>,
    pub ascending: Option<bool>,
}

impl StatementQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, agent: impl Into<Actor>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn verb(mut self, verb: Iri) -> Self {
        self.verb = Some(verb);
        self
    }

    pub fn activity(mut self, activity: Iri) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn registration(mut self, registration: Uuid) -> Self {
        self.registration = Some(registration);
        self
    }

    pub fn related_activities(mut self, related: bool) -> Self {
        self.related_activities = Some(related);
        self
    }

    pub fn related_agents(mut self, related: bool) -> Self {
        self.related_agents = Some(related);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn format(mut self, format: QueryFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn attachments(mut self, attachments: bool) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = Some(ascending);
        self
    }

    /// Query parameters in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(agent) = &self.agent {
            params.push(("agent", actor_to_json_string(agent)));
        }
        if let Some(verb) = &self.verb {
            params.push(("verb", verb.to_string()));
        }
        if let Some(activity) = &self.activity {
            params.push(("activity", activity.to_string()));
        }
        if let Some(registration) = &self.registration {
            params.push(("registration", registration.hyphenated().to_string()));
        }
        push_bool(&mut params, "related_activities", self.related_activities);
        push_bool(&mut params, "related_agents", self.related_agents);
        if let Some(since) = &self.since {
            params.push(("since", format_query_time(since)));
        }
        if let Some(until) = &self.until {
            params.push(("until", format_query_time(until)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(format) = self.format {
            params.push(("format", format.to_string()));
        }
        push_bool(&mut params, "attachments", self.attachments);
        push_bool(&mut params, "ascending", self.ascending);
        params
    }
}

fn push_bool(params: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<bool>) {
    if let Some(value) = value {
        params.push((name, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Agent;

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(StatementQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_params_encoding() {
        let query = StatementQuery::new()
            .agent(Agent::with_mbox("mailto:learner@example.com").unwrap())
            .verb(Iri::new("http://adlnet.gov/expapi/verbs/completed").unwrap())
            .since(Utc.with_ymd_and_hms(2021, 6, 18, 0, 0, 0).unwrap())
            .limit(25)
            .related_agents(false)
            .format(QueryFormat::Ids)
            .ascending(true);
        let mut params = query.to_params();
        let (name, agent) = params.remove(0);
        assert_eq!(name, "agent");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&agent).unwrap(),
            serde_json::json!({"objectType": "Agent", "mbox": "mailto:learner@example.com"})
        );
        assert_eq!(
            params,
            vec![
                ("verb", "http://adlnet.gov/expapi/verbs/completed".to_string()),
                ("related_agents", "false".to_string()),
                ("since", "2021-06-18T00:00:00Z".to_string()),
                ("limit", "25".to_string()),
                ("format", "ids".to_string()),
                ("ascending", "true".to_string()),
            ]
        );
    }
}
