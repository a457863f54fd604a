//! Statement context.

use uuid::Uuid;

use crate::model::activity::Activity;
use crate::model::actor::{Actor, Group};
use crate::model::statement::StatementRef;
use crate::model::value::{Extensions, LanguageTag};

/// Activities related to the statement's object, by relationship.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextActivities {
    pub parent: Vec<Activity>,
    pub grouping: Vec<Activity>,
    pub category: Vec<Activity>,
    pub other: Vec<Activity>,
}

impl ContextActivities {
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty() && self.grouping.is_empty() && self.category.is_empty() && self.other.is_empty()
    }

    /// Iterates over every activity, paired with its relationship name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Activity)> {
        tagged("parent", &self.parent)
            .chain(tagged("grouping", &self.grouping))
            .chain(tagged("category", &self.category))
            .chain(tagged("other", &self.other))
    }
}

fn tagged<'a>(name: &'static str, list: &'a [Activity]) -> impl Iterator<Item = (&'static str, &'a Activity)> {
    list.iter().map(move |a| (name, a))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    pub registration: Option<Uuid>,
    pub instructor: Option<Actor>,
    pub team: Option<Group>,
    pub context_activities: ContextActivities,
    /// Only meaningful when the statement object is an Activity.
    pub revision: Option<String>,
    /// Only meaningful when the statement object is an Activity.
    pub platform: Option<String>,
    pub language: Option<LanguageTag>,
    pub statement: Option<StatementRef>,
    pub extensions: Extensions,
}

impl Context {
    pub fn is_empty(&self) -> bool {
        self.registration.is_none()
            && self.instructor.is_none()
            && self.team.is_none()
            && self.context_activities.is_empty()
            && self.revision.is_none()
            && self.platform.is_none()
            && self.language.is_none()
            && self.statement.is_none()
            && self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_activities_iter() {
        let parent = Activity::from_id("http://example.com/course").unwrap();
        let category = Activity::from_id("http://example.com/profile").unwrap();
        let activities = ContextActivities {
            parent: vec![parent.clone()],
            category: vec![category.clone()],
            ..Default::default()
        };
        let collected: Vec<_> = activities.iter().collect();
        assert_eq!(collected, vec![("parent", &parent), ("category", &category)]);
    }

    #[test]
    fn test_empty_context() {
        assert!(Context::default().is_empty());
        let ctx = Context {
            platform: Some("Example LMS".to_string()),
            ..Default::default()
        };
        assert!(!ctx.is_empty());
    }
}
