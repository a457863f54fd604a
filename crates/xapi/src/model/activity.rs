//! Activities and their definitions, including interaction metadata.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::value::{Extensions, Iri, LanguageMap};

/// The thing an actor interacted with.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: Iri,
    pub definition: Option<ActivityDefinition>,
}

impl Activity {
    pub fn new(id: Iri) -> Self {
        Self { id, definition: None }
    }

    /// Parses the id and wraps it in an activity with no definition.
    pub fn from_id(id: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Iri::new(id)?))
    }

    pub fn with_definition(mut self, definition: ActivityDefinition) -> Self {
        self.definition = Some(definition);
        self
    }
}

/// Metadata describing an activity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityDefinition {
    pub name: LanguageMap,
    pub description: LanguageMap,
    pub activity_type: Option<Iri>,
    pub more_info: Option<Iri>,
    pub extensions: Extensions,
    pub interaction_type: Option<InteractionType>,
    pub correct_responses_pattern: Vec<String>,
    pub choices: Vec<InteractionComponent>,
    pub scale: Vec<InteractionComponent>,
    pub source: Vec<InteractionComponent>,
    pub target: Vec<InteractionComponent>,
    pub steps: Vec<InteractionComponent>,
}

impl ActivityDefinition {
    /// True when no field carries data; such a definition is not encoded.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_empty()
            && self.activity_type.is_none()
            && self.more_info.is_none()
            && self.extensions.is_empty()
            && self.interaction_type.is_none()
            && self.correct_responses_pattern.is_empty()
            && self.choices.is_empty()
            && self.scale.is_empty()
            && self.source.is_empty()
            && self.target.is_empty()
            && self.steps.is_empty()
    }
}

/// One option of an interaction activity (a choice, a scale point, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionComponent {
    pub id: String,
    pub description: LanguageMap,
}

impl InteractionComponent {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { what: "interaction component id" });
        }
        Ok(Self {
            id,
            description: LanguageMap::new(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    TrueFalse,
    Choice,
    FillIn,
    LongFillIn,
    Matching,
    Performance,
    Sequencing,
    Likert,
    Numeric,
    Other,
}

impl InteractionType {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::TrueFalse => "true-false",
            InteractionType::Choice => "choice",
            InteractionType::FillIn => "fill-in",
            InteractionType::LongFillIn => "long-fill-in",
            InteractionType::Matching => "matching",
            InteractionType::Performance => "performance",
            InteractionType::Sequencing => "sequencing",
            InteractionType::Likert => "likert",
            InteractionType::Numeric => "numeric",
            InteractionType::Other => "other",
        }
    }
}

impl FromStr for InteractionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "true-false" => InteractionType::TrueFalse,
            "choice" => InteractionType::Choice,
            "fill-in" => InteractionType::FillIn,
            "long-fill-in" => InteractionType::LongFillIn,
            "matching" => InteractionType::Matching,
            "performance" => InteractionType::Performance,
            "sequencing" => InteractionType::Sequencing,
            "likert" => InteractionType::Likert,
            "numeric" => InteractionType::Numeric,
            "other" => InteractionType::Other,
            _ => {
                return Err(ValidationError::UnknownInteractionType { value: s.to_string() });
            }
        })
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
