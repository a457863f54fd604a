//! The `objectType` discriminant shared by all polymorphic xAPI slots.

use std::fmt;

/// Every `objectType` value the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Agent,
    Group,
    Activity,
    StatementRef,
    SubStatement,
    Statement,
}

impl ObjectType {
    /// All discriminants, in xAPI wire order.
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Agent,
        ObjectType::Group,
        ObjectType::Activity,
        ObjectType::StatementRef,
        ObjectType::SubStatement,
        ObjectType::Statement,
    ];

    /// Returns the literal written to the `objectType` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Agent => "Agent",
            ObjectType::Group => "Group",
            ObjectType::Activity => "Activity",
            ObjectType::StatementRef => "StatementRef",
            ObjectType::SubStatement => "SubStatement",
            ObjectType::Statement => "Statement",
        }
    }

    /// Resolves a wire discriminant. Matching is exact and case-sensitive.
    pub fn from_discriminant(value: &str) -> Option<ObjectType> {
        match value {
            "Agent" => Some(ObjectType::Agent),
            "Group" => Some(ObjectType::Group),
            "Activity" => Some(ObjectType::Activity),
            "StatementRef" => Some(ObjectType::StatementRef),
            "SubStatement" => Some(ObjectType::SubStatement),
            "Statement" => Some(ObjectType::Statement),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
