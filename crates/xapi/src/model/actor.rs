//! Agents and groups.
//!
//! An agent is identified by at most one inverse functional identifier
//! (IFI). Groups come in two shapes: an anonymous group is defined purely by
//! its members, an identified group carries its own IFI.

use crate::error::ValidationError;
use crate::model::value::Iri;

/// An `account` IFI: a user name on some system identified by `homePage`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    name: String,
    home_page: Iri,
}

impl Account {
    pub fn new(name: impl Into<String>, home_page: Iri) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty { what: "account name" });
        }
        Ok(Self { name, home_page })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home_page(&self) -> &Iri {
        &self.home_page
    }
}

/// A `mailto:` IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mbox(Iri);

impl Mbox {
    /// Accepts `mailto:` IRIs only. The scheme check is case-insensitive.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let is_mailto = value
            .get(..7)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"));
        if !is_mailto || value.len() == 7 {
            return Err(ValidationError::InvalidMbox { value });
        }
        let iri = Iri::new(value.clone()).map_err(|_| ValidationError::InvalidMbox { value })?;
        Ok(Mbox(iri))
    }

    /// Builds the IRI from a bare e-mail address.
    pub fn from_address(address: &str) -> Result<Self, ValidationError> {
        Self::new(format!("mailto:{address}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Inverse functional identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ifi {
    Mbox(Mbox),
    /// Hex SHA-1 of the `mailto:` IRI.
    MboxSha1Sum(String),
    OpenId(Iri),
    Account(Account),
}

impl Ifi {
    /// Field names in the order the codec checks them.
    pub const FIELDS: [&'static str; 4] = ["mbox", "mbox_sha1sum", "openid", "account"];

    pub fn mbox(value: impl Into<String>) -> Result<Self, ValidationError> {
        Mbox::new(value).map(Ifi::Mbox)
    }

    pub fn mbox_sha1sum(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { what: "mbox_sha1sum" });
        }
        Ok(Ifi::MboxSha1Sum(value))
    }

    pub fn openid(value: impl Into<String>) -> Result<Self, ValidationError> {
        Iri::new(value).map(Ifi::OpenId)
    }

    pub fn account(name: impl Into<String>, home_page: &str) -> Result<Self, ValidationError> {
        Account::new(name, Iri::new(home_page)?).map(Ifi::Account)
    }

    /// The JSON field this identifier is written to.
    pub fn field_name(&self) -> &'static str {
        match self {
            Ifi::Mbox(_) => "mbox",
            Ifi::MboxSha1Sum(_) => "mbox_sha1sum",
            Ifi::OpenId(_) => "openid",
            Ifi::Account(_) => "account",
        }
    }
}

/// A single person or system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Agent {
    pub name: Option<String>,
    pub ifi: Option<Ifi>,
}

impl Agent {
    pub fn new(ifi: Ifi) -> Self {
        Self { name: None, ifi: Some(ifi) }
    }

    /// Shorthand for an agent identified by `mbox`.
    pub fn with_mbox(mbox: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Ifi::mbox(mbox)?))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A group without an identifier; it is defined by its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AnonymousGroup {
    pub name: Option<String>,
    pub member: Vec<Agent>,
}

/// A group with its own identifier. The member list is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifiedGroup {
    pub name: Option<String>,
    pub ifi: Ifi,
    pub member: Option<Vec<Agent>>,
}

impl IdentifiedGroup {
    pub fn new(ifi: Ifi) -> Self {
        Self {
            name: None,
            ifi,
            member: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Group {
    Anonymous(AnonymousGroup),
    Identified(IdentifiedGroup),
}

impl Group {
    pub fn anonymous(member: Vec<Agent>) -> Self {
        Group::Anonymous(AnonymousGroup { name: None, member })
    }

    pub fn identified(ifi: Ifi) -> Self {
        Group::Identified(IdentifiedGroup::new(ifi))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Group::Anonymous(g) => g.name.as_deref(),
            Group::Identified(g) => g.name.as_deref(),
        }
    }

    pub fn ifi(&self) -> Option<&Ifi> {
        match self {
            Group::Anonymous(_) => None,
            Group::Identified(g) => Some(&g.ifi),
        }
    }

    /// Members, empty when an identified group leaves them out.
    pub fn members(&self) -> &[Agent] {
        match self {
            Group::Anonymous(g) => &g.member,
            Group::Identified(g) => g.member.as_deref().unwrap_or(&[]),
        }
    }
}

impl From<AnonymousGroup> for Group {
    fn from(g: AnonymousGroup) -> Self {
        Group::Anonymous(g)
    }
}

impl From<IdentifiedGroup> for Group {
    fn from(g: IdentifiedGroup) -> Self {
        Group::Identified(g)
    }
}

/// Whoever performed or is credited with a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Actor {
    Agent(Agent),
    Group(Group),
}

impl Actor {
    pub fn name(&self) -> Option<&str> {
        match self {
            Actor::Agent(a) => a.name.as_deref(),
            Actor::Group(g) => g.name(),
        }
    }

    pub fn ifi(&self) -> Option<&Ifi> {
        match self {
            Actor::Agent(a) => a.ifi.as_ref(),
            Actor::Group(g) => g.ifi(),
        }
    }
}

impl From<Agent> for Actor {
    fn from(a: Agent) -> Self {
        Actor::Agent(a)
    }
}

impl From<Group> for Actor {
    fn from(g: Group) -> Self {
        Actor::Group(g)
    }
}
