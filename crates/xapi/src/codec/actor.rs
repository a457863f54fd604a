//! Agent and group encoding.

use serde_json::Value as JsonValue;

use crate::codec::object::Slot;
use crate::codec::primitives::{ObjectReader, ObjectWriter};
use crate::error::{DecodeError, ValidationError};
use crate::model::{Account, Actor, Agent, AnonymousGroup, Group, IdentifiedGroup, Ifi, Mbox, ObjectType};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the single IFI of an agent or group, if present.
fn decode_ifi(reader: &ObjectReader<'_>) -> Result<Option<Ifi>, DecodeError> {
    let found: Vec<&'static str> = Ifi::FIELDS.into_iter().filter(|f| reader.has(f)).collect();
    if found.len() > 1 {
        return Err(ValidationError::MultipleIdentifiers { found }.into());
    }
    let context = reader.context();
    let ifi = match found.first().copied() {
        None => return Ok(None),
        Some("mbox") => {
            let value = reader.str("mbox")?;
            Ifi::Mbox(Mbox::new(value).map_err(|e| DecodeError::invalid(context, "mbox", e))?)
        }
        Some("mbox_sha1sum") => {
            let value = reader.str("mbox_sha1sum")?;
            Ifi::mbox_sha1sum(value).map_err(|e| DecodeError::invalid(context, "mbox_sha1sum", e))?
        }
        Some("openid") => Ifi::OpenId(reader.iri("openid")?),
        Some(_) => {
            let account = reader
                .opt_object("account", "account")?
                .ok_or(DecodeError::MissingField { context, field: "account" })?;
            let name = account.str("name")?;
            let home_page = account.iri("homePage")?;
            Ifi::Account(Account::new(name, home_page).map_err(|e| DecodeError::invalid("account", "name", e))?)
        }
    };
    Ok(Some(ifi))
}

/// Decodes an agent whose discriminant has already been checked.
pub(crate) fn decode_agent_fields(reader: &ObjectReader<'_>) -> Result<Agent, DecodeError> {
    Ok(Agent {
        name: reader.opt_string("name")?,
        ifi: decode_ifi(reader)?,
    })
}

/// Decodes a group whose discriminant has already been checked.
///
/// Any IFI makes the group identified.
pub(crate) fn decode_group_fields(reader: &ObjectReader<'_>) -> Result<Group, DecodeError> {
    let name = reader.opt_string("name")?;
    let member = match reader.opt_array("member")? {
        None => None,
        Some(items) => Some(
            items
                .iter()
                .map(|item| decode_agent_in(item, Slot::Member))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };
    Ok(match decode_ifi(reader)? {
        None => Group::Anonymous(AnonymousGroup {
            name,
            member: member.unwrap_or_default(),
        }),
        Some(ifi) => Group::Identified(IdentifiedGroup { name, ifi, member }),
    })
}

/// Decodes a value that must be an agent, e.g. a group member.
pub(crate) fn decode_agent_in(value: &JsonValue, slot: Slot) -> Result<Agent, DecodeError> {
    let reader = ObjectReader::new(value, "agent")?;
    match slot.resolve(reader.object_type()?)? {
        ObjectType::Agent => decode_agent_fields(&reader),
        other => Err(slot.unknown(other.as_str())),
    }
}

/// Decodes a value that must be a group, e.g. a context team.
pub(crate) fn decode_group_in(value: &JsonValue, slot: Slot) -> Result<Group, DecodeError> {
    let reader = ObjectReader::new(value, "group")?;
    match slot.resolve(reader.object_type()?)? {
        ObjectType::Group => decode_group_fields(&reader),
        other => Err(slot.unknown(other.as_str())),
    }
}

/// Decodes an actor; a missing `objectType` means `Agent`.
pub(crate) fn decode_actor_in(value: &JsonValue, slot: Slot) -> Result<Actor, DecodeError> {
    let reader = ObjectReader::new(value, slot.name())?;
    match slot.resolve(reader.object_type()?)? {
        ObjectType::Agent => decode_agent_fields(&reader).map(Actor::Agent),
        ObjectType::Group => decode_group_fields(&reader).map(Actor::Group),
        other => Err(slot.unknown(other.as_str())),
    }
}

/// Decodes a statement actor.
pub fn decode_actor(value: &JsonValue) -> Result<Actor, DecodeError> {
    decode_actor_in(value, Slot::Actor)
}

/// Decodes an agent.
pub fn decode_agent(value: &JsonValue) -> Result<Agent, DecodeError> {
    decode_agent_in(value, Slot::Member)
}

// =============================================================================
// ENCODING
// =============================================================================

fn write_ifi(writer: &mut ObjectWriter, ifi: &Ifi) {
    match ifi {
        Ifi::Mbox(mbox) => writer.str("mbox", mbox.as_str()),
        Ifi::MboxSha1Sum(sum) => writer.str("mbox_sha1sum", sum),
        Ifi::OpenId(iri) => writer.str("openid", iri.as_str()),
        Ifi::Account(account) => {
            let mut inner = ObjectWriter::new();
            inner
                .str("name", account.name())
                .str("homePage", account.home_page().as_str());
            writer.value("account", inner.finish())
        }
    };
}

pub fn encode_agent(agent: &Agent) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer.object_type(ObjectType::Agent).opt_str("name", agent.name.as_deref());
    if let Some(ifi) = &agent.ifi {
        write_ifi(&mut writer, ifi);
    }
    writer.finish()
}

pub fn encode_group(group: &Group) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer.object_type(ObjectType::Group).opt_str("name", group.name());
    match group {
        Group::Anonymous(g) => {
            // Always present, even when empty
            writer.value("member", JsonValue::Array(g.member.iter().map(encode_agent).collect()));
        }
        Group::Identified(g) => {
            write_ifi(&mut writer, &g.ifi);
            if let Some(member) = &g.member {
                writer.value("member", JsonValue::Array(member.iter().map(encode_agent).collect()));
            }
        }
    }
    writer.finish()
}

pub fn encode_actor(actor: &Actor) -> JsonValue {
    match actor {
        Actor::Agent(a) => encode_agent(a),
        Actor::Group(g) => encode_group(g),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_agent_with_tag() {
        let actor = decode_actor(&json!({"objectType": "Agent", "mbox": "mailto:a@b.com"})).unwrap();
        let Actor::Agent(agent) = actor else {
            panic!("expected agent");
        };
        assert_eq!(agent.ifi, Some(Ifi::mbox("mailto:a@b.com").unwrap()));
    }

    #[test]
    fn test_untagged_actor_is_agent() {
        let actor = decode_actor(&json!({"name": "Team?", "member": []})).unwrap();
        assert!(matches!(actor, Actor::Agent(_)));
    }

    #[test]
    fn test_group_identification_follows_ifi() {
        let anonymous = decode_actor(&json!({"objectType": "Group", "member": []})).unwrap();
        assert!(matches!(anonymous, Actor::Group(Group::Anonymous(_))));

        for ifi in [
            json!({"mbox": "mailto:team@example.com"}),
            json!({"mbox_sha1sum": "ebd31e95054c018b10727ccffd2ef2ec3a016ee9"}),
            json!({"openid": "https://id.example.com/team"}),
            json!({"account": {"name": "team", "homePage": "https://lms.example.com"}}),
        ] {
            let mut value = ifi.clone();
            value["objectType"] = json!("Group");
            let actor = decode_actor(&value).unwrap();
            let Actor::Group(Group::Identified(group)) = actor else {
                panic!("{ifi} should make the group identified");
            };
            assert_eq!(group.member, None);
        }
    }

    #[test]
    fn test_anonymous_group_without_members_defaults_empty() {
        let actor = decode_actor(&json!({"objectType": "Group", "name": "Study group"})).unwrap();
        let Actor::Group(Group::Anonymous(group)) = actor else {
            panic!("expected anonymous group");
        };
        assert!(group.member.is_empty());
        assert_eq!(
            encode_actor(&Actor::Group(Group::Anonymous(group))),
            json!({"objectType": "Group", "name": "Study group", "member": []})
        );
    }

    #[test]
    fn test_multiple_identifiers_rejected() {
        let err = decode_actor(&json!({
            "mbox": "mailto:a@b.com",
            "openid": "https://id.example.com/a"
        }))
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::Validation(ValidationError::MultipleIdentifiers { found: vec!["mbox", "openid"] })
        );
    }

    #[test]
    fn test_actor_slot_rejects_activity() {
        let err = decode_actor(&json!({"objectType": "Activity", "id": "http://example.com/a"})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownVariant {
                object_type: "Activity".to_string(),
                position: "actor",
            }
        );
        assert!(matches!(
            decode_actor(&json!({"objectType": "Person"})),
            Err(DecodeError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_member_must_be_agent() {
        let err = decode_actor(&json!({
            "objectType": "Group",
            "member": [{"objectType": "Group", "member": []}]
        }))
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant { position: "member", .. }));
    }

    #[test]
    fn test_invalid_mbox() {
        let err = decode_actor(&json!({"mbox": "a@b.com"})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Invalid { field: "mbox", source: ValidationError::InvalidMbox { .. }, .. }
        ));
    }

    #[test]
    fn test_identified_group_round_trip() {
        let value = json!({
            "objectType": "Group",
            "name": "Team",
            "account": {"name": "team-7", "homePage": "https://lms.example.com"},
            "member": [{"objectType": "Agent", "name": "A", "mbox": "mailto:a@b.com"}]
        });
        assert_eq!(encode_actor(&decode_actor(&value).unwrap()), value);
    }
}
