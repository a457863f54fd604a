//! Activity and activity definition encoding.

use serde_json::Value as JsonValue;

use crate::codec::object::Slot;
use crate::codec::primitives::{ObjectReader, ObjectWriter};
use crate::error::DecodeError;
use crate::model::{Activity, ActivityDefinition, InteractionComponent, InteractionType, ObjectType};

const COMPONENT_LISTS: [&str; 5] = ["choices", "scale", "source", "target", "steps"];

// =============================================================================
// DECODING
// =============================================================================

fn decode_component(value: &JsonValue) -> Result<InteractionComponent, DecodeError> {
    let reader = ObjectReader::new(value, "interaction component")?;
    let mut component =
        InteractionComponent::new(reader.str("id")?).map_err(|e| DecodeError::invalid("interaction component", "id", e))?;
    component.description = reader.language_map("description")?;
    Ok(component)
}

fn decode_components(reader: &ObjectReader<'_>, field: &'static str) -> Result<Vec<InteractionComponent>, DecodeError> {
    match reader.opt_array(field)? {
        None => Ok(Vec::new()),
        Some(items) => items.iter().map(decode_component).collect(),
    }
}

fn decode_definition(reader: &ObjectReader<'_>) -> Result<ActivityDefinition, DecodeError> {
    let interaction_type = reader
        .opt_str("interactionType")?
        .map(|s| {
            s.parse::<InteractionType>()
                .map_err(|e| DecodeError::invalid("activity definition", "interactionType", e))
        })
        .transpose()?;
    Ok(ActivityDefinition {
        name: reader.language_map("name")?,
        description: reader.language_map("description")?,
        activity_type: reader.opt_iri("type")?,
        more_info: reader.opt_iri("moreInfo")?,
        extensions: reader.extensions("extensions")?,
        interaction_type,
        correct_responses_pattern: reader.string_list("correctResponsesPattern")?,
        choices: decode_components(reader, "choices")?,
        scale: decode_components(reader, "scale")?,
        source: decode_components(reader, "source")?,
        target: decode_components(reader, "target")?,
        steps: decode_components(reader, "steps")?,
    })
}

/// Decodes an activity whose discriminant has already been checked.
pub(crate) fn decode_activity_fields(reader: &ObjectReader<'_>) -> Result<Activity, DecodeError> {
    let definition = reader
        .opt_object("definition", "activity definition")?
        .map(|def| decode_definition(&def))
        .transpose()?;
    Ok(Activity {
        id: reader.iri("id")?,
        definition,
    })
}

/// Decodes an activity; `objectType`, when present, must be `Activity`.
pub fn decode_activity(value: &JsonValue) -> Result<Activity, DecodeError> {
    let reader = ObjectReader::new(value, "activity")?;
    Slot::ContextActivity.resolve(reader.object_type()?)?;
    decode_activity_fields(&reader)
}

// =============================================================================
// ENCODING
// =============================================================================

fn encode_component(component: &InteractionComponent) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .str("id", &component.id)
        .language_map("description", &component.description);
    writer.finish()
}

fn encode_definition(def: &ActivityDefinition) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .language_map("name", &def.name)
        .language_map("description", &def.description)
        .opt_iri("type", def.activity_type.as_ref())
        .opt_iri("moreInfo", def.more_info.as_ref())
        .extensions("extensions", &def.extensions)
        .opt_str("interactionType", def.interaction_type.map(InteractionType::as_str))
        .array(
            "correctResponsesPattern",
            def.correct_responses_pattern.iter().cloned().map(JsonValue::String).collect(),
        );
    let lists = [&def.choices, &def.scale, &def.source, &def.target, &def.steps];
    for (field, list) in COMPONENT_LISTS.into_iter().zip(lists) {
        writer.array(field, list.iter().map(encode_component).collect());
    }
    writer.finish()
}

/// Encodes an activity. The discriminant is written only when requested;
/// statement objects and context activities always request it.
pub fn encode_activity(activity: &Activity, with_object_type: bool) -> JsonValue {
    let mut writer = ObjectWriter::new();
    if with_object_type {
        writer.object_type(ObjectType::Activity);
    }
    writer.str("id", activity.id.as_str());
    if let Some(def) = &activity.definition {
        writer.object("definition", encode_definition(def));
    }
    writer.finish()
}
