//! Encoding of the non-polymorphic records: verb, result and attachment.

use serde_json::Value as JsonValue;

use crate::codec::primitives::{ObjectReader, ObjectWriter};
use crate::error::DecodeError;
use crate::model::{parse_content_type, parse_sha2, ActivityResult, Attachment, Score, Verb};

// =============================================================================
// VERB
// =============================================================================

pub fn decode_verb(value: &JsonValue) -> Result<Verb, DecodeError> {
    let reader = ObjectReader::new(value, "verb")?;
    Ok(Verb {
        id: reader.iri("id")?,
        display: reader.language_map("display")?,
    })
}

pub fn encode_verb(verb: &Verb) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer.str("id", verb.id.as_str()).language_map("display", &verb.display);
    writer.finish()
}

// =============================================================================
// RESULT
// =============================================================================

fn decode_score(value: &JsonValue) -> Result<Score, DecodeError> {
    let reader = ObjectReader::new(value, "score")?;
    Score::new(
        reader.opt_f64("scaled")?,
        reader.opt_f64("raw")?,
        reader.opt_f64("min")?,
        reader.opt_f64("max")?,
    )
    .map_err(|e| DecodeError::invalid("result", "score", e))
}

fn encode_score(score: &Score) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .opt_f64("scaled", score.scaled_value())
        .opt_f64("raw", score.raw())
        .opt_f64("min", score.min())
        .opt_f64("max", score.max());
    writer.finish()
}

pub fn decode_result(value: &JsonValue) -> Result<ActivityResult, DecodeError> {
    let reader = ObjectReader::new(value, "result")?;
    Ok(ActivityResult {
        score: reader.get("score").map(decode_score).transpose()?,
        success: reader.opt_bool("success")?,
        completion: reader.opt_bool("completion")?,
        response: reader.opt_string("response")?,
        duration: reader.opt_duration("duration")?,
        extensions: reader.extensions("extensions")?,
    })
}

pub fn encode_result(result: &ActivityResult) -> JsonValue {
    let mut writer = ObjectWriter::new();
    if let Some(score) = &result.score {
        writer.object("score", encode_score(score));
    }
    writer
        .opt_bool("success", result.success)
        .opt_bool("completion", result.completion)
        .opt_str("response", result.response.as_deref())
        .opt_duration("duration", result.duration.as_ref())
        .extensions("extensions", &result.extensions);
    writer.finish()
}

// =============================================================================
// ATTACHMENT
// =============================================================================

pub fn decode_attachment(value: &JsonValue) -> Result<Attachment, DecodeError> {
    let reader = ObjectReader::new(value, "attachment")?;
    let sha2 = parse_sha2(reader.str("sha2")?).map_err(|e| DecodeError::invalid("attachment", "sha2", e))?;
    Ok(Attachment {
        usage_type: reader.iri("usageType")?,
        display: reader.language_map("display")?,
        description: reader.language_map("description")?,
        content_type: parse_content_type(reader.str("contentType")?)
            .map_err(|e| DecodeError::invalid("attachment", "contentType", e))?,
        length: reader.u64("length")?,
        sha2,
        file_url: reader.opt_iri("fileUrl")?,
    })
}

pub fn encode_attachment(attachment: &Attachment) -> JsonValue {
    let mut writer = ObjectWriter::new();
    writer
        .str("usageType", attachment.usage_type.as_str())
        .language_map("display", &attachment.display)
        .language_map("description", &attachment.description)
        .str("contentType", &attachment.content_type)
        .u64("length", attachment.length)
        .str("sha2", &attachment.sha2)
        .opt_iri("fileUrl", attachment.file_url.as_ref());
    writer.finish()
}

pub(crate) fn decode_attachments(reader: &ObjectReader<'_>) -> Result<Vec<Attachment>, DecodeError> {
    match reader.opt_array("attachments")? {
        None => Ok(Vec::new()),
        Some(items) => items.iter().map(decode_attachment).collect(),
    }
}
