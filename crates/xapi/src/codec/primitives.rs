//! Field-level reading and writing of JSON objects.
//!
//! [`ObjectReader`] wraps a JSON object and reads typed fields, turning
//! absent and `null` fields into `None`. Every read carries a context name so
//! errors point at the object being decoded. [`ObjectWriter`] builds an object,
//! dropping empty values instead of writing `null`.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Number, Value as JsonValue};
use uuid::Uuid;

use crate::error::DecodeError;
use crate::model::{
    format_uuid, parse_uuid, Extensions, Iri, IsoDuration, LanguageMap, LanguageTag, ObjectType,
};
use crate::util::{format_duration, format_timestamp, parse_duration, parse_timestamp};

// =============================================================================
// DECODING
// =============================================================================

/// Reader over the fields of one JSON object.
#[derive(Debug, Clone, Copy)]
pub struct ObjectReader<'a> {
    map: &'a Map<String, JsonValue>,
    context: &'static str,
}

impl<'a> ObjectReader<'a> {
    /// Wraps `value`, failing unless it is a JSON object.
    pub fn new(value: &'a JsonValue, context: &'static str) -> Result<Self, DecodeError> {
        match value {
            JsonValue::Object(map) => Ok(Self { map, context }),
            _ => Err(DecodeError::WrongType {
                context,
                field: "(root)",
                expected: "an object",
            }),
        }
    }

    pub fn context(&self) -> &'static str {
        self.context
    }

    /// Returns a field, treating `null` as absent.
    pub fn get(&self, field: &str) -> Option<&'a JsonValue> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::WrongType {
            context: self.context,
            field,
            expected,
        }
    }

    fn missing(&self, field: &'static str) -> DecodeError {
        DecodeError::MissingField {
            context: self.context,
            field,
        }
    }

    /// Reads the `objectType` discriminant, if any.
    pub fn object_type(&self) -> Result<Option<&'a str>, DecodeError> {
        self.opt_str("objectType")
    }

    pub fn opt_str(&self, field: &'static str) -> Result<Option<&'a str>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.wrong_type(field, "a string")),
        }
    }

    pub fn str(&self, field: &'static str) -> Result<&'a str, DecodeError> {
        self.opt_str(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_string(&self, field: &'static str) -> Result<Option<String>, DecodeError> {
        Ok(self.opt_str(field)?.map(str::to_string))
    }

    pub fn opt_bool(&self, field: &'static str) -> Result<Option<bool>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(JsonValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.wrong_type(field, "a boolean")),
        }
    }

    pub fn opt_f64(&self, field: &'static str) -> Result<Option<f64>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(JsonValue::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "a number")),
            Some(_) => Err(self.wrong_type(field, "a number")),
        }
    }

    pub fn u64(&self, field: &'static str) -> Result<u64, DecodeError> {
        match self.get(field) {
            None => Err(self.missing(field)),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| self.wrong_type(field, "a non-negative integer")),
        }
    }

    pub fn opt_iri(&self, field: &'static str) -> Result<Option<Iri>, DecodeError> {
        self.opt_str(field)?
            .map(|s| Iri::new(s).map_err(|e| DecodeError::invalid(self.context, field, e)))
            .transpose()
    }

    pub fn iri(&self, field: &'static str) -> Result<Iri, DecodeError> {
        self.opt_iri(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_uuid(&self, field: &'static str) -> Result<Option<Uuid>, DecodeError> {
        self.opt_str(field)?
            .map(|s| parse_uuid(s).map_err(|e| DecodeError::invalid(self.context, field, e)))
            .transpose()
    }

    pub fn uuid(&self, field: &'static str) -> Result<Uuid, DecodeError> {
        self.opt_uuid(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_timestamp(&self, field: &'static str) -> Result<Option<DateTime<FixedOffset>>, DecodeError> {
        self.opt_str(field)?
            .map(|s| parse_timestamp(s).map_err(|e| DecodeError::invalid(self.context, field, e)))
            .transpose()
    }

    pub fn opt_duration(&self, field: &'static str) -> Result<Option<IsoDuration>, DecodeError> {
        self.opt_str(field)?
            .map(|s| parse_duration(s).map_err(|e| DecodeError::invalid(self.context, field, e)))
            .transpose()
    }

    pub fn opt_language_tag(&self, field: &'static str) -> Result<Option<LanguageTag>, DecodeError> {
        self.opt_str(field)?
            .map(|s| LanguageTag::new(s).map_err(|e| DecodeError::invalid(self.context, field, e)))
            .transpose()
    }

    /// Reads a nested object.
    pub fn opt_object(&self, field: &'static str, context: &'static str) -> Result<Option<ObjectReader<'a>>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(value @ JsonValue::Object(_)) => ObjectReader::new(value, context).map(Some),
            Some(_) => Err(self.wrong_type(field, "an object")),
        }
    }

    pub fn opt_array(&self, field: &'static str) -> Result<Option<&'a [JsonValue]>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(JsonValue::Array(items)) => Ok(Some(items.as_slice())),
            Some(_) => Err(self.wrong_type(field, "an array")),
        }
    }

    /// Reads an array of strings; absent yields an empty list.
    pub fn string_list(&self, field: &'static str) -> Result<Vec<String>, DecodeError> {
        let Some(items) = self.opt_array(field)? else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.clone()),
                _ => Err(self.wrong_type(field, "an array of strings")),
            })
            .collect()
    }

    /// Reads a language map; absent yields an empty map.
    pub fn language_map(&self, field: &'static str) -> Result<LanguageMap, DecodeError> {
        let mut out = LanguageMap::new();
        match self.get(field) {
            None => {}
            Some(JsonValue::Object(entries)) => {
                for (tag, value) in entries {
                    out.insert_json(tag, value)
                        .map_err(|e| DecodeError::invalid(self.context, field, e))?;
                }
            }
            Some(_) => return Err(self.wrong_type(field, "a language map")),
        }
        Ok(out)
    }

    /// Reads an extensions map; absent yields an empty map.
    pub fn extensions(&self, field: &'static str) -> Result<Extensions, DecodeError> {
        let mut out = Extensions::new();
        match self.get(field) {
            None => {}
            Some(JsonValue::Object(entries)) => {
                for (key, value) in entries {
                    out.insert(key, value.clone())
                        .map_err(|e| DecodeError::invalid(self.context, field, e))?;
                }
            }
            Some(_) => return Err(self.wrong_type(field, "an extensions object")),
        }
        Ok(out)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Builder for one JSON object. Empty values are skipped.
#[derive(Debug, Clone, Default)]
pub struct ObjectWriter {
    map: Map<String, JsonValue>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_type(&mut self, object_type: ObjectType) -> &mut Self {
        self.str("objectType", object_type.as_str())
    }

    pub fn str(&mut self, field: &str, value: &str) -> &mut Self {
        self.map.insert(field.to_string(), JsonValue::String(value.to_string()));
        self
    }

    pub fn opt_str(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.str(field, value);
        }
        self
    }

    pub fn opt_bool(&mut self, field: &str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.map.insert(field.to_string(), JsonValue::Bool(value));
        }
        self
    }

    pub fn opt_f64(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if let Some(number) = value.and_then(number_from_f64) {
            self.map.insert(field.to_string(), JsonValue::Number(number));
        }
        self
    }

    pub fn u64(&mut self, field: &str, value: u64) -> &mut Self {
        self.map.insert(field.to_string(), JsonValue::from(value));
        self
    }

    pub fn uuid(&mut self, field: &str, id: &Uuid) -> &mut Self {
        self.str(field, &format_uuid(id))
    }

    pub fn opt_uuid(&mut self, field: &str, id: Option<&Uuid>) -> &mut Self {
        if let Some(id) = id {
            self.uuid(field, id);
        }
        self
    }

    pub fn opt_iri(&mut self, field: &str, value: Option<&Iri>) -> &mut Self {
        self.opt_str(field, value.map(Iri::as_str))
    }

    pub fn opt_timestamp(&mut self, field: &str, value: Option<&DateTime<FixedOffset>>) -> &mut Self {
        if let Some(ts) = value {
            self.str(field, &format_timestamp(ts));
        }
        self
    }

    pub fn opt_duration(&mut self, field: &str, value: Option<&IsoDuration>) -> &mut Self {
        if let Some(d) = value {
            self.str(field, &format_duration(d));
        }
        self
    }

    /// Writes an arbitrary value as-is.
    pub fn value(&mut self, field: &str, value: JsonValue) -> &mut Self {
        self.map.insert(field.to_string(), value);
        self
    }

    /// Writes a nested object unless it came out empty.
    pub fn object(&mut self, field: &str, value: JsonValue) -> &mut Self {
        let empty = matches!(&value, JsonValue::Object(m) if m.is_empty());
        if !empty {
            self.value(field, value);
        }
        self
    }

    /// Writes an array unless it is empty.
    pub fn array(&mut self, field: &str, items: Vec<JsonValue>) -> &mut Self {
        if !items.is_empty() {
            self.value(field, JsonValue::Array(items));
        }
        self
    }

    pub fn language_map(&mut self, field: &str, map: &LanguageMap) -> &mut Self {
        if !map.is_empty() {
            let entries = map
                .iter()
                .map(|(tag, text)| (tag.to_string(), JsonValue::String(text.to_string())))
                .collect();
            self.value(field, JsonValue::Object(entries));
        }
        self
    }

    pub fn extensions(&mut self, field: &str, extensions: &Extensions) -> &mut Self {
        if !extensions.is_empty() {
            let entries = extensions
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            self.value(field, JsonValue::Object(entries));
        }
        self
    }

    pub fn finish(&mut self) -> JsonValue {
        JsonValue::Object(std::mem::take(&mut self.map))
    }
}

/// Integral values are written as integers so `50` stays `50`, not `50.0`.
fn number_from_f64(value: f64) -> Option<Number> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}
