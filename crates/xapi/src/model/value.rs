//! Validated scalar wrappers and the two xAPI map types.
//!
//! - [`Iri`]: any absolute URI/IRI (verb ids, activity ids, extension keys)
//! - [`LanguageTag`]: an RFC 5646 language tag
//! - [`LanguageMap`]: language tag to display string
//! - [`Extensions`]: IRI to arbitrary JSON value

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::error::ValidationError;

lazy_static! {
    // RFC 5646 well-formedness, simplified: primary subtag followed by
    // alphanumeric subtags of at most 8 characters.
    static ref LANGUAGE_TAG: Regex =
        Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").expect("static regex");
}

/// An absolute IRI.
///
/// The original text is kept verbatim so that values survive a decode/encode
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(pub(crate) String);

impl Iri {
    /// Validates and wraps an IRI. Relative references are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match url::Url::parse(&value) {
            Ok(_) => Ok(Iri(value)),
            Err(_) => Err(ValidationError::InvalidIri { value }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Iri {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iri::new(s)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An RFC 5646 language tag such as `en-US` or `zh-Hant-TW`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageTag(pub(crate) String);

impl LanguageTag {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if LANGUAGE_TAG.is_match(&value) {
            Ok(LanguageTag(value))
        } else {
            Err(ValidationError::InvalidLanguageTag { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageTag::new(s)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps language tags to display strings.
///
/// Values are always plain strings; a nested map is rejected at decode time
/// rather than flattened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageMap {
    entries: BTreeMap<LanguageTag, String>,
}

impl LanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map with a single entry.
    pub fn single(tag: &str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let mut map = Self::new();
        map.insert(tag, value)?;
        Ok(map)
    }

    /// Builds a map from `(tag, value)` pairs, validating every tag.
    pub fn try_from_pairs<'a, I, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (tag, value) in pairs {
            map.insert(tag, value)?;
        }
        Ok(map)
    }

    /// Inserts a display string, returning the previous one for the tag.
    pub fn insert(&mut self, tag: &str, value: impl Into<String>) -> Result<Option<String>, ValidationError> {
        let tag = LanguageTag::new(tag)?;
        Ok(self.entries.insert(tag, value.into()))
    }

    /// Inserts a display string under an already validated tag.
    pub fn insert_tag(&mut self, tag: LanguageTag, value: impl Into<String>) -> Option<String> {
        self.entries.insert(tag, value.into())
    }

    /// Inserts an untyped JSON value, rejecting anything that is not a string.
    pub fn insert_json(&mut self, tag: &str, value: &JsonValue) -> Result<Option<String>, ValidationError> {
        match value {
            JsonValue::String(s) => self.insert(tag, s.clone()),
            _ => Err(ValidationError::NonStringLanguageValue { tag: tag.to_string() }),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        let key = self.entries.keys().find(|k| k.as_str() == tag)?.clone();
        self.entries.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LanguageTag, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// IRI-keyed map of arbitrary JSON values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extensions {
    entries: BTreeMap<Iri, JsonValue>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value under an IRI key, returning the previous value.
    ///
    /// Keys that are not absolute IRIs are rejected.
    pub fn insert(&mut self, key: &str, value: impl Into<JsonValue>) -> Result<Option<JsonValue>, ValidationError> {
        let key = Iri::new(key)?;
        Ok(self.entries.insert(key, value.into()))
    }

    /// Inserts under an already validated key.
    pub fn insert_iri(&mut self, key: Iri, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.entries.insert(key, value.into())
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        let key = self.entries.keys().find(|k| k.as_str() == key)?.clone();
        self.entries.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &JsonValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_iri_validation() {
        assert!(Iri::new("http://adlnet.gov/expapi/verbs/attempted").is_ok());
        assert!(Iri::new("mailto:someone@example.com").is_ok());
        assert!(Iri::new("urn:uuid:e05aa883-acaf-40ad-bf54-02c8ce485fb0").is_ok());

        assert!(matches!(Iri::new("foo"), Err(ValidationError::InvalidIri { .. })));
        assert!(Iri::new("").is_err());
        assert!(Iri::new("/relative/path").is_err());
    }

    #[test]
    fn test_iri_keeps_original_text() {
        let iri = Iri::new("HTTP://Example.com/Path").unwrap();
        assert_eq!(iri.as_str(), "HTTP://Example.com/Path");
    }

    #[test]
    fn test_language_tags() {
        for tag in ["en", "en-US", "zh-Hant-TW", "und", "es-419"] {
            assert!(LanguageTag::new(tag).is_ok(), "{tag} should be valid");
        }
        for tag in ["", "en_US", "-en", "en-", "toolongprimary", "en--US"] {
            assert!(LanguageTag::new(tag).is_err(), "{tag} should be invalid");
        }
    }

    #[test]
    fn test_language_map_rejects_nested_values() {
        let mut map = LanguageMap::new();
        let err = map.insert_json("en-US", &json!({"nested": "map"})).unwrap_err();
        assert_eq!(err, ValidationError::NonStringLanguageValue { tag: "en-US".to_string() });
        assert!(map.insert_json("en-US", &json!(42)).is_err());
        assert!(map.is_empty());

        map.insert_json("en-US", &json!("attempted")).unwrap();
        assert_eq!(map.get("en-US"), Some("attempted"));
    }

    #[test]
    fn test_language_map_replace_and_remove() {
        let mut map = LanguageMap::try_from_pairs([("en-US", "attempted"), ("fr", "essayé")]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.insert("en-US", "tried").unwrap(), Some("attempted".to_string()));
        assert_eq!(map.remove("fr"), Some("essayé".to_string()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_extensions_key_validation() {
        let mut ext = Extensions::new();
        ext.insert("http://example.com/ext/color", json!({"r": 1})).unwrap();
        assert_eq!(ext.get("http://example.com/ext/color"), Some(&json!({"r": 1})));

        assert!(matches!(
            ext.insert("not a uri", 1),
            Err(ValidationError::InvalidIri { .. })
        ));
        assert_eq!(ext.len(), 1);
    }
}
