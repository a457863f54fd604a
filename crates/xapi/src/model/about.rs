//! xAPI protocol versions and the LRS `about` resource.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::value::Extensions;

/// A protocol version sent in `X-Experience-API-Version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    #[default]
    V1_0_3,
    V1_0_2,
    V1_0_1,
    V1_0_0,
}

impl Version {
    /// Supported versions, most recent first.
    pub const SUPPORTED: [Version; 4] = [Version::V1_0_3, Version::V1_0_2, Version::V1_0_1, Version::V1_0_0];

    pub const LATEST: Version = Version::V1_0_3;

    pub fn as_str(self) -> &'static str {
        match self {
            Version::V1_0_3 => "1.0.3",
            Version::V1_0_2 => "1.0.2",
            Version::V1_0_1 => "1.0.1",
            Version::V1_0_0 => "1.0.0",
        }
    }
}

impl FromStr for Version {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::SUPPORTED
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedVersion { value: s.to_string() })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// What an LRS reports about itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct About {
    /// Version strings as reported; may include versions this crate does
    /// not know.
    pub version: Vec<String>,
    pub extensions: Extensions,
}

impl About {
    pub fn supports(&self, version: Version) -> bool {
        self.version.iter().any(|v| v == version.as_str())
    }

    /// The most recent version both sides support.
    pub fn best_version(&self) -> Option<Version> {
        Version::SUPPORTED.into_iter().find(|v| self.supports(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_order_and_default() {
        assert_eq!(Version::default(), Version::LATEST);
        assert_eq!(Version::SUPPORTED[0].as_str(), "1.0.3");
        assert_eq!("1.0.1".parse::<Version>().unwrap(), Version::V1_0_1);
        assert!(matches!(
            "2.0.0".parse::<Version>(),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_best_version() {
        let about = About {
            version: vec!["0.95".to_string(), "1.0.1".to_string(), "1.0.0".to_string()],
            extensions: Extensions::new(),
        };
        assert!(about.supports(Version::V1_0_0));
        assert!(!about.supports(Version::V1_0_3));
        assert_eq!(about.best_version(), Some(Version::V1_0_1));
    }
}
