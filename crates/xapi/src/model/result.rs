//! Outcome of a statement: score, success, completion and duration.

use crate::error::ValidationError;
use crate::model::value::Extensions;
use crate::util::IsoDuration;

/// A score. `scaled` lies in `[-1, 1]`; `raw` lies within whichever of
/// `min`/`max` are present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    scaled: Option<f64>,
    raw: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Score {
    pub fn new(
        scaled: Option<f64>,
        raw: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [("scaled", scaled), ("raw", raw), ("min", min), ("max", max)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ValidationError::NotANumber { field });
            }
        }
        if let Some(scaled) = scaled {
            if !(-1.0..=1.0).contains(&scaled) {
                return Err(ValidationError::OutOfRange {
                    field: "scaled",
                    value: scaled,
                    min: -1.0,
                    max: 1.0,
                });
            }
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ValidationError::ScoreBoundsInverted { min, max });
            }
        }
        if let Some(raw) = raw {
            let below = min.is_some_and(|min| raw < min);
            let above = max.is_some_and(|max| raw > max);
            if below || above {
                return Err(ValidationError::OutOfRange {
                    field: "raw",
                    value: raw,
                    min: min.unwrap_or(f64::NEG_INFINITY),
                    max: max.unwrap_or(f64::INFINITY),
                });
            }
        }
        Ok(Self { scaled, raw, min, max })
    }

    /// A score with only the scaled component.
    pub fn scaled(scaled: f64) -> Result<Self, ValidationError> {
        Self::new(Some(scaled), None, None, None)
    }

    pub fn scaled_value(&self) -> Option<f64> {
        self.scaled
    }

    pub fn raw(&self) -> Option<f64> {
        self.raw
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.scaled.is_none() && self.raw.is_none() && self.min.is_none() && self.max.is_none()
    }
}

/// The xAPI `result` object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityResult {
    pub score: Option<Score>,
    pub success: Option<bool>,
    pub completion: Option<bool>,
    pub response: Option<String>,
    pub duration: Option<IsoDuration>,
    pub extensions: Extensions,
}

impl ActivityResult {
    pub fn is_empty(&self) -> bool {
        self.score.is_none_or(|s| s.is_empty())
            && self.success.is_none()
            && self.completion.is_none()
            && self.response.is_none()
            && self.duration.is_none()
            && self.extensions.is_empty()
    }
}
