//! ISO 8601 duration parsing and formatting.
//!
//! xAPI result durations use the `PnYnMnWnDTnHnMnS` form. Components are
//! kept exactly as written so that a canonical duration survives
//! `format(parse(text)) == text`. Canonical formatting:
//! - zero components are omitted
//! - a fractional part is allowed on seconds only, with trailing zeros trimmed
//! - the empty duration is written `PT0S`

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::error::ValidationError;

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

/// A non-negative ISO 8601 duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u64,
    /// Sub-second part, always below one second.
    pub nanos: u32,
}

impl IsoDuration {
    /// A duration of whole seconds, e.g. `PT1234S`.
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// Splits a std duration into hours, minutes and seconds.
    pub fn from_std(duration: StdDuration) -> Self {
        let total = duration.as_secs();
        let hours = total / SECONDS_PER_HOUR;
        Self {
            hours: u32::try_from(hours).unwrap_or(u32::MAX),
            minutes: ((total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u32,
            seconds: total % SECONDS_PER_MINUTE,
            nanos: duration.subsec_nanos(),
            ..Self::default()
        }
    }

    /// Converts to an exact std duration.
    ///
    /// Returns `None` when years or months are present, since their length
    /// depends on the calendar.
    pub fn to_std(&self) -> Option<StdDuration> {
        if self.years != 0 || self.months != 0 {
            return None;
        }
        let secs = u64::from(self.weeks)
            .checked_mul(SECONDS_PER_WEEK)?
            .checked_add(u64::from(self.days).checked_mul(SECONDS_PER_DAY)?)?
            .checked_add(u64::from(self.hours) * SECONDS_PER_HOUR)?
            .checked_add(u64::from(self.minutes) * SECONDS_PER_MINUTE)?
            .checked_add(self.seconds)?;
        Some(StdDuration::new(secs, self.nanos))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    fn has_date_part(&self) -> bool {
        self.years != 0 || self.months != 0 || self.weeks != 0 || self.days != 0
    }

    fn has_time_part(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.nanos != 0
    }
}

/// Parses an ISO 8601 duration such as `P1Y2M3DT4H5M6.5S` or `PT1234S`.
pub fn parse_duration(text: &str) -> Result<IsoDuration, ValidationError> {
    let invalid = || ValidationError::InvalidDuration {
        value: text.to_string(),
    };

    let body = text.strip_prefix('P').ok_or_else(invalid)?;
    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => {
            if time.is_empty() {
                return Err(invalid());
            }
            (date, Some(time))
        }
        None => (body, None),
    };
    if date_part.is_empty() && time_part.is_none() {
        return Err(invalid());
    }

    let mut duration = IsoDuration::default();

    // Designators must appear in this order, each at most once.
    let mut date_slot = 0usize;
    for (number, designator) in components(date_part).map_err(|_| invalid())? {
        if number.contains(['.', ',']) {
            return Err(invalid());
        }
        let value: u32 = number.parse().map_err(|_| invalid())?;
        let slot = match designator {
            'Y' => 1,
            'M' => 2,
            'W' => 3,
            'D' => 4,
            _ => return Err(invalid()),
        };
        if slot <= date_slot {
            return Err(invalid());
        }
        date_slot = slot;
        match designator {
            'Y' => duration.years = value,
            'M' => duration.months = value,
            'W' => duration.weeks = value,
            _ => duration.days = value,
        }
    }

    if let Some(time_part) = time_part {
        let mut time_slot = 0usize;
        for (number, designator) in components(time_part).map_err(|_| invalid())? {
            let slot = match designator {
                'H' => 1,
                'M' => 2,
                'S' => 3,
                _ => return Err(invalid()),
            };
            if slot <= time_slot {
                return Err(invalid());
            }
            time_slot = slot;
            match designator {
                'H' => duration.hours = parse_whole(number).ok_or_else(invalid)?,
                'M' => duration.minutes = parse_whole(number).ok_or_else(invalid)?,
                _ => {
                    let (seconds, nanos) = parse_seconds(number).ok_or_else(invalid)?;
                    duration.seconds = seconds;
                    duration.nanos = nanos;
                }
            }
        }
    }

    Ok(duration)
}

/// Formats a duration in canonical form.
pub fn format_duration(duration: &IsoDuration) -> String {
    if duration.is_zero() {
        return "PT0S".to_string();
    }

    let mut out = String::from("P");
    if duration.has_date_part() {
        push_component(&mut out, u64::from(duration.years), 'Y');
        push_component(&mut out, u64::from(duration.months), 'M');
        push_component(&mut out, u64::from(duration.weeks), 'W');
        push_component(&mut out, u64::from(duration.days), 'D');
    }
    if duration.has_time_part() {
        out.push('T');
        push_component(&mut out, u64::from(duration.hours), 'H');
        push_component(&mut out, u64::from(duration.minutes), 'M');
        if duration.seconds != 0 || duration.nanos != 0 {
            out.push_str(&duration.seconds.to_string());
            out.push_str(&format_fractional_seconds(duration.nanos));
            out.push('S');
        }
    }
    out
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self))
    }
}

impl FromStr for IsoDuration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

fn push_component(out: &mut String, value: u64, designator: char) {
    if value != 0 {
        out.push_str(&value.to_string());
        out.push(designator);
    }
}

/// Splits `1Y2M` into `[("1", 'Y'), ("2", 'M')]`.
fn components(part: &str) -> Result<Vec<(&str, char)>, ()> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in part.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            continue;
        }
        let number = &part[start..i];
        if number.is_empty() {
            return Err(());
        }
        out.push((number, c));
        start = i + c.len_utf8();
    }
    if start != part.len() {
        // Trailing digits without a designator
        return Err(());
    }
    Ok(out)
}

fn parse_whole(number: &str) -> Option<u32> {
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Parses `12`, `12.5` or `12,5` into whole seconds and nanoseconds.
fn parse_seconds(number: &str) -> Option<(u64, u32)> {
    let (whole, frac) = match number.find(['.', ',']) {
        Some(pos) => (&number[..pos], Some(&number[pos + 1..])),
        None => (number, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds: u64 = whole.parse().ok()?;
    let nanos = match frac {
        None => 0,
        Some(frac) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // Pad or truncate to 9 digits (nanoseconds)
            let mut padded = frac.to_string();
            while padded.len() < 9 {
                padded.push('0');
            }
            padded.truncate(9);
            padded.parse().ok()?
        }
    };
    debug_assert!(nanos < NANOS_PER_SECOND);
    Some((seconds, nanos))
}

/// Formats nanoseconds as a fraction, omitting it entirely when zero.
fn format_fractional_seconds(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }
    let digits = format!("{:09}", nanos);
    format!(".{}", digits.trim_end_matches('0'))
}
