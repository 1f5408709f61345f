use std::fmt;

use chrono::NaiveTime;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchedulingError;

/// Minutes in a calendar day; a `TimeOfDay` is always strictly below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Canonical time-of-day representation: minutes since midnight.
///
/// Callers hand the core two external formats for the same concept —
/// 24-hour `"HH:MM"` strings and free-form `"9am"` / `"5:30pm"` strings.
/// Both are normalized to this integer form at the boundary; all interval
/// math happens on the integer, never on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Start of day.
    pub const fn midnight() -> Self {
        Self(0)
    }

    /// Build from raw minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, SchedulingError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(SchedulingError::InvalidRange(format!(
                "{} minutes is not a valid time of day",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    /// Build from an hour/minute pair.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, SchedulingError> {
        if hour > 23 || minute > 59 {
            return Err(SchedulingError::InvalidRange(format!(
                "{:02}:{:02} is not a valid time of day",
                hour, minute
            )));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Parse a 24-hour `"HH:MM"` string.
    pub fn parse_hhmm(input: &str) -> Result<Self, SchedulingError> {
        let (hour, minute) = input
            .split_once(':')
            .ok_or_else(|| malformed(input))?;
        let hour: u16 = hour.trim().parse().map_err(|_| malformed(input))?;
        let minute: u16 = minute.trim().parse().map_err(|_| malformed(input))?;
        Self::from_hm(hour, minute)
    }

    /// Parse a free-form 12-hour string: `"9am"`, `"5:30pm"`, `"12:15 PM"`.
    pub fn parse_ampm(input: &str) -> Result<Self, SchedulingError> {
        let lowered = input.trim().to_ascii_lowercase();
        let (body, is_pm) = if let Some(rest) = lowered.strip_suffix("pm") {
            (rest.trim_end(), true)
        } else if let Some(rest) = lowered.strip_suffix("am") {
            (rest.trim_end(), false)
        } else {
            return Err(malformed(input));
        };

        let (hour, minute) = match body.split_once(':') {
            Some((h, m)) => (
                h.trim().parse::<u16>().map_err(|_| malformed(input))?,
                m.trim().parse::<u16>().map_err(|_| malformed(input))?,
            ),
            None => (body.trim().parse::<u16>().map_err(|_| malformed(input))?, 0),
        };

        if hour < 1 || hour > 12 {
            return Err(malformed(input));
        }

        // 12am is midnight, 12pm is noon.
        let hour24 = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Self::from_hm(hour24, minute)
    }

    /// Parse either external format, trying `"HH:MM"` first.
    pub fn parse(input: &str) -> Result<Self, SchedulingError> {
        Self::parse_hhmm(input).or_else(|_| Self::parse_ampm(input))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Advance by `minutes`, or `None` if the result would roll past
    /// midnight. Slot generation is scoped to a single calendar day, so
    /// rollover is never silently wrapped.
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        let total = self.0.checked_add(minutes)?;
        if total >= MINUTES_PER_DAY {
            return None;
        }
        Some(Self(total))
    }

    /// Whole minutes from `self` to a later time on the same day.
    pub fn minutes_until(self, later: TimeOfDay) -> u16 {
        later.0.saturating_sub(self.0)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Invariant 0 <= self.0 < MINUTES_PER_DAY makes this infallible.
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(de::Error::custom)
    }
}

fn malformed(input: &str) -> SchedulingError {
    SchedulingError::InvalidRange(format!("Malformed time string: {:?}", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_24_hour_strings() {
        assert_eq!(TimeOfDay::parse_hhmm("09:00").unwrap().minutes(), 540);
        assert_eq!(TimeOfDay::parse_hhmm("00:00").unwrap().minutes(), 0);
        assert_eq!(TimeOfDay::parse_hhmm("23:59").unwrap().minutes(), 1439);
    }

    #[test]
    fn rejects_malformed_24_hour_strings() {
        for bad in ["24:00", "12:60", "nine", "12", "12:", ":30"] {
            assert_matches!(
                TimeOfDay::parse_hhmm(bad),
                Err(SchedulingError::InvalidRange(_)),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn parses_12_hour_strings() {
        assert_eq!(TimeOfDay::parse_ampm("9am").unwrap().to_string(), "09:00");
        assert_eq!(TimeOfDay::parse_ampm("5:30pm").unwrap().to_string(), "17:30");
        assert_eq!(TimeOfDay::parse_ampm("12:15 PM").unwrap().to_string(), "12:15");
        assert_eq!(TimeOfDay::parse_ampm("12am").unwrap().to_string(), "00:00");
        assert_eq!(TimeOfDay::parse_ampm("12pm").unwrap().to_string(), "12:00");
    }

    #[test]
    fn rejects_malformed_12_hour_strings() {
        for bad in ["13pm", "0am", "9", "9xm", "5:75pm"] {
            assert_matches!(
                TimeOfDay::parse_ampm(bad),
                Err(SchedulingError::InvalidRange(_)),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn parse_accepts_both_formats() {
        assert_eq!(
            TimeOfDay::parse("17:30").unwrap(),
            TimeOfDay::parse("5:30pm").unwrap()
        );
    }

    #[test]
    fn checked_add_stops_at_midnight() {
        let late = TimeOfDay::parse_hhmm("23:45").unwrap();
        assert_eq!(late.checked_add_minutes(15), None);
        assert_eq!(late.checked_add_minutes(30), None);
        assert_eq!(
            late.checked_add_minutes(14).unwrap().to_string(),
            "23:59"
        );
    }

    #[test]
    fn serde_round_trips_as_hhmm_string() {
        let t = TimeOfDay::from_hm(9, 30).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"09:30\"");
        let back: TimeOfDay = serde_json::from_str("\"9:30am\"").unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn ordering_follows_the_clock() {
        let nine = TimeOfDay::from_hm(9, 0).unwrap();
        let ten = TimeOfDay::from_hm(10, 0).unwrap();
        assert!(nine < ten);
        assert_eq!(nine.minutes_until(ten), 60);
    }
}
