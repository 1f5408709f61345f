// libs/availability-cell/src/models.rs
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{SchedulingError, TimeOfDay};

/// Map a calendar date to the 0-6 weekday index used by availability
/// rules (0 = Sunday, 6 = Saturday).
pub fn weekday_index(date: NaiveDate) -> u8 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// A doctor's recurring availability for one weekday.
///
/// The weekly schedule is replaced wholesale whenever the doctor edits it;
/// individual rules carry no history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub doctor_id: Uuid,
    /// 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    pub is_available: bool,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub slot_duration_minutes: u16,
}

impl AvailabilityRule {
    /// A closed-for-the-day rule. Start and end collapse to midnight;
    /// slot generation never reads them when `is_available` is false.
    pub fn closed(doctor_id: Uuid, day_of_week: u8) -> Self {
        let midnight = TimeOfDay::midnight();
        Self {
            doctor_id,
            day_of_week,
            is_available: false,
            start_time: midnight,
            end_time: midnight,
            slot_duration_minutes: 30,
        }
    }

    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.day_of_week > 6 {
            return Err(SchedulingError::InvalidRange(format!(
                "Day of week must be between 0 (Sunday) and 6 (Saturday), got {}",
                self.day_of_week
            )));
        }
        if !self.is_available {
            return Ok(());
        }
        if self.start_time >= self.end_time {
            return Err(SchedulingError::InvalidRange(format!(
                "Start time {} must be before end time {}",
                self.start_time, self.end_time
            )));
        }
        if self.slot_duration_minutes == 0 {
            return Err(SchedulingError::InvalidRange(
                "Slot duration must be a positive number of minutes".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether this rule covers the given calendar date's weekday.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.day_of_week == weekday_index(date)
    }
}

/// The full 7-rule set for a doctor, one rule per weekday, as supplied
/// by the doctor directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub doctor_id: Uuid,
    rules: Vec<AvailabilityRule>,
}

impl WeeklySchedule {
    pub fn new(doctor_id: Uuid, rules: Vec<AvailabilityRule>) -> Result<Self, SchedulingError> {
        let schedule = Self { doctor_id, rules };
        schedule.validate()?;
        Ok(schedule)
    }

    /// A schedule with every weekday closed, for doctors who have not
    /// published availability yet.
    pub fn closed_all_week(doctor_id: Uuid) -> Self {
        Self {
            doctor_id,
            rules: (0..7).map(|day| AvailabilityRule::closed(doctor_id, day)).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.rules.len() != 7 {
            return Err(SchedulingError::InvalidRange(format!(
                "Weekly schedule must carry exactly 7 rules, got {}",
                self.rules.len()
            )));
        }
        let mut seen = [false; 7];
        for rule in &self.rules {
            rule.validate()?;
            if rule.doctor_id != self.doctor_id {
                return Err(SchedulingError::InvalidRange(
                    "All rules in a schedule must belong to the same doctor".to_string(),
                ));
            }
            let day = rule.day_of_week as usize;
            if seen[day] {
                return Err(SchedulingError::InvalidRange(format!(
                    "Duplicate rule for weekday {}",
                    rule.day_of_week
                )));
            }
            seen[day] = true;
        }
        Ok(())
    }

    /// The rule covering the given date's weekday, if any.
    pub fn rule_for(&self, date: NaiveDate) -> Option<&AvailabilityRule> {
        self.rules.iter().find(|rule| rule.applies_to(date))
    }

    pub fn rules(&self) -> &[AvailabilityRule] {
        &self.rules
    }
}

/// A candidate bookable interval. Ephemeral: computed on demand from a
/// rule and a date, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSlot {
    pub fn duration_minutes(&self) -> u16 {
        self.start.minutes_until(self.end)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
