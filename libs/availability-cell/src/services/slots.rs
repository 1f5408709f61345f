// libs/availability-cell/src/services/slots.rs
use chrono::NaiveDate;
use tracing::debug;

use crate::models::{AvailabilityRule, TimeSlot};

/// Generate the ordered candidate slots a doctor could be booked into on
/// `date`, from the rule covering that date's weekday.
///
/// Stateless: recomputed on every call. The cursor starts at the rule's
/// start time and advances by `slot_duration_minutes`; a trailing slot
/// whose end would pass the rule's end time is dropped, not clipped.
/// Generation is scoped to one calendar day, so a window that would roll
/// past midnight simply stops at the last full slot before it.
pub fn generate_slots(rule: &AvailabilityRule, date: NaiveDate) -> Vec<TimeSlot> {
    if !rule.is_available || !rule.applies_to(date) {
        return Vec::new();
    }
    // Invalid rules come back from validate(); a zero duration must not
    // spin the cursor in place.
    if rule.slot_duration_minutes == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = rule.start_time;
    while let Some(end) = cursor.checked_add_minutes(rule.slot_duration_minutes) {
        if end > rule.end_time {
            break;
        }
        slots.push(TimeSlot { start: cursor, end });
        cursor = end;
    }

    debug!(
        "Generated {} candidate slots for doctor {} on {}",
        slots.len(),
        rule.doctor_id,
        date
    );
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::TimeOfDay;
    use uuid::Uuid;

    fn monday() -> NaiveDate {
        // 2025-06-16 is a Monday.
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    fn monday_rule(start: &str, end: &str, duration: u16) -> AvailabilityRule {
        AvailabilityRule {
            doctor_id: Uuid::nil(),
            day_of_week: 1,
            is_available: true,
            start_time: TimeOfDay::parse_hhmm(start).unwrap(),
            end_time: TimeOfDay::parse_hhmm(end).unwrap(),
            slot_duration_minutes: duration,
        }
    }

    #[test]
    fn one_hour_window_with_half_hour_slots() {
        let slots = generate_slots(&monday_rule("09:00", "10:00", 30), monday());
        let rendered: Vec<String> = slots.iter().map(TimeSlot::to_string).collect();
        assert_eq!(rendered, vec!["09:00 - 09:30", "09:30 - 10:00"]);
    }

    #[test]
    fn trailing_partial_slot_is_dropped() {
        // Second slot would end at 10:20, past the 10:00 close.
        let slots = generate_slots(&monday_rule("09:00", "10:00", 40), monday());
        let rendered: Vec<String> = slots.iter().map(TimeSlot::to_string).collect();
        assert_eq!(rendered, vec!["09:00 - 09:40"]);
    }

    #[test]
    fn duration_matching_the_window_yields_one_slot() {
        let slots = generate_slots(&monday_rule("09:00", "10:00", 60), monday());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].to_string(), "09:00 - 10:00");
    }

    #[test]
    fn duration_exceeding_the_window_yields_nothing() {
        let slots = generate_slots(&monday_rule("09:00", "10:00", 61), monday());
        assert!(slots.is_empty());
    }

    #[test]
    fn unavailable_rule_yields_nothing() {
        let mut rule = monday_rule("09:00", "17:00", 30);
        rule.is_available = false;
        assert!(generate_slots(&rule, monday()).is_empty());
    }

    #[test]
    fn weekday_mismatch_yields_nothing() {
        let tuesday = monday().succ_opt().unwrap();
        assert!(generate_slots(&monday_rule("09:00", "17:00", 30), tuesday).is_empty());
    }

    #[test]
    fn slots_are_ordered_gapless_and_inside_the_window() {
        let rule = monday_rule("08:15", "12:00", 25);
        let slots = generate_slots(&rule, monday());
        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.start >= rule.start_time);
            assert!(slot.end <= rule.end_time);
            assert_eq!(slot.duration_minutes(), 25);
        }
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn late_window_never_rolls_into_the_next_day() {
        let slots = generate_slots(&monday_rule("23:00", "23:59", 30), monday());
        let rendered: Vec<String> = slots.iter().map(TimeSlot::to_string).collect();
        assert_eq!(rendered, vec!["23:00 - 23:30"]);
    }
}
