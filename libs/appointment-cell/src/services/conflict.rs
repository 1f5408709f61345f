// libs/appointment-cell/src/services/conflict.rs
use chrono::NaiveDate;
use tracing::{debug, warn};

use availability_cell::TimeSlot;
use shared_models::{SchedulingError, TimeOfDay};

use crate::models::Appointment;

/// Half-open interval overlap: `[a_start, a_end)` intersects
/// `[b_start, b_end)`. Touching endpoints do not conflict.
pub fn overlaps(
    a_start: TimeOfDay,
    a_end: TimeOfDay,
    b_start: TimeOfDay,
    b_end: TimeOfDay,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Filter candidate slots down to those free of any blocking booking on
/// `date`, preserving order. Pure: same inputs, same output.
///
/// Bookings dated other than `date` are a caller error; the policy here
/// is to ignore them (with a warning) rather than let a cross-day
/// interval silently shadow a slot.
pub fn filter_available(
    slots: Vec<TimeSlot>,
    bookings: &[Appointment],
    date: NaiveDate,
) -> Vec<TimeSlot> {
    let blocking: Vec<&Appointment> = bookings
        .iter()
        .filter(|booking| {
            if booking.date != date {
                warn!(
                    "Ignoring booking {} dated {} while filtering slots for {}",
                    booking.id, booking.date, date
                );
                return false;
            }
            booking.blocks_slot()
        })
        .collect();

    let filtered: Vec<TimeSlot> = slots
        .into_iter()
        .filter(|slot| {
            !blocking
                .iter()
                .any(|b| overlaps(slot.start, slot.end, b.start_time, b.end_time))
        })
        .collect();

    debug!("{} slots remain after conflict filtering", filtered.len());
    filtered
}

/// Validate a proposed booking interval against the doctor's existing
/// bookings for that day.
///
/// Used at booking-creation time, not just listing time. The store must
/// still re-verify under its own write-time guarantee; this check alone
/// does not close the list-then-book race.
pub fn validate_booking(
    date: NaiveDate,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    existing: &[Appointment],
    today: NaiveDate,
) -> Result<(), SchedulingError> {
    if start_time >= end_time {
        return Err(SchedulingError::InvalidRange(format!(
            "Start time {} must be before end time {}",
            start_time, end_time
        )));
    }

    // Date-only comparison; time-of-day plays no part.
    if date < today {
        return Err(SchedulingError::PastDate(date));
    }

    let conflict = existing.iter().any(|booking| {
        booking.date == date
            && booking.blocks_slot()
            && overlaps(start_time, end_time, booking.start_time, booking.end_time)
    });
    if conflict {
        debug!("Proposed interval {} - {} on {} conflicts", start_time, end_time, date);
        return Err(SchedulingError::Conflict);
    }

    Ok(())
}
