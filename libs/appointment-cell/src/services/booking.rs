// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use availability_cell::{generate_slots, TimeSlot};
use shared_models::SchedulingError;

use crate::models::{Appointment, AppointmentStatus, BookAppointmentRequest, LifecycleEvent};
use crate::ports::{AppointmentStore, Clock, DoctorDirectory, NotificationSink};
use crate::services::conflict::{filter_available, validate_booking};

/// Request-scoped booking operations: list a doctor's open slots and
/// create appointments against them.
///
/// Each call is an independent unit of work; no cross-request state is
/// held here. Listing and booking are not atomic with each other —
/// the store's `insert` carries the write-time guarantee that at most
/// one booking wins an interval.
pub struct BookingService {
    directory: Arc<dyn DoctorDirectory>,
    store: Arc<dyn AppointmentStore>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        directory: Arc<dyn DoctorDirectory>,
        store: Arc<dyn AppointmentStore>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { directory, store, sink, clock }
    }

    /// The slots still open for booking with `doctor_id` on `date`:
    /// candidates from the weekday's availability rule, minus any that
    /// intersect an existing non-cancelled appointment.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        debug!("Listing available slots for doctor {} on {}", doctor_id, date);

        let schedule = self.directory.weekly_schedule(doctor_id).await?;
        let Some(rule) = schedule.rule_for(date) else {
            return Ok(Vec::new());
        };

        let candidates = generate_slots(rule, date);
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let bookings = self.store.find_non_cancelled(doctor_id, date).await?;
        Ok(filter_available(candidates, &bookings, date))
    }

    /// Book an appointment.
    ///
    /// Validates the interval and date against the store's current view,
    /// then hands the insert to the store, which re-verifies overlap
    /// under its own concurrency guarantee. A validation pass here is
    /// therefore advisory; the insert is what decides a race.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!(
            "Booking requested for doctor {} on {} {} - {}",
            request.doctor_id, request.date, request.start_time, request.end_time
        );

        let existing = self
            .store
            .find_non_cancelled(request.doctor_id, request.date)
            .await?;
        validate_booking(
            request.date,
            request.start_time,
            request.end_time,
            &existing,
            self.clock.today(),
        )?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            department_id: request.department_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            reason: request.reason,
            status: AppointmentStatus::Scheduled,
            notes: request.notes,
            doctor_notes: None,
            created_by: request.created_by,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(appointment).await?;
        info!(
            "Appointment {} booked for doctor {} on {} {} - {}",
            stored.id, stored.doctor_id, stored.date, stored.start_time, stored.end_time
        );

        // Fire-and-forget: a failed notification never rolls back the
        // appointment.
        if let Err(e) = self.sink.publish(LifecycleEvent::created(stored.clone())).await {
            warn!("Failed to publish booking-created event: {}", e);
        }

        Ok(stored)
    }
}
