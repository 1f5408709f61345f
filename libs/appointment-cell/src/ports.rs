// libs/appointment-cell/src/ports.rs
//
// Collaborator interfaces the scheduling core is invoked with. The core
// owns none of these resources: rules and bookings are read-only inputs,
// the store enforces the write-time uniqueness guarantee, and event
// delivery belongs entirely to the sink.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use availability_cell::WeeklySchedule;
use shared_models::SchedulingError;

use crate::models::{Appointment, LifecycleEvent};

/// Read-only source of doctors' weekly availability rules.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// The doctor's current 7-rule schedule, or `NotFound` if the doctor
    /// does not exist.
    async fn weekly_schedule(&self, doctor_id: Uuid) -> Result<WeeklySchedule, SchedulingError>;
}

/// Persistence for appointments.
///
/// `insert` must itself guarantee at most one successful booking per
/// overlapping (doctor, date, interval) under concurrency — either a
/// database uniqueness/exclusion constraint or a check-then-insert
/// serialized per doctor. The application-level conflict check alone is
/// a TOCTOU race, not a substitute.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All non-cancelled appointments for the doctor on the given day.
    async fn find_non_cancelled(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    /// Insert a new appointment, re-verifying the overlap guarantee at
    /// write time. Returns `Conflict` if the interval is already taken.
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, SchedulingError>;
}

/// Receiver of lifecycle events. Delivery failures are the sink's
/// problem; the core logs and moves on.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: LifecycleEvent) -> Result<(), SchedulingError>;
}

/// Injectable source of "today", so past-date validation is testable
/// without wall-clock dependence.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock backed clock for production callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
