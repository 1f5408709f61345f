// libs/appointment-cell/src/store.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use shared_models::SchedulingError;

use crate::models::Appointment;
use crate::ports::AppointmentStore;
use crate::services::conflict::overlaps;

/// In-memory `AppointmentStore` with the write-time overlap guarantee.
///
/// `insert` re-runs the overlap check while holding the store lock, so
/// concurrent bookings of the same interval serialize and exactly one
/// wins. A production store backs the same contract with a database
/// exclusion constraint instead of a process-local lock.
#[derive(Default)]
pub struct MemoryAppointmentStore {
    by_doctor: Mutex<HashMap<Uuid, Vec<Appointment>>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace an appointment that was updated through the lifecycle
    /// service. No-op if the id is unknown.
    pub async fn persist(&self, appointment: Appointment) {
        let mut by_doctor = self.by_doctor.lock().await;
        let bookings = by_doctor.entry(appointment.doctor_id).or_default();
        if let Some(existing) = bookings.iter_mut().find(|b| b.id == appointment.id) {
            *existing = appointment;
        }
    }

    pub async fn get(&self, doctor_id: Uuid, id: Uuid) -> Option<Appointment> {
        let by_doctor = self.by_doctor.lock().await;
        by_doctor
            .get(&doctor_id)
            .and_then(|bookings| bookings.iter().find(|b| b.id == id).cloned())
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn find_non_cancelled(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let by_doctor = self.by_doctor.lock().await;
        let bookings = by_doctor
            .get(&doctor_id)
            .map(|bookings| {
                bookings
                    .iter()
                    .filter(|b| b.date == date && b.blocks_slot())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(bookings)
    }

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, SchedulingError> {
        // Check and insert under one lock acquisition: two concurrent
        // bookings of the last slot serialize here.
        let mut by_doctor = self.by_doctor.lock().await;
        let bookings = by_doctor.entry(appointment.doctor_id).or_default();

        let taken = bookings.iter().any(|b| {
            b.date == appointment.date
                && b.blocks_slot()
                && overlaps(
                    appointment.start_time,
                    appointment.end_time,
                    b.start_time,
                    b.end_time,
                )
        });
        if taken {
            debug!(
                "Insert rejected: {} {} - {} already taken for doctor {}",
                appointment.date,
                appointment.start_time,
                appointment.end_time,
                appointment.doctor_id
            );
            return Err(SchedulingError::Conflict);
        }

        bookings.push(appointment.clone());
        Ok(appointment)
    }
}
