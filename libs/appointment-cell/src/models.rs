// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::TimeOfDay;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booked appointment occupying one slot-shaped interval of a doctor's
/// day. Received fully resolved from the appointment store; the core
/// never issues its own cross-entity fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    /// Calendar day only; time-of-day lives in `start_time`/`end_time`.
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    /// Visible to the assigned doctor and admins only; the boundary is
    /// responsible for redaction.
    pub doctor_notes: Option<String>,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// Whether this appointment still blocks its interval.
    pub fn blocks_slot(&self) -> bool {
        !self.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Awaiting confirmation; behaves like `Scheduled` in the transition
    /// table.
    Pending,
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
            AppointmentStatus::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

/// Who is requesting an operation. Precondition data for the lifecycle
/// table, not authentication: the boundary has already authenticated the
/// caller and checked ownership before the core is invoked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Patient,
    Doctor,
    Admin,
    System,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Patient => write!(f, "patient"),
            Actor::Doctor => write!(f, "doctor"),
            Actor::Admin => write!(f, "admin"),
            Actor::System => write!(f, "system"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub reason: String,
    pub notes: Option<String>,
    pub created_by: Actor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub new_date: NaiveDate,
    pub new_start_time: TimeOfDay,
    pub new_end_time: TimeOfDay,
    pub reason: Option<String>,
}

// ==============================================================================
// LIFECYCLE EVENTS
// ==============================================================================

/// Emitted to the notification sink on booking creation and on every
/// completed status transition. Delivery is fire-and-forget: a failed
/// publish is logged and never blocks the operation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// `None` for the booking-created event.
    pub old_status: Option<AppointmentStatus>,
    pub new_status: AppointmentStatus,
    pub appointment: Appointment,
    pub occurred_at: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn created(appointment: Appointment) -> Self {
        Self {
            old_status: None,
            new_status: appointment.status,
            occurred_at: Utc::now(),
            appointment,
        }
    }

    pub fn transitioned(old_status: AppointmentStatus, appointment: Appointment) -> Self {
        Self {
            old_status: Some(old_status),
            new_status: appointment.status,
            occurred_at: Utc::now(),
            appointment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(AppointmentStatus::NoShow.is_terminal());
        assert!(!AppointmentStatus::Scheduled.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(!AppointmentStatus::Rescheduled.is_terminal());
        assert!(!AppointmentStatus::Pending.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        let back: AppointmentStatus = serde_json::from_str("\"rescheduled\"").unwrap();
        assert_eq!(back, AppointmentStatus::Rescheduled);
    }
}
