// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use shared_models::SchedulingError;

use crate::models::{
    Actor, Appointment, AppointmentStatus, LifecycleEvent, RescheduleRequest,
};
use crate::ports::{Clock, NotificationSink};
use crate::services::conflict::validate_booking;

/// State machine governing an appointment's status transitions.
///
/// Statuses move monotonically toward a terminal state (completed,
/// cancelled, no-show); the one cycle is rescheduling, which re-enters
/// `scheduled` once the new slot is assigned. Every completed transition
/// emits a lifecycle event; event delivery never blocks or fails the
/// transition itself.
pub struct LifecycleService {
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl LifecycleService {
    pub fn new(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Whether the transition table permits `from -> to` for `actor`.
    ///
    /// This is the actor column of the table, not authentication: the
    /// boundary has already established who the caller is and whether
    /// they own the appointment.
    pub fn permitted(from: AppointmentStatus, to: AppointmentStatus, actor: Actor) -> bool {
        use AppointmentStatus::*;

        // Pending is the pre-confirmation form of Scheduled.
        let from = match from {
            Pending => Scheduled,
            other => other,
        };

        match (from, to) {
            (Scheduled, Confirmed) => matches!(actor, Actor::Doctor | Actor::Admin),
            (Scheduled | Confirmed, Completed) => actor == Actor::Doctor,
            (Scheduled | Confirmed, NoShow) => actor == Actor::Doctor,
            (Scheduled | Confirmed, Cancelled) => {
                matches!(actor, Actor::Patient | Actor::Doctor | Actor::Admin)
            }
            (Scheduled | Confirmed, Rescheduled) => actor == Actor::Admin,
            (Rescheduled, Scheduled) => actor == Actor::System,
            _ => false,
        }
    }

    /// Apply a status transition and emit the lifecycle event.
    ///
    /// Completed and no-show additionally require the appointment date to
    /// be today or earlier. Transitions into `Rescheduled` are not
    /// accepted here: rescheduling needs the replacement slot validated,
    /// so it goes through [`LifecycleService::reschedule`].
    pub async fn transition(
        &self,
        mut appointment: Appointment,
        to: AppointmentStatus,
        actor: Actor,
    ) -> Result<Appointment, SchedulingError> {
        let from = appointment.status;
        debug!("Transition requested by {}: {} -> {}", actor, from, to);

        if to == AppointmentStatus::Rescheduled || !Self::permitted(from, to, actor) {
            warn!("Rejected transition {} -> {} by {}", from, to, actor);
            return Err(invalid(from, to));
        }

        // Completing or no-showing a visit that has not happened yet
        // makes no sense.
        if matches!(to, AppointmentStatus::Completed | AppointmentStatus::NoShow)
            && appointment.date > self.clock.today()
        {
            warn!(
                "Rejected {} -> {}: appointment date {} is in the future",
                from, to, appointment.date
            );
            return Err(invalid(from, to));
        }

        appointment.status = to;
        appointment.updated_at = Utc::now();
        info!("Appointment {} moved {} -> {}", appointment.id, from, to);

        self.emit(LifecycleEvent::transitioned(from, appointment.clone())).await;
        Ok(appointment)
    }

    /// Admin-only: move the appointment to a new validated slot.
    ///
    /// Runs the two table rows as one operation: `from -> rescheduled`,
    /// then the implicit system re-entry `rescheduled -> scheduled` once
    /// the new date and interval are assigned. Both transitions emit
    /// events. `existing` is the doctor's current non-cancelled bookings
    /// for the new date, minus this appointment itself.
    pub async fn reschedule(
        &self,
        mut appointment: Appointment,
        request: RescheduleRequest,
        actor: Actor,
        existing: &[Appointment],
    ) -> Result<Appointment, SchedulingError> {
        let from = appointment.status;
        debug!(
            "Reschedule of {} requested by {} to {} {} - {}",
            appointment.id, actor, request.new_date, request.new_start_time, request.new_end_time
        );

        if !Self::permitted(from, AppointmentStatus::Rescheduled, actor) {
            warn!("Rejected reschedule of {}: {} by {}", appointment.id, from, actor);
            return Err(invalid(from, AppointmentStatus::Rescheduled));
        }

        let others: Vec<Appointment> = existing
            .iter()
            .filter(|b| b.id != appointment.id)
            .cloned()
            .collect();
        validate_booking(
            request.new_date,
            request.new_start_time,
            request.new_end_time,
            &others,
            self.clock.today(),
        )?;

        appointment.status = AppointmentStatus::Rescheduled;
        appointment.updated_at = Utc::now();
        self.emit(LifecycleEvent::transitioned(from, appointment.clone())).await;

        appointment.date = request.new_date;
        appointment.start_time = request.new_start_time;
        appointment.end_time = request.new_end_time;
        if let Some(reason) = request.reason {
            appointment.notes = Some(match appointment.notes.take() {
                Some(notes) => format!("{}\nRescheduled: {}", notes, reason),
                None => format!("Rescheduled: {}", reason),
            });
        }
        appointment.status = AppointmentStatus::Scheduled;
        appointment.updated_at = Utc::now();
        info!(
            "Appointment {} rescheduled to {} {} - {}",
            appointment.id, appointment.date, appointment.start_time, appointment.end_time
        );

        self.emit(LifecycleEvent::transitioned(
            AppointmentStatus::Rescheduled,
            appointment.clone(),
        ))
        .await;
        Ok(appointment)
    }

    async fn emit(&self, event: LifecycleEvent) {
        // Notification failure must never block or fail a transition.
        if let Err(e) = self.sink.publish(event).await {
            warn!("Failed to publish lifecycle event: {}", e);
        }
    }
}

fn invalid(from: AppointmentStatus, to: AppointmentStatus) -> SchedulingError {
    SchedulingError::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}
