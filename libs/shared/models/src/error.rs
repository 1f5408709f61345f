use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error taxonomy shared by the scheduling cells.
///
/// These are surfaced to the calling layer as-is; the core never
/// downgrades or suppresses them. Translating them into user-facing
/// responses is the caller's job.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchedulingError {
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Booking date {0} is in the past")]
    PastDate(NaiveDate),

    #[error("Requested interval conflicts with an existing booking")]
    Conflict,

    #[error("Status transition not permitted: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}
