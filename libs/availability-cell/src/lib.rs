pub mod models;
pub mod services;

pub use models::{AvailabilityRule, TimeSlot, WeeklySchedule};
pub use services::slots::generate_slots;
