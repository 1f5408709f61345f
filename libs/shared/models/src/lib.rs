pub mod error;
pub mod time;

pub use error::SchedulingError;
pub use time::TimeOfDay;
