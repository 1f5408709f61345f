pub mod models;
pub mod ports;
pub mod services;
pub mod store;

pub use models::*;
pub use ports::{AppointmentStore, Clock, DoctorDirectory, FixedClock, NotificationSink, SystemClock};
pub use services::booking::BookingService;
pub use services::conflict::{filter_available, overlaps, validate_booking};
pub use services::lifecycle::LifecycleService;
pub use store::MemoryAppointmentStore;
