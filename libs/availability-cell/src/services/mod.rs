pub mod slots;

pub use slots::generate_slots;
