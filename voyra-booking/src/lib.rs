pub mod engine;

pub use engine::{BookingLifecycleEngine, ConfirmedBooking};
