pub mod availability;
pub mod backend;
pub mod booking;
pub mod capability;
pub mod config;
pub mod error;
pub mod product;

pub use availability::{AvailabilitySlot, DateRange, Price, ProductsAvailability, RateWithPrice};
pub use backend::{BackendApi, BackendError};
pub use booking::{BookingSource, BookingState, PassengerCount, ReservationState, Ticket};
pub use capability::{Capability, CapabilitySet, PluginDefinition};
pub use config::{Configuration, ParameterValue};
pub use error::PluginError;
pub use product::{ProductDescription, ProductSummary};
