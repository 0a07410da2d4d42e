use async_trait::async_trait;
use std::time::Duration;

use crate::availability::{AvailabilitySlot, DateRange, ProductsAvailability};
use crate::booking::PassengerCount;
use crate::config::Configuration;
use crate::product::ProductDescription;

/// Failure talking to the booking backend. All variants surface to callers as
/// `BackendUnavailable`; retry policy belongs to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("I/O error calling backend: {0}")]
    Io(String),

    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),

    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// Narrow contract over the third-party booking system. Everything behind it
/// is an opaque collaborator: request in, typed data or an error out.
///
/// Capacity authority lives here; the adapter is only the authority for
/// confirmation codes, which key the hold/commit/release calls.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn list_products(
        &self,
        config: &Configuration,
    ) -> Result<Vec<ProductDescription>, BackendError>;

    async fn product_by_id(
        &self,
        config: &Configuration,
        product_id: &str,
    ) -> Result<Option<ProductDescription>, BackendError>;

    /// Shallow check over many candidates; one verdict per matching product.
    async fn check_available(
        &self,
        config: &Configuration,
        product_ids: &[String],
        range: &DateRange,
        required_capacity: u32,
    ) -> Result<Vec<ProductsAvailability>, BackendError>;

    /// Precise per-slot availability for a single product.
    async fn product_availability(
        &self,
        config: &Configuration,
        product_id: &str,
        range: &DateRange,
    ) -> Result<Vec<AvailabilitySlot>, BackendError>;

    async fn hold_capacity(
        &self,
        config: &Configuration,
        reservation_code: &str,
        product_id: &str,
        rate_id: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), BackendError>;

    /// Releases a hold. Releasing an unknown or already-released hold is a
    /// no-op so the engine can use it as compensation.
    async fn release_capacity(
        &self,
        config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), BackendError>;

    async fn commit_capacity(
        &self,
        config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), BackendError>;

    async fn cancel_booking(
        &self,
        config: &Configuration,
        booking_code: &str,
    ) -> Result<(), BackendError>;

    async fn amend_booking(
        &self,
        config: &Configuration,
        booking_code: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), BackendError>;
}
