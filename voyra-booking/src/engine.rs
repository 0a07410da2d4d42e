use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use voyra_domain::backend::BackendApi;
use voyra_domain::booking::{BookingSource, BookingState, PassengerCount, QrTicket, ReservationState, Ticket};
use voyra_domain::capability::{Capability, CapabilitySet};
use voyra_domain::config::Configuration;
use voyra_domain::error::PluginError;

/// Outcome of a confirmed (or amended) booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBooking {
    pub booking_confirmation_code: String,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug)]
struct ReservationRecord {
    state: ReservationState,
    product_id: String,
    rate_id: String,
    passengers: Vec<PassengerCount>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
struct BookingRecord {
    state: BookingState,
    passengers: Vec<PassengerCount>,
    tickets: Vec<Ticket>,
    revision: u32,
}

/// The reservation/booking state machine.
///
/// Records are keyed by the confirmation codes this engine issues; each
/// record carries its own lock so operations on the same code serialize
/// while different codes never contend. Expiry is observed lazily on the
/// next touch of a record, driven by the backend's TTL, never by a timer
/// in here.
pub struct BookingLifecycleEngine {
    backend: Arc<dyn BackendApi>,
    capabilities: CapabilitySet,
    hold_ttl: chrono::Duration,
    reservations: DashMap<String, Arc<Mutex<ReservationRecord>>>,
    bookings: DashMap<String, Arc<Mutex<BookingRecord>>>,
}

impl BookingLifecycleEngine {
    pub fn new(backend: Arc<dyn BackendApi>, capabilities: CapabilitySet, hold_ttl: Duration) -> Self {
        BookingLifecycleEngine {
            backend,
            capabilities,
            hold_ttl: chrono::Duration::from_std(hold_ttl)
                .unwrap_or_else(|_| chrono::Duration::minutes(30)),
            reservations: DashMap::new(),
            bookings: DashMap::new(),
        }
    }

    /// Holds capacity in the backend and issues a reservation confirmation
    /// code. Two-step entry path; requires `RESERVATIONS`.
    pub async fn reserve(
        &self,
        config: &Configuration,
        product_id: &str,
        rate_id: &str,
        passengers: &[PassengerCount],
        source: &BookingSource,
    ) -> Result<String, PluginError> {
        self.capabilities.require(Capability::Reservations, "reserve")?;
        source.trace();

        let reservation_code = Uuid::new_v4().to_string();
        self.hold_with_compensation(config, &reservation_code, product_id, rate_id, passengers)
            .await?;

        self.reservations.insert(
            reservation_code.clone(),
            Arc::new(Mutex::new(ReservationRecord {
                state: ReservationState::Held,
                product_id: product_id.to_string(),
                rate_id: rate_id.to_string(),
                passengers: passengers.to_vec(),
                expires_at: Utc::now() + self.hold_ttl,
            })),
        );
        tracing::debug!("reserved {} on product {}", reservation_code, product_id);
        Ok(reservation_code)
    }

    /// Turns a held reservation into a booking. Not idempotent: a second
    /// confirm on the same code fails with `InvalidState`.
    pub async fn confirm(
        &self,
        config: &Configuration,
        reservation_code: &str,
        source: &BookingSource,
    ) -> Result<ConfirmedBooking, PluginError> {
        self.capabilities.require(Capability::Reservations, "confirm")?;
        source.trace();

        let record = self.reservation(reservation_code)?;
        let mut reservation = record.lock().await;
        observe_expiry(&mut reservation);
        if reservation.state != ReservationState::Held {
            return Err(PluginError::InvalidState(format!(
                "reservation {} is {}, expected HELD",
                reservation_code,
                reservation.state.as_str()
            )));
        }

        self.backend.commit_capacity(config, reservation_code).await?;

        let booking_code = Uuid::new_v4().to_string();
        let tickets = issue_tickets(&booking_code, &reservation.passengers, 0);
        reservation.state = ReservationState::Confirmed;
        self.bookings.insert(
            booking_code.clone(),
            Arc::new(Mutex::new(BookingRecord {
                state: BookingState::Confirmed,
                passengers: reservation.passengers.clone(),
                tickets: tickets.clone(),
                revision: 0,
            })),
        );
        tracing::debug!("confirmed {} as booking {}", reservation_code, booking_code);
        Ok(ConfirmedBooking {
            booking_confirmation_code: booking_code,
            tickets,
        })
    }

    /// Single-step entry path, legal only when `RESERVATIONS` is not
    /// declared. A plugin exposes exactly one of the two entry paths; both at
    /// once would let the orchestrator double-hold or never-hold inventory.
    pub async fn reserve_and_confirm(
        &self,
        config: &Configuration,
        product_id: &str,
        rate_id: &str,
        passengers: &[PassengerCount],
        source: &BookingSource,
    ) -> Result<ConfirmedBooking, PluginError> {
        if self.capabilities.supports(Capability::Reservations) {
            return Err(PluginError::UnsupportedCapability("reserveAndConfirm"));
        }
        source.trace();

        let hold_code = Uuid::new_v4().to_string();
        self.hold_with_compensation(config, &hold_code, product_id, rate_id, passengers)
            .await?;
        if let Err(err) = self.backend.commit_capacity(config, &hold_code).await {
            self.release_best_effort(config, &hold_code).await;
            return Err(err.into());
        }

        let booking_code = Uuid::new_v4().to_string();
        let tickets = issue_tickets(&booking_code, passengers, 0);
        self.bookings.insert(
            booking_code.clone(),
            Arc::new(Mutex::new(BookingRecord {
                state: BookingState::Confirmed,
                passengers: passengers.to_vec(),
                tickets: tickets.clone(),
                revision: 0,
            })),
        );
        tracing::debug!("booked {} on product {} in a single step", booking_code, product_id);
        Ok(ConfirmedBooking {
            booking_confirmation_code: booking_code,
            tickets,
        })
    }

    /// Releases a held reservation. Idempotent: cancelling an already
    /// cancelled reservation succeeds, because duplicate cancellations are
    /// routine under orchestrator retry.
    pub async fn cancel_reservation(
        &self,
        config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), PluginError> {
        self.capabilities
            .require(Capability::ReservationCancellation, "cancelReservation")?;

        let record = self.reservation(reservation_code)?;
        let mut reservation = record.lock().await;
        observe_expiry(&mut reservation);
        match reservation.state {
            ReservationState::Held => {
                self.backend.release_capacity(config, reservation_code).await?;
                reservation.state = ReservationState::Cancelled;
                tracing::debug!("cancelled reservation {}", reservation_code);
                Ok(())
            }
            ReservationState::Cancelled => Ok(()),
            state => Err(PluginError::InvalidState(format!(
                "reservation {} is {}, cannot cancel",
                reservation_code,
                state.as_str()
            ))),
        }
    }

    /// Cancels a confirmed booking. Refund policy is a backend concern; this
    /// only drives the state transition.
    pub async fn cancel_booking(
        &self,
        config: &Configuration,
        booking_code: &str,
    ) -> Result<(), PluginError> {
        let record = self.booking(booking_code)?;
        let mut booking = record.lock().await;
        if booking.state != BookingState::Confirmed {
            return Err(PluginError::InvalidState(format!(
                "booking {} is {}, expected CONFIRMED",
                booking_code,
                booking.state.as_str()
            )));
        }
        self.backend.cancel_booking(config, booking_code).await?;
        booking.state = BookingState::Cancelled;
        tracing::debug!("cancelled booking {}", booking_code);
        Ok(())
    }

    /// Amends a confirmed booking: tickets are re-issued, the booking
    /// confirmation code stays stable.
    pub async fn amend_booking(
        &self,
        config: &Configuration,
        booking_code: &str,
        passengers: &[PassengerCount],
        source: &BookingSource,
    ) -> Result<ConfirmedBooking, PluginError> {
        self.capabilities.require(Capability::Amendment, "amendBooking")?;
        source.trace();

        let record = self.booking(booking_code)?;
        let mut booking = record.lock().await;
        if booking.state != BookingState::Confirmed {
            return Err(PluginError::InvalidState(format!(
                "booking {} is {}, cannot amend",
                booking_code,
                booking.state.as_str()
            )));
        }
        self.backend.amend_booking(config, booking_code, passengers).await?;
        booking.revision += 1;
        booking.passengers = passengers.to_vec();
        booking.tickets = issue_tickets(booking_code, passengers, booking.revision);
        tracing::debug!("amended booking {} (revision {})", booking_code, booking.revision);
        Ok(ConfirmedBooking {
            booking_confirmation_code: booking_code.to_string(),
            tickets: booking.tickets.clone(),
        })
    }

    fn reservation(&self, code: &str) -> Result<Arc<Mutex<ReservationRecord>>, PluginError> {
        self.reservations
            .get(code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PluginError::NotFound(format!("unknown reservation code {code}")))
    }

    fn booking(&self, code: &str) -> Result<Arc<Mutex<BookingRecord>>, PluginError> {
        self.bookings
            .get(code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PluginError::NotFound(format!("unknown booking code {code}")))
    }

    async fn hold_with_compensation(
        &self,
        config: &Configuration,
        reservation_code: &str,
        product_id: &str,
        rate_id: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), PluginError> {
        if let Err(err) = self
            .backend
            .hold_capacity(config, reservation_code, product_id, rate_id, passengers)
            .await
        {
            // The hold may have partially landed; release so nothing dangles.
            self.release_best_effort(config, reservation_code).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn release_best_effort(&self, config: &Configuration, reservation_code: &str) {
        if let Err(release_err) = self.backend.release_capacity(config, reservation_code).await {
            tracing::warn!(
                "compensating release of {} failed: {}",
                reservation_code,
                release_err
            );
        }
    }
}

fn observe_expiry(reservation: &mut ReservationRecord) {
    if reservation.state == ReservationState::Held && Utc::now() > reservation.expires_at {
        tracing::debug!(
            "reservation for product {} rate {} expired at {}",
            reservation.product_id,
            reservation.rate_id,
            reservation.expires_at
        );
        reservation.state = ReservationState::Expired;
    }
}

fn issue_tickets(booking_code: &str, passengers: &[PassengerCount], revision: u32) -> Vec<Ticket> {
    let mut tickets = Vec::new();
    for group in passengers {
        for seat in 1..=group.count {
            let ticket_barcode = if revision == 0 {
                format!("{booking_code}_{}_{seat}", group.pricing_category_id)
            } else {
                format!("{booking_code}_amd{revision}_{}_{seat}", group.pricing_category_id)
            };
            tickets.push(Ticket {
                pricing_category_id: group.pricing_category_id.clone(),
                qr_ticket: QrTicket { ticket_barcode },
            });
        }
    }
    tickets
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyra_backend::MemoryBackend;
    use voyra_domain::booking::BookingChannel;

    const HOLD_TTL: Duration = Duration::from_secs(1800);

    fn engine(capabilities: &[Capability]) -> BookingLifecycleEngine {
        BookingLifecycleEngine::new(
            Arc::new(MemoryBackend::with_sample_catalog()),
            CapabilitySet::new(capabilities.iter().copied()).unwrap(),
            HOLD_TTL,
        )
    }

    fn two_step() -> BookingLifecycleEngine {
        engine(&[
            Capability::Availability,
            Capability::Reservations,
            Capability::ReservationCancellation,
            Capability::Amendment,
        ])
    }

    fn single_step() -> BookingLifecycleEngine {
        engine(&[Capability::Availability])
    }

    fn config() -> Configuration {
        Configuration::default()
    }

    fn source() -> BookingSource {
        BookingSource::Ota {
            booking_channel: BookingChannel {
                id: "bc1".to_string(),
                title: "Web".to_string(),
                system_type: Some("EXPEDIA".to_string()),
            },
        }
    }

    fn pax(groups: &[(&str, u32)]) -> Vec<PassengerCount> {
        groups
            .iter()
            .map(|(id, count)| PassengerCount {
                pricing_category_id: (*id).to_string(),
                count: *count,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_two_step_plugin_rejects_single_step_entry() {
        let engine = two_step();
        let err = engine
            .reserve_and_confirm(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PluginError::UnsupportedCapability("reserveAndConfirm")
        ));
    }

    #[tokio::test]
    async fn test_single_step_plugin_rejects_two_step_entry() {
        let engine = single_step();
        let reserve_err = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap_err();
        assert!(matches!(reserve_err, PluginError::UnsupportedCapability("reserve")));

        let confirm_err = engine.confirm(&config(), "whatever", &source()).await.unwrap_err();
        assert!(matches!(confirm_err, PluginError::UnsupportedCapability("confirm")));

        let booking = engine
            .reserve_and_confirm(&config(), "123", "standard", &pax(&[("ADT", 2)]), &source())
            .await
            .unwrap();
        assert_eq!(booking.tickets.len(), 2);
    }

    #[tokio::test]
    async fn test_confirm_issues_one_ticket_per_passenger_category_pair() {
        let engine = two_step();
        let code = engine
            .reserve(&config(), "123", "standard", &pax(&[("ADT", 1), ("CHD", 1)]), &source())
            .await
            .unwrap();
        let booking = engine.confirm(&config(), &code, &source()).await.unwrap();

        assert_eq!(booking.tickets.len(), 2);
        let categories: Vec<&str> = booking
            .tickets
            .iter()
            .map(|t| t.pricing_category_id.as_str())
            .collect();
        assert!(categories.contains(&"ADT"));
        assert!(categories.contains(&"CHD"));
        assert_ne!(booking.booking_confirmation_code, code);
    }

    #[tokio::test]
    async fn test_confirm_is_not_idempotent() {
        let engine = two_step();
        let code = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();
        engine.confirm(&config(), &code, &source()).await.unwrap();

        let err = engine.confirm(&config(), &code, &source()).await.unwrap_err();
        assert!(matches!(err, PluginError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_cancel_reservation_is_idempotent() {
        let engine = two_step();
        let code = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();
        engine.cancel_reservation(&config(), &code).await.unwrap();
        engine.cancel_reservation(&config(), &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_confirm_after_cancellation_is_invalid() {
        let engine = engine(&[
            Capability::Availability,
            Capability::Reservations,
            Capability::ReservationCancellation,
        ]);
        let code = engine
            .reserve(&config(), "123", "standard", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();
        engine.cancel_reservation(&config(), &code).await.unwrap();

        let err = engine.confirm(&config(), &code, &source()).await.unwrap_err();
        assert!(matches!(err, PluginError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_confirm_of_never_issued_code_is_not_found() {
        let engine = two_step();
        let err = engine
            .confirm(&config(), "never-issued", &source())
            .await
            .unwrap_err();
        assert!(matches!(err, PluginError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_expired_reservation_cannot_be_confirmed() {
        let engine = BookingLifecycleEngine::new(
            Arc::new(MemoryBackend::with_sample_catalog()),
            CapabilitySet::new([Capability::Reservations]).unwrap(),
            Duration::ZERO,
        );
        let code = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();
        let err = engine.confirm(&config(), &code, &source()).await.unwrap_err();
        assert!(matches!(err, PluginError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_failed_hold_leaves_no_dangling_capacity() {
        let engine = two_step();
        let err = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 11)]), &source())
            .await
            .unwrap_err();
        assert!(matches!(err, PluginError::BackendUnavailable(_)));

        // Full capacity is still available after the failed attempt.
        engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 10)]), &source())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_booking_requires_confirmed_state() {
        let engine = two_step();
        let code = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();
        let booking = engine.confirm(&config(), &code, &source()).await.unwrap();

        engine
            .cancel_booking(&config(), &booking.booking_confirmation_code)
            .await
            .unwrap();
        let err = engine
            .cancel_booking(&config(), &booking.booking_confirmation_code)
            .await
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_amendment_keeps_the_booking_code_and_reissues_tickets() {
        let engine = two_step();
        let code = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();
        let booking = engine.confirm(&config(), &code, &source()).await.unwrap();
        let original_barcodes: Vec<String> = booking
            .tickets
            .iter()
            .map(|t| t.qr_ticket.ticket_barcode.clone())
            .collect();

        let amended = engine
            .amend_booking(
                &config(),
                &booking.booking_confirmation_code,
                &pax(&[("ADT", 2)]),
                &source(),
            )
            .await
            .unwrap();

        assert_eq!(
            amended.booking_confirmation_code,
            booking.booking_confirmation_code
        );
        assert_eq!(amended.tickets.len(), 2);
        for ticket in &amended.tickets {
            assert!(!original_barcodes.contains(&ticket.qr_ticket.ticket_barcode));
        }
    }

    #[tokio::test]
    async fn test_amendment_requires_the_capability() {
        let engine = engine(&[Capability::Reservations]);
        let err = engine
            .amend_booking(&config(), "any", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PluginError::UnsupportedCapability("amendBooking")
        ));
    }

    #[tokio::test]
    async fn test_concurrent_confirms_on_one_code_yield_one_booking() {
        let engine = Arc::new(two_step());
        let code = engine
            .reserve(&config(), "123", "r1", &pax(&[("ADT", 1)]), &source())
            .await
            .unwrap();

        let cfg = config();
        let src = source();
        let (first, second) = tokio::join!(
            engine.confirm(&cfg, &code, &src),
            engine.confirm(&cfg, &code, &src),
        );
        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    }
}
