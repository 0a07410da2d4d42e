use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use voyra_domain::availability::{
    AvailabilitySlot, DateRange, Price, PricingCategoryWithPrice, ProductsAvailability,
    RateWithPrice,
};
use voyra_domain::backend::{BackendApi, BackendError};
use voyra_domain::booking::PassengerCount;
use voyra_domain::config::Configuration;
use voyra_domain::product::{
    BookingType, Extra, MeetingType, OpeningHours, OpeningHoursTimeInterval, OpeningHoursWeekday,
    PricingCategory, ProductCategory, ProductDescription, Rate, TicketSupport, TicketType,
    TimeOfDay,
};

const DEFAULT_CAPACITY: u32 = 10;

/// Departure times and their rates for the demonstration product.
const SLOT_TEMPLATE: &[(u32, u32, &[&str])] = &[
    (8, 45, &["r4"]),
    (9, 0, &["r1", "r3"]),
    (9, 15, &["r2"]),
    (9, 50, &["r5"]),
    (11, 15, &["r1", "r2"]),
    (11, 50, &["r1", "r5"]),
];

#[derive(Debug, Default)]
struct CapacityLedger {
    available: u32,
    holds: HashMap<String, u32>,
}

/// In-memory stand-in for the real booking system, seeded with a small
/// demonstration catalog. Useful for local runs and as the collaborator in
/// engine and transport tests.
pub struct MemoryBackend {
    products: Vec<ProductDescription>,
    ledgers: DashMap<String, CapacityLedger>,
}

impl MemoryBackend {
    pub fn new(products: Vec<ProductDescription>) -> Self {
        let ledgers = DashMap::new();
        for product in &products {
            ledgers.insert(
                product.id.clone(),
                CapacityLedger {
                    available: DEFAULT_CAPACITY,
                    holds: HashMap::new(),
                },
            );
        }
        MemoryBackend { products, ledgers }
    }

    /// The demonstration catalog: one London walking tour with adult/child
    /// pricing and five rates.
    pub fn with_sample_catalog() -> Self {
        Self::new(vec![sample_product()])
    }

    fn product(&self, product_id: &str) -> Option<&ProductDescription> {
        self.products.iter().find(|p| p.id == product_id)
    }

    fn first_bookable_date(range: &DateRange) -> Option<NaiveDate> {
        let tomorrow = Utc::now().date_naive().succ_opt()?;
        let start = range.from.max(tomorrow);
        (start <= range.to).then_some(start)
    }
}

#[async_trait]
impl BackendApi for MemoryBackend {
    async fn list_products(
        &self,
        _config: &Configuration,
    ) -> Result<Vec<ProductDescription>, BackendError> {
        Ok(self.products.clone())
    }

    async fn product_by_id(
        &self,
        _config: &Configuration,
        product_id: &str,
    ) -> Result<Option<ProductDescription>, BackendError> {
        Ok(self.product(product_id).cloned())
    }

    async fn check_available(
        &self,
        _config: &Configuration,
        product_ids: &[String],
        range: &DateRange,
        required_capacity: u32,
    ) -> Result<Vec<ProductsAvailability>, BackendError> {
        if Self::first_bookable_date(range).is_none() {
            return Ok(Vec::new());
        }
        let mut verdicts = Vec::new();
        for product_id in product_ids {
            let Some(ledger) = self.ledgers.get(product_id) else {
                continue;
            };
            if ledger.available >= required_capacity {
                verdicts.push(ProductsAvailability {
                    product_id: product_id.clone(),
                    actual_check_done: true,
                });
            }
        }
        Ok(verdicts)
    }

    async fn product_availability(
        &self,
        _config: &Configuration,
        product_id: &str,
        range: &DateRange,
    ) -> Result<Vec<AvailabilitySlot>, BackendError> {
        if self.product(product_id).is_none() {
            return Ok(Vec::new());
        }
        let Some(start) = Self::first_bookable_date(range) else {
            return Ok(Vec::new());
        };
        let bookable = DateRange {
            from: start,
            to: range.to,
        };
        let mut slots = Vec::new();
        for date in bookable.iter_days() {
            for (hour, minute, rate_ids) in SLOT_TEMPLATE {
                slots.push(AvailabilitySlot {
                    date,
                    time: Some(TimeOfDay {
                        hour: *hour,
                        minute: *minute,
                    }),
                    capacity: DEFAULT_CAPACITY,
                    rates: rate_ids.iter().map(|id| priced_rate(id)).collect(),
                });
            }
        }
        Ok(slots)
    }

    async fn hold_capacity(
        &self,
        _config: &Configuration,
        reservation_code: &str,
        product_id: &str,
        rate_id: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), BackendError> {
        let requested: u32 = passengers.iter().map(|p| p.count).sum();
        let mut ledger = self
            .ledgers
            .get_mut(product_id)
            .ok_or_else(|| BackendError::Rejected(format!("unknown product {product_id}")))?;
        if ledger.available < requested {
            return Err(BackendError::Rejected(format!(
                "insufficient capacity for product {product_id}: requested {requested}, available {}",
                ledger.available
            )));
        }
        ledger.available -= requested;
        ledger.holds.insert(reservation_code.to_string(), requested);
        tracing::debug!(
            "held {} seats on product {} rate {} under {}",
            requested,
            product_id,
            rate_id,
            reservation_code
        );
        Ok(())
    }

    async fn release_capacity(
        &self,
        _config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), BackendError> {
        for mut entry in self.ledgers.iter_mut() {
            if let Some(count) = entry.holds.remove(reservation_code) {
                entry.available += count;
                tracing::debug!("released {} seats held under {}", count, reservation_code);
                return Ok(());
            }
        }
        // Unknown hold: releasing is a no-op so compensation never cascades.
        Ok(())
    }

    async fn commit_capacity(
        &self,
        _config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), BackendError> {
        for mut entry in self.ledgers.iter_mut() {
            if entry.holds.remove(reservation_code).is_some() {
                return Ok(());
            }
        }
        Err(BackendError::Rejected(format!(
            "no capacity held under {reservation_code}"
        )))
    }

    async fn cancel_booking(
        &self,
        _config: &Configuration,
        booking_code: &str,
    ) -> Result<(), BackendError> {
        tracing::debug!("backend cancelled booking {}", booking_code);
        Ok(())
    }

    async fn amend_booking(
        &self,
        _config: &Configuration,
        booking_code: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), BackendError> {
        tracing::debug!(
            "backend amended booking {} to {} passenger groups",
            booking_code,
            passengers.len()
        );
        Ok(())
    }
}

fn priced_rate(rate_id: &str) -> RateWithPrice {
    RateWithPrice {
        rate_id: rate_id.to_string(),
        price_per_category: vec![
            PricingCategoryWithPrice {
                pricing_category_id: "ADT".to_string(),
                price: Price {
                    amount: "100".to_string(),
                    currency: "EUR".to_string(),
                },
            },
            PricingCategoryWithPrice {
                pricing_category_id: "CHD".to_string(),
                price: Price {
                    amount: "10".to_string(),
                    currency: "EUR".to_string(),
                },
            },
        ],
    }
}

fn sample_product() -> ProductDescription {
    ProductDescription {
        id: "123".to_string(),
        name: "London old town walking tour".to_string(),
        description: "Guided walking tour of the old town".to_string(),
        pricing_categories: vec![
            PricingCategory {
                id: "ADT".to_string(),
                label: "Adult".to_string(),
            },
            PricingCategory {
                id: "CHD".to_string(),
                label: "Child".to_string(),
            },
        ],
        rates: ["r1", "r2", "r3", "r4", "r5"]
            .iter()
            .map(|id| Rate {
                id: (*id).to_string(),
                label: (*id).to_string(),
            })
            .collect(),
        booking_type: BookingType::DateAndTime,
        product_category: ProductCategory::Activities,
        ticket_support: vec![TicketSupport::TicketPerBooking],
        ticket_type: TicketType::QrCode,
        meeting_type: MeetingType::MeetOnLocation,
        cities: vec!["London".to_string()],
        countries: vec!["GB".to_string()],
        start_times: SLOT_TEMPLATE
            .iter()
            .map(|(hour, minute, _)| TimeOfDay {
                hour: *hour,
                minute: *minute,
            })
            .collect(),
        all_year_opening_hours: Some(OpeningHours {
            monday: Some(OpeningHoursWeekday {
                open_24_hours: false,
                time_intervals: vec![
                    OpeningHoursTimeInterval {
                        open_from: "08:00".to_string(),
                        open_for_hours: 4,
                        open_for_minutes: 0,
                    },
                    OpeningHoursTimeInterval {
                        open_from: "13:00".to_string(),
                        open_for_hours: 4,
                        open_for_minutes: 0,
                    },
                ],
            }),
            ..OpeningHours::default()
        }),
        extras: vec![Extra {
            id: "audio-guide".to_string(),
            title: "Audio guide".to_string(),
            description: Some("Self-paced audio guide headset".to_string()),
            optional: false,
            max_per_booking: 1,
            limit_by_pax: false,
            increases_capacity: false,
        }],
        dropoff_available: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config() -> Configuration {
        Configuration::default()
    }

    fn future_range(days: i64) -> DateRange {
        let from = Utc::now().date_naive() + Duration::days(1);
        DateRange {
            from,
            to: from + Duration::days(days - 1),
        }
    }

    fn adults(count: u32) -> Vec<PassengerCount> {
        vec![PassengerCount {
            pricing_category_id: "ADT".to_string(),
            count,
        }]
    }

    #[tokio::test]
    async fn test_hold_then_release_restores_capacity() {
        let backend = MemoryBackend::with_sample_catalog();
        backend
            .hold_capacity(&config(), "res-1", "123", "r1", &adults(4))
            .await
            .unwrap();

        // Remaining capacity cannot satisfy a request for everything.
        let err = backend
            .hold_capacity(&config(), "res-2", "123", "r1", &adults(10))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));

        backend
            .release_capacity(&config(), "res-1")
            .await
            .unwrap();
        backend
            .hold_capacity(&config(), "res-3", "123", "r1", &adults(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_release_of_unknown_hold_is_a_noop() {
        let backend = MemoryBackend::with_sample_catalog();
        backend
            .release_capacity(&config(), "never-issued")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_commit_of_unknown_hold_is_rejected() {
        let backend = MemoryBackend::with_sample_catalog();
        let err = backend
            .commit_capacity(&config(), "never-issued")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_availability_covers_every_future_day_in_range() {
        let backend = MemoryBackend::with_sample_catalog();
        let slots = backend
            .product_availability(&config(), "123", &future_range(3))
            .await
            .unwrap();
        assert_eq!(slots.len(), 3 * SLOT_TEMPLATE.len());
        assert!(slots.iter().all(|s| s.capacity == DEFAULT_CAPACITY));
    }
}
