use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::product::TimeOfDay;

/// Inclusive date range for availability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(move |d| *d <= self.to)
    }
}

/// Monetary amount kept as strings deliberately; currency arithmetic is a
/// backend responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCategoryWithPrice {
    pub pricing_category_id: String,
    pub price: Price,
}

/// Per-person pricing of one rate on one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWithPrice {
    pub rate_id: String,
    pub price_per_category: Vec<PricingCategoryWithPrice>,
}

/// Authoritative availability for one departure of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,
    pub capacity: u32,
    pub rates: Vec<RateWithPrice>,
}

/// Shallow availability verdict for one candidate product. An unset
/// `actual_check_done` means the candidate was passed through without asking
/// the backend and must not be treated as a guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsAvailability {
    pub product_id: String,
    pub actual_check_done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange {
            from: date(2026, 9, 1),
            to: date(2026, 9, 3),
        };
        assert!(range.contains(date(2026, 9, 1)));
        assert!(range.contains(date(2026, 9, 3)));
        assert!(!range.contains(date(2026, 9, 4)));
        assert_eq!(range.iter_days().count(), 3);
    }
}
