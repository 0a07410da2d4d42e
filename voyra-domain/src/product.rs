use serde::{Deserialize, Serialize};

/// Pricing category a passenger can book under, e.g. "ADT"/"Adult".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingCategory {
    pub id: String,
    pub label: String,
}

/// A bookable rate for a product, e.g. "standard".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    Date,
    DateAndTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Accommodation,
    Activities,
    CarRentals,
    DayToursExcursions,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketSupport {
    TicketPerBooking,
    TicketPerPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    QrCode,
    Barcode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingType {
    MeetOnLocation,
    PickUp,
    MeetOnLocationOrPickUp,
}

/// Wall-clock start time of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursTimeInterval {
    pub open_from: String,
    pub open_for_hours: u32,
    pub open_for_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursWeekday {
    pub open_24_hours: bool,
    #[serde(default)]
    pub time_intervals: Vec<OpeningHoursTimeInterval>,
}

/// Per-weekday opening hours; a missing day means closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<OpeningHoursWeekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<OpeningHoursWeekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<OpeningHoursWeekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<OpeningHoursWeekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<OpeningHoursWeekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<OpeningHoursWeekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<OpeningHoursWeekday>,
}

/// Optional add-on to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub optional: bool,
    pub max_per_booking: u32,
    pub limit_by_pax: bool,
    pub increases_capacity: bool,
}

/// Shallow product info returned by catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pricing_categories: Vec<PricingCategory>,
    pub cities: Vec<String>,
    pub countries: Vec<String>,
}

/// Full product description returned by id lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescription {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pricing_categories: Vec<PricingCategory>,
    pub rates: Vec<Rate>,
    pub booking_type: BookingType,
    pub product_category: ProductCategory,
    pub ticket_support: Vec<TicketSupport>,
    pub ticket_type: TicketType,
    pub meeting_type: MeetingType,
    pub cities: Vec<String>,
    pub countries: Vec<String>,
    pub start_times: Vec<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_year_opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub extras: Vec<Extra>,
    pub dropoff_available: bool,
}

impl ProductDescription {
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            pricing_categories: self.pricing_categories.clone(),
            cities: self.cities.clone(),
            countries: self.countries.clone(),
        }
    }
}
