//! Request/response payloads shared by both transports. Every call except
//! the definition endpoint carries the full configuration parameter set;
//! the adapter is stateless between calls and never caches credentials.

use serde::{Deserialize, Serialize};

use voyra_domain::availability::DateRange;
use voyra_domain::booking::{BookingSource, PassengerCount};
use voyra_domain::config::ParameterValue;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductByIdRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub external_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsAvailabilityRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub external_product_ids: Vec<String>,
    pub range: DateRange,
    pub required_capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAvailabilityRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub product_id: String,
    pub range: DateRange,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub product_id: String,
    pub rate_id: String,
    pub passengers: Vec<PassengerCount>,
    pub booking_source: BookingSource,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_confirmation_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub reservation_confirmation_code: String,
    pub booking_source: BookingSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub reservation_confirmation_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub booking_confirmation_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendBookingRequest {
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub booking_confirmation_code: String,
    pub passengers: Vec<PassengerCount>,
    pub booking_source: BookingSource,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub success: bool,
}
