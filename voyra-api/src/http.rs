use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use voyra_booking::ConfirmedBooking;
use voyra_domain::availability::{AvailabilitySlot, ProductsAvailability};
use voyra_domain::capability::PluginDefinition;
use voyra_domain::config::Configuration;
use voyra_domain::product::{ProductDescription, ProductSummary};

use crate::contract::{
    AmendBookingRequest, CancelBookingRequest, CancelReservationRequest, CancellationResponse,
    ConfirmBookingRequest, GetProductByIdRequest, ProductAvailabilityRequest,
    ProductsAvailabilityRequest, ReservationRequest, ReservationResponse, SearchProductsRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Route table of the HTTP/JSON transport.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plugin/definition", get(get_definition))
        .route("/product/search", post(search_products))
        .route("/product/getById", post(get_product_by_id))
        .route("/product/getAvailable", post(get_available_products))
        .route("/product/getAvailability", post(get_product_availability))
        .route("/booking/reserve", post(create_reservation))
        .route("/booking/confirm", post(confirm_booking))
        .route("/booking/reserveAndConfirm", post(create_and_confirm_booking))
        .route("/booking/cancelReservation", post(cancel_reservation))
        .route("/booking/cancel", post(cancel_booking))
        .route("/booking/amend", post(amend_booking))
}

/// Plugin metadata; served without consuming any configuration so it is
/// available before credentials exist.
async fn get_definition(State(state): State<AppState>) -> Json<PluginDefinition> {
    Json(state.definition.clone())
}

async fn search_products(
    State(state): State<AppState>,
    Json(request): Json<SearchProductsRequest>,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let products = state
        .catalog
        .search_products(&config, &request.cities, &request.countries)
        .await?;
    Ok(Json(products))
}

async fn get_product_by_id(
    State(state): State<AppState>,
    Json(request): Json<GetProductByIdRequest>,
) -> Result<Json<ProductDescription>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let product = state
        .catalog
        .product_by_id(&config, &request.external_id)
        .await?;
    Ok(Json(product))
}

async fn get_available_products(
    State(state): State<AppState>,
    Json(request): Json<ProductsAvailabilityRequest>,
) -> Result<Json<Vec<ProductsAvailability>>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let verdicts = state
        .catalog
        .available_products(
            &config,
            &request.external_product_ids,
            &request.range,
            request.required_capacity,
        )
        .await?;
    Ok(Json(verdicts))
}

async fn get_product_availability(
    State(state): State<AppState>,
    Json(request): Json<ProductAvailabilityRequest>,
) -> Result<Json<Vec<AvailabilitySlot>>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let slots = state
        .catalog
        .product_availability(&config, &request.product_id, &request.range)
        .await?;
    Ok(Json(slots))
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<ReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let reservation_confirmation_code = state
        .engine
        .reserve(
            &config,
            &request.product_id,
            &request.rate_id,
            &request.passengers,
            &request.booking_source,
        )
        .await?;
    Ok(Json(ReservationResponse {
        reservation_confirmation_code,
    }))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Json(request): Json<ConfirmBookingRequest>,
) -> Result<Json<ConfirmedBooking>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let booking = state
        .engine
        .confirm(
            &config,
            &request.reservation_confirmation_code,
            &request.booking_source,
        )
        .await?;
    Ok(Json(booking))
}

async fn create_and_confirm_booking(
    State(state): State<AppState>,
    Json(request): Json<ReservationRequest>,
) -> Result<Json<ConfirmedBooking>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let booking = state
        .engine
        .reserve_and_confirm(
            &config,
            &request.product_id,
            &request.rate_id,
            &request.passengers,
            &request.booking_source,
        )
        .await?;
    Ok(Json(booking))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Json(request): Json<CancelReservationRequest>,
) -> Result<Json<CancellationResponse>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    state
        .engine
        .cancel_reservation(&config, &request.reservation_confirmation_code)
        .await?;
    Ok(Json(CancellationResponse { success: true }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<CancellationResponse>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    state
        .engine
        .cancel_booking(&config, &request.booking_confirmation_code)
        .await?;
    Ok(Json(CancellationResponse { success: true }))
}

async fn amend_booking(
    State(state): State<AppState>,
    Json(request): Json<AmendBookingRequest>,
) -> Result<Json<ConfirmedBooking>, ApiError> {
    let config = Configuration::from_parameters(&request.parameters)?;
    let booking = state
        .engine
        .amend_booking(
            &config,
            &request.booking_confirmation_code,
            &request.passengers,
            &request.booking_source,
        )
        .await?;
    Ok(Json(booking))
}
