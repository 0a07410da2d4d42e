//! RPC-style transport adapter. The wire codec and listener come from the
//! IDL compiler shared with the Inventory Server; this layer is the service
//! implementation it wraps: typed request in, typed response or
//! `tonic::Status` out, against the same `AppState` as the HTTP router.

use tonic::{Request, Response, Status};

use voyra_booking::ConfirmedBooking;
use voyra_domain::availability::{AvailabilitySlot, ProductsAvailability};
use voyra_domain::capability::PluginDefinition;
use voyra_domain::config::Configuration;
use voyra_domain::error::PluginError;
use voyra_domain::product::{ProductDescription, ProductSummary};

use crate::contract::{
    AmendBookingRequest, CancelBookingRequest, CancelReservationRequest, CancellationResponse,
    ConfirmBookingRequest, GetProductByIdRequest, ProductAvailabilityRequest,
    ProductsAvailabilityRequest, ReservationRequest, ReservationResponse, SearchProductsRequest,
};
use crate::state::AppState;

/// Native status code for each error kind; mirrors `error::status_for`.
pub fn to_status(err: PluginError) -> Status {
    let message = err.to_string();
    match err {
        PluginError::Configuration(_) => Status::invalid_argument(message),
        PluginError::UnsupportedCapability(_) => Status::unimplemented(message),
        PluginError::InvalidState(_) => Status::failed_precondition(message),
        PluginError::NotFound(_) => Status::not_found(message),
        PluginError::BackendUnavailable(_) => Status::unavailable(message),
    }
}

pub struct PluginRpc {
    state: AppState,
}

impl PluginRpc {
    pub fn new(state: AppState) -> Self {
        PluginRpc { state }
    }

    /// Metadata call; consumes no configuration.
    pub async fn get_definition(
        &self,
        _request: Request<()>,
    ) -> Result<Response<PluginDefinition>, Status> {
        Ok(Response::new(self.state.definition.clone()))
    }

    pub async fn search_products(
        &self,
        request: Request<SearchProductsRequest>,
    ) -> Result<Response<Vec<ProductSummary>>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let products = self
            .state
            .catalog
            .search_products(&config, &request.cities, &request.countries)
            .await
            .map_err(to_status)?;
        Ok(Response::new(products))
    }

    pub async fn get_product_by_id(
        &self,
        request: Request<GetProductByIdRequest>,
    ) -> Result<Response<ProductDescription>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let product = self
            .state
            .catalog
            .product_by_id(&config, &request.external_id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(product))
    }

    pub async fn get_available_products(
        &self,
        request: Request<ProductsAvailabilityRequest>,
    ) -> Result<Response<Vec<ProductsAvailability>>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let verdicts = self
            .state
            .catalog
            .available_products(
                &config,
                &request.external_product_ids,
                &request.range,
                request.required_capacity,
            )
            .await
            .map_err(to_status)?;
        Ok(Response::new(verdicts))
    }

    pub async fn get_product_availability(
        &self,
        request: Request<ProductAvailabilityRequest>,
    ) -> Result<Response<Vec<AvailabilitySlot>>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let slots = self
            .state
            .catalog
            .product_availability(&config, &request.product_id, &request.range)
            .await
            .map_err(to_status)?;
        Ok(Response::new(slots))
    }

    pub async fn create_reservation(
        &self,
        request: Request<ReservationRequest>,
    ) -> Result<Response<ReservationResponse>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let reservation_confirmation_code = self
            .state
            .engine
            .reserve(
                &config,
                &request.product_id,
                &request.rate_id,
                &request.passengers,
                &request.booking_source,
            )
            .await
            .map_err(to_status)?;
        Ok(Response::new(ReservationResponse {
            reservation_confirmation_code,
        }))
    }

    pub async fn confirm_booking(
        &self,
        request: Request<ConfirmBookingRequest>,
    ) -> Result<Response<ConfirmedBooking>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let booking = self
            .state
            .engine
            .confirm(
                &config,
                &request.reservation_confirmation_code,
                &request.booking_source,
            )
            .await
            .map_err(to_status)?;
        Ok(Response::new(booking))
    }

    pub async fn create_and_confirm_booking(
        &self,
        request: Request<ReservationRequest>,
    ) -> Result<Response<ConfirmedBooking>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let booking = self
            .state
            .engine
            .reserve_and_confirm(
                &config,
                &request.product_id,
                &request.rate_id,
                &request.passengers,
                &request.booking_source,
            )
            .await
            .map_err(to_status)?;
        Ok(Response::new(booking))
    }

    pub async fn cancel_reservation(
        &self,
        request: Request<CancelReservationRequest>,
    ) -> Result<Response<CancellationResponse>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        self.state
            .engine
            .cancel_reservation(&config, &request.reservation_confirmation_code)
            .await
            .map_err(to_status)?;
        Ok(Response::new(CancellationResponse { success: true }))
    }

    pub async fn cancel_booking(
        &self,
        request: Request<CancelBookingRequest>,
    ) -> Result<Response<CancellationResponse>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        self.state
            .engine
            .cancel_booking(&config, &request.booking_confirmation_code)
            .await
            .map_err(to_status)?;
        Ok(Response::new(CancellationResponse { success: true }))
    }

    pub async fn amend_booking(
        &self,
        request: Request<AmendBookingRequest>,
    ) -> Result<Response<ConfirmedBooking>, Status> {
        let request = request.into_inner();
        let config = Configuration::from_parameters(&request.parameters).map_err(to_status)?;
        let booking = self
            .state
            .engine
            .amend_booking(
                &config,
                &request.booking_confirmation_code,
                &request.passengers,
                &request.booking_source,
            )
            .await
            .map_err(to_status)?;
        Ok(Response::new(booking))
    }
}
