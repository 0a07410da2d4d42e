use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use voyra_api::error::status_for;
use voyra_api::rpc::{to_status, PluginRpc};
use voyra_api::{app, AppState};
use voyra_backend::MemoryBackend;
use voyra_domain::capability::{Capability, CapabilitySet};
use voyra_domain::error::PluginError;

fn state(capabilities: &[Capability]) -> AppState {
    AppState::new(
        Arc::new(MemoryBackend::with_sample_catalog()),
        CapabilitySet::new(capabilities.iter().copied()).unwrap(),
        "Voyra inventory plugin",
        "Provides availability and accepts bookings into the Voyra booking system",
        Duration::from_secs(1800),
    )
}

fn two_step_state() -> AppState {
    state(&[
        Capability::Availability,
        Capability::Reservations,
        Capability::ReservationCancellation,
        Capability::Amendment,
    ])
}

fn parameters() -> Value {
    json!([
        {"name": "VOYRA_API_SCHEME", "value": "https"},
        {"name": "VOYRA_API_HOST", "value": "api.example.com"},
        {"name": "VOYRA_API_PORT", "value": "443"},
        {"name": "VOYRA_API_PATH", "value": "/api/1"},
        {"name": "VOYRA_API_USERNAME", "value": "user"},
        {"name": "VOYRA_API_PASSWORD", "value": "secret"}
    ])
}

fn booking_source() -> Value {
    json!({
        "segment": "OTA",
        "bookingChannel": {"id": "bc1", "title": "Web", "systemType": "EXPEDIA"}
    })
}

async fn post(router: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_definition_is_served_without_configuration() {
    let router = app(two_step_state());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/plugin/definition")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let definition: Value = serde_json::from_slice(&bytes).unwrap();
    let capabilities = definition["capabilities"].as_array().unwrap();
    assert!(capabilities.contains(&json!("RESERVATIONS")));
    let parameters = definition["parameters"].as_array().unwrap();
    assert_eq!(parameters.len(), 6);
    assert_eq!(parameters[0]["required"], json!(true));
}

#[tokio::test]
async fn test_search_returns_the_catalog() {
    let router = app(two_step_state());
    let (status, body) = post(
        &router,
        "/product/search",
        json!({"parameters": parameters()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], json!("123"));
}

#[tokio::test]
async fn test_two_step_booking_flow_over_http() {
    let router = app(two_step_state());

    let (status, body) = post(
        &router,
        "/booking/reserve",
        json!({
            "parameters": parameters(),
            "productId": "123",
            "rateId": "standard",
            "passengers": [
                {"pricingCategoryId": "ADT", "count": 1},
                {"pricingCategoryId": "CHD", "count": 1}
            ],
            "bookingSource": booking_source()
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let code = body["reservationConfirmationCode"].as_str().unwrap().to_string();

    let confirm_body = json!({
        "parameters": parameters(),
        "reservationConfirmationCode": code,
        "bookingSource": booking_source()
    });
    let (status, body) = post(&router, "/booking/confirm", confirm_body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickets"].as_array().unwrap().len(), 2);

    // Confirm is not idempotent.
    let (status, body) = post(&router, "/booking/confirm", confirm_body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("INVALID_STATE"));
}

#[tokio::test]
async fn test_cancel_reservation_is_idempotent_over_http() {
    let router = app(two_step_state());
    let (_, body) = post(
        &router,
        "/booking/reserve",
        json!({
            "parameters": parameters(),
            "productId": "123",
            "rateId": "standard",
            "passengers": [{"pricingCategoryId": "ADT", "count": 1}],
            "bookingSource": booking_source()
        }),
    )
    .await;
    let code = body["reservationConfirmationCode"].as_str().unwrap().to_string();

    let cancel = json!({
        "parameters": parameters(),
        "reservationConfirmationCode": code
    });
    let (status, _) = post(&router, "/booking/cancelReservation", cancel.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&router, "/booking/cancelReservation", cancel).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_single_step_entry_is_rejected_identically_on_both_transports() {
    let request = json!({
        "parameters": parameters(),
        "productId": "123",
        "rateId": "standard",
        "passengers": [{"pricingCategoryId": "ADT", "count": 2}],
        "bookingSource": booking_source()
    });

    let router = app(two_step_state());
    let (status, body) = post(&router, "/booking/reserveAndConfirm", request.clone()).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"], json!("UNSUPPORTED_CAPABILITY"));

    let rpc = PluginRpc::new(two_step_state());
    let typed: voyra_api::contract::ReservationRequest = serde_json::from_value(request).unwrap();
    let err = rpc
        .create_and_confirm_booking(tonic::Request::new(typed))
        .await
        .unwrap_err();
    assert_eq!(err.code(), tonic::Code::Unimplemented);
}

#[tokio::test]
async fn test_single_step_plugin_books_in_one_call() {
    let router = app(state(&[Capability::Availability]));
    let (status, body) = post(
        &router,
        "/booking/reserveAndConfirm",
        json!({
            "parameters": parameters(),
            "productId": "123",
            "rateId": "standard",
            "passengers": [{"pricingCategoryId": "ADT", "count": 2}],
            "bookingSource": booking_source()
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["bookingConfirmationCode"].as_str().is_some());
    assert_eq!(body["tickets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bad_port_parameter_is_a_400() {
    let router = app(two_step_state());
    let (status, body) = post(
        &router,
        "/product/search",
        json!({
            "parameters": [{"name": "VOYRA_API_PORT", "value": "not-a-number"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("CONFIGURATION_ERROR"));
}

#[tokio::test]
async fn test_past_range_availability_is_empty_not_an_error() {
    let router = app(two_step_state());
    let (status, body) = post(
        &router,
        "/product/getAvailability",
        json!({
            "parameters": parameters(),
            "productId": "123",
            "range": {"from": "2020-01-01", "to": "2020-01-07"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[test]
fn test_both_transports_map_the_taxonomy_identically() {
    let cases = [
        (
            PluginError::Configuration("bad".into()),
            StatusCode::BAD_REQUEST,
            tonic::Code::InvalidArgument,
        ),
        (
            PluginError::UnsupportedCapability("reserve"),
            StatusCode::NOT_IMPLEMENTED,
            tonic::Code::Unimplemented,
        ),
        (
            PluginError::InvalidState("bad".into()),
            StatusCode::CONFLICT,
            tonic::Code::FailedPrecondition,
        ),
        (
            PluginError::NotFound("bad".into()),
            StatusCode::NOT_FOUND,
            tonic::Code::NotFound,
        ),
        (
            PluginError::BackendUnavailable("bad".into()),
            StatusCode::BAD_GATEWAY,
            tonic::Code::Unavailable,
        ),
    ];
    for (err, http_status, rpc_code) in cases {
        assert_eq!(status_for(&err), http_status);
        assert_eq!(to_status(err).code(), rpc_code);
    }
}
