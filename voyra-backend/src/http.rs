use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use voyra_domain::availability::{AvailabilitySlot, DateRange, ProductsAvailability};
use voyra_domain::backend::{BackendApi, BackendError};
use voyra_domain::booking::PassengerCount;
use voyra_domain::config::Configuration;
use voyra_domain::product::ProductDescription;

/// How long to wait for the backend to respond before giving up.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityCheckBody<'a> {
    product_ids: &'a [String],
    range: &'a DateRange,
    required_capacity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HoldBody<'a> {
    reservation_code: &'a str,
    product_id: &'a str,
    rate_id: &'a str,
    passengers: &'a [PassengerCount],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmendBody<'a> {
    passengers: &'a [PassengerCount],
}

/// `BackendApi` over HTTP(S). The connection target comes from the per-call
/// configuration, so one client instance serves every tenant; only the
/// timeout is fixed at construction.
pub struct HttpBackend {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Io(e.to_string()))?;
        Ok(HttpBackend { client, timeout })
    }

    fn map_err(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Io(err.to_string())
        }
    }

    fn url(&self, config: &Configuration, segments: &[&str]) -> String {
        let mut url = config.base_url();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    async fn post_unit<B: Serialize>(
        &self,
        config: &Configuration,
        segments: &[&str],
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(config, segments))
            .basic_auth(&config.username, Some(&config.password))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_err(e))?;
        expect_ok(response)?;
        Ok(())
    }
}

fn expect_ok(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(BackendError::Rejected(format!(
            "HTTP {}",
            response.status()
        )))
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn list_products(
        &self,
        config: &Configuration,
    ) -> Result<Vec<ProductDescription>, BackendError> {
        let request = self
            .client
            .get(self.url(config, &["product"]))
            .basic_auth(&config.username, Some(&config.password));
        tracing::debug!("GET {}/product", config.base_url());
        let response = request.send().await.map_err(|e| self.map_err(e))?;
        expect_ok(response)?
            .json()
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn product_by_id(
        &self,
        config: &Configuration,
        product_id: &str,
    ) -> Result<Option<ProductDescription>, BackendError> {
        let response = self
            .client
            .get(self.url(config, &["product", product_id]))
            .basic_auth(&config.username, Some(&config.password))
            .send()
            .await
            .map_err(|e| self.map_err(e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        expect_ok(response)?
            .json()
            .await
            .map_err(|e| self.map_err(e))
            .map(Some)
    }

    async fn check_available(
        &self,
        config: &Configuration,
        product_ids: &[String],
        range: &DateRange,
        required_capacity: u32,
    ) -> Result<Vec<ProductsAvailability>, BackendError> {
        let body = AvailabilityCheckBody {
            product_ids,
            range,
            required_capacity,
        };
        let response = self
            .client
            .post(self.url(config, &["availability", "check"]))
            .basic_auth(&config.username, Some(&config.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_err(e))?;
        expect_ok(response)?
            .json()
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn product_availability(
        &self,
        config: &Configuration,
        product_id: &str,
        range: &DateRange,
    ) -> Result<Vec<AvailabilitySlot>, BackendError> {
        let response = self
            .client
            .post(self.url(config, &["availability", product_id]))
            .basic_auth(&config.username, Some(&config.password))
            .json(range)
            .send()
            .await
            .map_err(|e| self.map_err(e))?;
        expect_ok(response)?
            .json()
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn hold_capacity(
        &self,
        config: &Configuration,
        reservation_code: &str,
        product_id: &str,
        rate_id: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), BackendError> {
        let body = HoldBody {
            reservation_code,
            product_id,
            rate_id,
            passengers,
        };
        self.post_unit(config, &["booking", "hold"], &body).await
    }

    async fn release_capacity(
        &self,
        config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), BackendError> {
        self.post_unit(config, &["booking", reservation_code, "release"], &())
            .await
    }

    async fn commit_capacity(
        &self,
        config: &Configuration,
        reservation_code: &str,
    ) -> Result<(), BackendError> {
        self.post_unit(config, &["booking", reservation_code, "commit"], &())
            .await
    }

    async fn cancel_booking(
        &self,
        config: &Configuration,
        booking_code: &str,
    ) -> Result<(), BackendError> {
        self.post_unit(config, &["booking", booking_code, "cancel"], &())
            .await
    }

    async fn amend_booking(
        &self,
        config: &Configuration,
        booking_code: &str,
        passengers: &[PassengerCount],
    ) -> Result<(), BackendError> {
        let body = AmendBody { passengers };
        self.post_unit(config, &["booking", booking_code, "amend"], &body)
            .await
    }
}
