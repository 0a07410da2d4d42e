use std::sync::Arc;

use chrono::Utc;

use voyra_domain::availability::{AvailabilitySlot, DateRange, ProductsAvailability};
use voyra_domain::backend::BackendApi;
use voyra_domain::capability::{Capability, CapabilitySet};
use voyra_domain::config::Configuration;
use voyra_domain::error::PluginError;
use voyra_domain::product::{ProductDescription, ProductSummary};

/// Read-only catalog queries against the backend collaborator.
///
/// Holds no state between calls; a repeated query restarts from scratch, no
/// server-side cursor survives.
pub struct ProductCatalogService {
    backend: Arc<dyn BackendApi>,
    capabilities: CapabilitySet,
}

impl ProductCatalogService {
    pub fn new(backend: Arc<dyn BackendApi>, capabilities: CapabilitySet) -> Self {
        ProductCatalogService {
            backend,
            capabilities,
        }
    }

    /// Lists products, optionally restricted by city and country. Empty
    /// filters mean no restriction.
    pub async fn search_products(
        &self,
        config: &Configuration,
        cities: &[String],
        countries: &[String],
    ) -> Result<Vec<ProductSummary>, PluginError> {
        tracing::trace!("searching products, {} city / {} country filters", cities.len(), countries.len());
        let products = self.backend.list_products(config).await?;
        let summaries = products
            .iter()
            .filter(|p| matches_filter(&p.cities, cities))
            .filter(|p| matches_filter(&p.countries, countries))
            .map(ProductDescription::summary)
            .collect();
        Ok(summaries)
    }

    pub async fn product_by_id(
        &self,
        config: &Configuration,
        product_id: &str,
    ) -> Result<ProductDescription, PluginError> {
        self.backend
            .product_by_id(config, product_id)
            .await?
            .ok_or_else(|| PluginError::NotFound(format!("no product with id {product_id}")))
    }

    /// Shallow availability over candidate products. A returned candidate may
    /// only have capacity on some dates of the range; `getProductAvailability`
    /// is the authoritative follow-up.
    pub async fn available_products(
        &self,
        config: &Configuration,
        product_ids: &[String],
        range: &DateRange,
        required_capacity: u32,
    ) -> Result<Vec<ProductsAvailability>, PluginError> {
        self.capabilities
            .require(Capability::Availability, "getAvailableProducts")?;
        let verdicts = self
            .backend
            .check_available(config, product_ids, range, required_capacity)
            .await?;
        Ok(verdicts)
    }

    /// Precise per-slot availability for one product. A range entirely in the
    /// past yields an empty sequence, not an error.
    pub async fn product_availability(
        &self,
        config: &Configuration,
        product_id: &str,
        range: &DateRange,
    ) -> Result<Vec<AvailabilitySlot>, PluginError> {
        self.capabilities
            .require(Capability::Availability, "getProductAvailability")?;
        let today = Utc::now().date_naive();
        if range.to < today {
            return Ok(Vec::new());
        }
        let mut slots = self
            .backend
            .product_availability(config, product_id, range)
            .await?;
        slots.retain(|slot| slot.date >= today);
        Ok(slots)
    }
}

fn matches_filter(values: &[String], filter: &[String]) -> bool {
    filter.is_empty()
        || values
            .iter()
            .any(|v| filter.iter().any(|f| v.eq_ignore_ascii_case(f)))
}
