use std::sync::Arc;
use std::time::Duration;

use voyra_booking::BookingLifecycleEngine;
use voyra_catalog::ProductCatalogService;
use voyra_domain::backend::BackendApi;
use voyra_domain::capability::{CapabilitySet, PluginDefinition};

/// Shared state behind both transports: one catalog, one engine, one
/// definition. Sharing a single engine is what keeps the two transports from
/// drifting apart behaviorally.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ProductCatalogService>,
    pub engine: Arc<BookingLifecycleEngine>,
    pub definition: PluginDefinition,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        capabilities: CapabilitySet,
        name: &str,
        description: &str,
        hold_ttl: Duration,
    ) -> Self {
        let definition = PluginDefinition::new(name, description, &capabilities);
        AppState {
            catalog: Arc::new(ProductCatalogService::new(
                backend.clone(),
                capabilities.clone(),
            )),
            engine: Arc::new(BookingLifecycleEngine::new(backend, capabilities, hold_ttl)),
            definition,
        }
    }
}
