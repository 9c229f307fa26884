use crate::config::AppConfig;
use crate::feeds::PriceProvider;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and shared read-only.
/// There is no mutable state between requests.
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn PriceProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn PriceProvider>) -> Arc<Self> {
        Arc::new(Self { config, provider })
    }
}
