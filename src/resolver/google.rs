use std::sync::Arc;

use async_trait::async_trait;

use super::RouteProvider;
use crate::{
    config::Config,
    entities::RouteResult,
    error::{unconfigured_error, Error},
    external::{google_maps, Transport},
};

/// Google Directions. Paid, most accurate, only enabled with a real key.
pub struct GoogleDirections {
    transport: Arc<dyn Transport>,
    api_base: String,
    key: Option<String>,
}

impl GoogleDirections {
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_base: config.google_maps_api_base.clone(),
            key: config.google_maps_api_key().map(String::from),
        }
    }
}

#[async_trait]
impl RouteProvider for GoogleDirections {
    fn name(&self) -> &'static str {
        "google_maps"
    }

    async fn attempt(&self, source: &str, destination: &str) -> Result<RouteResult, Error> {
        let key = self.key.as_deref().ok_or_else(unconfigured_error)?;

        let leg = google_maps::find_directions(
            self.transport.as_ref(),
            &self.api_base,
            key,
            source,
            destination,
        )
        .await?;

        leg.try_into()
    }
}
