use std::sync::Arc;

use async_trait::async_trait;

use super::RouteProvider;
use crate::{
    config::Config,
    entities::{Coordinates, RouteResult},
    error::Error,
    external::{nominatim, osrm, Transport},
};

/// Nominatim geocoding followed by an OSRM driving route. Free, rate limited.
pub struct OpenStreetMap {
    transport: Arc<dyn Transport>,
    nominatim_api_url: String,
    osrm_api_url: String,
    user_agent: String,
}

impl OpenStreetMap {
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            nominatim_api_url: config.nominatim_api_url.clone(),
            osrm_api_url: config.osrm_api_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub async fn geocode(&self, query: &str) -> Result<nominatim::Place, Error> {
        nominatim::geocode(
            self.transport.as_ref(),
            &self.nominatim_api_url,
            &self.user_agent,
            query,
        )
        .await
    }
}

/// Meters to kilometers with one decimal, ties rounded away from zero.
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} km", (meters / 100.0).round() / 10.0)
}

/// Seconds to whole minutes.
pub fn format_duration(seconds: f64) -> String {
    format!("{} mins", (seconds / 60.0).round() as i64)
}

#[async_trait]
impl RouteProvider for OpenStreetMap {
    fn name(&self) -> &'static str {
        "open_street_map"
    }

    async fn attempt(&self, source: &str, destination: &str) -> Result<RouteResult, Error> {
        let start = self.geocode(source).await?;
        let end = self.geocode(destination).await?;

        let route = osrm::find_route(
            self.transport.as_ref(),
            &self.osrm_api_url,
            start.location,
            end.location,
        )
        .await?;

        Ok(RouteResult {
            distance: format_distance(route.distance),
            duration: format_duration(route.duration),
            source: start.display_name,
            destination: end.display_name,
            coordinates: Some(Coordinates {
                start: start.location,
                end: end.location,
            }),
        })
    }
}

#[test]
fn converts_meters_to_kilometers() {
    assert_eq!(format_distance(15000.0), "15.0 km");
    assert_eq!(format_distance(1250.0), "1.3 km");
    assert_eq!(format_distance(1249.9), "1.2 km");
    assert_eq!(format_distance(0.0), "0.0 km");
    assert_eq!(format_distance(123456.7), "123.5 km");
}

#[test]
fn converts_seconds_to_minutes() {
    assert_eq!(format_duration(1500.0), "25 mins");
    assert_eq!(format_duration(89.0), "1 mins");
    assert_eq!(format_duration(90.0), "2 mins");
    assert_eq!(format_duration(0.0), "0 mins");
}
