use crate::entities::{Coordinates, GeoPoint, RouteResult};

pub const DISTANCE: &str = "15.0 km";
pub const DURATION: &str = "25 mins";
pub const DEFAULT_SOURCE: &str = "Default Farm";
pub const DEFAULT_DESTINATION: &str = "Default Market";

// Lower Manhattan and Brooklyn
pub const START: GeoPoint = GeoPoint {
    lat: 40.7128,
    lng: -74.0060,
};
pub const END: GeoPoint = GeoPoint {
    lat: 40.7306,
    lng: -73.9352,
};

/// Synthetic route used when every real provider failed. Cannot fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fallback;

impl Fallback {
    pub fn route(&self, source: &str, destination: &str) -> RouteResult {
        RouteResult {
            distance: DISTANCE.into(),
            duration: DURATION.into(),
            source: or_default(source, DEFAULT_SOURCE),
            destination: or_default(destination, DEFAULT_DESTINATION),
            coordinates: Some(Coordinates {
                start: START,
                end: END,
            }),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.into()
    } else {
        value.into()
    }
}

#[test]
fn substitutes_default_names() {
    let route = Fallback.route("", "");

    assert_eq!(route.source, "Default Farm");
    assert_eq!(route.destination, "Default Market");
    assert_eq!(route.distance, "15.0 km");
    assert_eq!(route.duration, "25 mins");

    let route = Fallback.route("Farm A", "");
    assert_eq!(route.source, "Farm A");
    assert_eq!(route.destination, "Default Market");
}
