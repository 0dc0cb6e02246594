use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// A WGS-84 position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid_input_error());
        }

        Ok(Self { lat, lng })
    }
}

/// Start and end of a resolved route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

#[test]
fn rejects_out_of_range_points() {
    assert!(GeoPoint::new(40.7128, -74.0060).is_ok());
    assert!(GeoPoint::new(90.0, 180.0).is_ok());
    assert!(GeoPoint::new(-90.0, -180.0).is_ok());

    assert!(GeoPoint::new(90.5, 0.0).is_err());
    assert!(GeoPoint::new(0.0, -180.1).is_err());
    assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
}
