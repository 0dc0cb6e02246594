use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Travel summary attached to a shipment when it is created.
///
/// `distance` and `duration` keep the formatting of whichever provider
/// produced them ("15.0 km", "1 hour 5 mins", ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub distance: String,
    pub duration: String,
    pub source: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub coordinates: Option<Coordinates>,
}

#[test]
fn serializes_like_route_data() {
    use crate::entities::GeoPoint;
    use serde_json::json;

    let route = RouteResult {
        distance: "15.0 km".into(),
        duration: "25 mins".into(),
        source: "Farm A".into(),
        destination: "Market NYC".into(),
        coordinates: Some(Coordinates {
            start: GeoPoint::new(40.7128, -74.006).unwrap(),
            end: GeoPoint::new(40.7306, -73.9352).unwrap(),
        }),
    };

    assert_eq!(
        serde_json::to_value(&route).unwrap(),
        json!({
            "distance": "15.0 km",
            "duration": "25 mins",
            "source": "Farm A",
            "destination": "Market NYC",
            "coordinates": {
                "start": { "lat": 40.7128, "lng": -74.006 },
                "end": { "lat": 40.7306, "lng": -73.9352 }
            }
        })
    );

    let bare = RouteResult {
        coordinates: None,
        ..route
    };
    assert!(serde_json::to_value(&bare).unwrap().get("coordinates").is_none());
}
