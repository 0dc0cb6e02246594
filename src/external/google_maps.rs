use serde::{Deserialize, Serialize};

use crate::{
    entities::{Coordinates, GeoPoint, RouteResult},
    error::{rejected_error, transport_error, Error},
    external::{Request, Transport},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,
    pub start_address: String,
    pub end_address: String,
    pub start_location: LatLng,
    pub end_location: LatLng,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

impl TryFrom<Leg> for RouteResult {
    type Error = Error;

    fn try_from(leg: Leg) -> Result<Self, Self::Error> {
        let start = GeoPoint::new(leg.start_location.lat, leg.start_location.lng)
            .map_err(|_| transport_error("malformed payload: start_location out of range"))?;
        let end = GeoPoint::new(leg.end_location.lat, leg.end_location.lng)
            .map_err(|_| transport_error("malformed payload: end_location out of range"))?;

        if leg.distance.text.trim().is_empty() {
            return Err(transport_error("malformed payload: empty distance text"));
        }
        if leg.duration.text.trim().is_empty() {
            return Err(transport_error("malformed payload: empty duration text"));
        }

        Ok(RouteResult {
            distance: leg.distance.text,
            duration: leg.duration.text,
            source: leg.start_address,
            destination: leg.end_address,
            coordinates: Some(Coordinates { start, end }),
        })
    }
}

/// First leg of the first driving route between two free-text places.
#[tracing::instrument(skip(transport, key))]
pub async fn find_directions(
    transport: &dyn Transport,
    api_base: &str,
    key: &str,
    origin: &str,
    destination: &str,
) -> Result<Leg, Error> {
    let url = format!("https://{}/maps/api/directions/json", api_base);

    let request = Request::new(url)
        .query("origin", origin)
        .query("destination", destination)
        .query("key", key);

    let data: Response = serde_json::from_value(transport.get(request).await?)?;

    if data.status != "OK" {
        return Err(rejected_error(data.status));
    }

    data.routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .ok_or_else(|| transport_error("malformed payload: no route legs"))
}
