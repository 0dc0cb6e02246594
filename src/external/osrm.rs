use serde::{Deserialize, Serialize};

use crate::{
    entities::GeoPoint,
    error::{rejected_error, transport_error, Error},
    external::{Request, Transport},
};

/// Distance in meters, duration in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance: f64,
    pub duration: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[tracing::instrument(skip(transport))]
pub async fn find_route(
    transport: &dyn Transport,
    api_url: &str,
    start: GeoPoint,
    end: GeoPoint,
) -> Result<Route, Error> {
    // OSRM takes lng,lat pairs
    let url = format!(
        "{}/route/v1/driving/{},{};{},{}",
        api_url.trim_end_matches('/'),
        start.lng,
        start.lat,
        end.lng,
        end.lat
    );

    let request = Request::new(url).query("overview", "false");

    let data: Response = serde_json::from_value(transport.get(request).await?)?;

    if data.code != "Ok" {
        return Err(rejected_error(data.code));
    }

    data.routes
        .into_iter()
        .next()
        .ok_or_else(|| transport_error("malformed payload: no routes"))
}
