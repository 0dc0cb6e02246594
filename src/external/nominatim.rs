use serde::{Deserialize, Serialize};

use crate::{
    entities::GeoPoint,
    error::{not_found_error, transport_error, Error},
    external::{Request, Transport},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Best match for a free-text search.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub location: GeoPoint,
    pub display_name: String,
}

/// Nominatim returns the full address; only the part before the first comma
/// is kept for display.
pub fn short_name(display_name: &str) -> &str {
    display_name.split(',').next().unwrap_or(display_name)
}

#[tracing::instrument(skip(transport))]
pub async fn geocode(
    transport: &dyn Transport,
    api_url: &str,
    user_agent: &str,
    query: &str,
) -> Result<Place, Error> {
    let url = format!("{}/search", api_url.trim_end_matches('/'));

    let request = Request::new(url)
        .query("q", query)
        .query("format", "json")
        .query("limit", 1)
        .header("User-Agent", user_agent);

    let results: Vec<SearchResult> = serde_json::from_value(transport.get(request).await?)?;

    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| not_found_error(query))?;

    let lat: f64 = result
        .lat
        .trim()
        .parse()
        .map_err(|_| transport_error(format!("malformed payload: lat {:?}", result.lat)))?;
    let lng: f64 = result
        .lon
        .trim()
        .parse()
        .map_err(|_| transport_error(format!("malformed payload: lon {:?}", result.lon)))?;

    let location = GeoPoint::new(lat, lng)
        .map_err(|_| transport_error("malformed payload: coordinates out of range"))?;

    Ok(Place {
        location,
        display_name: short_name(&result.display_name).to_string(),
    })
}

#[test]
fn short_name_keeps_text_before_first_comma() {
    assert_eq!(
        short_name("Brooklyn, Kings County, New York, United States"),
        "Brooklyn"
    );
    assert_eq!(short_name("Nowhere"), "Nowhere");
    assert_eq!(short_name(""), "");
}
