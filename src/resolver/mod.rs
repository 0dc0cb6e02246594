//! Route resolution across mapping providers.
//!
//! Providers are tried in order and the first success wins. When all of them
//! fail the synthetic [`Fallback`] route is returned, so [`RouteResolver::resolve`]
//! never fails.

mod fallback;
mod google;
mod open_street_map;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    entities::RouteResult,
    error::Error,
    external::{HttpTransport, Transport},
};

pub use fallback::Fallback;
pub use google::GoogleDirections;
pub use open_street_map::{format_distance, format_duration, OpenStreetMap};

/// One tier of the chain.
///
/// Returning an unconfigured error skips the tier silently; any other error
/// is logged and the next tier is tried.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, source: &str, destination: &str) -> Result<RouteResult, Error>;
}

pub struct RouteResolver {
    providers: Vec<Box<dyn RouteProvider>>,
    fallback: Fallback,
}

impl RouteResolver {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new(config)?);

        Ok(Self::with_transport(config, transport))
    }

    /// Google Directions, then OpenStreetMap, then the fallback route.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::with_providers(vec![
            Box::new(GoogleDirections::new(config, transport.clone())),
            Box::new(OpenStreetMap::new(config, transport)),
        ])
    }

    pub fn with_providers(providers: Vec<Box<dyn RouteProvider>>) -> Self {
        Self {
            providers,
            fallback: Fallback,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, source: &str, destination: &str) -> RouteResult {
        let last = self.providers.len().saturating_sub(1);

        for (i, provider) in self.providers.iter().enumerate() {
            let err = match provider.attempt(source, destination).await {
                Ok(route) => return route,
                Err(err) => err,
            };

            if err.is_unconfigured() {
                continue;
            }

            // the last real provider failing means the caller gets a synthetic route
            if i == last {
                tracing::error!(provider = provider.name(), error = %err, "routing failed, using fallback route");
            } else {
                tracing::warn!(provider = provider.name(), error = %err, "routing failed, trying next provider");
            }
        }

        self.fallback.route(source, destination)
    }
}

#[cfg(test)]
fn google_ok() -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "routes": [{
            "legs": [{
                "distance": { "text": "12.3 km", "value": 12300 },
                "duration": { "text": "21 mins", "value": 1260 },
                "start_address": "Farm A, Albany, NY, USA",
                "end_address": "Market NYC, New York, NY, USA",
                "start_location": { "lat": 42.6526, "lng": -73.7562 },
                "end_location": { "lat": 40.7306, "lng": -73.9352 }
            }]
        }]
    })
}

#[cfg(test)]
fn nominatim_hit(lat: &str, lon: &str, display_name: &str) -> serde_json::Value {
    serde_json::json!([{ "lat": lat, "lon": lon, "display_name": display_name }])
}

#[cfg(test)]
fn open_street_map_transport() -> crate::external::fake::FakeTransport {
    use crate::external::fake::{FakeTransport, NOMINATIM_URL, OSRM_URL};

    FakeTransport::new()
        .respond_to_query(
            NOMINATIM_URL,
            "Farm A",
            Ok(nominatim_hit("42.6526", "-73.7562", "Farm A, Albany County, New York")),
        )
        .respond_to_query(
            NOMINATIM_URL,
            "Market NYC",
            Ok(nominatim_hit("40.7306", "-73.9352", "Brooklyn, Kings County, New York")),
        )
        .respond(
            OSRM_URL,
            Ok(serde_json::json!({
                "code": "Ok",
                "routes": [{ "distance": 15000.0, "duration": 1500.0 }]
            })),
        )
}

#[cfg(test)]
fn keyed_config() -> Config {
    Config {
        google_maps_api_key: Some("abc123".into()),
        ..Config::default()
    }
}

#[test]
fn all_providers_failing_yields_fallback_route() {
    use crate::entities::{Coordinates, GeoPoint};
    use crate::external::fake::FakeTransport;
    use tokio_test::block_on;

    let transport = Arc::new(FakeTransport::new());
    let resolver = RouteResolver::with_transport(&keyed_config(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(
        route,
        RouteResult {
            distance: "15.0 km".into(),
            duration: "25 mins".into(),
            source: "Farm A".into(),
            destination: "Market NYC".into(),
            coordinates: Some(Coordinates {
                start: GeoPoint { lat: 40.7128, lng: -74.0060 },
                end: GeoPoint { lat: 40.7306, lng: -73.9352 },
            }),
        }
    );
}

#[test]
fn missing_credential_never_calls_google() {
    use crate::external::fake::{FakeTransport, GOOGLE_URL, NOMINATIM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(FakeTransport::new().respond(GOOGLE_URL, Ok(google_ok())));
    let resolver = RouteResolver::with_transport(&Config::default(), transport.clone());

    block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(transport.calls_to(GOOGLE_URL), 0);
    assert_eq!(transport.calls_to(NOMINATIM_URL), 1);
}

#[test]
fn placeholder_credential_never_calls_google() {
    use crate::config::PLACEHOLDER_API_KEY;
    use crate::external::fake::{FakeTransport, GOOGLE_URL};
    use tokio_test::block_on;

    let config = Config {
        google_maps_api_key: Some(PLACEHOLDER_API_KEY.into()),
        ..Config::default()
    };
    let transport = Arc::new(FakeTransport::new().respond(GOOGLE_URL, Ok(google_ok())));
    let resolver = RouteResolver::with_transport(&config, transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(transport.calls_to(GOOGLE_URL), 0);
    assert_eq!(route.distance, "15.0 km");
}

#[test]
fn google_success_is_used_as_is() {
    use crate::external::fake::{FakeTransport, GOOGLE_URL, NOMINATIM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(FakeTransport::new().respond(GOOGLE_URL, Ok(google_ok())));
    let resolver = RouteResolver::with_transport(&keyed_config(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(route.distance, "12.3 km");
    assert_eq!(route.duration, "21 mins");
    assert_eq!(route.source, "Farm A, Albany, NY, USA");
    assert_eq!(route.destination, "Market NYC, New York, NY, USA");
    let coordinates = route.coordinates.unwrap();
    assert_eq!(coordinates.start.lat, 42.6526);
    assert_eq!(coordinates.end.lng, -73.9352);

    assert_eq!(transport.calls_to(NOMINATIM_URL), 0);

    let request = &transport.requests()[0];
    assert_eq!(request.query_value("origin"), Some("Farm A"));
    assert_eq!(request.query_value("destination"), Some("Market NYC"));
    assert_eq!(request.query_value("key"), Some("abc123"));
}

#[test]
fn google_rejection_falls_through_to_open_street_map() {
    use crate::external::fake::{GOOGLE_URL, NOMINATIM_URL, OSRM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(open_street_map_transport().respond(
        GOOGLE_URL,
        Ok(serde_json::json!({ "status": "REQUEST_DENIED", "routes": [] })),
    ));
    let resolver = RouteResolver::with_transport(&keyed_config(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(route.distance, "15.0 km");
    assert_eq!(route.duration, "25 mins");
    assert_eq!(route.source, "Farm A");
    assert_eq!(route.destination, "Brooklyn");
    assert_eq!(route.coordinates.unwrap().start.lat, 42.6526);

    assert_eq!(transport.calls_to(GOOGLE_URL), 1);
    assert_eq!(transport.calls_to(NOMINATIM_URL), 2);
    assert_eq!(transport.calls_to(OSRM_URL), 1);
}

#[test]
fn google_transport_error_attempts_open_street_map_once() {
    use crate::error::transport_error;
    use crate::external::fake::{GOOGLE_URL, OSRM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(
        open_street_map_transport().respond(GOOGLE_URL, Err(transport_error("timed out"))),
    );
    let resolver = RouteResolver::with_transport(&keyed_config(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(route.destination, "Brooklyn");
    assert_eq!(transport.calls_to(GOOGLE_URL), 1);
    assert_eq!(transport.calls_to(OSRM_URL), 1);
}

#[test]
fn google_out_of_range_coordinates_are_malformed() {
    use crate::external::fake::{GOOGLE_URL, OSRM_URL};
    use tokio_test::block_on;

    let mut payload = google_ok();
    payload["routes"][0]["legs"][0]["start_location"]["lat"] = serde_json::json!(123.0);

    let transport = Arc::new(open_street_map_transport().respond(GOOGLE_URL, Ok(payload)));
    let resolver = RouteResolver::with_transport(&keyed_config(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(route.destination, "Brooklyn");
    assert_eq!(transport.calls_to(OSRM_URL), 1);
}

#[test]
fn google_empty_distance_or_duration_is_malformed() {
    use crate::external::fake::{GOOGLE_URL, OSRM_URL};
    use tokio_test::block_on;

    for field in ["distance", "duration"] {
        let mut payload = google_ok();
        payload["routes"][0]["legs"][0][field]["text"] = serde_json::json!(" ");

        let transport = Arc::new(open_street_map_transport().respond(GOOGLE_URL, Ok(payload)));
        let resolver = RouteResolver::with_transport(&keyed_config(), transport.clone());

        let route = block_on(resolver.resolve("Farm A", "Market NYC"));

        assert_eq!(route.distance, "15.0 km");
        assert_eq!(route.duration, "25 mins");
        assert_eq!(route.destination, "Brooklyn");
        assert_eq!(transport.calls_to(OSRM_URL), 1);
    }
}

#[test]
fn empty_geocode_result_uses_fallback_coordinates() {
    use crate::external::fake::{FakeTransport, NOMINATIM_URL, OSRM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(
        FakeTransport::new()
            .respond_to_query(
                NOMINATIM_URL,
                "Farm A",
                Ok(nominatim_hit("42.6526", "-73.7562", "Farm A, Albany County")),
            )
            .respond_to_query(NOMINATIM_URL, "Atlantis", Ok(serde_json::json!([]))),
    );
    let resolver = RouteResolver::with_transport(&Config::default(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Atlantis"));

    assert_eq!(route, Fallback.route("Farm A", "Atlantis"));
    assert_eq!(transport.calls_to(OSRM_URL), 0);
}

#[test]
fn osrm_rejection_uses_fallback() {
    use crate::external::fake::{FakeTransport, NOMINATIM_URL, OSRM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(
        FakeTransport::new()
            .respond(NOMINATIM_URL, Ok(nominatim_hit("40.0", "-74.0", "Somewhere")))
            .respond(OSRM_URL, Ok(serde_json::json!({ "code": "NoRoute" }))),
    );
    let resolver = RouteResolver::with_transport(&Config::default(), transport.clone());

    let route = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(route, Fallback.route("Farm A", "Market NYC"));
}

#[test]
fn open_street_map_requests_are_well_formed() {
    use crate::external::fake::{NOMINATIM_URL, OSRM_URL};
    use tokio_test::block_on;

    let transport = Arc::new(open_street_map_transport());
    let resolver = RouteResolver::with_transport(&Config::default(), transport.clone());

    block_on(resolver.resolve("Farm A", "Market NYC"));

    let requests = transport.requests();

    let geocode = &requests[0];
    assert!(geocode.url.starts_with(NOMINATIM_URL));
    assert_eq!(geocode.query_value("q"), Some("Farm A"));
    assert_eq!(geocode.query_value("format"), Some("json"));
    assert_eq!(geocode.query_value("limit"), Some("1"));
    assert!(geocode
        .headers
        .contains(&("User-Agent".to_string(), "AgriLogix-App".to_string())));

    let route = &requests[2];
    assert_eq!(
        route.url,
        format!("{}-73.7562,42.6526;-73.9352,40.7306", OSRM_URL)
    );
    assert_eq!(route.query_value("overview"), Some("false"));
}

#[test]
fn empty_inputs_get_default_names() {
    use crate::external::fake::FakeTransport;
    use tokio_test::block_on;

    let resolver =
        RouteResolver::with_transport(&Config::default(), Arc::new(FakeTransport::new()));

    let route = block_on(resolver.resolve("", ""));

    assert_eq!(route.source, "Default Farm");
    assert_eq!(route.destination, "Default Market");
    assert!(!route.distance.is_empty());
    assert!(!route.duration.is_empty());
}

#[test]
fn identical_inputs_give_identical_results() {
    use tokio_test::block_on;

    let resolver =
        RouteResolver::with_transport(&Config::default(), Arc::new(open_street_map_transport()));

    let first = block_on(resolver.resolve("Farm A", "Market NYC"));
    let second = block_on(resolver.resolve("Farm A", "Market NYC"));

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[cfg(test)]
struct Scripted {
    name: &'static str,
    outcome: Result<RouteResult, Error>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[async_trait]
impl RouteProvider for Arc<Scripted> {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(&self, _: &str, _: &str) -> Result<RouteResult, Error> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[test]
fn first_success_wins_and_later_providers_are_not_tried() {
    use crate::error::{rejected_error, unconfigured_error};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::block_on;

    let scripted = |name, outcome| {
        Arc::new(Scripted {
            name,
            outcome,
            calls: AtomicUsize::new(0),
        })
    };

    let found = RouteResult {
        distance: "3.0 km".into(),
        duration: "7 mins".into(),
        source: "a".into(),
        destination: "b".into(),
        coordinates: None,
    };

    let skipped = scripted("skipped", Err(unconfigured_error()));
    let rejected = scripted("rejected", Err(rejected_error("ZERO_RESULTS")));
    let winner = scripted("winner", Ok(found.clone()));
    let never = scripted("never", Ok(Fallback.route("x", "y")));

    let resolver = RouteResolver::with_providers(vec![
        Box::new(skipped.clone()),
        Box::new(rejected.clone()),
        Box::new(winner.clone()),
        Box::new(never.clone()),
    ]);

    assert_eq!(block_on(resolver.resolve("a", "b")), found);
    assert_eq!(skipped.calls.load(Ordering::SeqCst), 1);
    assert_eq!(rejected.calls.load(Ordering::SeqCst), 1);
    assert_eq!(winner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(never.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn no_providers_still_resolves() {
    use tokio_test::block_on;

    let resolver = RouteResolver::with_providers(Vec::new());

    assert_eq!(
        block_on(resolver.resolve("Farm A", "Market NYC")),
        Fallback.route("Farm A", "Market NYC")
    );
}

#[cfg(test)]
#[derive(Clone, Default)]
struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// WARN and ERROR lines emitted while resolving one route.
#[cfg(test)]
fn logged_failures(config: &Config, transport: crate::external::fake::FakeTransport) -> Vec<String> {
    use tokio_test::block_on;

    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let resolver = RouteResolver::with_transport(config, Arc::new(transport));
    tracing::subscriber::with_default(subscriber, || {
        block_on(resolver.resolve("Farm A", "Market NYC"));
    });

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    output
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with("WARN") || line.starts_with("ERROR"))
        .map(String::from)
        .collect()
}

#[test]
fn google_failure_before_a_success_logs_one_warning() {
    use crate::external::fake::GOOGLE_URL;

    let transport = open_street_map_transport().respond(
        GOOGLE_URL,
        Ok(serde_json::json!({ "status": "REQUEST_DENIED" })),
    );

    let lines = logged_failures(&keyed_config(), transport);

    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].starts_with("WARN"));
    assert!(lines[0].contains("google_maps"));
}

#[test]
fn every_provider_failing_logs_warning_then_error() {
    use crate::external::fake::FakeTransport;

    let lines = logged_failures(&keyed_config(), FakeTransport::new());

    assert_eq!(lines.len(), 2, "{:?}", lines);
    assert!(lines[0].starts_with("WARN"));
    assert!(lines[0].contains("google_maps"));
    assert!(lines[1].starts_with("ERROR"));
    assert!(lines[1].contains("open_street_map"));
}

#[test]
fn unconfigured_google_is_skipped_without_logging() {
    use crate::external::fake::FakeTransport;

    let lines = logged_failures(&Config::default(), FakeTransport::new());

    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].starts_with("ERROR"));
    assert!(lines[0].contains("open_street_map"));
    assert!(!lines.iter().any(|line| line.contains("google_maps")));
}
