use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{transport_error, Error},
    external::{Request, Transport},
};

pub const GOOGLE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const OSRM_URL: &str = "https://router.project-osrm.org/route/v1/driving/";

struct Rule {
    url_prefix: String,
    q: Option<String>,
    response: Result<Value, Error>,
}

/// Canned responses keyed by URL prefix (and optionally the `q` parameter);
/// every request is recorded.
#[derive(Default)]
pub struct FakeTransport {
    rules: Vec<Rule>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url_prefix: &str, response: Result<Value, Error>) -> Self {
        self.rules.push(Rule {
            url_prefix: url_prefix.into(),
            q: None,
            response,
        });
        self
    }

    pub fn respond_to_query(
        mut self,
        url_prefix: &str,
        q: &str,
        response: Result<Value, Error>,
    ) -> Self {
        self.rules.push(Rule {
            url_prefix: url_prefix.into(),
            q: Some(q.into()),
            response,
        });
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url_prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.starts_with(url_prefix))
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, request: Request) -> Result<Value, Error> {
        self.requests.lock().unwrap().push(request.clone());

        self.rules
            .iter()
            .find(|rule| {
                request.url.starts_with(&rule.url_prefix)
                    && match &rule.q {
                        Some(q) => request.query_value("q") == Some(q.as_str()),
                        None => true,
                    }
            })
            .map(|rule| rule.response.clone())
            .unwrap_or_else(|| Err(transport_error("connection refused")))
    }
}
