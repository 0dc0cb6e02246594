use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::Config,
    error::{transport_error, Error},
};

/// An outbound GET request: URL, query string pairs and extra headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new<T: Into<String>>(url: T) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn query<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends a GET request and hands back the parsed JSON body.
///
/// Network failures, timeouts, non-2xx responses and bodies that are not
/// JSON all come back as transport errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: Request) -> Result<Value, Error>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip_all, fields(url = %request.url))]
    async fn get(&self, request: Request) -> Result<Value, Error> {
        let mut builder = self.client.get(&request.url).query(&request.query);

        for (key, value) in request.headers.iter() {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let res = builder.send().await?;

        let status_code = res.status().as_u16();

        if !res.status().is_success() {
            return Err(transport_error(format!(
                "unexpected status code {}",
                status_code
            )));
        }

        let data: Value = res.json().await?;

        Ok(data)
    }
}

#[test]
fn request_builder_collects_pairs() {
    let request = Request::new("https://example.test/search")
        .query("q", "Farm A")
        .query("limit", 1)
        .header("User-Agent", "AgriLogix-App");

    assert_eq!(request.query_value("q"), Some("Farm A"));
    assert_eq!(request.query_value("limit"), Some("1"));
    assert_eq!(request.query_value("format"), None);
    assert_eq!(
        request.headers,
        vec![("User-Agent".to_string(), "AgriLogix-App".to_string())]
    );
}

#[test]
fn http_transport_builds_from_config() {
    assert!(HttpTransport::new(&Config::default()).is_ok());
}
