//! Recording transport shared by the resource tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bgw_core::logging::NoopLogger;

use crate::dispatcher::Credentials;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

/// Remembers every request and answers with an empty success envelope.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub(crate) fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse {
            status: 200,
            body: br#"{"retCode":0,"retMsg":"OK","result":{},"retExtInfo":{},"time":1}"#.to_vec(),
        })
    }
}

pub(crate) fn recording_gateway() -> (Arc<Gateway>, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let gateway = Gateway::with_transport(
        transport.clone(),
        "https://api.bybit.com",
        Credentials::new("test-key", "test-secret"),
        Duration::from_secs(5),
        NoopLogger::shared(),
        false,
    );
    (Arc::new(gateway), transport)
}

/// Recorded request reduced to what the resource tests assert on.
#[derive(Debug)]
pub(crate) struct Sent {
    pub method: Method,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub signed: bool,
}

impl From<HttpRequest> for Sent {
    fn from(req: HttpRequest) -> Self {
        let signed = req.header("X-BAPI-SIGN").is_some();
        let (url, query) = match req.url.split_once('?') {
            Some((u, q)) => (u.to_string(), Some(q.to_string())),
            None => (req.url.clone(), None),
        };
        let path = url
            .strip_prefix("https://api.bybit.com/v5/")
            .unwrap_or(&url)
            .to_string();
        let params = match req.method {
            Method::Get => query
                .unwrap_or_default()
                .split('&')
                .filter_map(|kv| kv.split_once('='))
                .map(|(k, v)| {
                    (
                        urlencoding::decode(k).unwrap().into_owned(),
                        urlencoding::decode(v).unwrap().into_owned(),
                    )
                })
                .collect(),
            Method::Post => serde_json::from_str(req.body.as_deref().unwrap_or("{}")).unwrap(),
        };
        Self {
            method: req.method,
            path,
            params,
            signed,
        }
    }
}

pub(crate) fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
