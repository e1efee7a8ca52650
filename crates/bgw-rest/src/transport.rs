//! HTTP transport seam.
//!
//! The dispatcher assembles a fully-formed [`HttpRequest`] (URL with query,
//! headers, body) and hands it to a [`Transport`]. Production uses
//! [`ReqwestTransport`]; tests substitute an in-memory implementation.
//! A transport reports what the server said (status + raw body) and only
//! fails when no response arrived at all.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;

/// HTTP verbs used by the V5 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(GatewayError::InvalidArgument(format!(
                "unsupported method: {other}"
            ))),
        }
    }
}

/// A request ready to be put on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL, query string included.
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    /// JSON body for POST; `None` for GET.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of whatever the server answered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError>;
}

/// [`Transport`] backed by a shared `reqwest::Client` (connection pooling).
///
/// Only connection setup is bounded here. The round trip as a whole is
/// bounded by the dispatcher, per call.
pub struct ReqwestTransport {
    http: reqwest::Client,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::request_with("failed to build HTTP client", e))?;
        Ok(Self {
            http,
            connect_timeout,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.connect_timeout)
        } else if e.is_connect() {
            GatewayError::request_with("HTTP connect failed", e)
        } else {
            GatewayError::request_with("HTTP request failed", e)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
