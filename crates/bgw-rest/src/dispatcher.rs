//! Request assembly, signing, and dispatch.
//!
//! | Method | Parameters go to              | Body                     |
//! |--------|-------------------------------|--------------------------|
//! | GET    | percent-encoded query string  | none                     |
//! | POST   | JSON object body              | `application/json`       |
//!
//! Authenticated requests carry three headers computed over the exact
//! [`ParamSet`] that goes on the wire:
//!
//! | Header             | Value                          |
//! |--------------------|--------------------------------|
//! | `X-BAPI-API-KEY`   | API key                        |
//! | `X-BAPI-TIMESTAMP` | milliseconds, taken at signing |
//! | `X-BAPI-SIGN`      | hex HMAC-SHA256                |
//!
//! One bounded-timeout round trip per call, no retry. A non-2xx status is
//! returned as [`GatewayError::Http`] with the raw body and is never parsed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bgw_core::config::mask;
use bgw_core::logging::SharedLogger;
use bgw_core::time_util::now_ms;
use tokio_util::sync::CancellationToken;

use crate::error::GatewayError;
use crate::params::ParamSet;
use crate::signing;
use crate::transport::{HttpRequest, Method, Transport};

/// API version segment inserted between base URL and endpoint.
pub const API_VERSION: &str = "v5";

pub const HEADER_API_KEY: &str = "X-BAPI-API-KEY";
pub const HEADER_TIMESTAMP: &str = "X-BAPI-TIMESTAMP";
pub const HEADER_SIGN: &str = "X-BAPI-SIGN";

/// Immutable API key / secret pair.
///
/// `Debug` masks the key and hides the secret.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Replaces the dispatcher's default timeout for this call.
    pub timeout: Option<Duration>,
    /// Cancelling this token aborts the in-flight HTTP call.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    pub fn with_cancel(token: CancellationToken) -> Self {
        Self {
            timeout: None,
            cancel: Some(token),
        }
    }
}

/// Builds signed requests and sends them through a [`Transport`].
pub struct RequestDispatcher {
    transport: Arc<dyn Transport>,
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    logger: SharedLogger,
    debug: bool,
}

impl RequestDispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
        logger: SharedLogger,
        debug: bool,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            credentials,
            timeout,
            logger,
            debug,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/v5/{endpoint}` without query string.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_VERSION,
            endpoint.trim_start_matches('/')
        )
    }

    /// Assemble the wire request, signing it with the current time when
    /// `needs_auth` is set.
    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &ParamSet,
        needs_auth: bool,
    ) -> Result<HttpRequest, GatewayError> {
        self.build_request_inner(method, endpoint, params, needs_auth, now_ms)
    }

    /// Same as [`build_request`](Self::build_request) with a fixed timestamp.
    pub fn build_request_at(
        &self,
        method: Method,
        endpoint: &str,
        params: &ParamSet,
        needs_auth: bool,
        timestamp: i64,
    ) -> Result<HttpRequest, GatewayError> {
        self.build_request_inner(method, endpoint, params, needs_auth, || timestamp)
    }

    fn build_request_inner(
        &self,
        method: Method,
        endpoint: &str,
        params: &ParamSet,
        needs_auth: bool,
        clock: impl FnOnce() -> i64,
    ) -> Result<HttpRequest, GatewayError> {
        let mut url = self.endpoint_url(endpoint);
        let mut headers: Vec<(&'static str, String)> = Vec::with_capacity(4);

        let body = match method {
            Method::Get => {
                if !params.is_empty() {
                    url.push('?');
                    url.push_str(&params.to_query_string());
                }
                None
            }
            Method::Post => {
                let json = params
                    .to_json()
                    .map_err(|e| GatewayError::request_with("failed to encode request body", e))?;
                headers.push(("Content-Type", "application/json".to_string()));
                Some(json)
            }
        };

        // Parameters are final at this point; sign exactly what gets sent.
        if needs_auth {
            let timestamp = clock();
            let signature = signing::sign(
                params,
                self.credentials.api_key(),
                self.credentials.api_secret(),
                timestamp,
            );
            headers.push((HEADER_API_KEY, self.credentials.api_key().to_string()));
            headers.push((HEADER_TIMESTAMP, timestamp.to_string()));
            headers.push((HEADER_SIGN, signature));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send one request and return the raw 2xx body.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &ParamSet,
        needs_auth: bool,
        options: &CallOptions,
    ) -> Result<Vec<u8>, GatewayError> {
        let request = self.build_request(method, endpoint, params, needs_auth)?;
        if self.debug {
            self.logger.debug(&format!(
                "{} {} auth={} key={}",
                request.method,
                request.url,
                needs_auth,
                mask(self.credentials.api_key())
            ));
        }

        let timeout = options.timeout.unwrap_or(self.timeout);
        let call = tokio::time::timeout(timeout, self.transport.send(request));
        let outcome = match &options.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(GatewayError::Cancelled),
                res = call => res,
            },
            None => call.await,
        };
        let response = outcome.map_err(|_| GatewayError::Timeout(timeout))??;

        if self.debug {
            self.logger.debug(&format!(
                "{} {} -> {} {}",
                method,
                endpoint,
                response.status,
                String::from_utf8_lossy(&response.body)
            ));
        }

        if !response.is_success() {
            return Err(GatewayError::Http {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response.body)
    }
}
