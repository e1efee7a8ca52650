//! The single choke point for every V5 call.
//!
//! ```text
//! caller ─ ParamSet ─▶ Gateway::execute
//!                        ├── RequestDispatcher (sign if needed, send, non-2xx → Http)
//!                        ├── envelope::parse   (malformed → InvalidResponse)
//!                        └── Envelope::into_result (retCode != 0 → Vendor{kind})
//! ```
//!
//! A `Gateway` holds only values fixed at construction (credentials, base
//! URL, transport, logger), so it is shared as `Arc<Gateway>` and called
//! from any number of tasks without locking.

use std::sync::Arc;
use std::time::Duration;

use bgw_core::config::BybitConfig;
use bgw_core::logging::SharedLogger;
use uuid::Uuid;

use crate::dispatcher::{CallOptions, Credentials, RequestDispatcher};
use crate::envelope::{self, Envelope};
use crate::error::GatewayError;
use crate::params::ParamSet;
use crate::transport::{Method, ReqwestTransport, Transport};

/// Signed request gateway for the Bybit V5 REST API.
pub struct Gateway {
    dispatcher: RequestDispatcher,
    logger: SharedLogger,
}

impl Gateway {
    /// Build a gateway over a reqwest transport from the config block.
    /// `timeoutMs` bounds connection setup and is the default per-call limit.
    pub fn new(config: &BybitConfig, logger: SharedLogger) -> Result<Self, GatewayError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
        Ok(Self::with_transport(
            transport,
            config.base_url.clone(),
            Credentials::new(config.api_key.clone(), config.api_secret.clone()),
            config.timeout(),
            logger,
            config.debug,
        ))
    }

    /// Build a gateway over any [`Transport`].
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
        logger: SharedLogger,
        debug: bool,
    ) -> Self {
        let dispatcher = RequestDispatcher::new(
            transport,
            base_url,
            credentials,
            timeout,
            Arc::clone(&logger),
            debug,
        );
        logger.info(&format!(
            "gateway ready: base_url={}",
            dispatcher.base_url()
        ));
        Self { dispatcher, logger }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Dispatch, parse, and classify one call with default options.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        params: ParamSet,
        needs_auth: bool,
    ) -> Result<Envelope, GatewayError> {
        self.execute_with(method, endpoint, params, needs_auth, CallOptions::default())
            .await
    }

    /// [`execute`](Self::execute) with a per-call timeout and/or cancellation token.
    pub async fn execute_with(
        &self,
        method: Method,
        endpoint: &str,
        params: ParamSet,
        needs_auth: bool,
        options: CallOptions,
    ) -> Result<Envelope, GatewayError> {
        let request_id = Uuid::new_v4();
        self.logger.debug(&format!(
            "[{request_id}] {method} {endpoint} params={} auth={needs_auth}",
            params.len()
        ));

        let result = self
            .dispatcher
            .send(method, endpoint, &params, needs_auth, &options)
            .await
            .and_then(|bytes| envelope::parse(&bytes))
            .and_then(Envelope::into_result);

        match &result {
            Ok(env) => self.logger.debug(&format!(
                "[{request_id}] {method} {endpoint} ok time={}",
                env.server_time
            )),
            Err(e) => self.logger.warn(&format!(
                "[{request_id}] {method} {endpoint} failed ({}): {e}",
                e.kind()
            )),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bgw_core::logging::{Logger, NoopLogger};
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::{HttpRequest, HttpResponse};

    /// Echoes the request's parameters back inside a success envelope.
    #[derive(Default)]
    struct EchoTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let params: serde_json::Map<String, serde_json::Value> = match request.method {
                Method::Get => request
                    .url
                    .split_once('?')
                    .map(|(_, q)| {
                        q.split('&')
                            .filter_map(|kv| kv.split_once('='))
                            .map(|(k, v)| (k.to_string(), json!(v)))
                            .collect()
                    })
                    .unwrap_or_default(),
                Method::Post => serde_json::from_str(request.body.as_deref().unwrap_or("{}"))
                    .map_err(|e| GatewayError::request_with("bad body", e))?,
            };
            // Yield so concurrent calls interleave.
            tokio::task::yield_now().await;
            let body = json!({
                "retCode": 0,
                "retMsg": "OK",
                "result": { "echo": params, "signed": request.header("X-BAPI-SIGN").is_some() },
                "retExtInfo": {},
                "time": 1_700_000_000_000i64,
            });
            Ok(HttpResponse {
                status: 200,
                body: body.to_string().into_bytes(),
            })
        }
    }

    struct CannedTransport {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, GatewayError> {
            Ok(HttpResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    #[derive(Default)]
    struct CapturingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for CapturingLogger {
        fn debug(&self, msg: &str) {
            self.lines.lock().unwrap().push(msg.to_string());
        }
        fn info(&self, msg: &str) {
            self.lines.lock().unwrap().push(msg.to_string());
        }
        fn warn(&self, msg: &str) {
            self.lines.lock().unwrap().push(msg.to_string());
        }
        fn error(&self, msg: &str) {
            self.lines.lock().unwrap().push(msg.to_string());
        }
    }

    fn gateway(transport: Arc<dyn Transport>) -> Gateway {
        Gateway::with_transport(
            transport,
            "https://api.bybit.com",
            Credentials::new("test-key", "test-secret"),
            Duration::from_secs(5),
            NoopLogger::shared(),
            false,
        )
    }

    fn canned(status: u16, body: &'static str) -> Gateway {
        gateway(Arc::new(CannedTransport { status, body }))
    }

    #[tokio::test]
    async fn success_envelope_is_returned() {
        let gw = canned(
            200,
            r#"{"retCode":0,"retMsg":"OK","result":{"foo":"bar"},"retExtInfo":{},"time":1700000000000}"#,
        );
        let env = gw
            .execute(Method::Get, "market/time", ParamSet::new(), false)
            .await
            .unwrap();
        assert_eq!(env.code, 0);
        assert_eq!(env.payload, json!({ "foo": "bar" }));
        assert_eq!(env.server_time, 1_700_000_000_000);
    }

    #[tokio::test]
    async fn vendor_failure_is_classified_with_message() {
        let gw = canned(
            200,
            r#"{"retCode":10010,"retMsg":"Too many visits!","result":{},"retExtInfo":{},"time":1}"#,
        );
        let err = gw
            .execute(Method::Post, "order/create", ParamSet::new(), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(err.to_string().contains("Too many visits!"));
    }

    #[tokio::test]
    async fn insufficient_balance_has_its_own_kind() {
        let gw = canned(200, r#"{"retCode":30031,"retMsg":"balance","result":null,"time":1}"#);
        let err = gw
            .execute(Method::Post, "order/create", ParamSet::new(), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    }

    #[tokio::test]
    async fn http_500_is_not_parsed() {
        let gw = canned(500, "boom");
        let err = gw
            .execute(Method::Get, "market/time", ParamSet::new(), false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(matches!(err, GatewayError::Http { ref body, .. } if body == "boom"));
    }

    #[tokio::test]
    async fn malformed_body_is_response_invalid() {
        let gw = canned(200, "not json");
        let err = gw
            .execute(Method::Get, "market/time", ParamSet::new(), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseInvalid);
    }

    #[tokio::test]
    async fn auth_flag_controls_signing() {
        let gw = gateway(Arc::new(EchoTransport::default()));
        let signed = gw
            .execute(Method::Get, "account/info", ParamSet::new(), true)
            .await
            .unwrap();
        assert_eq!(signed.payload["signed"], true);

        let public = gw
            .execute(Method::Get, "market/time", ParamSet::new(), false)
            .await
            .unwrap();
        assert_eq!(public.payload["signed"], false);
    }

    #[tokio::test]
    async fn concurrent_calls_do_not_leak() {
        let transport = Arc::new(EchoTransport::default());
        let gw = Arc::new(gateway(transport.clone()));

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..64 {
            let gw = Arc::clone(&gw);
            tasks.spawn(async move {
                let symbol = format!("SYM{i}USDT");
                let method = if i % 2 == 0 { Method::Get } else { Method::Post };
                let params = ParamSet::from([("category", "linear"), ("symbol", symbol.as_str())]);
                let env = gw.execute(method, "order/realtime", params, true).await.unwrap();
                (symbol, env)
            });
        }

        let mut seen = 0;
        while let Some(joined) = tasks.join_next().await {
            let (symbol, env) = joined.unwrap();
            assert_eq!(env.payload["echo"]["symbol"], symbol.as_str());
            assert_eq!(env.payload["echo"]["category"], "linear");
            seen += 1;
        }
        assert_eq!(seen, 64);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 64);
    }

    #[tokio::test]
    async fn secret_never_reaches_the_logger() {
        let logger = Arc::new(CapturingLogger::default());
        let gw = Gateway::with_transport(
            Arc::new(CannedTransport {
                status: 200,
                body: r#"{"retCode":10004,"retMsg":"error sign!","result":{},"time":1}"#,
            }),
            "https://api.bybit.com",
            Credentials::new("abcdefgh-key", "very-secret-value"),
            Duration::from_secs(5),
            logger.clone(),
            true,
        );
        let err = gw
            .execute(Method::Get, "account/info", ParamSet::new(), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSignature);

        let lines = logger.lines.lock().unwrap();
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| !l.contains("very-secret-value")));
        assert!(lines.iter().all(|l| !l.contains("abcdefgh-key")));
    }
}
