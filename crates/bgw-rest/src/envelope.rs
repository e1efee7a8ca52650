//! Bybit V5 response envelope.
//!
//! Every V5 endpoint answers with the same wrapper:
//!
//! ```json
//! { "retCode": 0, "retMsg": "OK", "result": {}, "retExtInfo": {}, "time": 1700000000000 }
//! ```
//!
//! `retCode` and `retMsg` are required; `result` and `retExtInfo` are kept as
//! opaque JSON values and default to `null`; `time` defaults to `0`. A
//! `retCode` of `0` is success. Anything else is a business failure even on
//! HTTP 200, and must go through [`classify_vendor_code`] before it reaches a
//! caller ([`Envelope::into_result`] does that).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, classify_vendor_code};

/// Normalized response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Vendor return code (`0` = success).
    #[serde(rename = "retCode")]
    pub code: i64,

    /// Vendor return message.
    #[serde(rename = "retMsg")]
    pub message: String,

    /// Endpoint-specific payload, undecoded.
    #[serde(rename = "result", default)]
    pub payload: serde_json::Value,

    /// Endpoint-specific extra info, undecoded.
    #[serde(rename = "retExtInfo", default)]
    pub extra: serde_json::Value,

    /// Server time in milliseconds.
    #[serde(rename = "time", default)]
    pub server_time: i64,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Pass a successful envelope through; classify a failed one.
    pub fn into_result(self) -> Result<Envelope, GatewayError> {
        match classify_vendor_code(self.code) {
            None => Ok(self),
            Some(kind) => Err(GatewayError::Vendor {
                kind,
                code: self.code,
                message: self.message,
            }),
        }
    }

    /// Decode the opaque payload into a caller-chosen type.
    pub fn decode_result<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            GatewayError::invalid_response(format!("result does not match expected shape: {e}"), Some(e))
        })
    }
}

/// Parse raw response bytes into an [`Envelope`].
///
/// Never panics; any malformed or incomplete body is
/// [`GatewayError::InvalidResponse`].
pub fn parse(bytes: &[u8]) -> Result<Envelope, GatewayError> {
    serde_json::from_slice::<Envelope>(bytes).map_err(|e| {
        let preview: String = String::from_utf8_lossy(bytes).chars().take(128).collect();
        GatewayError::invalid_response(format!("{e} (body: {preview})"), Some(e))
    })
}
