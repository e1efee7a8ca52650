//! Gateway error taxonomy.
//!
//! Three failure layers are kept apart:
//!
//! 1. **Transport**: no response, timeout, cancellation, or a non-2xx
//!    status ([`GatewayError::Request`], [`GatewayError::Timeout`],
//!    [`GatewayError::Cancelled`], [`GatewayError::Http`]).
//! 2. **Parse**: the body is not a well-formed envelope
//!    ([`GatewayError::InvalidResponse`]).
//! 3. **Vendor**: a well-formed envelope with a non-zero `retCode`
//!    ([`GatewayError::Vendor`]).
//!
//! Every variant maps to exactly one [`ErrorKind`] via [`GatewayError::kind`].
//!
//! # Vendor code table
//!
//! | `retCode`        | kind                  |
//! |------------------|-----------------------|
//! | 0                | success               |
//! | 10001–10003      | `InvalidParameter`    |
//! | 10004            | `InvalidSignature`    |
//! | 10005            | `AuthFailed`          |
//! | 10006, 10007     | `PermissionDenied`    |
//! | 10010            | `RateLimited`         |
//! | 20001–20044      | `RequestFailed`       |
//! | 30000–30099      | `InsufficientBalance` |
//! | 110001–110999    | `RequestFailed`       |
//! | anything else    | `Unknown`             |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Closed set of failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    InvalidSignature,
    AuthFailed,
    RateLimited,
    PermissionDenied,
    ServerError,
    ServiceUnavailable,
    /// Transport failure, or an order/request-domain vendor rejection.
    RequestFailed,
    /// The response body could not be parsed as an envelope.
    ResponseInvalid,
    InsufficientBalance,
    Unknown,
}

impl ErrorKind {
    /// Stable numeric code for this kind, used at service boundaries.
    pub fn code(self) -> u32 {
        match self {
            Self::Unknown => 10000,
            Self::InvalidParameter => 10001,
            Self::InvalidSignature => 10002,
            Self::AuthFailed => 10003,
            Self::RateLimited => 10004,
            Self::PermissionDenied => 10005,
            Self::ServerError => 10006,
            Self::ServiceUnavailable => 10007,
            Self::RequestFailed => 20001,
            Self::ResponseInvalid => 20002,
            Self::InsufficientBalance => 30004,
        }
    }

    /// Snake-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameter => "invalid_parameter",
            Self::InvalidSignature => "invalid_signature",
            Self::AuthFailed => "auth_failed",
            Self::RateLimited => "rate_limited",
            Self::PermissionDenied => "permission_denied",
            Self::ServerError => "server_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::RequestFailed => "request_failed",
            Self::ResponseInvalid => "response_invalid",
            Self::InsufficientBalance => "insufficient_balance",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a vendor `retCode` to an error kind. `0` is success and maps to `None`.
pub fn classify_vendor_code(ret_code: i64) -> Option<ErrorKind> {
    let kind = match ret_code {
        0 => return None,
        10001..=10003 => ErrorKind::InvalidParameter,
        10004 => ErrorKind::InvalidSignature,
        10005 => ErrorKind::AuthFailed,
        10006 | 10007 => ErrorKind::PermissionDenied,
        10010 => ErrorKind::RateLimited,
        20001..=20044 => ErrorKind::RequestFailed,
        30000..=30099 => ErrorKind::InsufficientBalance,
        110001..=110999 => ErrorKind::RequestFailed,
        _ => ErrorKind::Unknown,
    };
    Some(kind)
}

/// Map an HTTP status to an error kind. Any 2xx maps to `None`.
pub fn classify_http_status(status: u16) -> Option<ErrorKind> {
    let kind = match status {
        200..=299 => return None,
        400 => ErrorKind::InvalidParameter,
        401 => ErrorKind::AuthFailed,
        403 => ErrorKind::PermissionDenied,
        429 => ErrorKind::RateLimited,
        500 => ErrorKind::ServerError,
        503 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Unknown,
    };
    Some(kind)
}

/// Every way a gateway call can fail.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (connect, TLS, body read, ...).
    #[error("request failed: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller asked for something that cannot be put on the wire.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No response within the bounded timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the call while it was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// Non-2xx HTTP status. The body is kept verbatim and never parsed.
    #[error("http status {status}: {body}")]
    Http { status: u16, body: String },

    /// The body is not a well-formed response envelope.
    #[error("invalid response: {message}")]
    InvalidResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Well-formed envelope carrying a non-zero `retCode`.
    #[error("bybit error [{code}] {message}")]
    Vendor {
        kind: ErrorKind,
        code: i64,
        message: String,
    },
}

impl GatewayError {
    /// The single kind this failure maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidParameter,
            Self::Request { .. } | Self::Timeout(_) | Self::Cancelled => ErrorKind::RequestFailed,
            Self::Http { status, .. } => {
                classify_http_status(*status).unwrap_or(ErrorKind::Unknown)
            }
            Self::InvalidResponse { .. } => ErrorKind::ResponseInvalid,
            Self::Vendor { kind, .. } => *kind,
        }
    }

    /// Build a vendor error, classifying the code.
    pub fn vendor(code: i64, message: impl Into<String>) -> Self {
        Self::Vendor {
            kind: classify_vendor_code(code).unwrap_or(ErrorKind::Unknown),
            code,
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            source: None,
        }
    }

    pub fn request_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_response(message: impl Into<String>, source: Option<serde_json::Error>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            source,
        }
    }

    /// HTTP status, when the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
