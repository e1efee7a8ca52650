//! # bgw-rest
//!
//! Signed request gateway for the Bybit V5 REST API:
//!
//! - **Parameters** (`params`): ordered string parameter sets and the extras merge rule
//! - **Signing** (`signing`): HMAC-SHA256 over `timestamp + apiKey + sorted params`
//! - **Transport** (`transport`): `Transport` seam with a reqwest implementation
//! - **Dispatcher** (`dispatcher`): URL/header/body assembly, timeout and cancellation
//! - **Envelope** (`envelope`): `{retCode, retMsg, result, retExtInfo, time}` parsing
//! - **Errors** (`error`): `ErrorKind` taxonomy and `GatewayError` via thiserror
//! - **Gateway** (`gateway`): dispatch, parse, and classify in one call
//! - **Resources** (`api`): market, order, position, account, and asset callers
//! - **Client** (`client`): `BybitClient` bundling every resource

pub mod api;
pub mod client;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod params;
pub mod signing;
pub mod transport;

pub use client::BybitClient;
pub use dispatcher::{CallOptions, Credentials};
pub use envelope::Envelope;
pub use error::{ErrorKind, GatewayError};
pub use gateway::Gateway;
pub use params::{Extras, ParamSet};
pub use transport::{Method, Transport};
