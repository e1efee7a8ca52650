//! Market data (public, unsigned).
//!
//! | Operation        | Path                       |
//! |------------------|----------------------------|
//! | Kline            | `market/kline`             |
//! | Orderbook        | `market/orderbook`         |
//! | Tickers          | `market/tickers`           |
//! | Instruments info | `market/instruments-info`  |
//! | Recent trades    | `market/recent-trade`      |

use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::params::ParamSet;
use crate::transport::Method;

pub struct MarketApi {
    gateway: Arc<Gateway>,
}

impl MarketApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Candles for `symbol`. `start`/`end` are millisecond bounds.
    pub async fn get_kline(
        &self,
        category: &str,
        symbol: &str,
        interval: &str,
        limit: u32,
        start: i64,
        end: i64,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert("interval", interval)
            .insert_int_opt("limit", i64::from(limit))
            .insert_int_opt("start", start)
            .insert_int_opt("end", end);
        self.gateway
            .execute(Method::Get, "market/kline", params, false)
            .await
    }

    pub async fn get_orderbook(
        &self,
        category: &str,
        symbol: &str,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert_int_opt("limit", i64::from(limit));
        self.gateway
            .execute(Method::Get, "market/orderbook", params, false)
            .await
    }

    /// Tickers for a category; an empty `symbol` returns all of them.
    pub async fn get_tickers(&self, category: &str, symbol: &str) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol);
        self.gateway
            .execute(Method::Get, "market/tickers", params, false)
            .await
    }

    pub async fn get_instruments(
        &self,
        category: &str,
        symbol: &str,
        status: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol)
            .insert_str_opt("status", status);
        self.gateway
            .execute(Method::Get, "market/instruments-info", params, false)
            .await
    }

    pub async fn get_recent_trades(
        &self,
        category: &str,
        symbol: &str,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol)
            .insert_int_opt("limit", i64::from(limit));
        self.gateway
            .execute(Method::Get, "market/recent-trade", params, false)
            .await
    }
}
