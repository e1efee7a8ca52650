//! Position management (signed).

use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::params::{Extras, ParamSet, format_decimal};
use crate::transport::Method;

pub struct PositionApi {
    gateway: Arc<Gateway>,
}

impl PositionApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_positions(
        &self,
        category: &str,
        symbol: &str,
        settle_coin: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol)
            .insert_str_opt("settleCoin", settle_coin);
        self.gateway
            .execute(Method::Get, "position/list", params, true)
            .await
    }

    pub async fn set_leverage(
        &self,
        category: &str,
        symbol: &str,
        buy_leverage: f64,
        sell_leverage: f64,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert("buyLeverage", format_decimal(buy_leverage))
            .insert("sellLeverage", format_decimal(sell_leverage));
        self.gateway
            .execute(Method::Post, "position/set-leverage", params, true)
            .await
    }

    /// Take-profit / stop-loss for an open position. `extras` carries the
    /// trigger and size options (`tpTriggerBy`, `tpslMode`, `positionIdx`, ...).
    pub async fn set_trading_stop(
        &self,
        category: &str,
        symbol: &str,
        take_profit: f64,
        stop_loss: f64,
        extras: Option<&Extras>,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert_float_opt("takeProfit", take_profit)
            .insert_float_opt("stopLoss", stop_loss)
            .merge_extras(extras, &["category", "symbol"]);
        self.gateway
            .execute(Method::Post, "position/trading-stop", params, true)
            .await
    }

    /// `mode`: `0` merged single, `3` both sides.
    pub async fn switch_position_mode(
        &self,
        category: &str,
        symbol: &str,
        mode: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol)
            .insert_str_opt("mode", mode);
        self.gateway
            .execute(Method::Post, "position/switch-mode", params, true)
            .await
    }

    /// `tp_sl_mode`: `Full` or `Partial`.
    pub async fn set_tpsl_mode(
        &self,
        category: &str,
        symbol: &str,
        tp_sl_mode: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert("tpSlMode", tp_sl_mode);
        self.gateway
            .execute(Method::Post, "position/set-tpsl-mode", params, true)
            .await
    }

    pub async fn set_risk_limit(
        &self,
        category: &str,
        symbol: &str,
        risk_id: i64,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert("riskId", risk_id.to_string());
        self.gateway
            .execute(Method::Post, "position/set-risk-limit", params, true)
            .await
    }
}
