//! Account queries and settings (signed).

use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::params::ParamSet;
use crate::transport::Method;

pub struct AccountApi {
    gateway: Arc<Gateway>,
}

impl AccountApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Wallet balance for `account_type` (`UNIFIED`, `CONTRACT`, ...),
    /// optionally narrowed to one or more comma-separated coins.
    pub async fn get_wallet_balance(
        &self,
        account_type: &str,
        coin: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert_str_opt("accountType", account_type)
            .insert_str_opt("coin", coin);
        self.gateway
            .execute(Method::Get, "account/wallet-balance", params, true)
            .await
    }

    pub async fn get_fee_rate(&self, category: &str, symbol: &str) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol);
        self.gateway
            .execute(Method::Get, "account/fee-rate", params, true)
            .await
    }

    pub async fn get_account_info(&self) -> Result<Envelope, GatewayError> {
        self.gateway
            .execute(Method::Get, "account/info", ParamSet::new(), true)
            .await
    }

    /// `margin_mode`: `ISOLATED_MARGIN`, `REGULAR_MARGIN`, or `PORTFOLIO_MARGIN`.
    pub async fn set_margin_mode(&self, margin_mode: &str) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params.insert("setMarginMode", margin_mode);
        self.gateway
            .execute(Method::Post, "account/set-margin-mode", params, true)
            .await
    }

    pub async fn get_account_mode(&self) -> Result<Envelope, GatewayError> {
        self.gateway
            .execute(Method::Get, "account/mode", ParamSet::new(), true)
            .await
    }

    pub async fn set_account_mode(&self, account_mode: &str) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params.insert("accountMode", account_mode);
        self.gateway
            .execute(Method::Post, "account/set-mode", params, true)
            .await
    }
}
