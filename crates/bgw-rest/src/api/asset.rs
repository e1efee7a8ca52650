//! Asset balances, internal transfers, and withdrawals (signed).
//!
//! | Operation          | Method | Path                                         |
//! |--------------------|--------|----------------------------------------------|
//! | Coin balance       | GET    | `asset/transfer/query-account-coins-balance` |
//! | Asset info         | GET    | `asset/transfer/query-asset-info`            |
//! | Internal transfer  | POST   | `asset/transfer/inter-transfer`              |
//! | Transfer history   | GET    | `asset/transfer/query-inter-transfer-list`   |
//! | Withdraw           | POST   | `asset/withdraw/create`                      |
//! | Deposit history    | GET    | `asset/deposit/query-record`                 |
//! | Withdrawal history | GET    | `asset/withdraw/query-record`                |

use std::sync::Arc;

use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::params::{Extras, ParamSet};
use crate::transport::Method;

pub struct AssetApi {
    gateway: Arc<Gateway>,
}

impl AssetApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_coin_balance(
        &self,
        account_type: &str,
        coin: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert_str_opt("accountType", account_type)
            .insert_str_opt("coin", coin);
        self.gateway
            .execute(
                Method::Get,
                "asset/transfer/query-account-coins-balance",
                params,
                true,
            )
            .await
    }

    pub async fn get_asset_info(&self, account_type: &str) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params.insert_str_opt("accountType", account_type);
        self.gateway
            .execute(Method::Get, "asset/transfer/query-asset-info", params, true)
            .await
    }

    /// Move `amount` of `coin` between two account types.
    ///
    /// An empty `transfer_id` gets a fresh UUID, since the exchange requires
    /// one per transfer.
    pub async fn transfer(
        &self,
        transfer_id: &str,
        coin: &str,
        amount: &str,
        from_account_type: &str,
        to_account_type: &str,
    ) -> Result<Envelope, GatewayError> {
        let transfer_id = if transfer_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            transfer_id.to_string()
        };
        let mut params = ParamSet::new();
        params
            .insert("transferId", transfer_id)
            .insert("coin", coin)
            .insert("amount", amount)
            .insert("fromAccountType", from_account_type)
            .insert("toAccountType", to_account_type);
        self.gateway
            .execute(Method::Post, "asset/transfer/inter-transfer", params, true)
            .await
    }

    pub async fn get_transfer_history(
        &self,
        transfer_id: &str,
        coin: &str,
        status: &str,
        start_time: i64,
        end_time: i64,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert_str_opt("transferId", transfer_id)
            .insert_str_opt("coin", coin)
            .insert_str_opt("status", status)
            .insert_int_opt("startTime", start_time)
            .insert_int_opt("endTime", end_time)
            .insert_int_opt("limit", i64::from(limit));
        self.gateway
            .execute(
                Method::Get,
                "asset/transfer/query-inter-transfer-list",
                params,
                true,
            )
            .await
    }

    pub async fn withdraw(
        &self,
        coin: &str,
        chain: &str,
        address: &str,
        tag: &str,
        amount: &str,
        extras: Option<&Extras>,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("coin", coin)
            .insert("chain", chain)
            .insert("address", address)
            .insert("amount", amount)
            .insert_str_opt("tag", tag)
            .merge_extras(extras, &["coin", "chain", "address", "amount"]);
        self.gateway
            .execute(Method::Post, "asset/withdraw/create", params, true)
            .await
    }

    pub async fn get_deposit_history(
        &self,
        coin: &str,
        start_time: i64,
        end_time: i64,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let params = history_params(coin, start_time, end_time, limit);
        self.gateway
            .execute(Method::Get, "asset/deposit/query-record", params, true)
            .await
    }

    pub async fn get_withdrawal_history(
        &self,
        coin: &str,
        start_time: i64,
        end_time: i64,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let params = history_params(coin, start_time, end_time, limit);
        self.gateway
            .execute(Method::Get, "asset/withdraw/query-record", params, true)
            .await
    }
}

fn history_params(coin: &str, start_time: i64, end_time: i64, limit: u32) -> ParamSet {
    let mut params = ParamSet::new();
    params
        .insert_str_opt("coin", coin)
        .insert_int_opt("startTime", start_time)
        .insert_int_opt("endTime", end_time)
        .insert_int_opt("limit", i64::from(limit));
    params
}
