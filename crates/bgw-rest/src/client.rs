//! One handle over every resource, all sharing a single [`Gateway`].

use std::sync::Arc;

use bgw_core::config::BybitConfig;
use bgw_core::logging::SharedLogger;

use crate::api::{AccountApi, AssetApi, MarketApi, OrderApi, PositionApi};
use crate::error::GatewayError;
use crate::gateway::Gateway;

/// Bybit V5 REST client.
///
/// Cheap to share behind an `Arc`; every resource holds the same gateway,
/// so credentials and the connection pool are configured exactly once.
pub struct BybitClient {
    pub market: MarketApi,
    pub order: OrderApi,
    pub position: PositionApi,
    pub account: AccountApi,
    pub asset: AssetApi,
    gateway: Arc<Gateway>,
}

impl BybitClient {
    pub fn new(config: &BybitConfig, logger: SharedLogger) -> Result<Self, GatewayError> {
        Ok(Self::from_gateway(Arc::new(Gateway::new(config, logger)?)))
    }

    pub fn from_gateway(gateway: Arc<Gateway>) -> Self {
        Self {
            market: MarketApi::new(Arc::clone(&gateway)),
            order: OrderApi::new(Arc::clone(&gateway)),
            position: PositionApi::new(Arc::clone(&gateway)),
            account: AccountApi::new(Arc::clone(&gateway)),
            asset: AssetApi::new(Arc::clone(&gateway)),
            gateway,
        }
    }

    /// The underlying gateway, for endpoints without a typed wrapper.
    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }
}

#[cfg(test)]
mod tests {
    use bgw_core::logging::NoopLogger;

    use super::*;
    use crate::api::test_support::{Sent, recording_gateway};
    use crate::params::ParamSet;
    use crate::transport::Method;

    #[tokio::test]
    async fn resources_share_one_gateway() {
        let (gw, rec) = recording_gateway();
        let client = BybitClient::from_gateway(Arc::clone(&gw));
        assert!(Arc::ptr_eq(client.gateway(), &gw));

        client.market.get_tickers("spot", "BTCUSDT").await.unwrap();
        assert!(!Sent::from(rec.last()).signed);

        client.account.get_account_info().await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.path, "account/info");
        assert!(sent.signed);

        client
            .gateway()
            .execute(Method::Get, "market/time", ParamSet::new(), false)
            .await
            .unwrap();
        assert_eq!(Sent::from(rec.last()).path, "market/time");
    }

    #[test]
    fn builds_from_config() {
        let config = BybitConfig {
            api_key: "k".into(),
            api_secret: "s".into(),
            ..Default::default()
        };
        let client = BybitClient::new(&config, NoopLogger::shared()).unwrap();
        assert_eq!(client.gateway().dispatcher().base_url(), "https://api.bybit.com");
    }
}
