//! Order management (signed).
//!
//! | Operation        | Method | Path               |
//! |------------------|--------|--------------------|
//! | Create           | POST   | `order/create`     |
//! | Amend            | POST   | `order/amend`      |
//! | Cancel           | POST   | `order/cancel`     |
//! | Cancel all       | POST   | `order/cancel-all` |
//! | Open orders      | GET    | `order/realtime`   |
//! | Order history    | GET    | `order/history`    |

use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::params::{Extras, ParamSet, format_decimal};
use crate::transport::Method;

/// Order type string for market orders; these never carry a price.
pub const ORDER_TYPE_MARKET: &str = "Market";

/// New order. Fields left at their default are not sent.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    pub category: String,
    pub symbol: String,
    /// `Buy` or `Sell`.
    pub side: String,
    /// `Limit` or `Market`.
    pub order_type: String,
    pub qty: f64,
    pub price: f64,
    pub time_in_force: String,
    pub order_link_id: String,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub reduce_only: bool,
    pub close_on_trigger: bool,
}

/// Amendment of a resting order, addressed by `order_id` or `order_link_id`.
#[derive(Debug, Clone, Default)]
pub struct AmendRequest {
    pub category: String,
    pub symbol: String,
    pub order_id: String,
    pub order_link_id: String,
    pub qty: f64,
    pub price: f64,
}

pub struct OrderApi {
    gateway: Arc<Gateway>,
}

impl OrderApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Place an order. `extras` may add or override optional fields but
    /// never the required ones.
    pub async fn create_order(
        &self,
        req: &OrderRequest,
        extras: Option<&Extras>,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", req.category.as_str())
            .insert("symbol", req.symbol.as_str())
            .insert("side", req.side.as_str())
            .insert("orderType", req.order_type.as_str())
            .insert("qty", format_decimal(req.qty));
        if !req.order_type.eq_ignore_ascii_case(ORDER_TYPE_MARKET) {
            params.insert_float_opt("price", req.price);
        }
        params
            .insert_str_opt("timeInForce", &req.time_in_force)
            .insert_str_opt("orderLinkId", &req.order_link_id)
            .insert_float_opt("takeProfit", req.take_profit)
            .insert_float_opt("stopLoss", req.stop_loss)
            .insert_bool_opt("reduceOnly", req.reduce_only)
            .insert_bool_opt("closeOnTrigger", req.close_on_trigger)
            .merge_extras(extras, &["category", "symbol", "side", "orderType", "qty"]);

        self.gateway
            .execute(Method::Post, "order/create", params, true)
            .await
    }

    pub async fn amend_order(
        &self,
        req: &AmendRequest,
        extras: Option<&Extras>,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", req.category.as_str())
            .insert("symbol", req.symbol.as_str())
            .insert_str_opt("orderId", &req.order_id)
            .insert_str_opt("orderLinkId", &req.order_link_id)
            .insert_float_opt("qty", req.qty)
            .insert_float_opt("price", req.price)
            .merge_extras(extras, &["category", "symbol"]);

        self.gateway
            .execute(Method::Post, "order/amend", params, true)
            .await
    }

    /// Cancel by exchange `order_id` or client `order_link_id`.
    pub async fn cancel_order(
        &self,
        category: &str,
        symbol: &str,
        order_id: &str,
        order_link_id: &str,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert("symbol", symbol)
            .insert_str_opt("orderId", order_id)
            .insert_str_opt("orderLinkId", order_link_id);
        self.gateway
            .execute(Method::Post, "order/cancel", params, true)
            .await
    }

    pub async fn cancel_all_orders(
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
            .execute(Method::Post, "order/cancel-all", params, true)
            .await
    }

    pub async fn get_open_orders(
        &self,
        category: &str,
        symbol: &str,
        order_id: &str,
        order_link_id: &str,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol)
            .insert_str_opt("orderId", order_id)
            .insert_str_opt("orderLinkId", order_link_id)
            .insert_int_opt("limit", i64::from(limit));
        self.gateway
            .execute(Method::Get, "order/realtime", params, true)
            .await
    }

    pub async fn get_order_history(
        &self,
        category: &str,
        symbol: &str,
        order_id: &str,
        order_link_id: &str,
        order_status: &str,
        limit: u32,
    ) -> Result<Envelope, GatewayError> {
        let mut params = ParamSet::new();
        params
            .insert("category", category)
            .insert_str_opt("symbol", symbol)
            .insert_str_opt("orderId", order_id)
            .insert_str_opt("orderLinkId", order_link_id)
            .insert_str_opt("orderStatus", order_status)
            .insert_int_opt("limit", i64::from(limit));
        self.gateway
            .execute(Method::Get, "order/history", params, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{Sent, map, recording_gateway};

    fn limit_buy() -> OrderRequest {
        OrderRequest {
            category: "linear".into(),
            symbol: "BTCUSDT".into(),
            side: "Buy".into(),
            order_type: "Limit".into(),
            qty: 0.01,
            price: 43000.5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_limit_order() {
        let (gw, rec) = recording_gateway();
        let api = OrderApi::new(gw);

        api.create_order(&limit_buy(), None).await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.path, "order/create");
        assert!(sent.signed);
        assert_eq!(
            sent.params,
            map(&[
                ("category", "linear"),
                ("symbol", "BTCUSDT"),
                ("side", "Buy"),
                ("orderType", "Limit"),
                ("qty", "0.01"),
                ("price", "43000.5"),
            ])
        );
    }

    #[tokio::test]
    async fn market_order_drops_price() {
        let (gw, rec) = recording_gateway();
        let api = OrderApi::new(gw);

        let req = OrderRequest {
            order_type: "Market".into(),
            reduce_only: true,
            time_in_force: "IOC".into(),
            ..limit_buy()
        };
        api.create_order(&req, None).await.unwrap();
        let sent = Sent::from(rec.last());
        assert!(!sent.params.contains_key("price"));
        assert_eq!(sent.params.get("reduceOnly").map(String::as_str), Some("true"));
        assert_eq!(sent.params.get("timeInForce").map(String::as_str), Some("IOC"));
        assert!(!sent.params.contains_key("closeOnTrigger"));
    }

    #[tokio::test]
    async fn extras_cannot_rewrite_required_fields() {
        let (gw, rec) = recording_gateway();
        let api = OrderApi::new(gw);

        let mut extras = Extras::new();
        extras.insert("side".into(), "Sell".into());
        extras.insert("positionIdx".into(), "1".into());
        extras.insert("price".into(), "42000".into());

        api.create_order(&limit_buy(), Some(&extras)).await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.params.get("side").map(String::as_str), Some("Buy"));
        assert_eq!(sent.params.get("positionIdx").map(String::as_str), Some("1"));
        assert_eq!(sent.params.get("price").map(String::as_str), Some("42000"));
    }

    #[tokio::test]
    async fn amend_and_cancel() {
        let (gw, rec) = recording_gateway();
        let api = OrderApi::new(gw);

        let amend = AmendRequest {
            category: "linear".into(),
            symbol: "BTCUSDT".into(),
            order_link_id: "my-1".into(),
            price: 42500.0,
            ..Default::default()
        };
        api.amend_order(&amend, None).await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.path, "order/amend");
        assert_eq!(
            sent.params,
            map(&[
                ("category", "linear"),
                ("symbol", "BTCUSDT"),
                ("orderLinkId", "my-1"),
                ("price", "42500"),
            ])
        );

        api.cancel_order("linear", "BTCUSDT", "1234", "").await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.path, "order/cancel");
        assert_eq!(
            sent.params,
            map(&[("category", "linear"), ("symbol", "BTCUSDT"), ("orderId", "1234")])
        );

        api.cancel_all_orders("linear", "", "USDT").await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.path, "order/cancel-all");
        assert_eq!(sent.params, map(&[("category", "linear"), ("settleCoin", "USDT")]));
    }

    #[tokio::test]
    async fn order_queries_are_signed_gets() {
        let (gw, rec) = recording_gateway();
        let api = OrderApi::new(gw);

        api.get_open_orders("spot", "BTCUSDT", "", "", 20).await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.path, "order/realtime");
        assert!(sent.signed);
        assert_eq!(
            sent.params,
            map(&[("category", "spot"), ("symbol", "BTCUSDT"), ("limit", "20")])
        );

        api.get_order_history("linear", "", "", "", "Filled", 0).await.unwrap();
        let sent = Sent::from(rec.last());
        assert_eq!(sent.path, "order/history");
        assert_eq!(sent.params, map(&[("category", "linear"), ("orderStatus", "Filled")]));
    }
}
