//! Per-resource callers.
//!
//! Each resource turns typed arguments into a [`ParamSet`](crate::params::ParamSet)
//! and calls [`Gateway::execute`](crate::gateway::Gateway::execute). Optional
//! arguments holding their zero value are left out of the request. Nothing
//! here builds HTTP requests directly.
//!
//! | Resource   | Struct        | Auth |
//! |------------|---------------|------|
//! | Market     | `MarketApi`   | no   |
//! | Order      | `OrderApi`    | yes  |
//! | Position   | `PositionApi` | yes  |
//! | Account    | `AccountApi`  | yes  |
//! | Asset      | `AssetApi`    | yes  |

pub mod account;
pub mod asset;
pub mod market;
pub mod order;
pub mod position;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::AccountApi;
pub use asset::AssetApi;
pub use market::MarketApi;
pub use order::OrderApi;
pub use position::PositionApi;

/// Product categories accepted by the `category` parameter.
pub mod category {
    pub const SPOT: &str = "spot";
    pub const LINEAR: &str = "linear";
    pub const INVERSE: &str = "inverse";
    pub const OPTION: &str = "option";
}
