//! Private account endpoints
//!
//! These endpoints require HMAC credentials or a session token, except
//! [`login`](AccountEndpoints::login) which obtains the token.

use crate::client::QtradeClient;
use crate::error::{RestError, RestResult};
use crate::request::ApiRequest;
use crate::types::{LoginData, OrdersFilter};
use qtrade_types::{
    to_balance_map, AllBalances, BalanceMap, BalancesAllData, BalancesData, Order, OrdersData,
};
use serde_json::json;
use tracing::{debug, info, instrument};

/// Login, balances and order listing
pub struct AccountEndpoints<'a> {
    client: &'a QtradeClient,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(client: &'a QtradeClient) -> Self {
        Self { client }
    }

    /// Log in with email and password
    ///
    /// The returned bearer token authenticates later requests made without
    /// HMAC credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> RestResult<()> {
        let data: LoginData = self
            .client
            .post("/v1/login", json!({ "email": email, "password": password }))
            .await?;

        info!(user_id = data.user_id, "Logged in");
        self.client.set_session_token(data.token, data.user_id, email);
        Ok(())
    }

    /// Get spendable balances by currency
    #[instrument(skip(self))]
    pub async fn balances(&self) -> RestResult<BalanceMap> {
        let data: BalancesData = self.client.get("/v1/user/balances").await?;
        Ok(to_balance_map(data.balances))
    }

    /// Get spendable and in-order balances as separate maps
    #[instrument(skip(self))]
    pub async fn balances_all(&self) -> RestResult<AllBalances> {
        let data: BalancesAllData = self.client.get("/v1/user/balances_all").await?;
        Ok(data.into())
    }

    /// Get spendable plus in-order balances per currency
    #[instrument(skip(self))]
    pub async fn balances_merged(&self) -> RestResult<BalanceMap> {
        self.balances_all()
            .await?
            .merged()
            .map_err(|e| RestError::Parse(e.to_string()))
    }

    /// List orders
    ///
    /// `open` goes on the wire as the literal `true`/`false`; unset filters
    /// are left out of the query.
    #[instrument(skip(self))]
    pub async fn orders(&self, filter: &OrdersFilter) -> RestResult<Vec<Order>> {
        let request = ApiRequest::get("/v1/user/orders")
            .with_optional_query("open", filter.open)
            .with_optional_query("older_than", filter.older_than)
            .with_optional_query("newer_than", filter.newer_than);

        let data: OrdersData = self.client.fetch(request).await?;
        debug!(count = data.orders.len(), "Fetched orders");
        Ok(data.orders)
    }
}
