//! Captured `/v1/common` and `/v1/tickers` payloads and a mock-backed client

use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::{ClientConfig, QtradeClient};
use crate::clock::MockClock;
use crate::transport::MockTransport;

pub const ENDPOINT: &str = "http://localhost:9898/";

pub fn common_json() -> Value {
    json!({
        "currencies": [
            {
                "can_withdraw": false,
                "code": "GRIN",
                "config": {"default_signer": 61, "price": 10.537737418408733,
                           "required_confirmations": 10, "withdraw_fee": "0.25"},
                "long_name": "Grin",
                "metadata": {"delisting_date": "4/11/2019"},
                "precision": 9,
                "status": "delisted",
                "type": "grin"
            },
            {
                "can_withdraw": true,
                "code": "LTC",
                "config": {"address_version": 48, "price": 60.63, "withdraw_fee": "0.001"},
                "long_name": "Litecoin",
                "metadata": {},
                "precision": 8,
                "status": "ok",
                "type": "bitcoin_like"
            },
            {
                "can_withdraw": true,
                "code": "BTC",
                "long_name": "Bitcoin",
                "type": "bitcoin_like",
                "status": "ok",
                "precision": 8,
                "config": {"price": 8595.59, "withdraw_fee": "0.0005"},
                "metadata": {"withdraw_notices": []}
            },
            {
                "can_withdraw": true,
                "code": "BIS",
                "config": {"data_max": 1000, "withdraw_fee": "0.25"},
                "long_name": "Bismuth",
                "metadata": {"deposit_notices": [], "hidden": false},
                "precision": 8,
                "status": "ok",
                "type": "bismuth"
            }
        ],
        "markets": [
            {
                "base_currency": "BTC", "can_cancel": false, "can_trade": false,
                "can_view": false, "id": 23, "maker_fee": "0", "market_currency": "GRIN",
                "metadata": {"delisting_date": "4/11/2019", "labels": []},
                "taker_fee": "0.0075"
            },
            {
                "base_currency": "BTC", "can_cancel": true, "can_trade": true,
                "can_view": true, "id": 1, "maker_fee": "0", "market_currency": "LTC",
                "metadata": {}, "taker_fee": "0.005"
            },
            {
                "base_currency": "BTC", "can_cancel": true, "can_trade": true,
                "can_view": true, "id": 20, "maker_fee": "0", "market_currency": "BIS",
                "metadata": {"labels": []}, "taker_fee": "0.005"
            }
        ]
    })
}

pub fn tickers_json() -> Value {
    json!({
        "markets": [
            {
                "ask": "0.00707017", "bid": "0.00664751",
                "day_avg_price": "0.0071579647440367", "day_change": "0.0173330516998029",
                "day_high": "0.00727268", "day_low": "0.00713415", "day_open": "0.00714877",
                "day_volume_base": "0.00169664", "day_volume_market": "0.23702827",
                "id": 1, "id_hr": "LTC_BTC", "last": "0.00727268"
            },
            {
                "ask": "0.00001499", "bid": "0.00001332",
                "day_avg_price": "0.0000146739216644", "day_change": "-0.0893074119076549",
                "day_high": "0.00001641", "day_low": "0.00001292", "day_open": "0.00001646",
                "day_volume_base": "0.37996235", "day_volume_market": "25893.7153059",
                "id": 20, "id_hr": "BIS_BTC", "last": "0.00001499"
            },
            {
                "ask": null, "bid": null, "day_avg_price": null, "day_change": null,
                "day_high": null, "day_low": null, "day_open": null,
                "day_volume_base": "0", "day_volume_market": "0",
                "id": 8, "id_hr": "MMO_BTC", "last": "0.00000076"
            }
        ]
    })
}

pub fn open_orders_json() -> Value {
    json!({
        "orders": [
            {
                "id": 8980903, "market_amount": "0.5672848",
                "market_amount_remaining": "0.5672848",
                "created_at": "2019-11-14T16:34:20.424601Z", "price": "0.00651044",
                "base_amount": "0.00371174", "order_type": "buy_limit",
                "market_id": 1, "open": true, "trades": null
            },
            {
                "id": 8980902, "market_amount": "0.37039118",
                "market_amount_remaining": "0.37039118",
                "created_at": "2019-11-14T16:34:20.380538Z", "price": "0.00664751",
                "base_amount": "0.00247449", "order_type": "buy_limit",
                "market_id": 1, "open": true, "trades": null
            },
            {
                "id": 8980901, "market_amount": "12973.17366652",
                "market_amount_remaining": "12973.17366652",
                "created_at": "2019-11-14T16:34:20.328834Z", "price": "0.00000037",
                "order_type": "sell_limit", "market_id": 36, "open": true, "trades": null
            }
        ]
    })
}

pub fn placed_order_json(order_type: &str, amount: &str, price: &str) -> Value {
    json!({
        "order": {
            "id": 8987684, "market_amount": amount, "market_amount_remaining": amount,
            "created_at": "2019-11-14T23:46:52.897345Z", "price": price,
            "order_type": order_type, "market_id": 1, "open": true, "trades": []
        }
    })
}

/// Client over a mock transport and a clock frozen at t=10
pub fn mock_client(config: ClientConfig) -> (QtradeClient, Arc<MockTransport>, Arc<MockClock>) {
    let transport = Arc::new(MockTransport::new());
    let clock = Arc::new(MockClock::new(10.0));
    let client = QtradeClient::with_transport(config, transport.clone(), clock.clone())
        .expect("valid test config");
    (client, transport, clock)
}

/// Mock client with `/v1/common` and `/v1/tickers` routed
pub fn client_with_markets() -> (QtradeClient, Arc<MockTransport>, Arc<MockClock>) {
    let (client, transport, clock) = mock_client(ClientConfig::new(ENDPOINT));
    transport.push_data(Method::GET, "/v1/common", common_json());
    transport.push_data(Method::GET, "/v1/tickers", tickers_json());
    (client, transport, clock)
}
