//! Main REST client implementation

use crate::cache::MetadataCache;
use crate::clock::{Clock, SystemClock};
use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::rate_limiter::RateLimiter;
use crate::request::{ApiPayload, ApiRequest};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::{OrderOutcome, OrderRequest, OrdersFilter};
use parking_lot::RwLock;
use qtrade_auth::{Credentials, RequestSigner, AUTHORIZATION_HEADER};
use qtrade_types::{AllBalances, BalanceMap, Order, DEFAULT_SOFT_THRESHOLD};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.qtrade.io/";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default refresh interval for markets and tickers
const DEFAULT_CACHE_INTERVAL: Duration = Duration::from_secs(180);

/// Message attached to every non-2xx API error
const API_ERROR_MESSAGE: &str = "Invalid return code from backend";

/// Bearer-token login state
#[derive(Default)]
struct SessionAuth {
    token: Option<SecretString>,
    user_id: Option<u64>,
    email: Option<String>,
}

/// qTrade REST API client
///
/// One client is one session: an endpoint, optional HMAC credentials or a
/// bearer token from [`login`](AccountEndpoints::login), the rate-limit state
/// advertised by the exchange and cached reference data.
///
/// # Example
///
/// ```no_run
/// use qtrade_rest::{ClientConfig, Credentials, QtradeClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::new("https://api.qtrade.io/")
///         .with_credentials(Credentials::from_env()?);
///     let client = QtradeClient::with_config(config)?;
///
///     let balances = client.balances().await?;
///     println!("Balances: {:?}", balances);
///
///     Ok(())
/// }
/// ```
pub struct QtradeClient {
    endpoint: Url,
    config: ClientConfig,
    credentials: Option<Credentials>,
    session: RwLock<SessionAuth>,
    rate_limiter: RateLimiter,
    pub(crate) cache: tokio::sync::Mutex<MetadataCache>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
}

impl QtradeClient {
    /// Create a new client without authentication
    pub fn new(endpoint: impl Into<String>) -> RestResult<Self> {
        Self::with_config(ClientConfig::new(endpoint))
    }

    /// Create a new client with HMAC credentials
    pub fn with_credentials(endpoint: impl Into<String>, credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new(endpoint).with_credentials(credentials))
    }

    /// Create a new client with custom configuration over HTTP
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.as_deref().unwrap_or("qtrade-rest/0.1.0"),
        )?;
        Self::with_transport(config, Arc::new(transport), Arc::new(SystemClock))
    }

    /// Create a new client over an injected transport and clock
    pub fn with_transport(
        mut config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> RestResult<Self> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| RestError::InvalidUrl(e.to_string()))?;
        let credentials = config.credentials.take();

        info!(endpoint = %endpoint, authenticated = credentials.is_some(), "Created qTrade REST client");

        Ok(Self::assemble(endpoint, config, credentials, transport, clock))
    }

    fn assemble(
        endpoint: Url,
        config: ClientConfig,
        credentials: Option<Credentials>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            endpoint,
            rate_limiter: RateLimiter::new(config.soft_threshold, config.honor_rate_limit),
            cache: tokio::sync::Mutex::new(MetadataCache::new(
                config.market_cache_interval,
                config.ticker_cache_interval,
            )),
            config,
            credentials,
            session: RwLock::new(SessionAuth::default()),
            transport,
            clock,
        }
    }

    /// A new session on the same endpoint with no credentials or token
    ///
    /// Rate-limit state and caches start fresh; the transport and clock are
    /// shared.
    pub fn clone_without_auth(&self) -> Self {
        Self::assemble(
            self.endpoint.clone(),
            self.config.clone(),
            None,
            Arc::clone(&self.transport),
            Arc::clone(&self.clock),
        )
    }

    /// Base URL requests are resolved against
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Check if the client has HMAC credentials
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Check if the client holds a bearer token
    pub fn has_token(&self) -> bool {
        self.session.read().token.is_some()
    }

    /// User id returned by the last login
    pub fn user_id(&self) -> Option<u64> {
        self.session.read().user_id
    }

    /// Email used for the last login
    pub fn email(&self) -> Option<String> {
        self.session.read().email.clone()
    }

    pub(crate) fn set_session_token(&self, token: String, user_id: u64, email: &str) {
        let mut session = self.session.write();
        session.token = Some(SecretString::new(token.into_boxed_str()));
        session.user_id = Some(user_id);
        session.email = Some(email.to_string());
    }

    /// Rate limiter for this session
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    /// Issue a request and decode the response envelope
    ///
    /// A 429 response is retried exactly once. Non-2xx responses become
    /// [`RestError::Api`] after the rate limiter has seen their headers.
    pub async fn request(&self, request: ApiRequest) -> RestResult<ApiPayload> {
        let (url, body) = self.prepare(&request)?;
        let response = self.execute(&request, &url, body.as_deref()).await?;
        self.classify(&request, &url, body.as_deref(), response)
    }

    /// Issue a request and decode its `data` field into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> RestResult<T> {
        let path = request.path.clone();
        match self.request(request).await? {
            ApiPayload::Data(data) => serde_json::from_value(data)
                .map_err(|e| RestError::Parse(format!("{}: {}", path, e))),
            ApiPayload::Success => Err(RestError::Parse(format!(
                "{}: expected a JSON payload",
                path
            ))),
        }
    }

    /// GET `path` and decode its `data` field
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RestResult<T> {
        self.fetch(ApiRequest::get(path)).await
    }

    /// POST a JSON body to `path` and decode its `data` field
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> RestResult<T> {
        self.fetch(ApiRequest::post(path).with_body(body)).await
    }

    /// Issue a request and log the raw body line by line
    ///
    /// The status is not inspected and nothing is decoded.
    pub async fn stream_lines(&self, request: ApiRequest) -> RestResult<()> {
        let (url, body) = self.prepare(&request)?;
        debug!("{} streaming {}", request.method, url);

        let response = self.execute(&request, &url, body.as_deref()).await?;
        for line in response.text().lines() {
            info!("{}", line);
        }
        Ok(())
    }

    fn prepare(&self, request: &ApiRequest) -> RestResult<(Url, Option<String>)> {
        let mut url = self
            .endpoint
            .join(&request.path)
            .map_err(|e| RestError::InvalidUrl(e.to_string()))?;

        if !request.query.is_empty() {
            let query = serde_urlencoded::to_string(&request.query)
                .map_err(|e| RestError::InvalidArgument(e.to_string()))?;
            url.set_query(Some(&query));
        }

        let body = request
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RestError::Parse(e.to_string()))?;

        Ok((url, body))
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        url: &Url,
        body: Option<&str>,
    ) -> RestResult<HttpResponse> {
        let response = self.send_once(request, url, body).await?;
        if response.status != 429 {
            return Ok(response);
        }

        debug!("{} {} rate limited, retrying once", request.method, url);
        Ok(self.send_once(request, url, body).await?)
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        url: &Url,
        body: Option<&str>,
    ) -> RestResult<HttpResponse> {
        self.rate_limiter.throttle(self.clock.as_ref()).await;

        let auth = self.auth_headers(request.method.as_str(), url, body.unwrap_or(""));
        let mut headers: Vec<(String, String)> = request
            .headers
            .iter()
            .filter(|(name, _)| {
                auth.is_empty() || !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
            })
            .cloned()
            .collect();
        headers.extend(auth);
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method.clone(),
                url: url.clone(),
                headers,
                body: body.map(str::to_string),
            })
            .await?;

        self.rate_limiter
            .update_from_response(self.clock.unix_time(), &response);
        Ok(response)
    }

    /// HMAC signature if credentials are present, else the bearer token
    fn auth_headers(&self, method: &str, url: &Url, body: &str) -> Vec<(String, String)> {
        if let Some(credentials) = &self.credentials {
            let path = match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            };
            let timestamp = self.clock.unix_time() as u64;
            return RequestSigner::new(credentials, timestamp)
                .headers(method, &path, body)
                .into_pairs()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect();
        }

        match &self.session.read().token {
            Some(token) => vec![(
                AUTHORIZATION_HEADER.to_string(),
                format!("Bearer {}", token.expose_secret()),
            )],
            None => Vec::new(),
        }
    }

    fn classify(
        &self,
        request: &ApiRequest,
        url: &Url,
        body: Option<&str>,
        response: HttpResponse,
    ) -> RestResult<ApiPayload> {
        let parsed: Option<serde_json::Value> = serde_json::from_slice(&response.body).ok();

        if response.status <= 299 {
            return Ok(match parsed {
                Some(value) => {
                    debug!("{} {} req={} res={}", request.method, url, body.unwrap_or("null"), value);
                    ApiPayload::Data(envelope_data(value))
                }
                None => ApiPayload::Success,
            });
        }

        if !request.silent_statuses.contains(&response.status) {
            warn!(
                "{} {} {} req={} res=\n{}",
                request.method,
                url,
                response.status,
                body.unwrap_or("null"),
                response.text()
            );
        }

        Err(RestError::Api {
            message: API_ERROR_MESSAGE.to_string(),
            status: response.status,
            codes: parsed.as_ref().map(error_codes).unwrap_or_default(),
        })
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Reference data (markets, currencies, tickers)
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self)
    }

    /// Login, balances and order listing
    pub fn account(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(self)
    }

    /// Order placement and cancellation
    pub fn trading(&self) -> TradingEndpoints<'_> {
        TradingEndpoints::new(self)
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Log in with email and password, storing the bearer token
    pub async fn login(&self, email: &str, password: &str) -> RestResult<()> {
        self.account().login(email, password).await
    }

    /// Spendable balances by currency
    pub async fn balances(&self) -> RestResult<BalanceMap> {
        self.account().balances().await
    }

    /// Spendable and in-order balances
    pub async fn balances_all(&self) -> RestResult<AllBalances> {
        self.account().balances_all().await
    }

    /// Spendable plus in-order balances by currency
    pub async fn balances_merged(&self) -> RestResult<BalanceMap> {
        self.account().balances_merged().await
    }

    /// List orders
    pub async fn orders(&self, filter: &OrdersFilter) -> RestResult<Vec<Order>> {
        self.account().orders(filter).await
    }

    /// Place a limit order
    pub async fn order(&self, request: &OrderRequest) -> RestResult<OrderOutcome> {
        self.trading().order(request).await
    }

    /// Cancel every open order
    pub async fn cancel_all_orders(&self) -> RestResult<Vec<u64>> {
        self.trading().cancel_all_orders().await
    }

    /// Cancel every open order in one market
    pub async fn cancel_market_orders(
        &self,
        market_id: Option<u64>,
        market_string: Option<&str>,
    ) -> RestResult<Vec<u64>> {
        self.trading()
            .cancel_market_orders(market_id, market_string)
            .await
    }
}

impl std::fmt::Debug for QtradeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QtradeClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("has_credentials", &self.has_credentials())
            .field("has_token", &self.has_token())
            .finish()
    }
}

fn envelope_data(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) => map.remove("data").unwrap_or_default(),
        _ => serde_json::Value::Null,
    }
}

fn error_codes(value: &serde_json::Value) -> Vec<String> {
    value
        .get("errors")
        .and_then(|errors| errors.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("code"))
                .map(|code| match code.as_str() {
                    Some(s) => s.to_string(),
                    None => code.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API
    pub endpoint: String,
    /// HMAC credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Pause before requests according to the advertised rate limit
    pub honor_rate_limit: bool,
    /// Fraction of the budget consumed before pacing starts
    pub soft_threshold: f64,
    /// How long market and currency data stays fresh
    pub market_cache_interval: Duration,
    /// How long ticker data stays fresh
    pub ticker_cache_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            honor_rate_limit: true,
            soft_threshold: DEFAULT_SOFT_THRESHOLD,
            market_cache_interval: DEFAULT_CACHE_INTERVAL,
            ticker_cache_interval: DEFAULT_CACHE_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set credentials from a `keyid:secret` string
    pub fn with_key(self, key: &str) -> RestResult<Self> {
        Ok(self.with_credentials(Credentials::parse(key)?))
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable client-side rate limiting
    pub fn with_rate_limit(mut self, honor: bool) -> Self {
        self.honor_rate_limit = honor;
        self
    }

    /// Set the soft threshold
    pub fn with_soft_threshold(mut self, soft_threshold: f64) -> Self {
        self.soft_threshold = soft_threshold;
        self
    }

    /// Set both cache refresh intervals
    pub fn with_cache_interval(mut self, interval: Duration) -> Self {
        self.market_cache_interval = interval;
        self.ticker_cache_interval = interval;
        self
    }
}
