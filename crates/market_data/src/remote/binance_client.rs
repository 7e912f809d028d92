use std::env;
use std::time::Duration;

use async_trait::async_trait;
use common::MAX_CANDLES;
use common::models::{Candle, CandleSeries, Quote};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::remote::{ExchangeInfoResponse, KlineRow, Ticker24hResponse};
use crate::traits::{MarketDataGateway, RemoteResponse};

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const WEIGHT_WARN_LEVEL: u32 = 1000;

/// Binance spot public REST client. No API key is needed for market data.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base: Duration,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent("momentum_scanner/0.1.0")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        let base_url =
            env::var("BINANCE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // 2s, 4s, 8s with the default base.
    fn backoff_delay(&self, retry_count: u32) -> Duration {
        self.backoff_base * 2_u32.pow(retry_count)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut retry_count = 0;

        loop {
            match self.send_once(&url, query, what).await {
                Err(e) if e.is_rate_limit() => {
                    retry_count += 1;
                    if retry_count > self.max_retries {
                        return Err(e);
                    }

                    let backoff = self.backoff_delay(retry_count);
                    warn!(
                        "Rate limited on {}, backing off for {:?} (attempt {}/{})",
                        path, backoff, retry_count, self.max_retries
                    );
                    sleep(backoff).await;
                }
                other => return other,
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T, GatewayError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if status.as_u16() == 429 || status.as_u16() == 418 {
            return Err(GatewayError::RateLimited(status.as_u16()));
        }

        if let Some(used_weight) = response
            .headers()
            .get("x-mbx-used-weight-1m")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
        {
            if used_weight > WEIGHT_WARN_LEVEL {
                warn!("High API weight usage: {}", used_weight);
            } else {
                debug!("Used weights: {}/1200", used_weight);
            }
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| GatewayError::decode(what, e))
    }
}

#[async_trait]
impl MarketDataGateway for BinanceClient {
    async fn list_symbols(&self, quote_asset: &str) -> Result<Vec<String>, GatewayError> {
        let info: ExchangeInfoResponse = self
            .get_json("/api/v3/exchangeInfo", &[], "exchange info")
            .await?;

        let symbols = info.tradable_symbols(quote_asset);
        debug!(quote_asset, count = symbols.len(), "Loaded symbol universe");
        Ok(symbols)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        count: usize,
    ) -> Result<CandleSeries, GatewayError> {
        let limit = count.clamp(1, MAX_CANDLES);
        let query = [
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];

        let rows: Vec<KlineRow> = self.get_json("/api/v3/klines", &query, "klines").await?;
        let candles = rows
            .iter()
            .map(|row| row.to_model())
            .collect::<Result<Vec<Candle>, _>>()?;

        Ok(CandleSeries::new(symbol, candles))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, GatewayError> {
        let ticker: Ticker24hResponse = self
            .get_json(
                "/api/v3/ticker/24hr",
                &[("symbol", symbol.to_string())],
                "24h ticker",
            )
            .await?;
        ticker.to_model()
    }
}
