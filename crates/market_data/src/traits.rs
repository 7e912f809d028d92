use async_trait::async_trait;
use common::models::{CandleSeries, Quote};

use crate::error::GatewayError;

/// Converts a raw exchange payload into a domain model.
pub trait RemoteResponse<T> {
    fn to_model(&self) -> Result<T, GatewayError>;
}

// An empty candle series is "no data" and comes back as Ok.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    async fn list_symbols(&self, quote_asset: &str) -> Result<Vec<String>, GatewayError>;

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        count: usize,
    ) -> Result<CandleSeries, GatewayError>;

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, GatewayError>;
}
