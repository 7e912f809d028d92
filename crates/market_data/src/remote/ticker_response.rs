use common::models::Quote;
use serde::Deserialize;

use crate::error::{GatewayError, parse_decimal};
use crate::traits::RemoteResponse;

/// Subset of `GET /api/v3/ticker/24hr`.
#[derive(Debug, Deserialize)]
pub struct Ticker24hResponse {
    pub symbol: String,
    #[serde(rename(deserialize = "lastPrice"))]
    pub last_price: String,
    #[serde(rename(deserialize = "quoteVolume"))]
    pub quote_volume: String,
}

impl RemoteResponse<Quote> for Ticker24hResponse {
    fn to_model(&self) -> Result<Quote, GatewayError> {
        Ok(Quote {
            symbol: self.symbol.clone(),
            last_price: parse_decimal("ticker lastPrice", &self.last_price)?,
            quote_volume_24h: parse_decimal("ticker quoteVolume", &self.quote_volume)?,
        })
    }
}
