use common::models::Candle;
use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::{GatewayError, parse_decimal};
use crate::traits::RemoteResponse;

/// One row of `GET /api/v3/klines`. Binance encodes each kline as a JSON array.
#[derive(Debug, Deserialize)]
pub struct KlineRow(
    pub i64,        // 0: Open time
    pub String,     // 1: Open
    pub String,     // 2: High
    pub String,     // 3: Low
    pub String,     // 4: Close
    pub String,     // 5: Volume
    pub IgnoredAny, // 6: Close time
    pub IgnoredAny, // 7: Quote asset volume
    pub IgnoredAny, // 8: Number of trades
    pub IgnoredAny, // 9: Taker buy base volume
    pub IgnoredAny, // 10: Taker buy quote volume
    pub IgnoredAny, // 11: Ignore
);

impl RemoteResponse<Candle> for KlineRow {
    fn to_model(&self) -> Result<Candle, GatewayError> {
        Ok(Candle {
            open_time: self.0,
            open: parse_decimal("kline open", &self.1)?,
            high: parse_decimal("kline high", &self.2)?,
            low: parse_decimal("kline low", &self.3)?,
            close: parse_decimal("kline close", &self.4)?,
            volume: parse_decimal("kline volume", &self.5)?,
        })
    }
}
