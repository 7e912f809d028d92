use serde::{Deserialize, Serialize};

/// Indicator values for one symbol in one scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub percent_change: f64,
    /// Last candle's base volume times its close.
    pub quote_volume: f64,
    pub rsi: f64,
}
