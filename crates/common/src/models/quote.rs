use serde::{Deserialize, Serialize};

/// Live ticker snapshot used as the alert entry price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub last_price: f64,
    pub quote_volume_24h: f64,
}
