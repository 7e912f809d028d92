use serde::Deserialize;

/// Subset of `GET /api/v3/exchangeInfo`.
#[derive(Debug, Deserialize)]
pub struct ExchangeInfoResponse {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    #[serde(rename(deserialize = "baseAsset"))]
    pub base_asset: String,
    #[serde(rename(deserialize = "quoteAsset"))]
    pub quote_asset: String,
    #[serde(
        rename(deserialize = "isSpotTradingAllowed"),
        default = "default_spot_allowed"
    )]
    pub is_spot_trading_allowed: bool,
}

fn default_spot_allowed() -> bool {
    true
}

impl ExchangeInfoResponse {
    /// Symbols currently trading against `quote_asset`, sorted and deduplicated.
    pub fn tradable_symbols(&self, quote_asset: &str) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .symbols
            .iter()
            .filter(|s| s.status == "TRADING" && s.is_spot_trading_allowed)
            .filter(|s| s.quote_asset.eq_ignore_ascii_case(quote_asset))
            .map(|s| s.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}
