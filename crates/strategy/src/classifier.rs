use common::ScanConfig;
use common::models::Direction;

/// Maps a price move and RSI to a long-only direction.
///
/// Rules are checked in order and the first match wins:
/// a rise of at least the threshold below overbought follows the momentum,
/// a drop of at least the threshold above oversold bets on a bounce.
pub fn classify(percent_change: f64, rsi: f64, config: &ScanConfig) -> Option<Direction> {
    let threshold = config.percentage_threshold;

    if percent_change >= threshold && rsi < config.rsi_overbought {
        Some(Direction::MomentumBuy)
    } else if percent_change <= -threshold && rsi > config.rsi_oversold {
        Some(Direction::BounceBuy)
    } else {
        None
    }
}
