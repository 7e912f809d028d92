use common::ScanConfig;
use common::models::{Direction, RiskLevels};

/// Stop-loss and take-profit at fixed distances from `entry_price`.
///
/// Both directions are long entries, so the levels are computed the same way.
pub fn derive(entry_price: f64, direction: Direction, config: &ScanConfig) -> RiskLevels {
    let stop_distance = config.stop_loss_percent / 100.0;

    match direction {
        Direction::MomentumBuy | Direction::BounceBuy => RiskLevels {
            stop_loss: entry_price * (1.0 - stop_distance),
            take_profit: entry_price * (1.0 + stop_distance * config.risk_reward_ratio),
        },
    }
}
