//! Pure per-symbol evaluation. Given the same candles, entry price and config,
//! every function here returns the same result.

use common::ScanConfig;
use common::models::{CandleSeries, IndicatorSnapshot, TradeSignal};
use tracing::debug;

use crate::classifier::classify;
use crate::indicators::{IndicatorEngine, IndicatorError};
use crate::risk::derive;

/// Outcome of the candle-only checks, before a live quote is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screening {
    Illiquid(IndicatorSnapshot),
    BelowThreshold(IndicatorSnapshot),
    Candidate(IndicatorSnapshot),
}

#[derive(Debug, Clone)]
pub struct SignalPipeline {
    config: ScanConfig,
    engine: IndicatorEngine,
}

impl SignalPipeline {
    pub fn new(config: ScanConfig) -> Self {
        let engine = IndicatorEngine::from_config(&config);
        Self { config, engine }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Computes indicators and applies the liquidity filter, then the threshold.
    pub fn screen(&self, series: &CandleSeries) -> Result<Screening, IndicatorError> {
        let snapshot = self.engine.compute(series)?;

        // NaN volume fails this comparison and is treated as illiquid.
        if !(snapshot.quote_volume >= self.config.min_volume_usdt) {
            return Ok(Screening::Illiquid(snapshot));
        }
        if snapshot.percent_change.abs() < self.config.percentage_threshold {
            return Ok(Screening::BelowThreshold(snapshot));
        }
        Ok(Screening::Candidate(snapshot))
    }

    pub fn suggest(
        &self,
        symbol: &str,
        snapshot: &IndicatorSnapshot,
        entry_price: f64,
    ) -> Option<TradeSignal> {
        let direction = classify(snapshot.percent_change, snapshot.rsi, &self.config)?;
        let levels = derive(entry_price, direction, &self.config);

        debug!(
            symbol,
            %direction,
            entry_price,
            stop_loss = levels.stop_loss,
            take_profit = levels.take_profit,
            "Signal derived"
        );

        Some(TradeSignal {
            symbol: symbol.to_string(),
            direction,
            percent_change: snapshot.percent_change,
            rsi: snapshot.rsi,
            entry_price,
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
            max_holding_time_seconds: self.config.max_holding_time_seconds,
        })
    }

    /// `screen` followed by `suggest`, for callers that already hold the entry price.
    pub fn evaluate(
        &self,
        series: &CandleSeries,
        entry_price: f64,
    ) -> Result<Option<TradeSignal>, IndicatorError> {
        match self.screen(series)? {
            Screening::Candidate(snapshot) => Ok(self.suggest(&series.symbol, &snapshot, entry_price)),
            Screening::Illiquid(_) | Screening::BelowThreshold(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{Candle, Direction};

    fn series(closes: &[f64], last_volume: f64) -> CandleSeries {
        let last = closes.len().saturating_sub(1);
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                open_time: i as i64 * 60_000,
                open: close,
                high: close,
                low: close,
                close,
                volume: if i == last { last_volume } else { 1.0 },
            })
            .collect();
        CandleSeries::new("ALTUSDT", candles)
    }

    // Six +1/-1 swings around 100, a -2 dip to 98, then a 2.5% jump.
    // Recency-weighted RSI(14) is about 51.44; an equal-weight mean gives
    // 100 * 8.45 / 16.45.
    fn momentum_closes() -> Vec<f64> {
        let mut closes = vec![100.0];
        for _ in 0..6 {
            closes.push(101.0);
            closes.push(100.0);
        }
        closes.push(98.0);
        closes.push(98.0 * 1.025);
        closes
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_momentum_scenario_end_to_end() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        // 2000 * 100.45 is roughly $200k of quote volume
        let s = series(&momentum_closes(), 2_000.0);
        assert_eq!(s.len(), 15);

        let snapshot = match pipeline.screen(&s).unwrap() {
            Screening::Candidate(snapshot) => snapshot,
            other => panic!("expected candidate, got {:?}", other),
        };
        assert!((snapshot.percent_change - 2.5).abs() < 1e-9);
        assert!((snapshot.rsi - 51.442897893426).abs() < 1e-6);

        let entry = 100.5;
        let signal = pipeline.suggest("ALTUSDT", &snapshot, entry).unwrap();
        assert_eq!(signal.direction, Direction::MomentumBuy);
        assert_eq!(signal.entry_price, entry);
        assert!(approx(signal.stop_loss, entry * 0.995));
        assert!(approx(signal.take_profit, entry * 1.0075));
        assert_eq!(signal.max_holding_time_seconds, 300);
    }

    #[test]
    fn test_momentum_snapshot_with_given_rsi() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let snapshot = IndicatorSnapshot {
            percent_change: 2.5,
            quote_volume: 200_000.0,
            rsi: 55.0,
        };
        let signal = pipeline.suggest("ALTUSDT", &snapshot, 10.0).unwrap();
        assert_eq!(signal.direction, Direction::MomentumBuy);
        assert!(approx(signal.stop_loss, 9.95));
        assert!(approx(signal.take_profit, 10.075));
    }

    #[test]
    fn test_low_volume_is_illiquid() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        // 500 * 100.45 is about $50k
        let s = series(&momentum_closes(), 500.0);
        assert!(matches!(pipeline.screen(&s).unwrap(), Screening::Illiquid(_)));
        assert_eq!(pipeline.evaluate(&s, 100.45).unwrap(), None);
    }

    #[test]
    fn test_liquidity_is_checked_before_threshold() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let s = series(&[100.0; 15], 1.0);
        assert!(matches!(pipeline.screen(&s).unwrap(), Screening::Illiquid(_)));
    }

    #[test]
    fn test_small_move_is_below_threshold() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let mut closes = vec![100.0; 14];
        closes.push(101.0);
        let s = series(&closes, 10_000.0);
        assert!(matches!(
            pipeline.screen(&s).unwrap(),
            Screening::BelowThreshold(_)
        ));
    }

    #[test]
    fn test_oversold_drop_gives_no_signal() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let mut closes: Vec<f64> = (0..14).map(|i| 114.0 - i as f64).collect();
        let last = *closes.last().unwrap();
        closes.push(last * 0.97);
        let s = series(&closes, 10_000.0);

        let snapshot = match pipeline.screen(&s).unwrap() {
            Screening::Candidate(snapshot) => snapshot,
            other => panic!("expected candidate, got {:?}", other),
        };
        assert!((snapshot.percent_change + 3.0).abs() < 1e-9);
        assert!(snapshot.rsi < 30.0);
        assert_eq!(pipeline.suggest("ALTUSDT", &snapshot, last * 0.97), None);
    }

    #[test]
    fn test_oversold_snapshot_with_given_rsi() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let snapshot = IndicatorSnapshot {
            percent_change: -3.0,
            quote_volume: 200_000.0,
            rsi: 25.0,
        };
        assert_eq!(pipeline.suggest("ALTUSDT", &snapshot, 1.0), None);
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let s = series(&[100.0; 10], 10_000.0);
        assert!(matches!(
            pipeline.screen(&s),
            Err(IndicatorError::InsufficientData {
                required: 15,
                available: 10
            })
        ));
    }

    #[test]
    fn test_wilder_option_changes_only_the_rsi() {
        let pipeline = SignalPipeline::new(ScanConfig {
            rsi_smoothing: common::RsiSmoothing::Wilder,
            ..ScanConfig::default()
        });
        let s = series(&momentum_closes(), 2_000.0);

        let signal = pipeline.evaluate(&s, 100.5).unwrap().unwrap();
        assert!((signal.rsi - 100.0 * 8.45 / 16.45).abs() < 1e-6);
        assert_eq!(signal.direction, Direction::MomentumBuy);
    }

    #[test]
    fn test_late_rally_into_overbought_is_suppressed() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let mut closes = vec![100.0, 93.0];
        for i in 1..=12 {
            closes.push(93.0 + 0.5 * i as f64);
        }
        closes.push(99.0 * 1.025);
        // 10_000 * ~101.5 clears the volume floor
        let s = series(&closes, 10_000.0);

        assert_eq!(pipeline.evaluate(&s, 101.5).unwrap(), None);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let pipeline = SignalPipeline::new(ScanConfig::default());
        let s = series(&momentum_closes(), 2_000.0);

        let first = pipeline.evaluate(&s, 100.5).unwrap();
        for _ in 0..5 {
            assert_eq!(pipeline.evaluate(&s, 100.5).unwrap(), first);
        }
        assert!(first.is_some());
    }
}
