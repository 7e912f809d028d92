//! Indicator engine: RSI over closes plus the last-bar move and volume.

use common::RsiSmoothing;
use common::ScanConfig;
use common::models::{CandleSeries, IndicatorSnapshot};
use ta::Next;
use ta::indicators::RelativeStrengthIndex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("need {required} candles, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("RSI period must be at least 1")]
    InvalidPeriod,
    #[error("previous close is non-positive or a close is non-finite")]
    InvalidPrice,
}

#[derive(Debug, Clone, Copy)]
pub struct IndicatorEngine {
    period: usize,
    smoothing: RsiSmoothing,
}

impl IndicatorEngine {
    pub fn new(period: usize, smoothing: RsiSmoothing) -> Self {
        Self { period, smoothing }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.rsi_period, config.rsi_smoothing)
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn compute(&self, series: &CandleSeries) -> Result<IndicatorSnapshot, IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::InvalidPeriod);
        }

        let required = self.period + 1;
        if series.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        let (prev, last) = series
            .last_pair()
            .ok_or(IndicatorError::InsufficientData {
                required,
                available: series.len(),
            })?;
        if prev.close <= 0.0 {
            return Err(IndicatorError::InvalidPrice);
        }

        let closes = series.closes();
        if closes.iter().any(|c| !c.is_finite()) {
            return Err(IndicatorError::InvalidPrice);
        }

        Ok(IndicatorSnapshot {
            percent_change: percent_change(prev.close, last.close),
            quote_volume: last.volume * last.close,
            rsi: rsi(&closes, self.period, self.smoothing)?,
        })
    }
}

/// Simple percentage move from `previous` to `current`.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    (current - previous) / previous * 100.0
}

/// RSI at the last index of `closes`.
pub fn rsi(closes: &[f64], period: usize, smoothing: RsiSmoothing) -> Result<f64, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }
    if closes.len() < period + 1 {
        return Err(IndicatorError::InsufficientData {
            required: period + 1,
            available: closes.len(),
        });
    }

    let value = match smoothing {
        RsiSmoothing::Rma => rma_rsi(closes, period),
        RsiSmoothing::Wilder => wilder_rsi(closes, period),
        RsiSmoothing::Exponential => exponential_rsi(closes, period)?,
    };
    Ok(value.clamp(0.0, 100.0))
}

// Exponentially weighted means with alpha = 1/period over every delta,
// normalised by the sum of weights instead of seeded.
fn rma_rsi(closes: &[f64], period: usize) -> f64 {
    let decay = 1.0 - 1.0 / period as f64;
    let (mut gain, mut loss, mut weight) = (0.0, 0.0, 0.0);

    for d in closes.windows(2).map(|w| w[1] - w[0]) {
        gain = gain * decay + d.max(0.0);
        loss = loss * decay + (-d).max(0.0);
        weight = weight * decay + 1.0;
    }

    rsi_from_averages(gain / weight, loss / weight)
}

// Seeds with the simple mean of the first `period` deltas, then applies
// avg = (avg * (period - 1) + x) / period to every later delta.
fn wilder_rsi(closes: &[f64], period: usize) -> f64 {
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let (seed, rest) = deltas.split_at(period);
    let n = period as f64;

    let mut avg_gain = seed.iter().map(|d| d.max(0.0)).sum::<f64>() / n;
    let mut avg_loss = seed.iter().map(|d| (-d).max(0.0)).sum::<f64>() / n;

    for d in rest {
        avg_gain = (avg_gain * (n - 1.0) + d.max(0.0)) / n;
        avg_loss = (avg_loss * (n - 1.0) + (-d).max(0.0)) / n;
    }

    rsi_from_averages(avg_gain, avg_loss)
}

fn exponential_rsi(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    let mut indicator =
        RelativeStrengthIndex::new(period).map_err(|_| IndicatorError::InvalidPeriod)?;
    Ok(closes.iter().fold(50.0, |_, close| indicator.next(*close)))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // Flat series sits at the midpoint.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
