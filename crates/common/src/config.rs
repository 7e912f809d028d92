use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}={value:?} could not be parsed: {reason}")]
    Parse {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("invalid configuration: {0}")]
    Constraint(String),
}

/// Upper bound on candles per kline request.
pub const MAX_CANDLES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    /// Bias-adjusted exponential weighting (alpha = 1/period) over every delta.
    #[default]
    Rma,
    Wilder,
    Exponential,
}

impl FromStr for RsiSmoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rma" | "ewm" => Ok(Self::Rma),
            "wilder" => Ok(Self::Wilder),
            "exponential" | "ema" => Ok(Self::Exponential),
            other => Err(format!("unknown RSI smoothing '{}'", other)),
        }
    }
}

impl fmt::Display for RsiSmoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rma => write!(f, "rma"),
            Self::Wilder => write!(f, "wilder"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum absolute move between the last two candles, in percent.
    pub percentage_threshold: f64,
    pub min_volume_usdt: f64,
    pub check_interval_seconds: u64,
    pub risk_reward_ratio: f64,
    pub stop_loss_percent: f64,
    /// Advisory only, copied onto every alert.
    pub max_holding_time_seconds: u64,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub rsi_smoothing: RsiSmoothing,
    pub quote_asset: String,
    /// Symbols evaluated at once. 1 keeps the sweep strictly sequential.
    pub scan_concurrency: usize,
    /// Reload the symbol universe every N cycles. 0 keeps the startup universe.
    pub symbol_refresh_cycles: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            percentage_threshold: 2.0,
            min_volume_usdt: 100_000.0,
            check_interval_seconds: 60,
            risk_reward_ratio: 1.5,
            stop_loss_percent: 0.5,
            max_holding_time_seconds: 300,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            rsi_smoothing: RsiSmoothing::Rma,
            quote_asset: "USDT".to_string(),
            scan_concurrency: 1,
            symbol_refresh_cycles: 0,
        }
    }
}

impl ScanConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            percentage_threshold: read(&lookup, "PERCENTAGE_THRESHOLD", defaults.percentage_threshold)?,
            min_volume_usdt: read(&lookup, "MIN_VOLUME_USDT", defaults.min_volume_usdt)?,
            check_interval_seconds: read(
                &lookup,
                "CHECK_INTERVAL_SECONDS",
                defaults.check_interval_seconds,
            )?,
            risk_reward_ratio: read(&lookup, "RISK_REWARD_RATIO", defaults.risk_reward_ratio)?,
            stop_loss_percent: read(&lookup, "STOP_LOSS_PERCENT", defaults.stop_loss_percent)?,
            max_holding_time_seconds: read(
                &lookup,
                "MAX_HOLDING_TIME_SECONDS",
                defaults.max_holding_time_seconds,
            )?,
            rsi_period: read(&lookup, "RSI_PERIOD", defaults.rsi_period)?,
            rsi_oversold: read(&lookup, "RSI_OVERSOLD", defaults.rsi_oversold)?,
            rsi_overbought: read(&lookup, "RSI_OVERBOUGHT", defaults.rsi_overbought)?,
            rsi_smoothing: read(&lookup, "RSI_SMOOTHING", defaults.rsi_smoothing)?,
            quote_asset: lookup("QUOTE_ASSET")
                .map(|v| v.trim().to_uppercase())
                .unwrap_or(defaults.quote_asset),
            scan_concurrency: read(&lookup, "SCAN_CONCURRENCY", defaults.scan_concurrency)?,
            symbol_refresh_cycles: read(
                &lookup,
                "SYMBOL_REFRESH_CYCLES",
                defaults.symbol_refresh_cycles,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Constraint(msg.to_string()));

        if !(self.percentage_threshold > 0.0) {
            return fail("percentage_threshold must be > 0");
        }
        if !(self.min_volume_usdt >= 0.0) {
            return fail("min_volume_usdt must be >= 0");
        }
        if self.check_interval_seconds == 0 {
            return fail("check_interval_seconds must be > 0");
        }
        if !(self.risk_reward_ratio > 0.0) {
            return fail("risk_reward_ratio must be > 0");
        }
        if !(self.stop_loss_percent > 0.0 && self.stop_loss_percent < 100.0) {
            return fail("stop_loss_percent must be in (0, 100)");
        }
        if self.rsi_period == 0 {
            return fail("rsi_period must be >= 1");
        }
        if self.candles_required() > MAX_CANDLES {
            return fail("rsi_period must be below 1000");
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
        {
            return fail("RSI bounds must lie within [0, 100]");
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return fail("rsi_oversold must be below rsi_overbought");
        }
        if self.quote_asset.is_empty() {
            return fail("quote_asset must not be empty");
        }
        if self.scan_concurrency == 0 {
            return fail("scan_concurrency must be >= 1");
        }
        Ok(())
    }

    pub fn candles_required(&self) -> usize {
        self.rsi_period + 1
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    pub fn max_holding_time(&self) -> Duration {
        Duration::from_secs(self.max_holding_time_seconds)
    }
}

fn read<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Parse {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
