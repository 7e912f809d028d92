use std::sync::Arc;

use chrono::Utc;
use common::models::TradeSignal;
use common::{NotifyError, Notifier, ScanConfig};
use futures_util::{StreamExt, stream};
use market_data::{GatewayError, MarketDataGateway};
use strategy::{IndicatorError, Screening, SignalPipeline};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::services::alert_format::format_alert;

pub const CANDLE_INTERVAL: &str = "1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InsufficientData,
    InvalidData,
    Illiquid,
    BelowThreshold,
    InvalidQuote,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Alerted(TradeSignal),
    NoSignal,
    Skipped(SkipReason),
}

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("fetch failed for {symbol}: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: GatewayError,
    },
    #[error("alert for {symbol} not delivered: {source}")]
    Notify {
        symbol: String,
        #[source]
        source: NotifyError,
    },
}

/// Per-cycle tally of symbol outcomes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub scanned: usize,
    pub alerts: usize,
    pub no_signal: usize,
    pub skipped_insufficient: usize,
    pub skipped_invalid: usize,
    pub skipped_illiquid: usize,
    pub skipped_below_threshold: usize,
    pub fetch_errors: usize,
    pub notify_errors: usize,
}

impl CycleReport {
    fn record(&mut self, result: &Result<SymbolOutcome, SymbolError>) {
        self.scanned += 1;
        match result {
            Ok(SymbolOutcome::Alerted(_)) => self.alerts += 1,
            Ok(SymbolOutcome::NoSignal) => self.no_signal += 1,
            Ok(SymbolOutcome::Skipped(reason)) => match reason {
                SkipReason::InsufficientData => self.skipped_insufficient += 1,
                SkipReason::InvalidData | SkipReason::InvalidQuote => self.skipped_invalid += 1,
                SkipReason::Illiquid => self.skipped_illiquid += 1,
                SkipReason::BelowThreshold => self.skipped_below_threshold += 1,
            },
            Err(SymbolError::Fetch { .. }) => self.fetch_errors += 1,
            Err(SymbolError::Notify { .. }) => self.notify_errors += 1,
        }
    }
}

/// Sweeps the symbol universe on a fixed interval and dispatches alerts.
pub struct ScanService {
    gateway: Arc<dyn MarketDataGateway>,
    notifier: Arc<dyn Notifier>,
    pipeline: SignalPipeline,
    symbols: Vec<String>,
    state: ScanState,
    cycle: u64,
}

impl ScanService {
    pub fn new(
        gateway: Arc<dyn MarketDataGateway>,
        notifier: Arc<dyn Notifier>,
        config: ScanConfig,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            pipeline: SignalPipeline::new(config),
            symbols,
            state: ScanState::Idle,
            cycle: 0,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    fn config(&self) -> &ScanConfig {
        self.pipeline.config()
    }

    /// Loops `run_once` and sleeps the check interval after each full sweep.
    /// Returns once `shutdown` turns true or its sender is dropped.
    pub async fn run_forever(&mut self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.config().check_interval();
        info!(
            "Scanner started: {} symbols every {:?}",
            self.symbols.len(),
            interval
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_once().await;

            tokio::select! {
                _ = time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Scanner stopped after {} cycles.", self.cycle);
    }

    /// One sweep over the universe. Never fails: every per-symbol problem is
    /// logged and counted.
    pub async fn run_once(&mut self) -> CycleReport {
        self.cycle += 1;
        self.refresh_universe_if_due().await;

        self.state = ScanState::Scanning;
        debug!(cycle = self.cycle, symbols = self.symbols.len(), "Scanning");

        let mut report = CycleReport {
            cycle: self.cycle,
            ..CycleReport::default()
        };

        {
            let this = &*self;
            let mut results = stream::iter(this.symbols.clone())
                .map(move |symbol: String| async move { this.scan_symbol(&symbol).await })
                .buffer_unordered(this.config().scan_concurrency.max(1));

            while let Some(result) = results.next().await {
                log_result(&result);
                report.record(&result);
            }
        }

        self.state = ScanState::Idle;
        info!(
            cycle = report.cycle,
            scanned = report.scanned,
            alerts = report.alerts,
            no_signal = report.no_signal,
            insufficient = report.skipped_insufficient,
            invalid = report.skipped_invalid,
            illiquid = report.skipped_illiquid,
            below_threshold = report.skipped_below_threshold,
            fetch_errors = report.fetch_errors,
            notify_errors = report.notify_errors,
            "Cycle complete"
        );
        report
    }

    async fn scan_symbol(&self, symbol: &str) -> Result<SymbolOutcome, SymbolError> {
        let config = self.config();

        let series = self
            .gateway
            .fetch_candles(symbol, CANDLE_INTERVAL, config.candles_required())
            .await
            .map_err(|source| SymbolError::Fetch {
                symbol: symbol.to_string(),
                source,
            })?;

        let snapshot = match self.pipeline.screen(&series) {
            Ok(Screening::Candidate(snapshot)) => snapshot,
            Ok(Screening::Illiquid(snapshot)) => {
                debug!(symbol, quote_volume = snapshot.quote_volume, "Illiquid, skipping");
                return Ok(SymbolOutcome::Skipped(SkipReason::Illiquid));
            }
            Ok(Screening::BelowThreshold(_)) => {
                return Ok(SymbolOutcome::Skipped(SkipReason::BelowThreshold));
            }
            Err(IndicatorError::InsufficientData {
                required,
                available,
            }) => {
                debug!(symbol, required, available, "Not enough candles, skipping");
                return Ok(SymbolOutcome::Skipped(SkipReason::InsufficientData));
            }
            Err(e) => {
                debug!(symbol, "Unusable candles: {}", e);
                return Ok(SymbolOutcome::Skipped(SkipReason::InvalidData));
            }
        };

        let quote = self
            .gateway
            .fetch_quote(symbol)
            .await
            .map_err(|source| SymbolError::Fetch {
                symbol: symbol.to_string(),
                source,
            })?;

        let entry_price = quote.last_price;
        if !(entry_price.is_finite() && entry_price > 0.0) {
            warn!(symbol, entry_price, "Quote has no usable price, skipping");
            return Ok(SymbolOutcome::Skipped(SkipReason::InvalidQuote));
        }

        let Some(signal) = self.pipeline.suggest(symbol, &snapshot, entry_price) else {
            debug!(
                symbol,
                percent_change = snapshot.percent_change,
                rsi = snapshot.rsi,
                "RSI filter rejected move"
            );
            return Ok(SymbolOutcome::NoSignal);
        };

        let message = format_alert(&signal, entry_price, Utc::now());
        info!("{}", message);

        self.notifier
            .send(&message)
            .await
            .map_err(|source| SymbolError::Notify {
                symbol: symbol.to_string(),
                source,
            })?;

        Ok(SymbolOutcome::Alerted(signal))
    }

    // A failed or empty reload keeps the current universe.
    async fn refresh_universe_if_due(&mut self) {
        let every = self.config().symbol_refresh_cycles;
        if every == 0 || self.cycle <= 1 || (self.cycle - 1) % every != 0 {
            return;
        }

        let quote_asset = self.config().quote_asset.clone();
        match self.gateway.list_symbols(&quote_asset).await {
            Ok(symbols) if !symbols.is_empty() => {
                if symbols != self.symbols {
                    info!(
                        "Symbol universe refreshed: {} -> {} {} pairs",
                        self.symbols.len(),
                        symbols.len(),
                        quote_asset
                    );
                }
                self.symbols = symbols;
            }
            Ok(_) => warn!("Symbol refresh returned no pairs, keeping current universe"),
            Err(e) => warn!("Symbol refresh failed, keeping current universe: {}", e),
        }
    }
}

fn log_result(result: &Result<SymbolOutcome, SymbolError>) {
    match result {
        Ok(SymbolOutcome::Alerted(signal)) => {
            info!("Alert sent: {} {}", signal.symbol, signal.direction)
        }
        Err(e @ SymbolError::Fetch { .. }) => warn!("{}", e),
        Err(e @ SymbolError::Notify { .. }) => error!("{}", e),
        Ok(_) => {}
    }
}
