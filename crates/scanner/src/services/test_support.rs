use async_trait::async_trait;
use common::models::{Candle, CandleSeries, Quote};
use common::{NotifyError, Notifier};
use market_data::{GatewayError, MarketDataGateway};
use mockall::mock;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

mock! {
    pub Gateway {}

    #[async_trait]
    impl MarketDataGateway for Gateway {
        async fn list_symbols(&self, quote_asset: &str) -> Result<Vec<String>, GatewayError>;
        async fn fetch_candles(
            &self,
            symbol: &str,
            interval: &str,
            count: usize,
        ) -> Result<CandleSeries, GatewayError>;
        async fn fetch_quote(&self, symbol: &str) -> Result<Quote, GatewayError>;
    }
}

mock! {
    pub Telegram {}

    #[async_trait]
    impl Notifier for Telegram {
        async fn send(&self, text: &str) -> Result<(), NotifyError>;
    }
}

pub fn unavailable() -> GatewayError {
    GatewayError::Api {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

fn series_from(symbol: &str, closes: &[f64], last_volume: f64) -> CandleSeries {
    let last = closes.len().saturating_sub(1);
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            open_time: 1_700_000_000_000 + i as i64 * 60_000,
            open: close,
            high: close,
            low: close,
            close,
            volume: if i == last { last_volume } else { 1.0 },
        })
        .collect();
    CandleSeries::new(symbol, candles)
}

/// 15 closes swinging around 100, ending with a 2.5% jump. RSI(14) is about 51.
pub fn momentum_series(symbol: &str, last_volume: f64) -> CandleSeries {
    let mut closes = vec![100.0];
    for _ in 0..6 {
        closes.push(101.0);
        closes.push(100.0);
    }
    closes.push(98.0);
    closes.push(98.0 * 1.025);
    series_from(symbol, &closes, last_volume)
}

/// 14 falling closes then a 3% drop. RSI(14) is 0.
pub fn oversold_series(symbol: &str) -> CandleSeries {
    let mut closes: Vec<f64> = (0..14).map(|i| 114.0 - i as f64).collect();
    closes.push(101.0 * 0.97);
    series_from(symbol, &closes, 10_000.0)
}

pub fn flat_series(symbol: &str, len: usize, last_volume: f64) -> CandleSeries {
    series_from(symbol, &vec![100.0; len], last_volume)
}

struct WarningCapture(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for WarningCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

/// Records WARN and ERROR messages on the current thread into `sink`.
pub fn capture_warnings(sink: &Arc<Mutex<Vec<String>>>) -> DefaultGuard {
    let subscriber = tracing_subscriber::registry().with(WarningCapture(sink.clone()));
    tracing::subscriber::set_default(subscriber)
}
