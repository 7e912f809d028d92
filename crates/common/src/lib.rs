pub mod config;
pub mod logger;
pub mod models;
pub mod notifier;

pub use config::{ConfigError, MAX_CANDLES, RsiSmoothing, ScanConfig};
pub use notifier::{NotifyError, Notifier};
