use common::{ConfigError, NotifyError};
use market_data::GatewayError;
use thiserror::Error;

/// Anything that stops the scanner from starting. Always fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("market data gateway unavailable: {0}")]
    Gateway(#[from] GatewayError),
    #[error("notifier unavailable: {0}")]
    Notifier(#[from] NotifyError),
    #[error("no tradable symbols quoted in {0}")]
    EmptyUniverse(String),
}
