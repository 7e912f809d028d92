use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("notifier misconfigured: {0}")]
    Config(String),
}

/// Destination for human-readable alert text.
///
/// Delivery is best effort: callers log failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
