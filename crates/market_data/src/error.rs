use thiserror::Error;

/// Failures talking to the exchange. All of them are recoverable: the scanner
/// skips the affected symbol and keeps going.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited by exchange (HTTP {0})")]
    RateLimited(u16),
    #[error("exchange returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed {what}: {reason}")]
    Decode { what: &'static str, reason: String },
}

impl GatewayError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    pub(crate) fn decode(what: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            what,
            reason: reason.to_string(),
        }
    }
}

pub(crate) fn parse_decimal(what: &'static str, raw: &str) -> Result<f64, GatewayError> {
    raw.parse::<f64>()
        .map_err(|e| GatewayError::decode(what, format!("{:?}: {}", raw, e)))
}
