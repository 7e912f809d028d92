use common::{Notifier, ScanConfig};
use market_data::MarketDataGateway;
use tracing::info;

use crate::errors::StartupError;

pub const STARTUP_MESSAGE: &str = "Crypto Scalping Assistant with RSI started successfully!";

/// Checks both collaborators and loads the symbol universe. The notifier goes
/// first so a bad token fails before any market data is requested.
pub async fn bootstrap(
    gateway: &dyn MarketDataGateway,
    notifier: &dyn Notifier,
    config: &ScanConfig,
) -> Result<Vec<String>, StartupError> {
    notifier.send(STARTUP_MESSAGE).await?;
    info!("Notifier reachable, startup message sent.");

    let symbols = gateway.list_symbols(&config.quote_asset).await?;
    if symbols.is_empty() {
        return Err(StartupError::EmptyUniverse(config.quote_asset.clone()));
    }

    info!("Monitoring {} {} pairs...", symbols.len(), config.quote_asset);
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{MockGateway, MockTelegram};
    use common::NotifyError;
    use market_data::GatewayError;

    #[tokio::test]
    async fn test_bootstrap_returns_universe() {
        let mut notifier = MockTelegram::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|text: &str| {
                assert_eq!(text, STARTUP_MESSAGE);
                Ok(())
            });

        let mut gateway = MockGateway::new();
        gateway
            .expect_list_symbols()
            .times(1)
            .returning(|quote: &str| {
                assert_eq!(quote, "USDT");
                Ok(vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()])
            });

        let symbols = bootstrap(&gateway, &notifier, &ScanConfig::default())
            .await
            .unwrap();
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[tokio::test]
    async fn test_unreachable_notifier_is_fatal() {
        let mut notifier = MockTelegram::new();
        notifier
            .expect_send()
            .returning(|_: &str| Err(NotifyError::Config("bad token".to_string())));

        let mut gateway = MockGateway::new();
        gateway.expect_list_symbols().never();

        let err = bootstrap(&gateway, &notifier, &ScanConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::Notifier(_)));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_fatal() {
        let mut notifier = MockTelegram::new();
        notifier.expect_send().returning(|_: &str| Ok(()));

        let mut gateway = MockGateway::new();
        gateway.expect_list_symbols().returning(|_: &str| {
            Err(GatewayError::Api {
                status: 503,
                body: "maintenance".to_string(),
            })
        });

        let err = bootstrap(&gateway, &notifier, &ScanConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_empty_universe_is_fatal() {
        let mut notifier = MockTelegram::new();
        notifier.expect_send().returning(|_: &str| Ok(()));

        let mut gateway = MockGateway::new();
        gateway.expect_list_symbols().returning(|_: &str| Ok(Vec::new()));

        let err = bootstrap(&gateway, &notifier, &ScanConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::EmptyUniverse(q) if q == "USDT"));
    }
}
