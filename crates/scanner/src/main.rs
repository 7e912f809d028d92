use std::sync::Arc;

use dotenvy::dotenv;
use tokio::sync::watch;
use tracing::{error, info};

use common::ScanConfig;
use common::logger;
use market_data::BinanceClient;
use scanner::errors::StartupError;
use scanner::services::scan_service::ScanService;
use scanner::services::startup;
use scanner::services::telegram_service::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    info!("Starting Binance Scalping Alerts with RSI...");

    if let Err(e) = run().await {
        error!("Startup failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}

async fn run() -> Result<(), StartupError> {
    let config = ScanConfig::from_env()?;
    info!(
        "Threshold {}%, min volume {} {}, RSI({}, {}) {}/{}, check every {}s",
        config.percentage_threshold,
        config.min_volume_usdt,
        config.quote_asset,
        config.rsi_period,
        config.rsi_smoothing,
        config.rsi_oversold,
        config.rsi_overbought,
        config.check_interval_seconds
    );

    let gateway = Arc::new(BinanceClient::from_env()?);
    let notifier = Arc::new(TelegramNotifier::from_env()?);

    let symbols = startup::bootstrap(gateway.as_ref(), notifier.as_ref(), &config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping scanner...");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut scanner = ScanService::new(gateway, notifier, config, symbols);
    scanner.run_forever(shutdown_rx).await;
    Ok(())
}
