use chrono::{DateTime, Utc};
use common::models::TradeSignal;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the Telegram alert for a signal. `current_price` is the live quote
/// the signal was priced from.
pub fn format_alert(signal: &TradeSignal, current_price: f64, at: DateTime<Utc>) -> String {
    format!(
        "🚨 {symbol} Alert\n\
         Time: {time} UTC\n\
         Price Change: {change:.2}%\n\
         Current Price: ${price:.2}\n\
         RSI: {rsi:.2}\n\
         Signal: {label}\n\
         Entry: ${entry:.2}\n\
         Stop-Loss: ${stop:.2}\n\
         Take-Profit: ${target:.2}\n\
         Max Hold: {hold}s",
        symbol = signal.symbol,
        time = at.format(TIMESTAMP_FORMAT),
        change = signal.percent_change,
        price = current_price,
        rsi = signal.rsi,
        label = signal.direction.label(),
        entry = signal.entry_price,
        stop = signal.stop_loss,
        target = signal.take_profit,
        hold = signal.max_holding_time_seconds,
    )
}
