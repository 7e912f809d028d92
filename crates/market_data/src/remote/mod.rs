pub mod binance_client;
pub mod exchange_info_response;
pub mod kline_response;
pub mod ticker_response;

pub use binance_client::BinanceClient;
pub use exchange_info_response::{ExchangeInfoResponse, SymbolInfo};
pub use kline_response::KlineRow;
pub use ticker_response::Ticker24hResponse;
