pub mod candle;
pub mod indicator;
pub mod quote;
pub mod signal;

pub use candle::{Candle, CandleSeries};
pub use indicator::IndicatorSnapshot;
pub use quote::Quote;
pub use signal::{Direction, RiskLevels, TradeSignal};
