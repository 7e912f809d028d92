pub mod error;
pub mod remote;
pub mod traits;

pub use error::GatewayError;
pub use remote::BinanceClient;
pub use traits::{MarketDataGateway, RemoteResponse};
