//! Momentum/RSI alert scanner: scheduling, alert formatting and delivery.

pub mod errors;
pub mod services;
