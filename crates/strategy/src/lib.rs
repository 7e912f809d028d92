//! Signal generation: indicators, classification and risk levels.

pub mod classifier;
pub mod indicators;
pub mod pipeline;
pub mod risk;

pub use classifier::classify;
pub use indicators::{IndicatorEngine, IndicatorError};
pub use pipeline::{Screening, SignalPipeline};
pub use risk::derive;
