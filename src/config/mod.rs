//! Configuration module for stage-motion.
//!
//! Provides types for loading and validating controller and channel configurations
//! from TOML files (with `std` feature) or building them in code.

mod channel;
mod limits;
mod scale;
mod stage;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use channel::ChannelConfig;
pub use limits::TravelLimit;
pub use scale::AxisScale;
pub use stage::StageModel;
pub use system::{ControllerConfig, MAX_CHANNELS};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Counts, Micrometers};
