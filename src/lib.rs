//! # stage-motion
//!
//! Motion control for multi-channel linear-stage controllers over a serial link.
//!
//! ## Features
//!
//! - **Physical units**: Moves are requested in micrometers and snapped to whole encoder counts
//! - **Hard travel limits**: Every move is legalized before anything is sent
//! - **Non-blocking moves**: Pending moves are confirmed lazily and never race
//! - **Pluggable transport**: Any byte stream implementing [`Link`] can drive the controller
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stage_motion::{ControllerConfig, StageController, StageModel, UnitExt};
//!
//! let config = ControllerConfig::from_stages(
//!     &[Some(StageModel::Zfm2030), None, Some(StageModel::LongTravel)],
//!     &[false, false, true],
//! )?
//! .with_port("/dev/ttyUSB0")?;
//!
//! let mut stages = StageController::open(&config, delay)?;
//!
//! // Relative, non-blocking: returns the achievable target
//! let target = stages.move_um(0, 10.0_f64.um(), true, false)?;
//!
//! // Moving again (or zeroing) on channel 0 waits for this move first
//! stages.finish(0)?;
//! let here = stages.get_position_um(0)?;
//! stages.close()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables the serial link, the simulator and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt formatting for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod link;
pub mod motion;
pub mod motor;
pub mod observe;
pub mod protocol;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisScale, ChannelConfig, ControllerConfig, StageModel};
pub use error::{Error, Result};
pub use link::Link;
pub use motion::{PollPolicy, Poller};
pub use motor::{state, Channel, ControllerBuilder, MotionState, StageController};
pub use observe::{LogObserver, MotionEvent, NoopObserver, Observer};

// Configuration loading and host transports (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use link::{SerialLink, SimulatedController};

// Unit types
pub use config::units::{Counts, Micrometers, UnitExt};
