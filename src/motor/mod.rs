//! Motor module for stage-motion.
//!
//! Provides the multi-channel stage controller, its builder and per-channel state.

mod builder;
mod channel;
mod controller;
pub mod state;

pub use builder::ControllerBuilder;
pub use channel::Channel;
pub use controller::StageController;
pub use state::MotionState;
