//! Motion module for stage-motion.
//!
//! Provides move legalization and the polling loop used to confirm completion.

mod legalize;
mod poll;

pub use legalize::{legalize, reference_position, LegalMove};
pub use poll::{PollPolicy, Poller};
