//! Observation hooks for controller state transitions.
//!
//! The controller reports what it does through an [`Observer`] instead of printing.
//! Observers cannot influence motion; they only see events.

use crate::config::units::Counts;

/// Something the controller did.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionEvent {
    /// Controller initialized and seeded every populated channel.
    Connected {
        /// Number of populated channels.
        populated: u8,
    },
    /// A position was read from the device.
    PositionRead {
        /// Channel id.
        channel: u8,
        /// Raw encoder count.
        counts: Counts,
        /// Converted position in micrometers.
        position_um: f64,
    },
    /// A request was snapped to count granularity and passed the limit check.
    Legalized {
        /// Channel id.
        channel: u8,
        /// Requested displacement in micrometers.
        requested_um: f64,
        /// Achievable target in micrometers.
        legal_um: f64,
    },
    /// A pending move is being resolved before a new command.
    MoveSuperseded {
        /// Channel id.
        channel: u8,
        /// Target of the pending move.
        previous: Counts,
    },
    /// A move command was sent.
    MoveIssued {
        /// Channel id.
        channel: u8,
        /// Target count.
        target: Counts,
        /// Target position in micrometers.
        position_um: f64,
    },
    /// A poll found the stage still outside the tolerance window.
    Polling {
        /// Channel id.
        channel: u8,
        /// Count reported by the device.
        reported: Counts,
        /// Count being waited for.
        target: Counts,
    },
    /// A pending move was confirmed complete.
    MoveFinished {
        /// Channel id.
        channel: u8,
        /// Final encoder count.
        counts: Counts,
    },
    /// A pending move was dropped without confirmation.
    MoveAbandoned {
        /// Channel id.
        channel: u8,
        /// Target of the dropped move.
        target: Counts,
    },
    /// An encoder zero was requested.
    ZeroRequested {
        /// Channel id.
        channel: u8,
    },
    /// The device acknowledged the new encoder zero.
    EncoderZeroed {
        /// Channel id.
        channel: u8,
    },
    /// The link was released.
    Closed,
}

/// Receives controller events.
pub trait Observer {
    /// Called after each state transition.
    fn on_event(&mut self, event: &MotionEvent);
}

impl<F> Observer for F
where
    F: FnMut(&MotionEvent),
{
    fn on_event(&mut self, event: &MotionEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: &MotionEvent) {}
}

/// Forwards events to the `log` facade.
///
/// Transitions log at `info`, polls at `trace` (or `debug` when verbose).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver {
    verbose: bool,
}

impl LogObserver {
    /// Create a log observer.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Observer for LogObserver {
    fn on_event(&mut self, event: &MotionEvent) {
        let poll_level = if self.verbose {
            log::Level::Debug
        } else {
            log::Level::Trace
        };
        match *event {
            MotionEvent::Connected { populated } => {
                log::info!("Controller ready, {} populated channel(s)", populated)
            }
            MotionEvent::PositionRead {
                channel,
                counts,
                position_um,
            } => log::log!(
                poll_level,
                "Channel {} encoder value {} ({:.2} um)",
                channel,
                counts.0,
                position_um
            ),
            MotionEvent::Legalized {
                channel,
                requested_um,
                legal_um,
            } => log::debug!(
                "Channel {} legalized move_um: {:.2} ({:.2} requested)",
                channel,
                legal_um,
                requested_um
            ),
            MotionEvent::MoveSuperseded { channel, previous } => log::debug!(
                "Channel {} resolving pending move to {} before next command",
                channel,
                previous.0
            ),
            MotionEvent::MoveIssued {
                channel,
                target,
                position_um,
            } => log::info!(
                "Moving channel {} to position_um: {:.2} (count {})",
                channel,
                position_um,
                target.0
            ),
            MotionEvent::Polling {
                channel,
                reported,
                target,
            } => log::log!(
                poll_level,
                "Channel {} at {}, waiting for {}",
                channel,
                reported.0,
                target.0
            ),
            MotionEvent::MoveFinished { channel, counts } => {
                log::info!("Channel {} move done at count {}", channel, counts.0)
            }
            MotionEvent::MoveAbandoned { channel, target } => log::warn!(
                "Channel {} abandoned unconfirmed move to {}",
                channel,
                target.0
            ),
            MotionEvent::ZeroRequested { channel } => {
                log::info!("Waiting for channel {} encoder to acknowledge re-set to zero", channel)
            }
            MotionEvent::EncoderZeroed { channel } => {
                log::info!("Channel {} encoder re-set done", channel)
            }
            MotionEvent::Closed => log::info!("Controller closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = 0;
        {
            let mut observer = |_: &MotionEvent| seen += 1;
            observer.on_event(&MotionEvent::Closed);
            observer.on_event(&MotionEvent::ZeroRequested { channel: 0 });
        }
        assert_eq!(seen, 2);
    }
}
