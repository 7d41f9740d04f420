//! Multi-channel stage controller.
//!
//! Owns the link and every channel's state, and runs the per-channel motion
//! state machine:
//!
//! ```text
//!            move (block = false)
//!   Idle ───────────────────────────▶ Moving { target }
//!    ▲                                   │
//!    │  finish: poll until within        │ move again: finish first,
//!    │  tolerance of target              │ then issue the new target
//!    └───────────────────────────────────┘
//! ```
//!
//! Operations on one channel are totally ordered. Issuing a move or zeroing an
//! encoder always resolves a pending move on that channel first, so at most one
//! target is ever pending per channel.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::units::{Counts, Micrometers};
use crate::config::{ControllerConfig, MAX_CHANNELS};
use crate::error::{Error, MotionError, Result};
use crate::link::Link;
use crate::motion::{legalize, PollPolicy, Poller};
use crate::observe::{MotionEvent, NoopObserver, Observer};
use crate::protocol::Transport;

use super::builder::ControllerBuilder;
use super::channel::{lookup, lookup_mut, Channel};
use super::state::MotionState;

/// Motion-control adaptor for a multi-channel linear-stage controller.
///
/// Generic over:
/// - `L`: byte link to the device (must implement [`Link`])
/// - `D`: delay provider used between polls (must implement `DelayNs`)
/// - `O`: event sink (defaults to [`NoopObserver`])
pub struct StageController<L, D, O = NoopObserver>
where
    L: Link,
    D: DelayNs,
    O: Observer,
{
    transport: Transport<L>,
    delay: D,
    observer: O,
    channels: Vec<Option<Channel>, MAX_CHANNELS>,
    poll: PollPolicy,
}

impl<L, D> StageController<L, D, NoopObserver>
where
    L: Link,
    D: DelayNs,
{
    /// Start building a controller.
    pub fn builder() -> ControllerBuilder<L, D, NoopObserver> {
        ControllerBuilder::new()
    }

    /// Create a controller from configuration without an observer.
    ///
    /// Reads the encoder of every populated channel once.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a seeding read fails.
    pub fn new(config: &ControllerConfig, link: L, delay: D) -> Result<Self> {
        Self::builder().config(config).link(link).delay(delay).build()
    }
}

#[cfg(feature = "std")]
impl<D> StageController<crate::link::SerialLink, D, crate::observe::LogObserver>
where
    D: DelayNs,
{
    /// Open the configured serial port and initialize the controller.
    ///
    /// Events are forwarded to the `log` facade.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if no port is configured or it cannot be opened.
    pub fn open(config: &ControllerConfig, delay: D) -> Result<Self> {
        let port = config
            .port
            .as_ref()
            .ok_or(Error::Connection(crate::error::ConnectionError::NoPort))?;
        let link = crate::link::SerialLink::open(port.as_str(), config.baud_rate)?;
        ControllerBuilder::new()
            .config(config)
            .link(link)
            .delay(delay)
            .observer(crate::observe::LogObserver::new(config.verbose))
            .build()
    }
}

impl<L, D, O> StageController<L, D, O>
where
    L: Link,
    D: DelayNs,
    O: Observer,
{
    /// Assemble a controller and seed every populated channel's position.
    pub(crate) fn initialize(
        link: L,
        delay: D,
        observer: O,
        channels: Vec<Option<Channel>, MAX_CHANNELS>,
        poll: PollPolicy,
    ) -> Result<Self> {
        let mut controller = Self {
            transport: Transport::new(link),
            delay,
            observer,
            channels,
            poll,
        };

        let ids: Vec<u8, MAX_CHANNELS> = controller.channel_ids().collect();
        for &id in &ids {
            controller.read_counts(id)?;
        }
        controller.observer.on_event(&MotionEvent::Connected {
            populated: ids.len() as u8,
        });

        Ok(controller)
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Ids of populated channels.
    pub fn channel_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.channels
            .iter()
            .flatten()
            .map(|channel| channel.id())
    }

    /// Get a populated channel.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownChannel` or `ConfigError::ChannelUnpopulated`.
    pub fn channel(&self, channel: u8) -> Result<&Channel> {
        lookup(&self.channels, channel)
    }

    /// Current motion state of a channel.
    pub fn state(&self, channel: u8) -> Result<MotionState> {
        Ok(self.channel(channel)?.state())
    }

    /// Poll settings in effect.
    #[inline]
    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }

    /// Borrow the link.
    #[inline]
    pub fn link(&self) -> &L {
        self.transport.link()
    }

    /// Mutably borrow the link.
    #[inline]
    pub fn link_mut(&mut self) -> &mut L {
        self.transport.link_mut()
    }

    /// Borrow the observer.
    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutably borrow the observer.
    #[inline]
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    // ---------------------------------------------------------------------
    // Public operations
    // ---------------------------------------------------------------------

    /// Current physical position, refreshed from the device.
    ///
    /// Does not change the channel's motion state.
    pub fn get_position_um(&mut self, channel: u8) -> Result<Micrometers> {
        let counts = self.read_counts(channel)?;
        Ok(self.channel(channel)?.scale().to_um(counts))
    }

    /// Validate and snap a candidate move without executing it.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::OutOfRange` if the snapped target is outside the limits.
    pub fn legalize_move_um(
        &mut self,
        channel: u8,
        move_um: Micrometers,
        relative: bool,
    ) -> Result<Micrometers> {
        let legal = legalize(self.channel(channel)?, move_um, relative)?;
        self.observer.on_event(&MotionEvent::Legalized {
            channel,
            requested_um: move_um.0,
            legal_um: legal.position.0,
        });
        Ok(legal.position)
    }

    /// Execute a move and return the legalized target position.
    ///
    /// With `block` unset the call returns once the command is sent; completion is
    /// confirmed by the next operation on the channel or by [`finish`](Self::finish).
    ///
    /// # Errors
    ///
    /// Returns `MotionError::OutOfRange` before anything is sent if the move is
    /// illegal, or a protocol or timeout error while resolving it.
    pub fn move_um(
        &mut self,
        channel: u8,
        move_um: Micrometers,
        relative: bool,
        block: bool,
    ) -> Result<Micrometers> {
        let position = self.legalize_move_um(channel, move_um, relative)?;
        let target = self.channel(channel)?.scale().to_counts(position);
        self.issue_move(channel, target, block)?;
        Ok(position)
    }

    /// Issue a move to an encoder count.
    ///
    /// A move already pending on the channel is resolved first, so two rapid
    /// non-blocking calls serialize instead of racing.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::OutOfRange` before anything is sent if `target` is
    /// not strictly inside the channel's travel range.
    pub fn issue_move(&mut self, channel: u8, target: Counts, block: bool) -> Result<()> {
        let scale = *self.channel(channel)?.scale();
        let position = scale.to_um(target);
        if !scale.limit.contains(position) {
            return Err(Error::Motion(MotionError::OutOfRange {
                requested_um: position.0,
                legalized_um: position.0,
                limit_um: scale.limit.bound().0,
            }));
        }

        let pending = self.channel(channel)?.state().target();
        if let Some(previous) = pending {
            self.observer.on_event(&MotionEvent::MoveSuperseded { channel, previous });
            self.finish(channel)?;
        }

        self.transport.move_to(channel, target)?;

        let ch = lookup_mut(&mut self.channels, channel)?;
        ch.begin_move(target);
        let position_um = ch.scale().to_um(target).0;
        self.observer.on_event(&MotionEvent::MoveIssued {
            channel,
            target,
            position_um,
        });

        if block {
            self.finish(channel)?;
        }
        Ok(())
    }

    /// Wait for a pending move to complete. No-op when the channel is idle.
    ///
    /// Polls the encoder until the reading is within the channel's tolerance of the
    /// target, sleeping one poll interval between reads.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::MoveTimedOut` if the deadline passes first; the move
    /// stays pending so the caller can retry or [`abandon_move`](Self::abandon_move).
    pub fn finish(&mut self, channel: u8) -> Result<()> {
        let Some(target) = self.channel(channel)?.state().target() else {
            return Ok(());
        };

        let mut poller = Poller::new(self.poll);
        let counts = loop {
            let reading = self.read_counts(channel)?;
            if self.channel(channel)?.arrived(reading, target) {
                break reading;
            }
            self.observer.on_event(&MotionEvent::Polling {
                channel,
                reported: reading,
                target,
            });
            if !poller.wait(&mut self.delay) {
                return Err(Error::Motion(MotionError::MoveTimedOut {
                    channel,
                    target: target.0,
                    last: reading.0,
                }));
            }
        };

        lookup_mut(&mut self.channels, channel)?.end_move();
        self.observer
            .on_event(&MotionEvent::MoveFinished { channel, counts });
        Ok(())
    }

    /// Drop a pending move without confirming it.
    ///
    /// Returns the target that was pending, if any. The stage may still be moving.
    pub fn abandon_move(&mut self, channel: u8) -> Result<Option<Counts>> {
        let target = lookup_mut(&mut self.channels, channel)?.end_move();
        if let Some(target) = target {
            self.observer
                .on_event(&MotionEvent::MoveAbandoned { channel, target });
        }
        Ok(target)
    }

    /// Set the channel's current position as encoder zero.
    ///
    /// The travel limits assume the range is centered on zero, so zeroing anywhere
    /// but the mechanical midpoint shifts the usable range. When the channel has a
    /// zero guard, zeroing further than the guard from the current zero is refused.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::ZeroOffCenter` if the guard rejects the position, or a
    /// protocol or timeout error while waiting for the device.
    pub fn zero_encoder(&mut self, channel: u8) -> Result<()> {
        self.finish(channel)?;

        let guard = self.channel(channel)?.zero_guard();
        if let Some(max) = guard {
            let position = self.get_position_um(channel)?;
            if position.abs().0 > max.0 {
                return Err(Error::Motion(MotionError::ZeroOffCenter {
                    position_um: position.0,
                    max_um: max.0,
                }));
            }
        }

        self.observer
            .on_event(&MotionEvent::ZeroRequested { channel });
        self.transport.zero_encoder(channel)?;

        let mut poller = Poller::new(self.poll);
        loop {
            let reading = self.read_counts(channel)?;
            if reading == Counts::ZERO {
                break;
            }
            if !poller.wait(&mut self.delay) {
                return Err(Error::Motion(MotionError::MoveTimedOut {
                    channel,
                    target: 0,
                    last: reading.0,
                }));
            }
        }

        self.observer
            .on_event(&MotionEvent::EncoderZeroed { channel });
        Ok(())
    }

    /// Release the link.
    ///
    /// Pending moves are not confirmed; the stages still complete them on the device.
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()?;
        self.observer.on_event(&MotionEvent::Closed);
        Ok(())
    }

    /// Consume the controller and return its link.
    pub fn into_link(self) -> L {
        self.transport.into_inner()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Read a channel's encoder and record it as the last known position.
    fn read_counts(&mut self, channel: u8) -> Result<Counts> {
        lookup(&self.channels, channel)?;
        let counts = self.transport.read_position(channel)?;

        let ch = lookup_mut(&mut self.channels, channel)?;
        ch.record_reading(counts);
        let position_um = ch.scale().to_um(counts).0;
        self.observer.on_event(&MotionEvent::PositionRead {
            channel,
            counts,
            position_um,
        });
        Ok(counts)
    }
}

impl<L, D, O> core::fmt::Debug for StageController<L, D, O>
where
    L: Link + core::fmt::Debug,
    D: DelayNs,
    O: Observer,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StageController")
            .field("link", self.transport.link())
            .field("channels", &self.channels)
            .field("poll", &self.poll)
            .finish()
    }
}
