//! Error types for stage-motion library.
//!
//! Provides unified error handling across connection, configuration, wire protocol,
//! and motion execution.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stage-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Transport could not be opened
    Connection(ConnectionError),
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Device response did not match the expected framing
    Protocol(ProtocolError),
    /// Move legalization or completion error
    Motion(MotionError),
}

/// Connection errors raised while opening the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// No port was configured and none was supplied
    NoPort,
    /// The serial port could not be opened
    Unavailable {
        /// Port path or name
        port: heapless::String<64>,
        /// Reason reported by the operating system
        reason: heapless::String<128>,
    },
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Stage model name not in the supported lookup table
    UnsupportedStage(heapless::String<32>),
    /// No channels configured
    NoChannels,
    /// More channels configured than the controller provides
    TooManyChannels(usize),
    /// Stage and reversal tuples have different lengths
    LengthMismatch {
        /// Number of stage entries
        stages: usize,
        /// Number of reversal entries
        reverse: usize,
    },
    /// Channel id is not configured on this controller
    UnknownChannel(u8),
    /// Channel has no stage attached and accepts no commands
    ChannelUnpopulated(u8),
    /// Tolerance window must be at least one count
    InvalidTolerance(u32),
    /// Poll interval must be non-zero
    InvalidPollInterval(u32),
    /// Zero-offset guard must be positive
    InvalidZeroGuard(f64),
    /// Builder is missing a required part
    Missing(&'static str),
    /// Serial port path longer than the 64 bytes it is stored in
    PortTooLong(usize),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Wire protocol errors. Fatal to the current call; no retry is attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// Position response was addressed to a different channel
    ChannelMismatch {
        /// Channel the request was sent to
        expected: u8,
        /// Channel byte found in the response
        received: u8,
    },
    /// Bytes were left in the input buffer after a request completed
    LeftoverBytes(usize),
    /// The link failed to write or returned fewer bytes than requested
    LinkIo,
}

/// Move legalization and completion errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Legalized target lies outside the symmetric travel range
    OutOfRange {
        /// Requested displacement in micrometers
        requested_um: f64,
        /// Target after snapping to count granularity
        legalized_um: f64,
        /// Symmetric travel bound in micrometers
        limit_um: f64,
    },
    /// Polling did not observe the target within the configured deadline
    MoveTimedOut {
        /// Channel being polled
        channel: u8,
        /// Pending target in counts
        target: i32,
        /// Last count reported by the device
        last: i32,
    },
    /// Channel position has never been read from the device
    PositionUnknown(u8),
    /// Zeroing refused because the stage is too far from the range midpoint
    ZeroOffCenter {
        /// Current position in micrometers
        position_um: f64,
        /// Configured maximum offset in micrometers
        max_um: f64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::NoPort => write!(f, "No serial port configured"),
            ConnectionError::Unavailable { port, reason } => {
                write!(f, "No connection to controller on port {}: {}", port, reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::UnsupportedStage(name) => write!(
                f,
                "Stage '{}' not supported. Valid values: ZFM2020, ZFM2030, A, B",
                name
            ),
            ConfigError::NoChannels => write!(f, "At least one channel must be configured"),
            ConfigError::TooManyChannels(n) => {
                write!(f, "{} channels configured, controller supports 1 to 3", n)
            }
            ConfigError::LengthMismatch { stages, reverse } => write!(
                f,
                "{} stage entries but {} reversal entries",
                stages, reverse
            ),
            ConfigError::UnknownChannel(ch) => write!(f, "Channel {} not available", ch),
            ConfigError::ChannelUnpopulated(ch) => {
                write!(f, "Channel {} has no stage attached (cannot send command)", ch)
            }
            ConfigError::InvalidTolerance(v) => {
                write!(f, "Invalid tolerance: {} counts. Must be >= 1", v)
            }
            ConfigError::InvalidPollInterval(v) => {
                write!(f, "Invalid poll interval: {} ms. Must be > 0", v)
            }
            ConfigError::InvalidZeroGuard(v) => {
                write!(f, "Invalid zero offset guard: {} um. Must be > 0", v)
            }
            ConfigError::Missing(part) => write!(f, "{} is required", part),
            ConfigError::PortTooLong(len) => {
                write!(f, "Serial port path is {} bytes. Must be <= 64", len)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::ChannelMismatch { expected, received } => write!(
                f,
                "Response for channel {} received while querying channel {}",
                received, expected
            ),
            ProtocolError::LeftoverBytes(n) => {
                write!(f, "{} unexpected bytes left on the link", n)
            }
            ProtocolError::LinkIo => write!(f, "Serial link read or write failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::OutOfRange {
                requested_um,
                legalized_um,
                limit_um,
            } => write!(
                f,
                "Requested move {:.2} um (legalized {:.2} um) exceeds limit +/-{:.2} um",
                requested_um, legalized_um, limit_um
            ),
            MotionError::MoveTimedOut {
                channel,
                target,
                last,
            } => write!(
                f,
                "Channel {} did not reach count {} in time (last reading {})",
                channel, target, last
            ),
            MotionError::PositionUnknown(ch) => {
                write!(f, "Channel {} position has not been read yet", ch)
            }
            MotionError::ZeroOffCenter {
                position_um,
                max_um,
            } => write!(
                f,
                "Refusing to zero at {:.2} um, more than {:.2} um from the range midpoint",
                position_um, max_um
            ),
        }
    }
}

/// Copy a message into a bounded string, cutting it at a char boundary.
#[cfg_attr(not(feature = "std"), allow(dead_code))]
pub(crate) fn bounded<const N: usize>(msg: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

// Conversion impls
impl From<ConnectionError> for Error {
    fn from(e: ConnectionError) -> Self {
        Error::Connection(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConnectionError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
