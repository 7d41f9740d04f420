//! Wire protocol for the controller.
//!
//! Provides the fixed-size frame codec and the transport that enforces framing
//! after every request.

mod frame;
mod transport;

pub use frame::{
    decode_position_response, encode_position_response, Command, Frame, COMMAND_LEN,
    POSITION_REQUEST_LEN, POSITION_RESPONSE_LEN, RESPONSE_CHANNEL_OFFSET,
};
pub use transport::Transport;
