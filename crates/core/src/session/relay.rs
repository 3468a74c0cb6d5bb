//! Outbound side of the move relay

use crate::protocol::RelayMessage;

/// Where a session announces the moves it accepts.
///
/// Sending is fire-and-forget: an implementation may drop or reorder
/// messages and the session never learns about it.
pub trait MoveRelay {
    fn send(&self, message: &RelayMessage);
}

/// Relay that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRelay;

impl MoveRelay for NullRelay {
    fn send(&self, _message: &RelayMessage) {}
}
