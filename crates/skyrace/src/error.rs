//! Unified error type for the engine facade.

use skyrace_protocol::{PlayerId, ProtocolError};
use skyrace_room::RoomError;

/// Top-level error that wraps every layer's errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A frame that failed to decode or broke a protocol rule.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room or rules rejection.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The player id was never registered or has disconnected.
    #[error("unknown connection {0}")]
    UnknownConnection(PlayerId),
}

impl EngineError {
    /// Stable snake_case tag sent to clients in `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Protocol(e) => e.code(),
            Self::Room(e) => e.code(),
            Self::UnknownConnection(_) => "unknown_connection",
        }
    }
}
