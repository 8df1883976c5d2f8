//! Error types for the protocol layer.

/// Errors raised while turning events into bytes or back.
///
/// A `ProtocolError` never reaches game state: a frame that fails to
/// decode is rejected before any room sees it.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, unknown event tag,
    /// missing fields, and so on.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but breaks a protocol rule, e.g. an empty
    /// room code or player name.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl ProtocolError {
    /// Stable snake_case tag sent to clients in `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            #[cfg(feature = "json")]
            Self::Encode(_) => "encode_failed",
            #[cfg(feature = "json")]
            Self::Decode(_) => "malformed_event",
            Self::InvalidMessage(_) => "invalid_message",
        }
    }
}
