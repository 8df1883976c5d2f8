//! Codec trait and implementations for event (de)serialization.
//!
//! The engine never touches a socket. Whatever transport sits in front of
//! it hands over raw frames; a [`Codec`] turns those into typed events and
//! typed events back into frames. Swapping JSON for a binary format means
//! adding one more implementation here and nothing else.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes typed values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the engine.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Browser clients speak JSON natively, so this is the default. It sits
/// behind the `json` feature (on by default).
///
/// ```rust
/// use skyrace_protocol::{Codec, JsonCodec, RoomCode};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&RoomCode::new("ab12cd3")).unwrap();
/// assert_eq!(bytes, b"\"AB12CD3\"");
///
/// let code: RoomCode = codec.decode(&bytes).unwrap();
/// assert_eq!(code.as_str(), "AB12CD3");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
