//! Wire-level vocabulary for Skyrace.
//!
//! This crate is the bottom of the stack. It knows nothing about dice,
//! pieces, or rooms as running things; it only defines:
//!
//! - **Identity** ([`PlayerId`], [`RoomCode`]): who and where.
//! - **Addressing** ([`Recipient`]): who an outbound event is for.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing that.
//!
//! ```text
//! transport (external) → Protocol (bytes ↔ events) → Room (serialized state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{PlayerId, Recipient, RoomCode};
