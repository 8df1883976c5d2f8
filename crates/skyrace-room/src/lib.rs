//! Room lifecycle for Skyrace.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! [`Game`](skyrace_rules::Game) outright. Every request for a room is a
//! message on that task's channel, so one room's events are applied
//! strictly one at a time while different rooms run in parallel.
//!
//! # Key types
//!
//! - [`RoomManager`] — creates/destroys rooms, tracks who sits where
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`ClientEvent`] / [`ServerEvent`] — the inbound and outbound vocabulary
//! - [`RoomConfig`] — seat limits, channel size, code length, turn timeout

mod config;
mod error;
mod event;
mod manager;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use event::{ClientEvent, ServerEvent};
pub use manager::{RoomManager, SourceFactory};
pub use room::{JoinKind, PlayerSender, RoomHandle, RoomInfo};
