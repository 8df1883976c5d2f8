//! # Skyrace
//!
//! Server-authoritative engine for a four-colour race-track board game.
//!
//! Players roll a die, bring pieces out of their hangar on a six, race
//! them once around a shared 52-cell track, capture opponents by landing
//! on them, and finish through a private six-cell lane. The engine owns
//! all randomness and every rule; clients only ask.
//!
//! The engine never touches a socket. A transport registers each
//! connection with [`Engine::connect`], feeds it inbound frames or
//! [`ClientEvent`]s, forwards whatever arrives on the connection's
//! [`ServerEvent`] receiver, and calls [`Engine::disconnect`] when the
//! connection goes away.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skyrace::prelude::*;
//!
//! # async fn demo() -> Result<(), EngineError> {
//! let engine = Engine::builder().build();
//! let (alice, mut inbox) = engine.connect().await;
//!
//! engine
//!     .handle(alice, ClientEvent::CreateRoom { player_name: "alice".into() })
//!     .await?;
//! while let Ok(event) = inbox.try_recv() {
//!     println!("{}", event.name());
//! }
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
pub mod telemetry;

pub use engine::{Engine, EngineBuilder};
pub use error::EngineError;

pub use skyrace_protocol::{Codec, JsonCodec, PlayerId, ProtocolError, RoomCode};
pub use skyrace_room::{ClientEvent, RoomConfig, RoomError, RoomInfo, ServerEvent, SourceFactory};
pub use skyrace_rules::{GameError, RandomSource, RngSource, ScriptedSource};

pub mod prelude {
    pub use crate::{
        ClientEvent, Engine, EngineBuilder, EngineError, PlayerId, RoomCode, RoomConfig,
        ServerEvent,
    };
    pub use skyrace_rules::{Color, Game, GameStatus, MoveCandidate, MoveKind, PieceId, Position};
}
