//! Rules engine for Skyrace, a four-colour race-track board game.
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! mutating the [`Game`] it is handed. Concurrency lives one layer up: a
//! room actor owns exactly one `Game` and is its only writer.
//!
//! # Layers
//!
//! - [`color`] — static per-colour board geometry.
//! - [`position`] — pure stepping functions over the shared track and the
//!   private final lanes, plus the derived [`Occupancy`] index.
//! - [`moves`] — legal-move computation and move application (captures).
//! - [`turn`] — whose turn it is, six-streaks, turn advancement.
//! - [`game`] — the per-room state that ties it all together.
//! - [`random`] — the injectable dice / shuffle source.

pub mod color;
mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod position;
pub mod random;
pub mod turn;

pub use color::{Color, ColorConfig, FINAL_PATH_LENGTH, PIECES_PER_PLAYER, TRACK_LENGTH};
pub use error::GameError;
pub use game::{Departure, Game, GameStatus, LastRoll, MoveResult, Roll, RollOutcome, Seat, TurnAfterMove};
pub use moves::{MoveCandidate, MoveKind};
pub use piece::{Piece, PieceId, PieceStatus, Player, Position};
pub use position::Occupancy;
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use turn::{EXIT_ROLL, PassReason, STREAK_CAP, TurnState};
