//! Pieces and the players who own them.

use serde::{Deserialize, Serialize};
use skyrace_protocol::PlayerId;
use std::fmt;

use crate::{Color, PIECES_PER_PLAYER};

/// Identifies one piece: its owner plus a slot in `0..4`.
///
/// The owner is a lookup key, not a reference. Pieces never outlive the
/// player who owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId {
    pub owner: PlayerId,
    pub slot: u8,
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.owner, self.slot)
    }
}

/// Coarse lifecycle of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceStatus {
    Hangar,
    OnBoard,
    FinalPath,
    Finished,
}

/// Where a piece is, with the offset scoped to its status.
///
/// `OnBoard` offsets are shared-track cells `0..52`; `FinalPath` offsets
/// are local to the owner's lane, `0..6`. Carrying the status in the
/// variant means an offset can never be read in the wrong space.
///
/// Serialized as `{"status": "on_board", "offset": 13}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "offset", rename_all = "snake_case")]
pub enum Position {
    Hangar,
    OnBoard(u8),
    FinalPath(u8),
    Finished,
}

impl Position {
    pub fn status(self) -> PieceStatus {
        match self {
            Self::Hangar => PieceStatus::Hangar,
            Self::OnBoard(_) => PieceStatus::OnBoard,
            Self::FinalPath(_) => PieceStatus::FinalPath,
            Self::Finished => PieceStatus::Finished,
        }
    }

    /// The status-relative offset, if the status has one.
    pub fn offset(self) -> Option<u8> {
        match self {
            Self::OnBoard(o) | Self::FinalPath(o) => Some(o),
            Self::Hangar | Self::Finished => None,
        }
    }

    /// The shared-track cell, if the piece is on the shared track.
    pub fn track_offset(self) -> Option<u8> {
        match self {
            Self::OnBoard(o) => Some(o),
            _ => None,
        }
    }
}

/// One token on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    pub fn owner(&self) -> PlayerId {
        self.id.owner
    }

    pub fn status(&self) -> PieceStatus {
        self.position.status()
    }
}

/// A seated player and their four pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: Color,
    pub pieces: [Piece; PIECES_PER_PLAYER],
}

impl Player {
    /// Seats a new player with every piece in the hangar.
    pub fn new(id: PlayerId, name: impl Into<String>, color: Color) -> Self {
        let pieces = std::array::from_fn(|slot| Piece {
            id: PieceId {
                owner: id,
                slot: slot as u8,
            },
            color,
            position: Position::Hangar,
        });
        Self {
            id,
            name: name.into(),
            color,
            pieces,
        }
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    /// `true` once every piece is home.
    pub fn all_finished(&self) -> bool {
        self.pieces.iter().all(|p| p.position == Position::Finished)
    }

    /// How many pieces currently have `status`.
    pub fn count(&self, status: PieceStatus) -> usize {
        self.pieces.iter().filter(|p| p.status() == status).count()
    }
}
