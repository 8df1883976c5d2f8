//! Position model: pure stepping over the shared track and final lanes.
//!
//! Nothing here mutates state. Each function answers "if this piece moved
//! `die` cells, where would it end up?" and returns `None` when the answer
//! is "nowhere legal" (overshooting home).

use std::collections::BTreeMap;

use crate::{Color, FINAL_PATH_LENGTH, PieceId, Player, Position, TRACK_LENGTH};

// ---------------------------------------------------------------------------
// Occupancy
// ---------------------------------------------------------------------------

/// Derived index: shared-track cell → pieces standing there.
///
/// Only `OnBoard` pieces appear. Lanes are private per colour and never
/// contested, so they are not indexed. The index is always rebuilt from
/// scratch after a mutation rather than patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: BTreeMap<u8, BTreeMap<PieceId, Color>>,
}

impl Occupancy {
    /// Builds the index from the players' current piece positions.
    pub fn rebuild(players: &[Player]) -> Self {
        let mut cells: BTreeMap<u8, BTreeMap<PieceId, Color>> = BTreeMap::new();
        for piece in players.iter().flat_map(|p| p.pieces.iter()) {
            if let Some(offset) = piece.position.track_offset() {
                cells.entry(offset).or_default().insert(piece.id, piece.color);
            }
        }
        Self { cells }
    }

    /// Pieces on `offset`, with their colours.
    pub fn at(&self, offset: u8) -> impl Iterator<Item = (PieceId, Color)> + '_ {
        self.cells
            .get(&offset)
            .into_iter()
            .flat_map(|m| m.iter().map(|(id, c)| (*id, *c)))
    }

    /// `true` if a piece of any colour other than `color` sits on `offset`.
    pub fn has_opponent(&self, offset: u8, color: Color) -> bool {
        self.at(offset).any(|(_, c)| c != color)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Stepping
// ---------------------------------------------------------------------------

/// `true` if an opposing colour already occupies `offset`.
///
/// Used to refuse a hangar exit onto an occupied entry cell. A colour
/// never blocks itself.
pub fn is_entry_blocked(occupancy: &Occupancy, color: Color, offset: u8) -> bool {
    occupancy.has_opponent(offset, color)
}

/// Steps a `color` piece standing on shared cell `offset` forward by `die`.
///
/// Travel wraps modulo [`TRACK_LENGTH`] until it passes the colour's
/// `safe_zone_entry`; every step beyond that cell is counted inside the
/// colour's own lane instead. Reaching one past the last lane cell is
/// [`Position::Finished`]; going further is an overshoot (`None`).
pub fn advance_on_track(color: Color, offset: u8, die: u8) -> Option<Position> {
    let track = u16::from(TRACK_LENGTH);
    let offset = u16::from(offset) % track;
    let die = u16::from(die);
    let to_entry = (u16::from(color.safe_zone_entry()) + track - offset) % track;

    if die <= to_entry {
        return Some(Position::OnBoard(((offset + die) % track) as u8));
    }
    // First step past the entry cell lands on lane offset 0.
    lane_target(die - to_entry - 1)
}

/// Steps a piece on lane offset `lane` forward by `die`.
///
/// Legal only while the result stays within the lane or lands exactly on
/// home; overshoot is refused, never clamped.
pub fn advance_on_final_path(lane: u8, die: u8) -> Option<Position> {
    lane_target(u16::from(lane) + u16::from(die))
}

fn lane_target(lane: u16) -> Option<Position> {
    let length = u16::from(FINAL_PATH_LENGTH);
    match lane {
        l if l < length => Some(Position::FinalPath(l as u8)),
        l if l == length => Some(Position::Finished),
        _ => None,
    }
}
