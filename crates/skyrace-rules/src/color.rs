//! Static board geometry: the colour palette and where each colour enters
//! and leaves the shared track.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the shared circular track.
pub const TRACK_LENGTH: u8 = 52;

/// Number of cells in each colour's private final lane.
pub const FINAL_PATH_LENGTH: u8 = 6;

/// Pieces dealt to every player.
pub const PIECES_PER_PLAYER: usize = 4;

/// Distance between two consecutive colours' start cells.
const QUADRANT: u8 = TRACK_LENGTH / 4;

/// A player colour. Assigned from [`Color::PALETTE`] in join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

/// Where one colour joins the shared track and where it peels off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    /// Shared-track cell a piece lands on when it leaves the hangar.
    pub start_offset: u8,
    /// Last shared-track cell before the colour's final lane. One step
    /// past this cell is lane offset 0.
    pub safe_zone_entry: u8,
    /// Cells in the private lane; stepping one past the last cell is home.
    pub final_path_length: u8,
}

impl Color {
    /// Seating order for colours.
    pub const PALETTE: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Board geometry for this colour.
    pub const fn config(self) -> ColorConfig {
        let quadrant = match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Green => 2,
            Color::Yellow => 3,
        };
        let start_offset = quadrant * QUADRANT;
        ColorConfig {
            start_offset,
            // 50 cells after the start cell; the lane branches off there.
            safe_zone_entry: (start_offset + TRACK_LENGTH - 2) % TRACK_LENGTH,
            final_path_length: FINAL_PATH_LENGTH,
        }
    }

    /// Shortcut for `self.config().start_offset`.
    pub const fn start_offset(self) -> u8 {
        self.config().start_offset
    }

    /// Shortcut for `self.config().safe_zone_entry`.
    pub const fn safe_zone_entry(self) -> u8 {
        self.config().safe_zone_entry
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        };
        f.write_str(name)
    }
}
