//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use skyrace_rules::Color;

/// Settings shared by every room a [`RoomManager`](crate::RoomManager)
/// creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Minimum players required to start the game.
    pub min_players: usize,

    /// Maximum players allowed in the room. Never more than the palette.
    pub max_players: usize,

    /// Bound of each room actor's command channel.
    pub channel_size: usize,

    /// Length of generated room codes.
    pub code_length: usize,

    /// Apply a roll's only legal move without waiting for `make_move`.
    pub auto_apply_single_move: bool,

    /// Pass the turn when the current player neither rolls nor moves for
    /// this long. `None` leaves turns open until the player acts or leaves.
    pub turn_timeout: Option<Duration>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            channel_size: 64,
            code_length: 7,
            auto_apply_single_move: true,
            turn_timeout: None,
        }
    }
}

impl RoomConfig {
    /// Pulls every field back into its usable range.
    pub fn validated(mut self) -> Self {
        let palette = Color::PALETTE.len();
        self.max_players = self.max_players.clamp(2, palette);
        self.min_players = self.min_players.clamp(2, self.max_players);
        self.channel_size = self.channel_size.max(1);
        self.code_length = self.code_length.clamp(4, 16);
        self.turn_timeout = self.turn_timeout.filter(|t| !t.is_zero());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.code_length, 7);
        assert!(config.auto_apply_single_move);
        assert!(config.turn_timeout.is_none());
    }

    #[test]
    fn test_validated_clamps_seat_limits() {
        let config = RoomConfig {
            min_players: 9,
            max_players: 12,
            channel_size: 0,
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.max_players, 4);
        assert_eq!(config.min_players, 4);
        assert_eq!(config.channel_size, 1);
    }

    #[test]
    fn test_validated_drops_zero_timeout() {
        let config = RoomConfig {
            turn_timeout: Some(Duration::ZERO),
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.turn_timeout, None);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: RoomConfig = serde_json::from_str(r#"{"max_players": 3}"#).unwrap();
        assert_eq!(config.max_players, 3);
        assert_eq!(config.channel_size, 64);
    }
}
