//! Error types for rule violations.

use skyrace_protocol::PlayerId;

/// A request the rules refuse.
///
/// All of these are request-local: the `Game` is left exactly as it was
/// and only the requester hears about it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Every seat is taken.
    #[error("room is full")]
    RoomFull,

    /// Seating or starting after the game left `waiting`.
    #[error("game already started")]
    GameAlreadyStarted,

    /// Rolling or moving before the game started.
    #[error("game has not started")]
    GameNotStarted,

    /// Rolling or moving after someone won.
    #[error("game is over")]
    GameFinished,

    /// The requester is not the current player.
    #[error("not your turn")]
    NotYourTurn,

    /// Only the room creator may start the game.
    #[error("only the room creator can start the game")]
    NotRoomCreator,

    /// Fewer players than the minimum are seated.
    #[error("at least {0} players are needed to start")]
    NotEnoughPlayers(usize),

    /// The piece or candidate isn't part of the outstanding move set.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// The current player still owes a move choice for their last roll.
    #[error("choose a move before rolling again")]
    MovePending,

    /// The player has no seat at this table.
    #[error("player {0} is not seated in this room")]
    NotSeated(PlayerId),
}

impl GameError {
    /// Stable snake_case tag sent to clients in `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomFull => "room_full",
            Self::GameAlreadyStarted => "game_already_started",
            Self::GameNotStarted => "game_not_started",
            Self::GameFinished => "game_finished",
            Self::NotYourTurn => "not_your_turn",
            Self::NotRoomCreator => "not_room_creator",
            Self::NotEnoughPlayers(_) => "not_enough_players",
            Self::InvalidMove(_) => "invalid_move",
            Self::MovePending => "move_pending",
            Self::NotSeated(_) => "not_seated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_taxonomy() {
        assert_eq!(GameError::RoomFull.code(), "room_full");
        assert_eq!(GameError::NotYourTurn.code(), "not_your_turn");
        assert_eq!(GameError::InvalidMove("x".into()).code(), "invalid_move");
        assert_eq!(GameError::NotSeated(PlayerId(1)).code(), "not_seated");
    }

    #[test]
    fn test_display_includes_detail() {
        let err = GameError::NotEnoughPlayers(2);
        assert_eq!(err.to_string(), "at least 2 players are needed to start");
    }
}
