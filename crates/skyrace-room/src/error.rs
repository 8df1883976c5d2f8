//! Error types for the room layer.

use skyrace_protocol::RoomCode;
use skyrace_rules::GameError;

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The player already sits in another room.
    #[error("already seated in room {0}")]
    AlreadyInRoom(RoomCode),

    /// The player has no seat anywhere.
    #[error("not seated in any room")]
    NotInAnyRoom,

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),

    /// The game rules refused the request.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl RoomError {
    /// Stable snake_case tag sent to clients in `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "room_not_found",
            Self::AlreadyInRoom(_) => "already_in_room",
            Self::NotInAnyRoom => "not_in_any_room",
            Self::Unavailable(_) => "room_unavailable",
            Self::Game(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_errors_keep_their_code() {
        let err: RoomError = GameError::NotYourTurn.into();
        assert_eq!(err.code(), "not_your_turn");
        assert_eq!(err.to_string(), "not your turn");
    }

    #[test]
    fn test_not_found_code() {
        let err = RoomError::NotFound(RoomCode::new("abc1234"));
        assert_eq!(err.code(), "room_not_found");
        assert_eq!(err.to_string(), "room ABC1234 not found");
    }
}
