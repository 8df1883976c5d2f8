//! Inbound and outbound event vocabulary.
//!
//! Both enums are internally tagged on `"event"`, so a frame looks like
//! `{"event": "roll_dice", "room_id": "K3Q9ZP1"}`.

use serde::{Deserialize, Serialize};
use skyrace_protocol::{PlayerId, RoomCode};
use skyrace_rules::{Color, Game, MoveCandidate, PassReason, PieceId, Player};

/// A request from one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    CreateRoom {
        player_name: String,
    },
    JoinRoom {
        room_id: RoomCode,
        player_name: String,
    },
    StartGame {
        room_id: RoomCode,
    },
    RollDice {
        room_id: RoomCode,
    },
    MakeMove {
        room_id: RoomCode,
        piece_id: PieceId,
        candidate: MoveCandidate,
    },
}

impl ClientEvent {
    /// The room this event targets, if it targets an existing one.
    pub fn room_id(&self) -> Option<&RoomCode> {
        match self {
            Self::CreateRoom { .. } => None,
            Self::JoinRoom { room_id, .. }
            | Self::StartGame { room_id }
            | Self::RollDice { room_id }
            | Self::MakeMove { room_id, .. } => Some(room_id),
        }
    }

    /// Snake-case event name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::StartGame { .. } => "start_game",
            Self::RollDice { .. } => "roll_dice",
            Self::MakeMove { .. } => "make_move",
        }
    }
}

/// A notification to one or more connections.
///
/// Outbound only, so it is never deserialized on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// To the creator only.
    RoomCreated { room_id: RoomCode },

    /// To the joiner only, on a fresh seat and on re-attach.
    RoomJoined {
        room_id: RoomCode,
        players: Vec<Player>,
    },

    PlayerJoined {
        player_id: PlayerId,
        player_name: String,
        color: Color,
    },

    PlayerLeft {
        player_id: PlayerId,
        player_name: String,
    },

    GameStarted {
        first_player: PlayerId,
        turn_order: Vec<PlayerId>,
    },

    DiceRolled { player_id: PlayerId, value: u8 },

    /// To the roller only, when there is a choice to make.
    PossibleMoves {
        value: u8,
        candidates: Vec<MoveCandidate>,
    },

    PieceMoved {
        player_id: PlayerId,
        candidate: MoveCandidate,
        captured: Vec<PieceId>,
    },

    /// `player_id` holds the turn now.
    TurnPassed {
        player_id: PlayerId,
        reason: PassReason,
    },

    /// Full room snapshot, broadcast after every change.
    GameStateUpdate { room_id: RoomCode, state: Box<Game> },

    GameOver { winner_id: PlayerId },

    /// To the requester only.
    Error { code: String, message: String },
}

impl ServerEvent {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_owned(),
            message: message.into(),
        }
    }

    /// Snake-case event name, for logs and test assertions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "room_created",
            Self::RoomJoined { .. } => "room_joined",
            Self::PlayerJoined { .. } => "player_joined",
            Self::PlayerLeft { .. } => "player_left",
            Self::GameStarted { .. } => "game_started",
            Self::DiceRolled { .. } => "dice_rolled",
            Self::PossibleMoves { .. } => "possible_moves",
            Self::PieceMoved { .. } => "piece_moved",
            Self::TurnPassed { .. } => "turn_passed",
            Self::GameStateUpdate { .. } => "game_state_update",
            Self::GameOver { .. } => "game_over",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrace_rules::{MoveKind, Position};

    #[test]
    fn test_client_event_wire_shape() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join_room","room_id":"ab12cd3","player_name":"bob"}"#)
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: RoomCode::new("AB12CD3"),
                player_name: "bob".into(),
            }
        );
        assert_eq!(event.room_id().map(RoomCode::as_str), Some("AB12CD3"));
    }

    #[test]
    fn test_make_move_decodes_candidate() {
        let raw = r#"{
            "event": "make_move",
            "room_id": "AB12CD3",
            "piece_id": {"owner": 1, "slot": 0},
            "candidate": {
                "piece": {"owner": 1, "slot": 0},
                "target": {"status": "on_board", "offset": 0},
                "kind": "exit_hangar"
            }
        }"#;
        let ClientEvent::MakeMove { candidate, .. } = serde_json::from_str(raw).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(candidate.kind, MoveKind::ExitHangar);
        assert_eq!(candidate.target, Position::OnBoard(0));
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"event":"teleport","room_id":"X"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_tagging() {
        let json = serde_json::to_value(ServerEvent::DiceRolled {
            player_id: PlayerId(3),
            value: 6,
        })
        .unwrap();
        assert_eq!(json["event"], "dice_rolled");
        assert_eq!(json["player_id"], 3);
        assert_eq!(json["value"], 6);
    }

    #[test]
    fn test_turn_passed_reason_is_snake_case() {
        let json = serde_json::to_value(ServerEvent::TurnPassed {
            player_id: PlayerId(2),
            reason: PassReason::StreakCapped,
        })
        .unwrap();
        assert_eq!(json["reason"], "streak_capped");
    }
}
