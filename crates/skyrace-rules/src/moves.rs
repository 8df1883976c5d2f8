//! Move resolver: which moves a die value allows, and what applying one
//! does to the board.

use serde::{Deserialize, Serialize};

use crate::position::{advance_on_final_path, advance_on_track, is_entry_blocked};
use crate::turn::EXIT_ROLL;
use crate::{Occupancy, Piece, PieceId, Player, Position};

/// What kind of move a candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Hangar → the colour's start cell.
    ExitHangar,
    /// Forward along the track or lane.
    Advance,
    /// Lands exactly home.
    Win,
}

/// One legal move for one die roll.
///
/// Candidates are ephemeral: produced by a roll, consumed by exactly one
/// move application, or dropped when the turn passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveCandidate {
    pub piece: PieceId,
    pub target: Position,
    pub kind: MoveKind,
}

/// Legal moves for `player` rolling `die`, at most one per piece.
pub fn legal_moves(player: &Player, occupancy: &Occupancy, die: u8) -> Vec<MoveCandidate> {
    player
        .pieces
        .iter()
        .filter_map(|piece| candidate_for(piece, occupancy, die))
        .collect()
}

fn candidate_for(piece: &Piece, occupancy: &Occupancy, die: u8) -> Option<MoveCandidate> {
    let (target, kind) = match piece.position {
        Position::Hangar => {
            let start = piece.color.start_offset();
            if die != EXIT_ROLL || is_entry_blocked(occupancy, piece.color, start) {
                return None;
            }
            (Position::OnBoard(start), MoveKind::ExitHangar)
        }
        Position::OnBoard(offset) => {
            let target = advance_on_track(piece.color, offset, die)?;
            (target, kind_for(target))
        }
        Position::FinalPath(lane) => {
            let target = advance_on_final_path(lane, die)?;
            (target, kind_for(target))
        }
        Position::Finished => return None,
    };
    Some(MoveCandidate {
        piece: piece.id,
        target,
        kind,
    })
}

fn kind_for(target: Position) -> MoveKind {
    if target == Position::Finished {
        MoveKind::Win
    } else {
        MoveKind::Advance
    }
}

/// Relocates the candidate's piece and resolves captures.
///
/// Every piece of another colour on the landing cell goes back to its
/// hangar. Same-colour pieces stack; lane and home cells are never
/// contested. Returns the captured pieces. The caller validates the
/// candidate first and rebuilds the occupancy index afterwards.
pub fn apply_candidate(players: &mut [Player], candidate: &MoveCandidate) -> Vec<PieceId> {
    let Some(mover_color) = players
        .iter_mut()
        .find(|p| p.id == candidate.piece.owner)
        .and_then(|p| p.piece_mut(candidate.piece))
        .map(|piece| {
            piece.position = candidate.target;
            piece.color
        })
    else {
        return Vec::new();
    };

    let Some(landing) = candidate.target.track_offset() else {
        return Vec::new();
    };

    let mut captured = Vec::new();
    for piece in players.iter_mut().flat_map(|p| p.pieces.iter_mut()) {
        if piece.color != mover_color && piece.position == Position::OnBoard(landing) {
            piece.position = Position::Hangar;
            captured.push(piece.id);
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, PieceStatus};
    use skyrace_protocol::PlayerId;

    fn player_with(id: u64, color: Color, positions: [Position; 4]) -> Player {
        let mut player = Player::new(PlayerId(id), format!("p{id}"), color);
        for (piece, position) in player.pieces.iter_mut().zip(positions) {
            piece.position = position;
        }
        player
    }

    fn all_hangar(id: u64, color: Color) -> Player {
        Player::new(PlayerId(id), format!("p{id}"), color)
    }

    #[test]
    fn test_hangar_pieces_need_a_six() {
        let red = all_hangar(1, Color::Red);
        let occ = Occupancy::rebuild(std::slice::from_ref(&red));
        for die in 1..6 {
            assert!(legal_moves(&red, &occ, die).is_empty(), "die {die}");
        }
        let moves = legal_moves(&red, &occ, 6);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.kind == MoveKind::ExitHangar));
        assert!(moves.iter().all(|m| m.target == Position::OnBoard(0)));
    }

    #[test]
    fn test_hangar_exit_blocked_by_opponent_on_start() {
        let red = all_hangar(1, Color::Red);
        let blue = player_with(
            2,
            Color::Blue,
            [Position::OnBoard(0), Position::Hangar, Position::Hangar, Position::Hangar],
        );
        let occ = Occupancy::rebuild(&[red.clone(), blue]);
        assert!(legal_moves(&red, &occ, 6).is_empty());
    }

    #[test]
    fn test_hangar_exit_not_blocked_by_own_piece() {
        let red = player_with(
            1,
            Color::Red,
            [Position::OnBoard(0), Position::Hangar, Position::Hangar, Position::Hangar],
        );
        let occ = Occupancy::rebuild(std::slice::from_ref(&red));
        let moves = legal_moves(&red, &occ, 6);
        assert_eq!(moves.len(), 4);
        assert_eq!(
            moves.iter().filter(|m| m.kind == MoveKind::ExitHangar).count(),
            3
        );
    }

    #[test]
    fn test_final_path_win_and_overshoot() {
        let red = player_with(
            1,
            Color::Red,
            [Position::FinalPath(3), Position::Finished, Position::Finished, Position::Finished],
        );
        let occ = Occupancy::rebuild(std::slice::from_ref(&red));

        let moves = legal_moves(&red, &occ, 3);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind, MoveKind::Win);
        assert_eq!(moves[0].target, Position::Finished);

        assert!(legal_moves(&red, &occ, 4).is_empty());
        assert_eq!(legal_moves(&red, &occ, 2)[0].target, Position::FinalPath(5));
    }

    #[test]
    fn test_capture_sends_opponent_home_only() {
        let mut players = vec![
            player_with(
                1,
                Color::Red,
                [Position::OnBoard(4), Position::OnBoard(13), Position::Hangar, Position::Hangar],
            ),
            player_with(
                2,
                Color::Blue,
                [Position::OnBoard(13), Position::FinalPath(1), Position::Hangar, Position::Hangar],
            ),
        ];
        let candidate = MoveCandidate {
            piece: players[0].pieces[0].id,
            target: Position::OnBoard(13),
            kind: MoveKind::Advance,
        };

        let captured = apply_candidate(&mut players, &candidate);

        assert_eq!(captured, vec![players[1].pieces[0].id]);
        assert_eq!(players[0].pieces[0].position, Position::OnBoard(13));
        assert_eq!(players[0].pieces[1].position, Position::OnBoard(13));
        assert_eq!(players[1].pieces[0].status(), PieceStatus::Hangar);
        assert_eq!(players[1].pieces[1].position, Position::FinalPath(1));
    }

    #[test]
    fn test_lane_moves_never_capture() {
        let mut players = vec![
            player_with(
                1,
                Color::Red,
                [Position::FinalPath(0), Position::Hangar, Position::Hangar, Position::Hangar],
            ),
            player_with(
                2,
                Color::Blue,
                [Position::OnBoard(2), Position::Hangar, Position::Hangar, Position::Hangar],
            ),
        ];
        let candidate = MoveCandidate {
            piece: players[0].pieces[0].id,
            target: Position::FinalPath(2),
            kind: MoveKind::Advance,
        };
        assert!(apply_candidate(&mut players, &candidate).is_empty());
        assert_eq!(players[1].pieces[0].position, Position::OnBoard(2));
    }
}
