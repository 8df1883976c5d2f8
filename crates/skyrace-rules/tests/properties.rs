//! Property tests for the move resolver.

use proptest::prelude::*;
use skyrace_protocol::PlayerId;
use skyrace_rules::moves::{apply_candidate, legal_moves};
use skyrace_rules::{
    Color, FINAL_PATH_LENGTH, MoveKind, Occupancy, Player, Position, TRACK_LENGTH,
};

fn any_position() -> impl Strategy<Value = Position> {
    prop_oneof![
        Just(Position::Hangar),
        (0..TRACK_LENGTH).prop_map(Position::OnBoard),
        (0..FINAL_PATH_LENGTH).prop_map(Position::FinalPath),
        Just(Position::Finished),
    ]
}

fn any_color() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::PALETTE.to_vec())
}

fn player(id: u64, color: Color, positions: [Position; 4]) -> Player {
    let mut player = Player::new(PlayerId(id), format!("p{id}"), color);
    for (piece, position) in player.pieces.iter_mut().zip(positions) {
        piece.position = position;
    }
    player
}

proptest! {
    #[test]
    fn prop_targets_never_overshoot_the_lane(
        color in any_color(),
        positions in prop::array::uniform4(any_position()),
        die in 1u8..=6,
    ) {
        let me = player(1, color, positions);
        let occ = Occupancy::rebuild(std::slice::from_ref(&me));
        for candidate in legal_moves(&me, &occ, die) {
            match candidate.target {
                Position::OnBoard(o) => prop_assert!(o < TRACK_LENGTH),
                Position::FinalPath(o) => prop_assert!(o < FINAL_PATH_LENGTH),
                Position::Finished => prop_assert_eq!(candidate.kind, MoveKind::Win),
                Position::Hangar => prop_assert!(false, "moves never target the hangar"),
            }
        }
        for piece in &me.pieces {
            if let Position::FinalPath(lane) = piece.position {
                let offered = legal_moves(&me, &occ, die).iter().any(|m| m.piece == piece.id);
                prop_assert_eq!(offered, lane + die <= FINAL_PATH_LENGTH);
            }
        }
    }

    #[test]
    fn prop_hangar_exit_iff_six_and_entry_free(
        mover in any_color(),
        other in any_color(),
        other_pos in any_position(),
        die in 1u8..=6,
    ) {
        prop_assume!(mover != other);
        let me = player(1, mover, [Position::Hangar; 4]);
        let them = player(2, other, [other_pos, Position::Hangar, Position::Hangar, Position::Hangar]);
        let occ = Occupancy::rebuild(&[me.clone(), them]);

        let blocked = other_pos == Position::OnBoard(mover.start_offset());
        let can_exit = !legal_moves(&me, &occ, die).is_empty();
        prop_assert_eq!(can_exit, die == 6 && !blocked);
    }

    #[test]
    fn prop_capture_only_hits_opponents_on_the_landing_cell(
        mine in prop::array::uniform4(any_position()),
        theirs in prop::array::uniform4(any_position()),
        die in 1u8..=6,
        pick in any::<prop::sample::Index>(),
    ) {
        let players = vec![player(1, Color::Red, mine), player(2, Color::Blue, theirs)];
        let occ = Occupancy::rebuild(&players);
        let moves = legal_moves(&players[0], &occ, die);
        prop_assume!(!moves.is_empty());
        let candidate = moves[pick.index(moves.len())];

        let mut after = players.clone();
        let captured = apply_candidate(&mut after, &candidate);

        for (slot, piece) in after[0].pieces.iter().enumerate() {
            if piece.id == candidate.piece {
                prop_assert_eq!(piece.position, candidate.target);
            } else {
                prop_assert_eq!(piece.position, players[0].pieces[slot].position);
            }
        }
        for (slot, piece) in after[1].pieces.iter().enumerate() {
            let before = players[1].pieces[slot].position;
            let hit = before.track_offset().is_some() && before.track_offset() == candidate.target.track_offset();
            if hit {
                prop_assert_eq!(piece.position, Position::Hangar);
                prop_assert!(captured.contains(&piece.id));
            } else {
                prop_assert_eq!(piece.position, before);
            }
        }
    }
}
