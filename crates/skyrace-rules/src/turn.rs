//! Turn controller: turn order, six-streaks, and turn advancement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skyrace_protocol::PlayerId;

/// The roll that releases a piece from the hangar and earns another roll.
pub const EXIT_ROLL: u8 = 6;

/// Consecutive sixes after which the turn is forcibly passed.
pub const STREAK_CAP: u8 = 3;

/// Why the turn moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassReason {
    /// The roll produced no legal move.
    NoLegalMoves,
    /// Third six in a row.
    StreakCapped,
    /// A move finished on a non-six roll.
    TurnFinished,
    /// The current player left the room.
    PlayerLeft,
    /// The current player sat on their turn past the configured timeout.
    TimedOut,
}

/// Result of feeding a roll into the streak counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Streak {
    /// Keep resolving the roll.
    Continue,
    /// Streak cap reached; the counter is already reset.
    Capped,
}

/// Whose turn it is and how many sixes each player has strung together.
///
/// `order` is frozen when the game starts and only shrinks as players
/// leave. While the game is running `current` is always in `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    #[serde(rename = "turn_order")]
    order: Vec<PlayerId>,
    #[serde(rename = "current_player")]
    current: Option<PlayerId>,
    streaks: BTreeMap<PlayerId, u8>,
}

impl TurnState {
    /// Freezes `order` and hands the turn to its first entry.
    pub fn begin(order: Vec<PlayerId>) -> Self {
        let current = order.first().copied();
        let streaks = order.iter().map(|id| (*id, 0)).collect();
        Self {
            order,
            current,
            streaks,
        }
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn current(&self) -> Option<PlayerId> {
        self.current
    }

    pub fn streak(&self, player: PlayerId) -> u8 {
        self.streaks.get(&player).copied().unwrap_or(0)
    }

    /// Applies the consecutive-six policy to one roll.
    ///
    /// A six bumps the counter; anything else resets it. On the
    /// [`STREAK_CAP`]-th six the counter resets and [`Streak::Capped`] is
    /// returned. The caller is expected to pass the turn.
    pub fn record_roll(&mut self, player: PlayerId, die: u8) -> Streak {
        let streak = self.streaks.entry(player).or_insert(0);
        if die != EXIT_ROLL {
            *streak = 0;
            return Streak::Continue;
        }
        *streak += 1;
        if *streak >= STREAK_CAP {
            *streak = 0;
            Streak::Capped
        } else {
            Streak::Continue
        }
    }

    /// Hands the turn to the next player in `order`, cyclically.
    ///
    /// The outgoing player's streak is cleared: sixes only chain within
    /// one turn. Returns the new current player.
    pub fn pass(&mut self) -> Option<PlayerId> {
        if let Some(outgoing) = self.current {
            self.streaks.insert(outgoing, 0);
        }
        let next = match self.current.and_then(|c| self.order.iter().position(|id| *id == c)) {
            Some(index) => self.order.get((index + 1) % self.order.len()).copied(),
            None => self.order.first().copied(),
        };
        self.current = next;
        next
    }

    /// Drops `player` from the rotation.
    ///
    /// If they held the turn it is passed first, so the turn lands on the
    /// player after them. Returns the new current player in that case.
    pub fn remove(&mut self, player: PlayerId) -> Option<PlayerId> {
        let passed = if self.current == Some(player) {
            self.pass()
        } else {
            None
        };
        self.order.retain(|id| *id != player);
        self.streaks.remove(&player);
        if self.order.is_empty() {
            self.current = None;
            return None;
        }
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<PlayerId> {
        raw.iter().copied().map(PlayerId).collect()
    }

    #[test]
    fn test_begin_hands_turn_to_first() {
        let turn = TurnState::begin(ids(&[3, 1, 2]));
        assert_eq!(turn.current(), Some(PlayerId(3)));
        assert_eq!(turn.order(), ids(&[3, 1, 2]).as_slice());
    }

    #[test]
    fn test_pass_is_cyclic() {
        let mut turn = TurnState::begin(ids(&[1, 2, 3]));
        assert_eq!(turn.pass(), Some(PlayerId(2)));
        assert_eq!(turn.pass(), Some(PlayerId(3)));
        assert_eq!(turn.pass(), Some(PlayerId(1)));
    }

    #[test]
    fn test_third_six_caps_and_resets() {
        let mut turn = TurnState::begin(ids(&[1, 2]));
        let p = PlayerId(1);
        assert_eq!(turn.record_roll(p, 6), Streak::Continue);
        assert_eq!(turn.record_roll(p, 6), Streak::Continue);
        assert_eq!(turn.streak(p), 2);
        assert_eq!(turn.record_roll(p, 6), Streak::Capped);
        assert_eq!(turn.streak(p), 0);
    }

    #[test]
    fn test_non_six_resets_streak() {
        let mut turn = TurnState::begin(ids(&[1, 2]));
        let p = PlayerId(1);
        turn.record_roll(p, 6);
        turn.record_roll(p, 2);
        assert_eq!(turn.streak(p), 0);
    }

    #[test]
    fn test_pass_clears_outgoing_streak() {
        let mut turn = TurnState::begin(ids(&[1, 2]));
        turn.record_roll(PlayerId(1), 6);
        turn.pass();
        assert_eq!(turn.streak(PlayerId(1)), 0);
    }

    #[test]
    fn test_remove_current_passes_before_removal() {
        let mut turn = TurnState::begin(ids(&[1, 2]));
        assert_eq!(turn.remove(PlayerId(1)), Some(PlayerId(2)));
        assert_eq!(turn.current(), Some(PlayerId(2)));
        assert_eq!(turn.order(), ids(&[2]).as_slice());
    }

    #[test]
    fn test_remove_other_keeps_current() {
        let mut turn = TurnState::begin(ids(&[1, 2, 3]));
        assert_eq!(turn.remove(PlayerId(3)), None);
        assert_eq!(turn.current(), Some(PlayerId(1)));
        assert_eq!(turn.pass(), Some(PlayerId(2)));
        assert_eq!(turn.pass(), Some(PlayerId(1)));
    }

    #[test]
    fn test_remove_last_player_empties_rotation() {
        let mut turn = TurnState::begin(ids(&[1]));
        assert_eq!(turn.remove(PlayerId(1)), None);
        assert_eq!(turn.current(), None);
    }
}
