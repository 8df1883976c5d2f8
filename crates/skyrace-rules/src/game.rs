//! Per-room game state and the operations that drive it.
//!
//! A [`Game`] is owned by exactly one room actor. Every public `&mut self`
//! method is one serialized step: it validates, mutates, and returns a
//! description of what happened for the caller to broadcast. A method
//! that returns `Err` has changed nothing.

use serde::{Deserialize, Serialize};
use skyrace_protocol::PlayerId;

use crate::moves::{self, MoveCandidate};
use crate::turn::{PassReason, Streak, TurnState};
use crate::{
    Color, EXIT_ROLL, FINAL_PATH_LENGTH, GameError, Occupancy, PieceId, Player, Position,
    RandomSource, TRACK_LENGTH, position,
};

/// Room lifecycle. One-way: `Waiting → Playing → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// The most recent roll, kept for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRoll {
    pub player: PlayerId,
    pub die: u8,
}

/// A roll whose move choice is still outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRoll {
    player: PlayerId,
    die: u8,
    moves: Vec<MoveCandidate>,
}

/// Result of [`Game::seat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// A fresh seat with this colour.
    Seated(Color),
    /// The player already had a seat; nothing changed.
    AlreadySeated(Color),
}

impl Seat {
    pub fn color(self) -> Color {
        match self {
            Self::Seated(c) | Self::AlreadySeated(c) => c,
        }
    }
}

/// Result of [`Game::unseat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The player who left, pieces included.
    pub player: Player,
    /// New creator, if the departing player held that role.
    pub new_creator: Option<PlayerId>,
    /// New current player, if the departing player held the turn.
    pub turn_passed_to: Option<PlayerId>,
    /// `true` if nobody is left.
    pub now_empty: bool,
}

/// Result of [`Game::roll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roll {
    pub player: PlayerId,
    pub die: u8,
    pub outcome: RollOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// The roller must pick one of these with [`Game::make_move`].
    AwaitingMove { moves: Vec<MoveCandidate> },
    /// Nothing to do with this roll; the turn moved on.
    TurnPassed { next: PlayerId, reason: PassReason },
}

/// Result of [`Game::make_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub player: PlayerId,
    pub candidate: MoveCandidate,
    pub captured: Vec<PieceId>,
    pub turn: TurnAfterMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAfterMove {
    /// Moved on a six: roll again.
    KeepTurn,
    Passed { next: PlayerId },
    GameOver { winner: PlayerId },
}

/// Everything one room knows about its match.
///
/// Serializes to the full-state snapshot broadcast after every change.
/// The occupancy index and the outstanding move set stay server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    players: Vec<Player>,
    creator: Option<PlayerId>,
    status: GameStatus,
    min_players: usize,
    max_players: usize,
    turn: TurnState,
    winner: Option<PlayerId>,
    last_roll: Option<LastRoll>,
    #[serde(skip)]
    occupancy: Occupancy,
    #[serde(skip)]
    pending: Option<PendingRoll>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(2, Color::PALETTE.len())
    }
}

impl Game {
    /// An empty table in `waiting`. Limits are clamped to `2..=4`, the
    /// palette size.
    pub fn new(min_players: usize, max_players: usize) -> Self {
        let palette = Color::PALETTE.len();
        let max_players = max_players.clamp(2, palette);
        Self {
            players: Vec::new(),
            creator: None,
            status: GameStatus::Waiting,
            min_players: min_players.clamp(2, max_players),
            max_players,
            turn: TurnState::default(),
            winner: None,
            last_roll: None,
            occupancy: Occupancy::default(),
            pending: None,
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_seated(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn creator(&self) -> Option<PlayerId> {
        self.creator
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        self.turn.order()
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn.current()
    }

    pub fn streak(&self, player: PlayerId) -> u8 {
        self.turn.streak(player)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn last_roll(&self) -> Option<LastRoll> {
        self.last_roll
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// The move set the current player must choose from, if any.
    pub fn pending_moves(&self) -> Option<&[MoveCandidate]> {
        self.pending.as_ref().map(|p| p.moves.as_slice())
    }

    /// `true` if an opposing colour stands on shared cell `offset`.
    pub fn is_entry_blocked(&self, color: Color, offset: u8) -> bool {
        position::is_entry_blocked(&self.occupancy, color, offset)
    }

    /// Legal moves for `player` rolling `die` on the current board.
    /// Empty for players without a seat.
    pub fn legal_moves(&self, player: PlayerId, die: u8) -> Vec<MoveCandidate> {
        self.player(player)
            .map(|p| moves::legal_moves(p, &self.occupancy, die))
            .unwrap_or_default()
    }

    // -- Seating -----------------------------------------------------------

    /// Seats `id` with the first free palette colour.
    ///
    /// Re-seating a player who already has a seat is a no-op success,
    /// whatever the room status.
    pub fn seat(&mut self, id: PlayerId, name: impl Into<String>) -> Result<Seat, GameError> {
        if let Some(existing) = self.player(id) {
            return Ok(Seat::AlreadySeated(existing.color));
        }
        if self.status != GameStatus::Waiting {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.players.len() >= self.max_players {
            return Err(GameError::RoomFull);
        }
        let color = Color::PALETTE
            .into_iter()
            .find(|c| self.players.iter().all(|p| p.color != *c))
            .ok_or(GameError::RoomFull)?;

        self.players.push(Player::new(id, name, color));
        if self.creator.is_none() {
            self.creator = Some(id);
        }
        tracing::debug!(player = %id, %color, "seated");
        Ok(Seat::Seated(color))
    }

    /// Removes `id` and their pieces.
    ///
    /// The creator role falls to the next-listed player. If the leaver
    /// held the turn in a running game, the turn passes before they are
    /// dropped from the rotation. The game never pauses.
    pub fn unseat(&mut self, id: PlayerId) -> Result<Departure, GameError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::NotSeated(id))?;

        let turn_passed_to = if self.status == GameStatus::Playing {
            if self.pending.as_ref().is_some_and(|p| p.player == id) {
                self.pending = None;
            }
            self.turn.remove(id)
        } else {
            None
        };

        let player = self.players.remove(index);
        self.occupancy = Occupancy::rebuild(&self.players);

        let new_creator = if self.creator == Some(id) {
            self.creator = self.players.first().map(|p| p.id);
            self.creator
        } else {
            None
        };

        Ok(Departure {
            player,
            new_creator,
            turn_passed_to,
            now_empty: self.players.is_empty(),
        })
    }

    // -- Turn flow ---------------------------------------------------------

    /// Starts the match: freezes a random turn order and hands the turn
    /// to its first entry. Returns that first player.
    pub fn start(
        &mut self,
        requester: PlayerId,
        rng: &mut dyn RandomSource,
    ) -> Result<PlayerId, GameError> {
        if self.creator != Some(requester) {
            return Err(GameError::NotRoomCreator);
        }
        if self.status != GameStatus::Waiting {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.players.len() < self.min_players {
            return Err(GameError::NotEnoughPlayers(self.min_players));
        }

        let mut order: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        rng.shuffle(&mut order);
        self.turn = TurnState::begin(order);
        self.status = GameStatus::Playing;

        let first = self.turn.current().ok_or(GameError::NotEnoughPlayers(self.min_players))?;
        tracing::debug!(%first, order = ?self.turn.order(), "turn order frozen");
        Ok(first)
    }

    /// Rolls the die for the current player and resolves what it allows.
    ///
    /// The third six in a row and a roll with no legal move both pass the
    /// turn immediately. Otherwise the candidates are stored until
    /// [`Game::make_move`] consumes one.
    pub fn roll(&mut self, player: PlayerId, rng: &mut dyn RandomSource) -> Result<Roll, GameError> {
        self.ensure_turn(player)?;
        if self.pending.is_some() {
            return Err(GameError::MovePending);
        }

        let die = rng.roll_die();
        self.last_roll = Some(LastRoll { player, die });

        let outcome = match self.turn.record_roll(player, die) {
            Streak::Capped => self.pass_after_roll(PassReason::StreakCapped)?,
            Streak::Continue => {
                let moves = self.legal_moves(player, die);
                if moves.is_empty() {
                    self.pass_after_roll(PassReason::NoLegalMoves)?
                } else {
                    self.pending = Some(PendingRoll {
                        player,
                        die,
                        moves: moves.clone(),
                    });
                    RollOutcome::AwaitingMove { moves }
                }
            }
        };

        Ok(Roll {
            player,
            die,
            outcome,
        })
    }

    /// Applies one of the outstanding candidates.
    ///
    /// Rejects (with no mutation) a piece the player doesn't own or a
    /// candidate that isn't in the most recent legal-move set.
    pub fn make_move(
        &mut self,
        player: PlayerId,
        piece: PieceId,
        candidate: &MoveCandidate,
    ) -> Result<MoveResult, GameError> {
        self.ensure_turn(player)?;
        if piece.owner != player {
            return Err(GameError::InvalidMove(format!("piece {piece} is not yours")));
        }
        if candidate.piece != piece {
            return Err(GameError::InvalidMove(format!(
                "candidate is for piece {}, not {piece}",
                candidate.piece
            )));
        }
        let pending = self
            .pending
            .as_ref()
            .filter(|p| p.player == player)
            .ok_or_else(|| GameError::InvalidMove("roll the die first".into()))?;
        if !pending.moves.contains(candidate) {
            return Err(GameError::InvalidMove(format!(
                "{:?} to {:?} is not a legal move for this roll",
                candidate.kind, candidate.target
            )));
        }
        let die = pending.die;
        self.pending = None;

        let captured = moves::apply_candidate(&mut self.players, candidate);
        self.occupancy = Occupancy::rebuild(&self.players);

        let won = self.player(player).is_some_and(Player::all_finished);
        let turn = if won {
            self.status = GameStatus::Finished;
            self.winner = Some(player);
            TurnAfterMove::GameOver { winner: player }
        } else if die == EXIT_ROLL {
            TurnAfterMove::KeepTurn
        } else {
            match self.turn.pass() {
                Some(next) => TurnAfterMove::Passed { next },
                None => TurnAfterMove::KeepTurn,
            }
        };

        Ok(MoveResult {
            player,
            candidate: *candidate,
            captured,
            turn,
        })
    }

    /// Forfeits the current turn, discarding any outstanding move choice.
    /// Returns the new current player; `None` if no game is running.
    pub fn skip_turn(&mut self, reason: PassReason) -> Option<PlayerId> {
        if self.status != GameStatus::Playing {
            return None;
        }
        self.pending = None;
        self.pass(reason)
    }

    /// Places a piece directly, bypassing the move rules.
    ///
    /// For setting up board positions in tests and tooling. Offsets must
    /// lie within the status's range.
    pub fn arrange(&mut self, piece: PieceId, position: Position) -> Result<(), GameError> {
        let in_range = match position {
            Position::OnBoard(o) => o < TRACK_LENGTH,
            Position::FinalPath(o) => o < FINAL_PATH_LENGTH,
            Position::Hangar | Position::Finished => true,
        };
        if !in_range {
            return Err(GameError::InvalidMove(format!("{position:?} is off the board")));
        }
        let slot = self
            .players
            .iter_mut()
            .find(|p| p.id == piece.owner)
            .ok_or(GameError::NotSeated(piece.owner))?
            .piece_mut(piece)
            .ok_or_else(|| GameError::InvalidMove(format!("no piece {piece}")))?;
        slot.position = position;
        self.occupancy = Occupancy::rebuild(&self.players);
        Ok(())
    }

    fn ensure_turn(&self, player: PlayerId) -> Result<(), GameError> {
        match self.status {
            GameStatus::Waiting => return Err(GameError::GameNotStarted),
            GameStatus::Finished => return Err(GameError::GameFinished),
            GameStatus::Playing => {}
        }
        if !self.is_seated(player) {
            return Err(GameError::NotSeated(player));
        }
        if self.turn.current() != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Hands the turn on. `None` once the rotation is empty.
    fn pass(&mut self, reason: PassReason) -> Option<PlayerId> {
        let next = self.turn.pass();
        tracing::debug!(?next, ?reason, "turn passed");
        next
    }

    /// The roller held the turn, so the rotation cannot be empty here.
    fn pass_after_roll(&mut self, reason: PassReason) -> Result<RollOutcome, GameError> {
        let next = self.pass(reason).ok_or(GameError::NotYourTurn)?;
        Ok(RollOutcome::TurnPassed { next, reason })
    }
}
