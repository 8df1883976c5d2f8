//! Room actor: an isolated Tokio task that owns one game.
//!
//! The actor is the only writer of its [`Game`]. Callers talk to it through
//! a bounded mpsc channel; every command carries a oneshot reply so the
//! caller learns whether the request was accepted. Rejected requests leave
//! the game untouched and produce no broadcast.

use std::collections::HashMap;

use skyrace_protocol::{PlayerId, Recipient, RoomCode};
use skyrace_rules::{
    Game, GameStatus, MoveCandidate, PassReason, PieceId, RandomSource, RollOutcome, Seat,
    TurnAfterMove,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::{RoomConfig, RoomError, ServerEvent};

/// Channel sender for delivering outbound events to a player.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// How a player arrives at the table. Decides which greeting they get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// First seat in a freshly created room: `room_created`.
    Create,
    /// Any later seat: `room_joined`, plus `player_joined` for the room.
    Join,
}

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        kind: JoinKind,
        sender: PlayerSender,
        reply: Reply<Seat>,
    },
    Leave {
        player_id: PlayerId,
        reply: Reply<RoomInfo>,
    },
    Start {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Roll {
        player_id: PlayerId,
        reply: Reply<u8>,
    },
    Move {
        player_id: PlayerId,
        piece: PieceId,
        candidate: MoveCandidate,
        reply: Reply<()>,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Snapshot {
        reply: oneshot::Sender<Game>,
    },
    Shutdown,
}

/// Room metadata (not the board itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomCode,
    pub status: GameStatus,
    pub player_count: usize,
    pub max_players: usize,
    pub creator: Option<PlayerId>,
    pub current_player: Option<PlayerId>,
}

/// Handle to a running room actor.
///
/// Cheap to clone: it's an `mpsc::Sender` plus the room code. The
/// [`RoomManager`](crate::RoomManager) holds one per room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomCode {
        &self.room_id
    }

    /// Seats a player, or re-attaches one who already has a seat.
    ///
    /// `sender` replaces any previous outbound channel for the player.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: impl Into<String>,
        kind: JoinKind,
        sender: PlayerSender,
    ) -> Result<Seat, RoomError> {
        let name = name.into();
        self.request(|reply| RoomCommand::Join {
            player_id,
            name,
            kind,
            sender,
            reply,
        })
        .await?
    }

    /// Unseats a player. Returns the room as it stands afterwards.
    pub async fn leave(&self, player_id: PlayerId) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await?
    }

    pub async fn start(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Start { player_id, reply })
            .await?
    }

    /// Rolls for `player_id`. Returns the die value.
    pub async fn roll(&self, player_id: PlayerId) -> Result<u8, RoomError> {
        self.request(|reply| RoomCommand::Roll { player_id, reply })
            .await?
    }

    pub async fn make_move(
        &self,
        player_id: PlayerId,
        piece: PieceId,
        candidate: MoveCandidate,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Move {
            player_id,
            piece,
            candidate,
            reply,
        })
        .await?
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    /// A copy of the full game state.
    pub async fn snapshot(&self) -> Result<Game, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// What woke the actor loop.
enum Wake {
    Command(Option<RoomCommand>),
    TurnTimeout,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomCode,
    config: RoomConfig,
    game: Game,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    dice: Box<dyn RandomSource>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// When the current turn expires, if a turn timeout is configured.
    deadline: Option<Instant>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::debug!(room = %self.room_id, "room actor started");

        loop {
            let wake = match self.deadline {
                Some(deadline) => tokio::select! {
                    cmd = self.receiver.recv() => Wake::Command(cmd),
                    () = tokio::time::sleep_until(deadline) => Wake::TurnTimeout,
                },
                None => Wake::Command(self.receiver.recv().await),
            };

            let cmd = match wake {
                Wake::TurnTimeout => {
                    self.handle_timeout();
                    continue;
                }
                Wake::Command(Some(cmd)) => cmd,
                Wake::Command(None) => break,
            };

            match cmd {
                RoomCommand::Join {
                    player_id,
                    name,
                    kind,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, name, kind, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::Start { player_id, reply } => {
                    let result = self.handle_start(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::Roll { player_id, reply } => {
                    let result = self.handle_roll(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::Move {
                    player_id,
                    piece,
                    candidate,
                    reply,
                } => {
                    let result = self.handle_move(player_id, piece, candidate);
                    let _ = reply.send(result);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.game.clone());
                }
                RoomCommand::Shutdown => {
                    tracing::debug!(room = %self.room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::debug!(room = %self.room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: String,
        kind: JoinKind,
        sender: PlayerSender,
    ) -> Result<Seat, RoomError> {
        let seat = self.game.seat(player_id, name)?;
        self.senders.insert(player_id, sender);

        match (seat, kind) {
            (Seat::Seated(_), JoinKind::Create) => {
                self.emit(
                    Recipient::Player(player_id),
                    ServerEvent::RoomCreated {
                        room_id: self.room_id.clone(),
                    },
                );
            }
            (Seat::Seated(color), JoinKind::Join) => {
                tracing::info!(
                    room = %self.room_id,
                    player = %player_id,
                    %color,
                    players = self.game.players().len(),
                    "player joined"
                );
                self.send_room_joined(player_id);
                let player_name = self
                    .game
                    .player(player_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                self.emit(
                    Recipient::All,
                    ServerEvent::PlayerJoined {
                        player_id,
                        player_name,
                        color,
                    },
                );
            }
            (Seat::AlreadySeated(_), _) => {
                tracing::debug!(room = %self.room_id, player = %player_id, "player re-attached");
                self.send_room_joined(player_id);
            }
        }

        self.broadcast_state();
        Ok(seat)
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<RoomInfo, RoomError> {
        let departure = self.game.unseat(player_id)?;
        self.senders.remove(&player_id);

        tracing::info!(
            room = %self.room_id,
            player = %player_id,
            players = self.game.players().len(),
            "player left"
        );

        if !departure.now_empty {
            self.emit(
                Recipient::All,
                ServerEvent::PlayerLeft {
                    player_id,
                    player_name: departure.player.name,
                },
            );
            if let Some(creator) = departure.new_creator {
                tracing::debug!(room = %self.room_id, %creator, "creator promoted");
            }
            if let Some(next) = departure.turn_passed_to {
                self.announce_pass(next, PassReason::PlayerLeft);
                self.arm_turn_timer();
            }
            self.broadcast_state();
        }

        Ok(self.info())
    }

    fn handle_start(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let first = self.game.start(player_id, &mut *self.dice)?;
        let turn_order = self.game.turn_order().to_vec();

        tracing::info!(
            room = %self.room_id,
            %first,
            players = turn_order.len(),
            "game started"
        );

        self.emit(
            Recipient::All,
            ServerEvent::GameStarted {
                first_player: first,
                turn_order,
            },
        );
        self.broadcast_state();
        self.arm_turn_timer();
        Ok(())
    }

    fn handle_roll(&mut self, player_id: PlayerId) -> Result<u8, RoomError> {
        let roll = self.game.roll(player_id, &mut *self.dice)?;
        tracing::info!(room = %self.room_id, player = %player_id, die = roll.die, "dice rolled");

        self.emit(
            Recipient::All,
            ServerEvent::DiceRolled {
                player_id,
                value: roll.die,
            },
        );

        match roll.outcome {
            RollOutcome::TurnPassed { next, reason } => self.announce_pass(next, reason),
            RollOutcome::AwaitingMove { moves } => self.settle_roll(player_id, roll.die, moves),
        }

        self.broadcast_state();
        self.arm_turn_timer();
        Ok(roll.die)
    }

    /// Plays a lone candidate straight away when configured to; otherwise
    /// asks the roller to choose.
    ///
    /// A refused auto-apply leaves the game's outstanding set untouched, so
    /// the roller is offered that set instead and the turn stays playable.
    fn settle_roll(&mut self, player_id: PlayerId, die: u8, moves: Vec<MoveCandidate>) {
        if moves.len() == 1 && self.config.auto_apply_single_move {
            let only = moves[0];
            match self.apply_move(player_id, only.piece, &only) {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(room = %self.room_id, error = %e, "auto-apply refused");
                }
            }
        }

        let candidates = match self.game.pending_moves() {
            Some(pending) => pending.to_vec(),
            None => moves,
        };
        self.emit(
            Recipient::Player(player_id),
            ServerEvent::PossibleMoves {
                value: die,
                candidates,
            },
        );
    }

    fn handle_move(
        &mut self,
        player_id: PlayerId,
        piece: PieceId,
        candidate: MoveCandidate,
    ) -> Result<(), RoomError> {
        self.apply_move(player_id, piece, &candidate)?;
        self.broadcast_state();
        self.arm_turn_timer();
        Ok(())
    }

    /// Applies a candidate and announces the move and whatever follows it.
    /// The snapshot broadcast is left to the caller.
    fn apply_move(
        &mut self,
        player_id: PlayerId,
        piece: PieceId,
        candidate: &MoveCandidate,
    ) -> Result<(), RoomError> {
        let result = self.game.make_move(player_id, piece, candidate)?;
        tracing::info!(
            room = %self.room_id,
            player = %player_id,
            %piece,
            kind = ?result.candidate.kind,
            target = ?result.candidate.target,
            "move applied"
        );
        for captured in &result.captured {
            tracing::info!(room = %self.room_id, player = %player_id, %captured, "piece captured");
        }

        self.emit(
            Recipient::All,
            ServerEvent::PieceMoved {
                player_id,
                candidate: result.candidate,
                captured: result.captured,
            },
        );

        match result.turn {
            TurnAfterMove::KeepTurn => {}
            TurnAfterMove::Passed { next } => self.announce_pass(next, PassReason::TurnFinished),
            TurnAfterMove::GameOver { winner } => {
                tracing::info!(room = %self.room_id, %winner, "game over");
                self.emit(Recipient::All, ServerEvent::GameOver { winner_id: winner });
            }
        }
        Ok(())
    }

    fn handle_timeout(&mut self) {
        self.deadline = None;
        let stalled = self.game.current_player();
        if let Some(next) = self.game.skip_turn(PassReason::TimedOut) {
            if let Some(stalled) = stalled {
                tracing::info!(room = %self.room_id, player = %stalled, "turn timed out");
            }
            self.announce_pass(next, PassReason::TimedOut);
            self.broadcast_state();
        }
        self.arm_turn_timer();
    }

    fn announce_pass(&self, next: PlayerId, reason: PassReason) {
        tracing::info!(room = %self.room_id, player = %next, ?reason, "turn passed");
        self.emit(
            Recipient::All,
            ServerEvent::TurnPassed {
                player_id: next,
                reason,
            },
        );
    }

    /// Restarts the turn clock while a game is running; clears it otherwise.
    fn arm_turn_timer(&mut self) {
        self.deadline = match (self.config.turn_timeout, self.game.status()) {
            (Some(timeout), GameStatus::Playing) => Some(Instant::now() + timeout),
            _ => None,
        };
    }

    fn send_room_joined(&self, player_id: PlayerId) {
        self.emit(
            Recipient::Player(player_id),
            ServerEvent::RoomJoined {
                room_id: self.room_id.clone(),
                players: self.game.players().to_vec(),
            },
        );
    }

    fn broadcast_state(&self) {
        self.emit(
            Recipient::All,
            ServerEvent::GameStateUpdate {
                room_id: self.room_id.clone(),
                state: Box::new(self.game.clone()),
            },
        );
    }

    /// Delivers an event to every seated player the recipient covers.
    /// Sends to a receiver that is gone are dropped.
    fn emit(&self, recipient: Recipient, event: ServerEvent) {
        if let Recipient::Player(only) = recipient {
            if let Some(sender) = self.senders.get(&only) {
                let _ = sender.send(event);
            }
            return;
        }
        for (player_id, sender) in &self.senders {
            if recipient.includes(*player_id) {
                let _ = sender.send(event.clone());
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            status: self.game.status(),
            player_count: self.game.players().len(),
            max_players: self.game.max_players(),
            creator: self.game.creator(),
            current_player: self.game.current_player(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
pub(crate) fn spawn_room(
    room_id: RoomCode,
    config: RoomConfig,
    dice: Box<dyn RandomSource>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size);

    let actor = RoomActor {
        room_id: room_id.clone(),
        game: Game::new(config.min_players, config.max_players),
        config,
        senders: HashMap::new(),
        dice,
        receiver: rx,
        deadline: None,
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}
