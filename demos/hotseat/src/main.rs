//! Bots play one full match in-process.
//!
//! ```text
//! cargo run -p hotseat -- [players 2-4] [seed]
//! RUST_LOG=debug cargo run -p hotseat
//! ```

use std::sync::Arc;

use skyrace::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;

const NAMES: [&str; 4] = ["ada", "brook", "cy", "dune"];

// ---------------------------------------------------------------------------
// Bot
// ---------------------------------------------------------------------------

struct Bot {
    id: PlayerId,
    name: &'static str,
    room: RoomCode,
    engine: Arc<Engine>,
    inbox: UnboundedReceiver<ServerEvent>,
    /// Latest snapshot, for sizing up candidates.
    state: Option<Box<Game>>,
    /// Set once a roll's choice has been answered; the snapshot that roll
    /// broadcast is stale by the time it is read.
    answered: bool,
}

impl Bot {
    /// Plays until the match ends. Returns the winner.
    async fn run(mut self) -> Option<PlayerId> {
        while let Some(event) = self.inbox.recv().await {
            match event {
                ServerEvent::GameStateUpdate { state, .. } => {
                    let my_turn = state.status() == GameStatus::Playing
                        && state.current_player() == Some(self.id);
                    self.state = Some(state);
                    if std::mem::take(&mut self.answered) {
                        continue;
                    }
                    if my_turn {
                        self.send(ClientEvent::RollDice {
                            room_id: self.room.clone(),
                        })
                        .await;
                    }
                }
                ServerEvent::PossibleMoves { candidates, .. } => {
                    let Some(candidate) = self.pick(&candidates) else {
                        continue;
                    };
                    self.answered = true;
                    self.send(ClientEvent::MakeMove {
                        room_id: self.room.clone(),
                        piece_id: candidate.piece,
                        candidate,
                    })
                    .await;
                }
                ServerEvent::PieceMoved {
                    player_id,
                    candidate,
                    captured,
                } if player_id == self.id => {
                    tracing::debug!(bot = self.name, piece = %candidate.piece, target = ?candidate.target, "moved");
                    for piece in captured {
                        tracing::info!(bot = self.name, %piece, "captured");
                    }
                }
                ServerEvent::GameOver { winner_id } => return Some(winner_id),
                ServerEvent::Error { code, message } => {
                    tracing::warn!(bot = self.name, %code, %message, "request rejected");
                }
                _ => {}
            }
        }
        None
    }

    /// Winning beats capturing beats leaving the hangar beats anything else.
    fn pick(&self, candidates: &[MoveCandidate]) -> Option<MoveCandidate> {
        let captures = |m: MoveCandidate| match (&self.state, m.target) {
            (Some(state), Position::OnBoard(cell)) => state
                .player(self.id)
                .is_some_and(|me| state.occupancy().has_opponent(cell, me.color)),
            _ => false,
        };
        candidates
            .iter()
            .find(|m| m.kind == MoveKind::Win)
            .or_else(|| candidates.iter().find(|m| captures(**m)))
            .or_else(|| candidates.iter().find(|m| m.kind == MoveKind::ExitHangar))
            .or_else(|| candidates.first())
            .copied()
    }

    async fn send(&self, event: ClientEvent) {
        // Rejections come back as `error` events on the inbox.
        let _ = self.engine.handle(self.id, event).await;
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    skyrace::telemetry::init();

    let mut args = std::env::args().skip(1);
    let players = args
        .next()
        .and_then(|a| a.parse::<usize>().ok())
        .unwrap_or(2)
        .clamp(2, NAMES.len());
    let seed = args.next().and_then(|a| a.parse::<u64>().ok());

    let builder = Engine::builder();
    let engine = Arc::new(match seed {
        Some(seed) => builder.seeded_dice(seed).build(),
        None => builder.build(),
    });

    // Seat everyone before any bot starts listening.
    let mut seats = Vec::with_capacity(players);
    let (host, mut host_inbox) = engine.connect().await;
    engine
        .handle(host, ClientEvent::CreateRoom { player_name: NAMES[0].into() })
        .await?;
    let room = std::iter::from_fn(|| host_inbox.try_recv().ok())
        .find_map(|e| match e {
            ServerEvent::RoomCreated { room_id } => Some(room_id),
            _ => None,
        })
        .ok_or_else(|| skyrace::ProtocolError::InvalidMessage("no room_created".into()))?;
    tracing::info!(%room, players, "room ready");
    seats.push((host, NAMES[0], host_inbox));

    for name in &NAMES[1..players] {
        let (id, inbox) = engine.connect().await;
        engine
            .handle(
                id,
                ClientEvent::JoinRoom {
                    room_id: room.clone(),
                    player_name: (*name).into(),
                },
            )
            .await?;
        seats.push((id, *name, inbox));
    }

    let mut bots = Vec::with_capacity(players);
    for (id, name, inbox) in seats {
        let bot = Bot {
            id,
            name,
            room: room.clone(),
            engine: Arc::clone(&engine),
            inbox,
            state: None,
            answered: false,
        };
        bots.push(tokio::spawn(bot.run()));
    }

    engine
        .handle(host, ClientEvent::StartGame { room_id: room.clone() })
        .await?;

    let mut winner = None;
    for bot in bots {
        if let Ok(Some(id)) = bot.await {
            winner = Some(id);
        }
    }

    match winner {
        Some(winner_id) => {
            tracing::info!(%room, winner = %winner_id, "match over");
            let frame = engine.encode(&ServerEvent::GameOver { winner_id })?;
            println!("{}", String::from_utf8_lossy(&frame));
        }
        None => tracing::warn!(%room, "match ended without a winner"),
    }
    Ok(())
}
