//! `Engine` builder and inbound event dispatcher.
//!
//! This is the entry point for a transport. It ties the layers together:
//! frames → protocol → room registry → room actors.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use skyrace_protocol::{Codec, JsonCodec, PlayerId, ProtocolError, RoomCode};
use skyrace_room::{
    ClientEvent, PlayerSender, RoomConfig, RoomError, RoomInfo, RoomManager, ServerEvent,
    SourceFactory,
};
use skyrace_rules::{RandomSource, RngSource};
use tokio::sync::{Mutex, mpsc};

use crate::EngineError;

/// Builder for configuring an [`Engine`].
///
/// ```rust
/// use skyrace::{Engine, RoomConfig};
///
/// let engine = Engine::builder()
///     .room_config(RoomConfig { max_players: 2, ..RoomConfig::default() })
///     .seeded_dice(7)
///     .build();
/// ```
pub struct EngineBuilder {
    config: RoomConfig,
    dice: Option<SourceFactory>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings and entropy-seeded dice.
    pub fn new() -> Self {
        Self {
            config: RoomConfig::default(),
            dice: None,
        }
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where each new room gets its dice from.
    pub fn dice(mut self, factory: SourceFactory) -> Self {
        self.dice = Some(factory);
        self
    }

    /// Reproducible dice: room `n` (counting from 0) rolls from
    /// `RngSource::seeded(seed + n)`.
    pub fn seeded_dice(self, seed: u64) -> Self {
        let next = Arc::new(AtomicU64::new(seed));
        self.dice(Arc::new(move || {
            let seed = next.fetch_add(1, Ordering::Relaxed);
            Box::new(RngSource::seeded(seed)) as Box<dyn RandomSource>
        }))
    }

    /// Builds an engine speaking JSON.
    pub fn build(self) -> Engine<JsonCodec> {
        self.build_with_codec(JsonCodec)
    }

    /// Builds an engine with a custom frame codec.
    pub fn build_with_codec<C: Codec>(self, codec: C) -> Engine<C> {
        let rooms = match self.dice {
            Some(dice) => RoomManager::with_source_factory(self.config, dice),
            None => RoomManager::new(self.config),
        };
        Engine {
            rooms: Mutex::new(rooms),
            connections: Mutex::new(HashMap::new()),
            next_player: AtomicU64::new(1),
            codec,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The game session engine.
///
/// Holds the room registry and one outbound channel per connection. The
/// registry lock is only held for seat bookkeeping; rolls and moves are
/// forwarded to the room actor after it is released, so rooms run
/// independently.
pub struct Engine<C: Codec = JsonCodec> {
    rooms: Mutex<RoomManager>,
    connections: Mutex<HashMap<PlayerId, PlayerSender>>,
    next_player: AtomicU64,
    codec: C,
}

impl Engine {
    /// Creates a new builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }
}

impl<C: Codec> Engine<C> {
    /// Registers a connection. Everything the engine sends to this player
    /// arrives on the returned receiver.
    pub async fn connect(&self) -> (PlayerId, mpsc::UnboundedReceiver<ServerEvent>) {
        let player_id = PlayerId(self.next_player.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.lock().await.insert(player_id, tx);
        tracing::debug!(player = %player_id, "connection registered");
        (player_id, rx)
    }

    /// Handles one inbound event from `player_id`.
    ///
    /// A rejected request has already been answered with an `error` event
    /// to the requester alone when this returns `Err`; the error is handed
    /// back for the caller's logs.
    pub async fn handle(&self, player_id: PlayerId, event: ClientEvent) -> Result<(), EngineError> {
        let name = event.name();
        let room = event.room_id().cloned();
        let result = self.dispatch(player_id, event).await;
        if let Err(e) = &result {
            tracing::debug!(
                player = %player_id,
                room = ?room,
                event = name,
                code = e.code(),
                error = %e,
                "request rejected"
            );
            self.reject(player_id, e).await;
        }
        result
    }

    /// Decodes a raw frame and handles it. Undecodable frames are
    /// rejected like any other bad request.
    pub async fn handle_frame(&self, player_id: PlayerId, frame: &[u8]) -> Result<(), EngineError> {
        match self.codec.decode::<ClientEvent>(frame) {
            Ok(event) => self.handle(player_id, event).await,
            Err(e) => {
                let e = EngineError::from(e);
                tracing::debug!(player = %player_id, error = %e, "failed to decode frame");
                self.reject(player_id, &e).await;
                Err(e)
            }
        }
    }

    /// Encodes an outbound event for the wire.
    pub fn encode(&self, event: &ServerEvent) -> Result<Vec<u8>, EngineError> {
        Ok(self.codec.encode(event)?)
    }

    /// Drops a connection and unseats its player.
    ///
    /// Leaving mid-game passes the turn if it was theirs; the last player
    /// out destroys the room.
    pub async fn disconnect(&self, player_id: PlayerId) {
        self.connections.lock().await.remove(&player_id);

        match self.rooms.lock().await.leave_room(player_id).await {
            Ok(room) => tracing::debug!(player = %player_id, %room, "disconnected from room"),
            Err(RoomError::NotInAnyRoom) => {}
            Err(e) => tracing::warn!(player = %player_id, error = %e, "leave on disconnect failed"),
        }
        tracing::debug!(player = %player_id, "connection dropped");
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.room_count()
    }

    pub async fn room_info(&self, room_id: &RoomCode) -> Result<RoomInfo, EngineError> {
        let handle = self
            .rooms
            .lock()
            .await
            .room_handle(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        Ok(handle.info().await?)
    }

    /// The room `player_id` sits in, if any.
    pub async fn player_room(&self, player_id: PlayerId) -> Option<RoomCode> {
        self.rooms.lock().await.player_room(player_id).cloned()
    }

    async fn dispatch(&self, player_id: PlayerId, event: ClientEvent) -> Result<(), EngineError> {
        let sender = self
            .connections
            .lock()
            .await
            .get(&player_id)
            .cloned()
            .ok_or(EngineError::UnknownConnection(player_id))?;

        match event {
            ClientEvent::CreateRoom { player_name } => {
                let name = player_name_from(&player_name)?;
                self.rooms
                    .lock()
                    .await
                    .create_room(player_id, name, sender)
                    .await?;
            }
            ClientEvent::JoinRoom {
                room_id,
                player_name,
            } => {
                let name = player_name_from(&player_name)?;
                ensure_code(&room_id)?;
                self.rooms
                    .lock()
                    .await
                    .join_room(player_id, &room_id, name, sender)
                    .await?;
            }
            ClientEvent::StartGame { room_id } => {
                let room = self.route(player_id, &room_id).await?;
                room.start(player_id).await?;
            }
            ClientEvent::RollDice { room_id } => {
                let room = self.route(player_id, &room_id).await?;
                room.roll(player_id).await?;
            }
            ClientEvent::MakeMove {
                room_id,
                piece_id,
                candidate,
            } => {
                let room = self.route(player_id, &room_id).await?;
                room.make_move(player_id, piece_id, candidate).await?;
            }
        }
        Ok(())
    }

    async fn route(
        &self,
        player_id: PlayerId,
        room_id: &RoomCode,
    ) -> Result<skyrace_room::RoomHandle, EngineError> {
        ensure_code(room_id)?;
        Ok(self.rooms.lock().await.route(player_id, room_id)?)
    }

    /// Sends an `error` event to the requester only.
    async fn reject(&self, player_id: PlayerId, error: &EngineError) {
        if let Some(sender) = self.connections.lock().await.get(&player_id) {
            let _ = sender.send(ServerEvent::error(error.code(), error.to_string()));
        }
    }
}

fn player_name_from(raw: &str) -> Result<&str, ProtocolError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ProtocolError::InvalidMessage("player_name is empty".into()));
    }
    Ok(name)
}

fn ensure_code(room_id: &RoomCode) -> Result<(), ProtocolError> {
    if room_id.is_empty() {
        return Err(ProtocolError::InvalidMessage("room_id is empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_is_trimmed() {
        assert_eq!(player_name_from("  alice ").unwrap(), "alice");
        assert!(player_name_from("   ").is_err());
    }

    #[test]
    fn test_empty_room_code_rejected() {
        let err = ensure_code(&RoomCode::new("  ")).unwrap_err();
        assert_eq!(err.code(), "invalid_message");
    }

    #[tokio::test]
    async fn test_connect_allocates_distinct_ids() {
        let engine = Engine::builder().build();
        let (a, _rx_a) = engine.connect().await;
        let (b, _rx_b) = engine.connect().await;
        assert_ne!(a, b);
    }
}
