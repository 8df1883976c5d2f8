//! Room manager: creates, tracks, and routes players to rooms.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use skyrace_protocol::{PlayerId, RoomCode};
use skyrace_rules::{GameError, RandomSource, RngSource};

use crate::room::spawn_room;
use crate::{JoinKind, PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Builds the dice for each new room.
pub type SourceFactory = Arc<dyn Fn() -> Box<dyn RandomSource> + Send + Sync>;

/// Owns every live room and tracks which player sits where.
///
/// Lookups and seat bookkeeping happen here; game state lives only in the
/// room actors. A player sits in at most one room at a time, and a room
/// is destroyed as soon as its last player leaves.
pub struct RoomManager {
    config: RoomConfig,
    dice: SourceFactory,

    /// Active rooms, keyed by code.
    rooms: HashMap<RoomCode, RoomHandle>,

    /// The room each seated player is in.
    player_rooms: HashMap<PlayerId, RoomCode>,
}

impl RoomManager {
    /// A manager whose rooms roll entropy-seeded dice.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_source_factory(
            config,
            Arc::new(|| Box::new(RngSource::from_entropy()) as Box<dyn RandomSource>),
        )
    }

    /// A manager whose rooms take their dice from `dice`.
    pub fn with_source_factory(config: RoomConfig, dice: SourceFactory) -> Self {
        Self {
            config: config.validated(),
            dice,
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Opens a room under a fresh code and seats `player_id` as creator.
    pub async fn create_room(
        &mut self,
        player_id: PlayerId,
        player_name: &str,
        sender: PlayerSender,
    ) -> Result<RoomCode, RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RoomError::AlreadyInRoom(current.clone()));
        }

        let room_id = self.unused_code();
        let handle = spawn_room(room_id.clone(), self.config.clone(), (self.dice)());

        if let Err(e) = handle
            .join(player_id, player_name, JoinKind::Create, sender)
            .await
        {
            let _ = handle.shutdown().await;
            return Err(e);
        }

        self.rooms.insert(room_id.clone(), handle);
        self.player_rooms.insert(player_id, room_id.clone());
        tracing::info!(room = %room_id, creator = %player_id, "room created");
        Ok(room_id)
    }

    /// Seats a player in an existing room.
    ///
    /// Joining the room the player already sits in re-attaches them: it
    /// succeeds in any game status and hands them a fresh snapshot.
    pub async fn join_room(
        &mut self,
        player_id: PlayerId,
        room_id: &RoomCode,
        player_name: &str,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            if current != room_id {
                return Err(RoomError::AlreadyInRoom(current.clone()));
            }
        }

        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        handle
            .join(player_id, player_name, JoinKind::Join, sender)
            .await?;
        self.player_rooms.insert(player_id, room_id.clone());
        Ok(())
    }

    /// Unseats a player from wherever they sit. Destroys the room if that
    /// was its last player.
    ///
    /// The seat mapping is dropped only once the room no longer seats the
    /// player; any other failure leaves it in place.
    pub async fn leave_room(&mut self, player_id: PlayerId) -> Result<RoomCode, RoomError> {
        let room_id = self
            .player_rooms
            .get(&player_id)
            .cloned()
            .ok_or(RoomError::NotInAnyRoom)?;

        let Some(handle) = self.rooms.get(&room_id).cloned() else {
            self.player_rooms.remove(&player_id);
            return Ok(room_id);
        };

        match handle.leave(player_id).await {
            Ok(info) if info.player_count > 0 => {
                self.player_rooms.remove(&player_id);
            }
            Ok(_) | Err(RoomError::Unavailable(_)) => self.destroy_room(&room_id).await?,
            Err(RoomError::Game(GameError::NotSeated(_))) => {
                tracing::warn!(room = %room_id, player = %player_id, "stale seat mapping dropped");
                self.player_rooms.remove(&player_id);
            }
            Err(e) => return Err(e),
        }
        Ok(room_id)
    }

    /// Resolves the room a room-scoped request targets.
    ///
    /// The room must exist and the requester must be seated in it.
    pub fn route(&self, player_id: PlayerId, room_id: &RoomCode) -> Result<RoomHandle, RoomError> {
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        if self.player_rooms.get(&player_id) != Some(room_id) {
            return Err(GameError::NotSeated(player_id).into());
        }
        Ok(handle.clone())
    }

    /// Shuts down a room and forgets everyone seated in it.
    pub async fn destroy_room(&mut self, room_id: &RoomCode) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| rid != room_id);

        tracing::info!(room = %room_id, "room destroyed");
        Ok(())
    }

    pub async fn room_info(&self, room_id: &RoomCode) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.info().await
    }

    pub fn room_handle(&self, room_id: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(room_id).cloned()
    }

    /// The room a player is currently in, if any.
    pub fn player_room(&self, player_id: PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(&player_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    fn unused_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..self.config.code_length)
                .map(|_| {
                    let i = rng.random_range(0..RoomCode::ALPHABET.len());
                    char::from(RoomCode::ALPHABET[i])
                })
                .collect();
            let code = RoomCode::new(raw);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
