use std::collections::HashMap;

use lifts_events::{BlockPos, DimensionId, EntityId};
use lifts_scripting_host::RunId;

/// One player's active ride: where they stand and the run polling them
#[derive(Debug, Clone, PartialEq)]
pub struct RideSession {
    pub player: EntityId,
    pub dimension: DimensionId,
    pub anchor: BlockPos,
    pub anchor_type: String,
    /// Tick the player was last confirmed on the anchor
    pub watermark: u64,
    pub run: RunId,
}

impl RideSession {
    pub fn is_stale(&self, now: u64, budget: u64) -> bool {
        now.saturating_sub(self.watermark) >= budget
    }
}

/// Sessions keyed by player. Holds at most one session per player.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<EntityId, RideSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session, returning the one it replaced
    pub fn insert(&mut self, session: RideSession) -> Option<RideSession> {
        self.sessions.insert(session.player, session)
    }

    pub fn remove(&mut self, player: EntityId) -> Option<RideSession> {
        self.sessions.remove(&player)
    }

    pub fn get(&self, player: EntityId) -> Option<&RideSession> {
        self.sessions.get(&player)
    }

    pub fn get_mut(&mut self, player: EntityId) -> Option<&mut RideSession> {
        self.sessions.get_mut(&player)
    }

    pub fn contains(&self, player: EntityId) -> bool {
        self.sessions.contains_key(&player)
    }

    /// Riding players in id order
    pub fn players(&self) -> Vec<EntityId> {
        let mut players: Vec<EntityId> = self.sessions.keys().copied().collect();
        players.sort();
        players
    }

    pub fn drain(&mut self) -> Vec<RideSession> {
        self.sessions.drain().map(|(_, session)| session).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
