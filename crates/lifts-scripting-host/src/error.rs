use lifts_events::{BlockPos, DimensionId, EntityId};

/// Failures reported by the host world surface
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The location is in a chunk that is not currently loaded
    #[error("LocationInUnloadedChunkError: {pos} in {dimension}")]
    UnloadedChunk { dimension: DimensionId, pos: BlockPos },

    /// The entity was removed or its player disconnected
    #[error("Entity {0} is no longer valid")]
    InvalidEntity(EntityId),

    /// Anything else the host threw
    #[error("Host error: {0}")]
    Host(String),
}

impl WorldError {
    /// Transient failures clear up on their own (the chunk loads again) and
    /// are expected during dimension changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, WorldError::UnloadedChunk { .. })
    }
}

pub type WorldResult<T> = Result<T, WorldError>;
