use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemEvent {
    /// The world or the script environment (re)initialized. Every scheduled
    /// run from before this point is gone.
    WorldInitialize,
    /// The host is shutting down
    Shutdown,
}
