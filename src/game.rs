//! Game records: the persistent identity wrapped around a state document.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tracked game. The rules-state itself lives in the state
/// document stored alongside this record; everything here is plain
/// lifecycle metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    /// Display name for listings.
    pub name: String,
    /// Who runs the game. Privileged views (private pages, vote
    /// locking) are offered to this person by the command layer.
    pub storyteller: String,
    pub created_at: Timestamp,
}
