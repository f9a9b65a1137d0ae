// ── Interest reference data ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A selectable interest. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub id: EntityId,
    pub description: String,
}
