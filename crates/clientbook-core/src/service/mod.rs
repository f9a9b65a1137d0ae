// ── Entity services ──
//
// Per-entity verbs over the transport adapter. Each service translates
// between domain and wire types, checks input before any request, logs a
// failure once, and hands it back to the caller unchanged.

mod auth;
mod clients;
mod interests;

pub use auth::AuthService;
pub use clients::ClientService;
pub use interests::InterestService;

use crate::error::CoreError;
use crate::model::EntityId;

/// Reject ids that can't address a server record.
fn require_id(id: &EntityId) -> Result<&str, CoreError> {
    if id.is_blank() {
        Err(CoreError::validation("id", "must not be empty"))
    } else {
        Ok(id.as_str())
    }
}
