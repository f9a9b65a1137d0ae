// ── Domain model ──
//
// Canonical in-memory shapes for clientbook entities. Wire types live in
// `clientbook-api`; `crate::convert` translates between the two.

pub mod client;
pub mod entity_id;
pub mod filters;
pub mod interest;

pub use client::{Client, ClientDraft, ClientListItem, Gender};
pub use entity_id::EntityId;
pub use filters::ClientFilters;
pub use interest::Interest;
