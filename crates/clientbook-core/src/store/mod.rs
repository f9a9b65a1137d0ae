// ── Client-state store ──
//
// Cached entity state between the services and the views, published
// through a `watch` channel.

mod client_store;
mod state;

pub use client_store::{ClientStore, RefreshOutcome};
pub use state::{StorePhase, StoreState};
