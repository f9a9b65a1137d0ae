//! Domain model, entity services, and client-state store for clientbook.
//!
//! This crate sits between `clientbook-api` (raw HTTP transport) and view
//! consumers such as the CLI:
//!
//! - **[`ClientStore`]**: cached client list, in-flight flag, last error,
//!   and interest catalogue. Operations refresh, create, update, delete,
//!   fetch by id, and load reference data; writes re-raise their errors,
//!   reads record them. State is published through a `watch` channel and
//!   consumed via [`ClientStore::snapshot`] or a [`StoreStream`].
//!
//! - **Entity services** ([`ClientService`], [`InterestService`],
//!   [`AuthService`]): per-entity verbs that validate input before any
//!   request and translate between wire and domain types.
//!
//! - **[`SessionContext`]**: explicitly passed session state. It doubles as
//!   the transport's credential source, so a login is visible to the next
//!   request without rebuilding anything.
//!
//! - **Domain model** ([`model`]): [`Client`], [`ClientDraft`],
//!   [`ClientListItem`], [`ClientFilters`], [`Interest`], keyed by
//!   [`EntityId`].

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ApiConfig, DEFAULT_API_URL, TlsVerification};
pub use error::CoreError;
pub use service::{AuthService, ClientService, InterestService};
pub use session::{SessionContext, SessionGrant, SessionSnapshot};
pub use store::{ClientStore, RefreshOutcome, StorePhase, StoreState};
pub use stream::{StoreStream, StoreWatchStream};

pub use model::{Client, ClientDraft, ClientFilters, ClientListItem, EntityId, Gender, Interest};
