use std::sync::Arc;

use strum::Display;

use crate::error::CoreError;
use crate::model::{ClientListItem, Interest};

/// Where the store is in its operation cycle.
///
/// Refresh: `Idle → Loading → Idle`.
/// Create / update: `Idle → Writing → Refreshing → Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StorePhase {
    #[default]
    Idle,
    Loading,
    Writing,
    Refreshing,
}

/// Everything a view can observe about the store.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    /// Last applied list, in server order.
    pub entities: Arc<Vec<ClientListItem>>,
    /// `true` while any operation is in flight.
    pub loading: bool,
    /// Error from the most recent failed operation.
    pub error: Option<CoreError>,
    pub phase: StorePhase,
    /// Interest catalogue, once fetched.
    pub reference_data: Option<Arc<Vec<Interest>>>,
    pub(crate) in_flight: usize,
}

impl StoreState {
    pub fn contains(&self, id: &crate::model::EntityId) -> bool {
        self.entities.iter().any(|c| &c.id == id)
    }
}
