// ── ClientStore ──
//
// Holds the cached client list, an in-flight flag, the last error, and the
// interest catalogue. Views read it through `snapshot()` / `subscribe()`
// and change it only through the operations below.
//
// Operations are not queued. `loading` is backed by an in-flight counter
// so overlapping operations don't clear each other's flag, and every
// refresh takes an epoch number: a response older than the newest issued
// refresh is dropped instead of overwriting fresher data.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{OnceCell, watch};
use tracing::{debug, warn};

use clientbook_api::ApiClient;

use super::state::{StorePhase, StoreState};
use crate::error::CoreError;
use crate::model::{Client, ClientDraft, ClientFilters, EntityId, Interest};
use crate::service::{ClientService, InterestService};
use crate::session::SessionContext;
use crate::stream::StoreStream;

/// How a refresh ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced `entities`.
    Applied { count: usize },
    /// A newer refresh was issued while this one was in flight.
    Discarded,
    /// The request failed; the error is recorded in the state.
    Failed(CoreError),
}

struct StoreInner {
    clients: ClientService,
    interests: InterestService,
    state: watch::Sender<StoreState>,
    epoch: AtomicU64,
    pending_loads: AtomicUsize,
    last_filters: Mutex<Option<ClientFilters>>,
    reference: OnceCell<Arc<Vec<Interest>>>,
}

/// Client-side holder of cached client state. Cheap to clone; clones
/// share the same state.
#[derive(Clone)]
pub struct ClientStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ClientStore")
            .field("entities", &state.entities.len())
            .field("phase", &state.phase)
            .field("loading", &state.loading)
            .finish_non_exhaustive()
    }
}

/// Marks one operation as in flight for as long as it lives.
///
/// Dropping it (normal return, `?`, or an abandoned future) decrements
/// the counter; the last one out flips `loading` off and the phase back
/// to `Idle`.
struct InFlight<'a> {
    state: &'a watch::Sender<StoreState>,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a watch::Sender<StoreState>, phase: StorePhase) -> Self {
        state.send_modify(|s| {
            s.in_flight += 1;
            s.loading = true;
            s.phase = phase;
            s.error = None;
        });
        Self { state }
    }

    fn phase(&self, phase: StorePhase) {
        self.state.send_modify(|s| s.phase = phase);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            if s.in_flight == 0 {
                s.loading = false;
                s.phase = StorePhase::Idle;
            }
        });
    }
}

/// Counts list requests awaiting a response.
struct PendingLoad<'a>(&'a AtomicUsize);

impl<'a> PendingLoad<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ClientStore {
    pub fn new(clients: ClientService, interests: InterestService) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            inner: Arc::new(StoreInner {
                clients,
                interests,
                state,
                epoch: AtomicU64::new(0),
                pending_loads: AtomicUsize::new(0),
                last_filters: Mutex::new(None),
                reference: OnceCell::new(),
            }),
        }
    }

    /// Wire both services to one transport adapter and session.
    pub fn from_api(api: Arc<ApiClient>, session: SessionContext) -> Self {
        Self::new(
            ClientService::new(Arc::clone(&api), session),
            InterestService::new(api),
        )
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StoreStream {
        StoreStream::new(self.inner.state.subscribe())
    }

    /// Interest catalogue, if already fetched.
    pub fn interests(&self) -> Option<Arc<Vec<Interest>>> {
        self.inner.reference.get().cloned()
    }

    /// Filters used by the most recent explicit refresh.
    pub fn last_filters(&self) -> Option<ClientFilters> {
        self.inner
            .last_filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.take().is_some());
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Reload the list. Failures are recorded in the state, not returned.
    pub async fn refresh(&self, filters: Option<&ClientFilters>) -> RefreshOutcome {
        let filters = filters.cloned().map(ClientFilters::normalized);
        *self
            .inner
            .last_filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = filters.clone();

        let _guard = InFlight::begin(&self.inner.state, StorePhase::Loading);
        self.load(filters.as_ref()).await
    }

    async fn load(&self, filters: Option<&ClientFilters>) -> RefreshOutcome {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let result = {
            let _pending = PendingLoad::begin(&self.inner.pending_loads);
            self.inner.clients.list(filters).await
        };

        let mut outcome = RefreshOutcome::Discarded;
        self.inner.state.send_if_modified(|s| {
            if self.inner.epoch.load(Ordering::SeqCst) != epoch {
                debug!(epoch, "stale refresh discarded");
                return false;
            }
            match result {
                Ok(rows) => {
                    outcome = RefreshOutcome::Applied { count: rows.len() };
                    s.entities = Arc::new(rows);
                    s.error = None;
                }
                Err(e) => {
                    outcome = RefreshOutcome::Failed(e.clone());
                    s.error = Some(e);
                }
            }
            true
        });
        outcome
    }

    /// Fetch one client. Records the error on failure; never touches
    /// `entities`.
    pub async fn get_by_id(&self, id: &EntityId) -> Result<Client, CoreError> {
        let _guard = InFlight::begin(&self.inner.state, StorePhase::Loading);
        let result = self.inner.clients.get_by_id(id).await;
        self.record(result)
    }

    /// Load the interest catalogue once. A failed load is retried on the
    /// next call.
    pub async fn fetch_reference_data(&self) -> Result<Arc<Vec<Interest>>, CoreError> {
        if let Some(cached) = self.inner.reference.get() {
            return Ok(Arc::clone(cached));
        }

        let _guard = InFlight::begin(&self.inner.state, StorePhase::Loading);
        let result = self
            .inner
            .reference
            .get_or_try_init(|| async { self.inner.interests.list().await.map(Arc::new) })
            .await
            .cloned();
        let interests = self.record(result)?;
        self.inner
            .state
            .send_modify(|s| s.reference_data = Some(Arc::clone(&interests)));
        Ok(interests)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create a client, then reload the list with the last filters.
    pub async fn create(&self, draft: ClientDraft) -> Result<Client, CoreError> {
        let guard = InFlight::begin(&self.inner.state, StorePhase::Writing);
        let result = self.inner.clients.create(draft).await;
        let created = self.record(result)?;

        guard.phase(StorePhase::Refreshing);
        self.refresh_after_write().await;
        Ok(created)
    }

    /// Update client `id`, then reload the list with the last filters.
    pub async fn update(&self, id: &EntityId, draft: ClientDraft) -> Result<Client, CoreError> {
        let guard = InFlight::begin(&self.inner.state, StorePhase::Writing);
        let result = self.inner.clients.update(id, draft).await;
        let updated = self.record(result)?;

        guard.phase(StorePhase::Refreshing);
        self.refresh_after_write().await;
        Ok(updated)
    }

    /// Delete client `id` and drop it from the cached list.
    ///
    /// A refresh still in flight may have been answered before the delete
    /// landed; in that case the list is reloaded with the last filters,
    /// which also supersedes the in-flight response.
    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let guard = InFlight::begin(&self.inner.state, StorePhase::Writing);
        let result = self.inner.clients.delete(id).await;
        self.record(result)?;

        self.inner.state.send_if_modified(|s| {
            if !s.contains(id) {
                return false;
            }
            s.entities = Arc::new(s.entities.iter().filter(|c| &c.id != id).cloned().collect());
            true
        });

        if self.inner.pending_loads.load(Ordering::SeqCst) > 0 {
            debug!(%id, "refresh in flight during delete, reloading");
            guard.phase(StorePhase::Refreshing);
            self.refresh_after_write().await;
        }
        Ok(())
    }

    async fn refresh_after_write(&self) {
        let filters = self.last_filters();
        if let RefreshOutcome::Failed(e) = self.load(filters.as_ref()).await {
            warn!(error = %e, "refresh after write failed");
        }
    }

    fn record<T>(&self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            self.inner.state.send_modify(|s| s.error = Some(e.clone()));
        }
        result
    }
}
