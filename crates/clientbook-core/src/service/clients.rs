use std::sync::Arc;

use tracing::{debug, warn};

use clientbook_api::{ApiClient, ClientQuery};

use super::require_id;
use crate::convert::draft_to_request;
use crate::error::CoreError;
use crate::model::{Client, ClientDraft, ClientFilters, ClientListItem, EntityId};
use crate::session::SessionContext;

/// CRUD verbs for client records.
#[derive(Debug, Clone)]
pub struct ClientService {
    api: Arc<ApiClient>,
    session: SessionContext,
}

impl ClientService {
    pub fn new(api: Arc<ApiClient>, session: SessionContext) -> Self {
        Self { api, session }
    }

    fn session_user(&self) -> Result<String, CoreError> {
        self.session
            .user_id()
            .ok_or_else(|| CoreError::NotAuthenticated {
                missing: "user id".into(),
            })
    }

    /// List clients in server order.
    ///
    /// `None` and all-blank filters produce the same request. When no
    /// owner is given the query is scoped to the session's user.
    pub async fn list(
        &self,
        filters: Option<&ClientFilters>,
    ) -> Result<Vec<ClientListItem>, CoreError> {
        self.list_inner(filters)
            .await
            .inspect_err(|e| warn!(error = %e, "listing clients failed"))
    }

    async fn list_inner(
        &self,
        filters: Option<&ClientFilters>,
    ) -> Result<Vec<ClientListItem>, CoreError> {
        let mut filters = filters.cloned().unwrap_or_default().normalized();
        filters.validate()?;
        if filters.owner_id.is_none() {
            filters.owner_id = Some(self.session_user()?);
        }

        let rows = self.api.list_clients(&ClientQuery::from(filters)).await?;
        debug!(count = rows.len(), "clients listed");
        Ok(rows.into_iter().map(ClientListItem::from).collect())
    }

    /// Fetch one client. A missing record is an `Api` error with status 404.
    pub async fn get_by_id(&self, id: &EntityId) -> Result<Client, CoreError> {
        self.get_inner(id)
            .await
            .inspect_err(|e| warn!(%id, error = %e, "fetching client failed"))
    }

    async fn get_inner(&self, id: &EntityId) -> Result<Client, CoreError> {
        let resp = self.api.get_client(require_id(id)?).await?;
        Client::try_from(resp)
    }

    /// Create a client owned by the session's user.
    pub async fn create(&self, draft: ClientDraft) -> Result<Client, CoreError> {
        self.create_inner(draft)
            .await
            .inspect_err(|e| warn!(error = %e, "creating client failed"))
    }

    async fn create_inner(&self, draft: ClientDraft) -> Result<Client, CoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let owner = self.session_user()?;

        let resp = self
            .api
            .create_client(&draft_to_request(&draft, Some(&owner)))
            .await?;
        Client::try_from(resp)
    }

    /// Replace the fields of client `id` with `draft`.
    pub async fn update(&self, id: &EntityId, draft: ClientDraft) -> Result<Client, CoreError> {
        self.update_inner(id, draft)
            .await
            .inspect_err(|e| warn!(%id, error = %e, "updating client failed"))
    }

    async fn update_inner(&self, id: &EntityId, draft: ClientDraft) -> Result<Client, CoreError> {
        let path_id = require_id(id)?;
        let draft = draft.normalized();
        draft.validate()?;

        let resp = self
            .api
            .update_client(path_id, &draft_to_request(&draft, None))
            .await?;
        Client::try_from(resp)
    }

    /// Delete client `id`. Confirming intent is the caller's job.
    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete_inner(id)
            .await
            .inspect_err(|e| warn!(%id, error = %e, "deleting client failed"))
    }

    async fn delete_inner(&self, id: &EntityId) -> Result<(), CoreError> {
        self.api.delete_client(require_id(id)?).await?;
        Ok(())
    }
}
