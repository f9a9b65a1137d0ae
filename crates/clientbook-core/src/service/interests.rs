use std::sync::Arc;

use tracing::warn;

use clientbook_api::ApiClient;

use crate::error::CoreError;
use crate::model::Interest;

/// Read-only access to the interest catalogue.
#[derive(Debug, Clone)]
pub struct InterestService {
    api: Arc<ApiClient>,
}

impl InterestService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Interest>, CoreError> {
        match self.api.list_interests().await {
            Ok(rows) => Ok(rows.into_iter().map(Interest::from).collect()),
            Err(e) => {
                let e = CoreError::from(e);
                warn!(error = %e, "listing interests failed");
                Err(e)
            }
        }
    }
}
