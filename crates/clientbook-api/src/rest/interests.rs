// Interest endpoints (read-only reference data).

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::types::InterestResponse;

impl ApiClient {
    /// List every interest.
    ///
    /// `GET interests`
    pub async fn list_interests(&self) -> Result<Vec<InterestResponse>, Error> {
        let url = self.url(&["interests"])?;
        self.get(url).await
    }
}
