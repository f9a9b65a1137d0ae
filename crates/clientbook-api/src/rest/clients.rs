// Client endpoints
//
// `clients` is a plain REST collection: list with query-string filters,
// path-addressed get / update / delete, and POST to create.

use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::types::{ClientQuery, ClientRequest, ClientResponse, ClientSummary};

impl ApiClient {
    /// List clients matching `query`, in server order.
    ///
    /// `GET clients?nombre=..&identificacion=..&usuarioId=..`
    pub async fn list_clients(&self, query: &ClientQuery) -> Result<Vec<ClientSummary>, Error> {
        let url = self.url(&["clients"])?;
        let params = query.to_params();
        if params.is_empty() {
            self.get(url).await
        } else {
            self.get_with_params(url, &params).await
        }
    }

    /// Fetch one client.
    ///
    /// `GET clients/{id}`
    pub async fn get_client(&self, id: &str) -> Result<ClientResponse, Error> {
        let url = self.url(&["clients", id])?;
        self.get(url).await
    }

    /// Create a client; the response carries the server-assigned id.
    ///
    /// `POST clients`
    pub async fn create_client(&self, body: &ClientRequest) -> Result<ClientResponse, Error> {
        let url = self.url(&["clients"])?;
        debug!(identificacion = %body.identificacion, "creating client");
        self.post(url, body).await
    }

    /// Replace a client's fields.
    ///
    /// `PUT clients/{id}`
    pub async fn update_client(
        &self,
        id: &str,
        body: &ClientRequest,
    ) -> Result<ClientResponse, Error> {
        let url = self.url(&["clients", id])?;
        debug!(id, "updating client");
        self.put(url, body).await
    }

    /// Delete a client.
    ///
    /// `DELETE clients/{id}`
    pub async fn delete_client(&self, id: &str) -> Result<(), Error> {
        let url = self.url(&["clients", id])?;
        debug!(id, "deleting client");
        self.delete(url).await
    }
}
