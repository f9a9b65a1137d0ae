// clientbook-api: Async Rust client for the clientbook REST API

pub mod auth;
pub mod error;
pub mod rest;
pub mod transport;

pub use auth::{Anonymous, CredentialSource, StaticToken};
pub use error::Error;
pub use rest::ApiClient;
pub use rest::types::{
    ClientQuery, ClientRequest, ClientResponse, ClientSummary, InterestResponse, LoginResponse,
};
pub use transport::{TlsMode, TransportConfig};
