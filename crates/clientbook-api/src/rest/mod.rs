// REST API surface: transport mechanics plus one file per endpoint group.

pub mod auth;
pub mod client;
pub mod clients;
pub mod interests;
pub mod types;

pub use client::ApiClient;
