//! `client` crate — the transport boundary.
//!
//! Provides the immutable connection descriptor, the [`RemoteDataClient`]
//! trait the service executes against, an HTTP implementation for the
//! platform's web API, and an in-memory mock for tests. No domain logic
//! lives here.

pub mod connection;
pub mod error;
pub mod http;
pub mod mock;
pub mod remote;

pub use connection::Connection;
pub use error::ClientError;
pub use http::HttpDataClient;
pub use remote::{ActionRequest, RemoteDataClient, Row};
