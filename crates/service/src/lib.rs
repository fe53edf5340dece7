//! `service` crate — read operations, mutations, and enrichment.
//!
//! `DataSyncService` orchestrates the query builders, the remote client, and
//! the entity mapper: every read builds a query, executes it, and maps the
//! rows; every mutation builds a fixed-shape action payload and invokes it.
//! Post-mutation refresh is the caller's job — nothing here re-reads on its
//! own.

pub mod enrich;
pub mod error;
pub mod mapper;
pub mod sync;

pub use enrich::enrich_flows;
pub use error::ServiceError;
pub use mapper::MapError;
pub use sync::DataSyncService;
