//! Service-level error type.

use thiserror::Error;

use crate::MapError;

/// Errors surfaced by the data-sync operations.
///
/// Transport and query errors pass through unchanged — no retry, no
/// rewriting. Only the mapping boundary adds its own kind.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Client(#[from] client::ClientError),

    #[error(transparent)]
    Map(#[from] MapError),
}
