//! Typed error type for the client crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable connection details were supplied.
    #[error("no connection available")]
    NoConnection,

    /// Transport-level failure from the HTTP stack. Propagated raw; nothing
    /// in this repository retries or rewrites it.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("platform returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected row envelope.
    #[error("malformed response: {0}")]
    Decode(String),
}
