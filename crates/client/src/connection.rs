//! Connection descriptor for the remote platform.

use crate::ClientError;

/// Immutable connection details, validated at construction.
///
/// There is deliberately no "set the connection later" path: holding a
/// `Connection` means the no-connection precondition has already been met,
/// so the per-operation checks collapse into this constructor.
#[derive(Debug, Clone)]
pub struct Connection {
    base_url: String,
    bearer_token: String,
}

impl Connection {
    /// Build a connection descriptor.
    ///
    /// # Errors
    /// Returns [`ClientError::NoConnection`] when either detail is empty.
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let bearer_token = bearer_token.into();
        if base_url.is_empty() || bearer_token.is_empty() {
            return Err(ClientError::NoConnection);
        }
        Ok(Self { base_url, bearer_token })
    }

    /// Environment root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn bearer_token(&self) -> &str {
        &self.bearer_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_details_are_rejected_up_front() {
        assert!(matches!(Connection::new("", "token"), Err(ClientError::NoConnection)));
        assert!(matches!(
            Connection::new("https://org.example.com", ""),
            Err(ClientError::NoConnection)
        ));
    }

    #[test]
    fn trailing_slash_is_normalized_away() {
        let connection = Connection::new("https://org.example.com/", "token").unwrap();
        assert_eq!(connection.base_url(), "https://org.example.com");
    }
}
