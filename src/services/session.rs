//! Session collaborator
//!
//! Sign-in happens with the identity provider outside this program. All the
//! workflow needs is to know whether a session exists and to obtain a
//! short-lived token right before each authenticated call.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Not signed in: pass --token or set TABLEPORT_SESSION_TOKEN")]
    SignedOut,

    #[error("Token request failed: {0}")]
    Token(String),
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn is_signed_in(&self) -> bool;

    /// Fresh token for the given JWT template
    async fn get_token(&self, template: &str) -> Result<String, SessionError>;
}

/// Session backed by a token handed to the program at startup
#[derive(Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl std::fmt::Debug for StaticSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSession")
            .field("signed_in", &self.token.is_some())
            .finish()
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    async fn get_token(&self, template: &str) -> Result<String, SessionError> {
        tracing::trace!(template, "issuing session token");
        self.token.clone().ok_or(SessionError::SignedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_session_returns_token() {
        let session = StaticSession::new(Some("jwt-abc".to_string()));
        assert!(session.is_signed_in());
        assert_eq!(session.get_token("api").await, Ok("jwt-abc".to_string()));
    }

    #[tokio::test]
    async fn test_blank_token_means_signed_out() {
        let session = StaticSession::new(Some("  ".to_string()));
        assert!(!session.is_signed_in());
        assert_eq!(session.get_token("api").await, Err(SessionError::SignedOut));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let session = StaticSession::new(Some("jwt-abc".to_string()));
        assert!(!format!("{:?}", session).contains("jwt-abc"));
    }
}
