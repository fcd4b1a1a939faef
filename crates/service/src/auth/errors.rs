use thiserror::Error;

/// Failures of admin login and session handling
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username/password, or a missing, forged or expired session.
    #[error("invalid credentials")]
    Unauthorized,
    #[error("admin auth misconfigured: {0}")]
    Config(String),
    #[error("password hashing failed: {0}")]
    HashError(String),
    #[error("session token error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Stable numeric code for logs
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Unauthorized => 1004,
            AuthError::Config(_) => 1005,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
        }
    }

    /// Whether the caller (not the server) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::Unauthorized)
    }
}
