use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown student")]
    Unauthorized,
    #[error("allow-list unavailable: {0}")]
    AllowList(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Unauthorized => 1004,
            AuthError::AllowList(_) => 1200,
        }
    }
}
