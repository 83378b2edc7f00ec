use thiserror::Error;

/// Normalized failure taxonomy for every portal operation.
///
/// Domain failures carry the server's own message verbatim; transport failures
/// cover every case where no usable envelope came back; validation failures are
/// raised locally before any request is issued.
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    #[error("{message}")]
    Api { status: i64, message: String },

    #[error("failed to reach server: {0}")]
    Connection(String),

    #[error("{0}")]
    Validation(String),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(message.into())
    }
}

/// Message the API returns for an expired or malformed bearer token.
pub const TOKEN_INVALID_MESSAGE: &str = "Token tidak tidak valid atau kadaluwarsa";
