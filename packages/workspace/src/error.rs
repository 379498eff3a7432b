use storefront_editor::EditorError;
use thiserror::Error;

use crate::uploader::UploadError;

/// Errors from a persistence gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No {key} stored for tenant {tenant_id}")]
    NotFound { tenant_id: String, key: &'static str },

    #[error("Invalid tenant id: {0:?}")]
    InvalidTenant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The stored document is newer than the one the session loaded
    #[error("Stored layout is at version {stored}, save was based on version {attempted}")]
    Conflict { stored: u64, attempted: u64 },
}

impl GatewayError {
    /// Transient failures worth retrying as-is
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<storefront_schema::DocumentError> for GatewayError {
    fn from(err: storefront_schema::DocumentError) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the studio service
#[derive(Error, Debug)]
pub enum StudioError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}
