//! Error types for the editor

use thiserror::Error;

/// Errors a composition operation can signal.
///
/// Structural no-ops (unknown section id, out-of-range index, disallowed
/// block) are not errors; they come back as `Change::Unchanged`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section type not registered: {0}")]
    UnknownSectionType(String),

    #[error("Variant not found: {0}")]
    UnknownVariant(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("An upload is already pending for {0}")]
    UploadPending(String),

    #[error("Upload target not found: {0}")]
    UploadTargetMissing(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}
