//! Error types for the schema crate

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Section type registered twice: {0}")]
    DuplicateSectionType(String),

    #[error("Block type registered twice: {0}")]
    DuplicateBlockType(String),

    #[error("Section '{section}' allows unregistered block type '{block}'")]
    UnknownAllowedBlock { section: String, block: String },
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}
