//! Persistence and orchestration for storefront editing.
//!
//! - [`LayoutGateway`]: where layouts and studio configs live
//! - [`MemoryLayoutStore`] / [`FileLayoutStore`]: the two gateways
//! - [`LayoutWatcher`]: file-system changes as [`ExternalChange`]s
//! - [`StudioService`]: one tenant's session with save, reload and uploads

pub mod error;
pub mod file_store;
pub mod gateway;
pub mod memory_store;
pub mod service;
pub mod uploader;
pub mod watcher;

pub use error::{GatewayError, GatewayResult, StudioError};
pub use file_store::FileLayoutStore;
pub use gateway::{
    ChangeFeed, ChangeSubscription, ChangedDocument, ConflictPolicy, ExternalChange, LayoutGateway, SaveReceipt,
};
pub use memory_store::MemoryLayoutStore;
pub use service::{SaveOutcome, StudioService};
pub use uploader::{ImageUploader, LocalImageUploader, UploadError};
pub use watcher::{LayoutWatcher, WatcherError, WatcherResult};
