//! Directory-backed gateway.
//!
//! ```text
//! <root>/
//!   <tenant>/
//!     store_layout.json
//!     store_studio_config.json
//! ```
//!
//! Writes go to a temp file in the same directory and are renamed into
//! place, so readers never observe a half-written document.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use storefront_schema::{LayoutDocument, StudioConfig, LAYOUT_KEY, STUDIO_CONFIG_KEY};
use tokio::fs as tokio_fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{
    validate_tenant, ChangeFeed, ChangeSubscription, ChangedDocument, ConflictPolicy, ExternalChange, LayoutGateway,
    SaveReceipt,
};
use crate::watcher::{LayoutWatcher, WatcherResult};

pub const LAYOUT_FILE: &str = "store_layout.json";
pub const STUDIO_CONFIG_FILE: &str = "store_studio_config.json";

pub struct FileLayoutStore {
    root: PathBuf,
    policy: ConflictPolicy,
    feed: ChangeFeed,
    /// Serialises read-check-write of layout saves within this process
    write_lock: Mutex<()>,
}

impl FileLayoutStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: ConflictPolicy::default(),
            feed: ChangeFeed::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tenant_dir(&self, tenant_id: &str) -> GatewayResult<PathBuf> {
        validate_tenant(tenant_id)?;
        Ok(self.root.join(tenant_id))
    }

    pub fn layout_path(&self, tenant_id: &str) -> GatewayResult<PathBuf> {
        Ok(self.tenant_dir(tenant_id)?.join(LAYOUT_FILE))
    }

    pub fn studio_config_path(&self, tenant_id: &str) -> GatewayResult<PathBuf> {
        Ok(self.tenant_dir(tenant_id)?.join(STUDIO_CONFIG_FILE))
    }

    /// Tenants that have a stored layout
    pub async fn tenants(&self) -> GatewayResult<Vec<String>> {
        let mut tenants = Vec::new();
        let mut entries = match tokio_fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(tenants),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if validate_tenant(&name).is_ok() && tokio_fs::metadata(entry.path().join(LAYOUT_FILE)).await.is_ok() {
                tenants.push(name);
            }
        }
        tenants.sort();
        Ok(tenants)
    }

    /// Watch the store root for writes made by other processes
    pub fn watch(&self) -> WatcherResult<LayoutWatcher> {
        LayoutWatcher::new(self.root.clone(), self.feed.sender())
    }

    async fn stored_version(&self, path: &Path, tenant_id: &str) -> GatewayResult<Option<u64>> {
        match tokio_fs::read_to_string(path).await {
            Ok(json) => match LayoutDocument::from_json(tenant_id, &json) {
                Ok(doc) => Ok(Some(doc.version)),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Stored layout unreadable, overwriting");
                    Ok(None)
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Write `contents` next to `path` and rename it into place
async fn write_atomic(path: &Path, contents: &str) -> GatewayResult<()> {
    let parent = path.parent().ok_or_else(|| {
        GatewayError::Io(std::io::Error::new(ErrorKind::Other, "Invalid path"))
    })?;
    tokio_fs::create_dir_all(parent).await?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document");
    let temp = parent.join(format!(".{file_name}.tmp"));

    tokio_fs::write(&temp, contents).await?;
    if let Err(err) = tokio_fs::rename(&temp, path).await {
        tokio_fs::remove_file(&temp).await.ok();
        return Err(err.into());
    }
    Ok(())
}

#[async_trait]
impl LayoutGateway for FileLayoutStore {
    async fn load_document(&self, tenant_id: &str) -> GatewayResult<LayoutDocument> {
        let path = self.layout_path(tenant_id)?;
        let json = match tokio_fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(GatewayError::NotFound {
                    tenant_id: tenant_id.to_string(),
                    key: LAYOUT_KEY,
                })
            }
            Err(err) => return Err(err.into()),
        };
        Ok(LayoutDocument::from_json(tenant_id, &json)?)
    }

    #[instrument(skip_all, fields(tenant = %document.tenant_id, base = document.version))]
    async fn save_document(&self, document: &LayoutDocument) -> GatewayResult<SaveReceipt> {
        let path = self.layout_path(&document.tenant_id)?;
        let _guard = self.write_lock.lock().await;

        let stored = self.stored_version(&path, &document.tenant_id).await?;
        self.policy.check(stored, document.version)?;

        let receipt = SaveReceipt::next(stored, document.version);
        let mut copy = document.clone();
        copy.version = receipt.version;
        copy.updated_at = receipt.updated_at;
        write_atomic(&path, &copy.to_json_pretty()?).await?;

        debug!(version = receipt.version, path = %path.display(), "Layout saved");
        self.feed.publish(ExternalChange {
            tenant_id: document.tenant_id.clone(),
            document: ChangedDocument::Layout,
            version: Some(receipt.version),
        });
        Ok(receipt)
    }

    async fn load_studio_config(&self, tenant_id: &str) -> GatewayResult<StudioConfig> {
        let path = self.studio_config_path(tenant_id)?;
        match tokio_fs::read_to_string(&path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(tenant = %tenant_id, key = STUDIO_CONFIG_KEY, "No studio config, using defaults");
                Ok(StudioConfig::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save_studio_config(&self, tenant_id: &str, config: &StudioConfig) -> GatewayResult<()> {
        let path = self.studio_config_path(tenant_id)?;
        write_atomic(&path, &serde_json::to_string_pretty(config)?).await?;
        self.feed.publish(ExternalChange {
            tenant_id: tenant_id.to_string(),
            document: ChangedDocument::StudioConfig,
            version: None,
        });
        Ok(())
    }

    fn subscribe(&self, tenant_id: &str) -> ChangeSubscription {
        self.feed.subscribe(tenant_id)
    }
}
