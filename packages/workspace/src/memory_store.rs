use async_trait::async_trait;
use std::collections::HashMap;
use storefront_schema::{LayoutDocument, StudioConfig, LAYOUT_KEY};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{
    validate_tenant, ChangeFeed, ChangeSubscription, ChangedDocument, ConflictPolicy, ExternalChange, LayoutGateway,
    SaveReceipt,
};

/// In-process gateway for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    layouts: RwLock<HashMap<String, LayoutDocument>>,
    configs: RwLock<HashMap<String, StudioConfig>>,
    policy: ConflictPolicy,
    feed: ChangeFeed,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Stored version of a tenant's layout
    pub async fn stored_version(&self, tenant_id: &str) -> Option<u64> {
        self.layouts.read().await.get(tenant_id).map(|doc| doc.version)
    }
}

#[async_trait]
impl LayoutGateway for MemoryLayoutStore {
    async fn load_document(&self, tenant_id: &str) -> GatewayResult<LayoutDocument> {
        validate_tenant(tenant_id)?;
        self.layouts
            .read()
            .await
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound {
                tenant_id: tenant_id.to_string(),
                key: LAYOUT_KEY,
            })
    }

    #[instrument(skip_all, fields(tenant = %document.tenant_id, base = document.version))]
    async fn save_document(&self, document: &LayoutDocument) -> GatewayResult<SaveReceipt> {
        validate_tenant(&document.tenant_id)?;

        let receipt = {
            let mut layouts = self.layouts.write().await;
            let stored = layouts.get(&document.tenant_id).map(|doc| doc.version);
            self.policy.check(stored, document.version)?;

            let receipt = SaveReceipt::next(stored, document.version);
            let mut copy = document.clone();
            copy.version = receipt.version;
            copy.updated_at = receipt.updated_at;
            layouts.insert(document.tenant_id.clone(), copy);
            receipt
        };

        debug!(version = receipt.version, "Layout saved");
        self.feed.publish(ExternalChange {
            tenant_id: document.tenant_id.clone(),
            document: ChangedDocument::Layout,
            version: Some(receipt.version),
        });
        Ok(receipt)
    }

    async fn load_studio_config(&self, tenant_id: &str) -> GatewayResult<StudioConfig> {
        validate_tenant(tenant_id)?;
        Ok(self.configs.read().await.get(tenant_id).cloned().unwrap_or_default())
    }

    async fn save_studio_config(&self, tenant_id: &str, config: &StudioConfig) -> GatewayResult<()> {
        validate_tenant(tenant_id)?;
        self.configs
            .write()
            .await
            .insert(tenant_id.to_string(), config.clone());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_layout_is_not_found() {
        let store = MemoryLayoutStore::new();
        let err = store.load_document("acme").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_assigns_version_without_touching_input() {
        let store = MemoryLayoutStore::new();
        let doc = LayoutDocument::new("acme");

        let receipt = store.save_document(&doc).await.unwrap();
        assert_eq!(receipt.version, 1);
        assert_eq!(doc.version, 0);

        let loaded = store.load_document("acme").await.unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.tenant_id, "acme");
    }

    #[tokio::test]
    async fn test_reject_stale_save() {
        let store = MemoryLayoutStore::new().with_conflict_policy(ConflictPolicy::RejectStale);
        let base = LayoutDocument::new("acme");
        store.save_document(&base).await.unwrap();

        // Second writer still based on version 0
        let err = store.save_document(&base).await.unwrap_err();
        assert!(matches!(err, GatewayError::Conflict { stored: 1, attempted: 0 }));
        assert_eq!(store.stored_version("acme").await, Some(1));
    }

    #[tokio::test]
    async fn test_last_writer_wins_overwrites() {
        let store = MemoryLayoutStore::new();
        let base = LayoutDocument::new("acme");
        store.save_document(&base).await.unwrap();

        let receipt = store.save_document(&base).await.unwrap();
        assert_eq!(receipt.version, 2);
    }

    #[tokio::test]
    async fn test_studio_config_defaults_and_notifies() {
        let store = MemoryLayoutStore::new();
        assert!(!store.load_studio_config("acme").await.unwrap().enabled);

        let mut changes = store.subscribe("acme");
        store.save_studio_config("acme", &StudioConfig::enabled()).await.unwrap();

        assert!(store.load_studio_config("acme").await.unwrap().enabled);
        assert_eq!(changes.recv().await.unwrap().document, ChangedDocument::StudioConfig);
    }
}
