//! Persistence gateway the studio depends on.
//!
//! A gateway stores two documents per tenant (`store_layout` and
//! `store_studio_config`) and announces changes to them. Implementations
//! never merge: a save replaces the whole stored layout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_schema::{LayoutDocument, StudioConfig};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// Which stored document changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangedDocument {
    Layout,
    StudioConfig,
}

/// Notification that a tenant's stored state changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalChange {
    pub tenant_id: String,
    pub document: ChangedDocument,

    /// Stored layout version after the change, when the source knows it
    pub version: Option<u64>,
}

/// What a save does when the stored layout moved on since it was loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictPolicy {
    /// Overwrite whatever is stored
    #[default]
    LastWriterWins,
    /// Fail with [`GatewayError::Conflict`]
    RejectStale,
}

impl ConflictPolicy {
    /// Check a save based on `attempted` against the `stored` version
    pub fn check(self, stored: Option<u64>, attempted: u64) -> GatewayResult<()> {
        match (self, stored) {
            (ConflictPolicy::RejectStale, Some(stored)) if stored > attempted => {
                Err(GatewayError::Conflict { stored, attempted })
            }
            _ => Ok(()),
        }
    }
}

/// Result of a successful layout save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl SaveReceipt {
    /// Next version after `stored`/`attempted`, stamped now
    pub fn next(stored: Option<u64>, attempted: u64) -> Self {
        Self {
            version: stored.unwrap_or(0).max(attempted) + 1,
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait LayoutGateway: Send + Sync {
    /// Load a tenant's layout; [`GatewayError::NotFound`] if never saved
    async fn load_document(&self, tenant_id: &str) -> GatewayResult<LayoutDocument>;

    /// Persist `document` for its tenant.
    ///
    /// `document.version` is the version the caller loaded. The stored copy
    /// gets the receipt's version and timestamp; `document` is not touched.
    async fn save_document(&self, document: &LayoutDocument) -> GatewayResult<SaveReceipt>;

    /// Studio config; defaults (disabled) when never saved
    async fn load_studio_config(&self, tenant_id: &str) -> GatewayResult<StudioConfig>;

    async fn save_studio_config(&self, tenant_id: &str, config: &StudioConfig) -> GatewayResult<()>;

    /// Change notifications for one tenant
    fn subscribe(&self, tenant_id: &str) -> ChangeSubscription;
}

/// Broadcast hub shared by the gateways
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ExternalChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, change: ExternalChange) {
        // No receivers is fine
        let delivered = self.sender.send(change).unwrap_or(0);
        debug!(delivered, "Published external change");
    }

    pub fn subscribe(&self, tenant_id: &str) -> ChangeSubscription {
        ChangeSubscription {
            tenant_id: tenant_id.to_string(),
            receiver: self.sender.subscribe(),
        }
    }

    pub(crate) fn sender(&self) -> broadcast::Sender<ExternalChange> {
        self.sender.clone()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Receiver filtered to one tenant
#[derive(Debug)]
pub struct ChangeSubscription {
    tenant_id: String,
    receiver: broadcast::Receiver<ExternalChange>,
}

impl ChangeSubscription {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Next change for this tenant; `None` once the feed is gone.
    ///
    /// Missed notifications collapse into one layout change with an unknown
    /// version, since any of them calls for a reload anyway.
    pub async fn recv(&mut self) -> Option<ExternalChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.tenant_id == self.tenant_id => return Some(change),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(tenant = %self.tenant_id, skipped, "Change subscription lagged");
                    return Some(ExternalChange {
                        tenant_id: self.tenant_id.clone(),
                        document: ChangedDocument::Layout,
                        version: None,
                    });
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Tenant ids become directory names, so keep them to a safe alphabet
pub fn validate_tenant(tenant_id: &str) -> GatewayResult<()> {
    let valid = !tenant_id.is_empty()
        && !tenant_id.starts_with('.')
        && tenant_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(GatewayError::InvalidTenant(tenant_id.to_string()))
    }
}
