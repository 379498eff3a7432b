//! # Layout Document
//!
//! The persisted, ordered composition of a tenant's storefront.
//!
//! Order in [`LayoutDocument::sections`] is the only source of render order.
//! Sections and blocks are created by the composer in `storefront-editor`,
//! which owns identity assignment and default-settings seeding; this module
//! only describes the shape and how it is (de)serialized.
//!
//! ## Persisted shape
//!
//! ```json
//! {
//!   "sections": [
//!     { "id": "...", "type": "hero", "name": "Hero banner", "visible": true,
//!       "settings": {}, "blocks": [ { "id": "...", "type": "button", "settings": {} } ] }
//!   ],
//!   "updatedAt": "2024-06-01T12:00:00Z"
//! }
//! ```

use crate::error::DocumentError;
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Persistence key of the layout document
pub const LAYOUT_KEY: &str = "store_layout";

/// A tenant's storefront layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    /// Owning tenant (the storage key, not part of the blob)
    #[serde(skip)]
    pub tenant_id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub sections: Vec<PlacedSection>,

    /// Save counter; absent in legacy layouts
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// A section placed in a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSection {
    pub id: String,

    #[serde(rename = "type")]
    pub type_id: String,

    #[serde(rename = "name", default)]
    pub display_name: String,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub settings: Settings,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocks: Vec<PlacedBlock>,
}

/// A content block nested in a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub id: String,

    #[serde(rename = "type")]
    pub type_id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub settings: Settings,
}

fn default_visible() -> bool {
    true
}

/// Treat an explicit `null` like a missing value
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LayoutDocument {
    /// Create an empty layout for a tenant
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            sections: Vec::new(),
            version: 0,
            updated_at: DateTime::<Utc>::default(),
        }
    }

    /// Parse the persisted JSON blob for a tenant
    pub fn from_json(tenant_id: impl Into<String>, json: &str) -> Result<Self, DocumentError> {
        let mut doc: LayoutDocument = serde_json::from_str(json)?;
        doc.tenant_id = tenant_id.into();
        Ok(doc)
    }

    pub fn from_value(tenant_id: impl Into<String>, value: serde_json::Value) -> Result<Self, DocumentError> {
        let mut doc: LayoutDocument = serde_json::from_value(value)?;
        doc.tenant_id = tenant_id.into();
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, section_id: &str) -> Option<&PlacedSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut PlacedSection> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    pub fn position(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    /// Every section and block id in document order
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().flat_map(|s| {
            std::iter::once(s.id.as_str()).chain(s.blocks.iter().map(|b| b.id.as_str()))
        })
    }

    /// Whether any section or block already uses `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.all_ids().any(|existing| existing == id)
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Record a successful save
    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = at;
    }
}

impl PlacedSection {
    pub fn block(&self, block_id: &str) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut PlacedBlock> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    pub fn block_position(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }

    /// Read a string setting, if present
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}
