//! Pending image uploads.
//!
//! An upload targets one settings key on a section, or on a block inside a
//! section. While the transfer runs the key may hold a local preview; the
//! value it had before is remembered so a failure can put it back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use storefront_schema::{LayoutDocument, Settings};

/// The settings field an upload writes into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub section_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    pub key: String,
}

impl UploadTarget {
    pub fn section(section_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            block_id: None,
            key: key.into(),
        }
    }

    pub fn block(section_id: impl Into<String>, block_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            block_id: Some(block_id.into()),
            key: key.into(),
        }
    }

    /// The settings map this target points at, if it still exists
    pub fn settings<'a>(&self, doc: &'a LayoutDocument) -> Option<&'a Settings> {
        let section = doc.section(&self.section_id)?;
        match &self.block_id {
            Some(block_id) => section.block(block_id).map(|b| &b.settings),
            None => Some(&section.settings),
        }
    }

    pub fn settings_mut<'a>(&self, doc: &'a mut LayoutDocument) -> Option<&'a mut Settings> {
        let section = doc.section_mut(&self.section_id)?;
        match &self.block_id {
            Some(block_id) => section.block_mut(block_id).map(|b| &mut b.settings),
            None => Some(&mut section.settings),
        }
    }
}

impl std::fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.block_id {
            Some(block_id) => write!(f, "{}/{}.{}", self.section_id, block_id, self.key),
            None => write!(f, "{}.{}", self.section_id, self.key),
        }
    }
}

/// Handle returned by `begin_upload`
///
/// Tickets carry the document generation they were issued for; once the
/// document is replaced they no longer match and are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub target: UploadTarget,
    pub(crate) generation: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct PendingUpload {
    /// Value of the key before the upload started (`None` = absent)
    pub previous: Option<Value>,
}

/// Uploads in flight for one session
#[derive(Debug, Default)]
pub(crate) struct UploadTracker {
    generation: u64,
    pending: HashMap<UploadTarget, PendingUpload>,
}

impl UploadTracker {
    pub fn is_pending(&self, target: &UploadTarget) -> bool {
        self.pending.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Targets in flight with the value each held before its upload
    pub fn pending(&self) -> impl Iterator<Item = (&UploadTarget, &PendingUpload)> {
        self.pending.iter()
    }

    pub fn insert(&mut self, target: UploadTarget, previous: Option<Value>) -> UploadTicket {
        self.pending.insert(target.clone(), PendingUpload { previous });
        UploadTicket {
            target,
            generation: self.generation,
        }
    }

    /// Take the pending entry for a ticket that is still current
    pub fn take(&mut self, ticket: &UploadTicket) -> Option<PendingUpload> {
        if ticket.generation != self.generation {
            return None;
        }
        self.pending.remove(&ticket.target)
    }

    /// Forget every pending upload; outstanding tickets become stale
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }
}

/// Put `value` back under `key` (`None` removes the key)
pub(crate) fn restore_value(settings: &mut Settings, key: &str, value: Option<Value>) -> bool {
    match value {
        Some(value) => settings.insert(key.to_string(), value.clone()).as_ref() != Some(&value),
        None => settings.remove(key).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stale_ticket_is_not_taken() {
        let mut tracker = UploadTracker::default();
        let ticket = tracker.insert(UploadTarget::section("s", "image"), None);

        tracker.cancel_all();
        assert!(tracker.take(&ticket).is_none());
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn test_restore_value_absent_stays_absent() {
        let mut settings = Settings::new();
        settings.insert("image".to_string(), json!("blob:preview"));

        assert!(restore_value(&mut settings, "image", None));
        assert!(!settings.contains_key("image"));
        assert!(!restore_value(&mut settings, "image", None));
    }

    #[test]
    fn test_display() {
        assert_eq!(UploadTarget::section("s1", "backgroundImage").to_string(), "s1.backgroundImage");
        assert_eq!(UploadTarget::block("s1", "b2", "src").to_string(), "s1/b2.src");
    }
}
