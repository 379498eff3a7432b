//! # Layout Mutations
//!
//! High-level semantic operations on a layout document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one editor action
//! 2. **Total**: Invalid references are no-ops, never failures
//! 3. **Invertible**: Applying a mutation yields its inverse for undo
//! 4. **Replayable**: Applying yields a resolved form that reproduces the
//!    exact same result (same generated ids) on redo
//!
//! ## Mutation Semantics
//!
//! ### AddSection
//! - Fresh id, settings = registry defaults overlaid with the preset
//! - Placed by category (see [`crate::placement`])
//!
//! ### RemoveSection
//! - Removes the section and every block inside it
//!
//! ### ReplaceSectionSettings / ReplaceBlockSettings
//! - Whole-map replacement, not a merge; keys missing from the new map are gone
//!
//! ### AddBlock
//! - Appends; no-op unless the section type allows the block type

use serde::{Deserialize, Serialize};
use storefront_schema::{PlacedBlock, PlacedSection, Settings};

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    /// Add a section of a registered type at its category position
    #[serde(rename_all = "camelCase")]
    AddSection {
        type_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preset_settings: Option<Settings>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },

    /// Put a fully-formed section back at an index (undo/redo only)
    #[serde(rename_all = "camelCase")]
    RestoreSection { index: usize, section: PlacedSection },

    /// Remove a section and its blocks
    #[serde(rename_all = "camelCase")]
    RemoveSection { section_id: String },

    /// Array-move one section
    #[serde(rename_all = "camelCase")]
    ReorderSections { from: usize, to: usize },

    #[serde(rename_all = "camelCase")]
    SetSectionVisibility { section_id: String, visible: bool },

    /// Replace the whole settings map (atomic, last write wins)
    #[serde(rename_all = "camelCase")]
    ReplaceSectionSettings { section_id: String, settings: Settings },

    #[serde(rename_all = "camelCase")]
    RenameSection { section_id: String, name: String },

    /// Deep copy with fresh ids, inserted right after the source
    #[serde(rename_all = "camelCase")]
    DuplicateSection { section_id: String },

    /// Append a block with the block type's defaults
    #[serde(rename_all = "camelCase")]
    AddBlock { section_id: String, block_type: String },

    /// Put a fully-formed block back at an index (undo/redo only)
    #[serde(rename_all = "camelCase")]
    RestoreBlock {
        section_id: String,
        index: usize,
        block: PlacedBlock,
    },

    #[serde(rename_all = "camelCase")]
    RemoveBlock { section_id: String, block_id: String },

    #[serde(rename_all = "camelCase")]
    ReorderBlocks {
        section_id: String,
        from: usize,
        to: usize,
    },

    #[serde(rename_all = "camelCase")]
    ReplaceBlockSettings {
        section_id: String,
        block_id: String,
        settings: Settings,
    },
}

impl Mutation {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddSection { .. } => "add_section",
            Mutation::RestoreSection { .. } => "restore_section",
            Mutation::RemoveSection { .. } => "remove_section",
            Mutation::ReorderSections { .. } => "reorder_sections",
            Mutation::SetSectionVisibility { .. } => "set_section_visibility",
            Mutation::ReplaceSectionSettings { .. } => "replace_section_settings",
            Mutation::RenameSection { .. } => "rename_section",
            Mutation::DuplicateSection { .. } => "duplicate_section",
            Mutation::AddBlock { .. } => "add_block",
            Mutation::RestoreBlock { .. } => "restore_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::ReorderBlocks { .. } => "reorder_blocks",
            Mutation::ReplaceBlockSettings { .. } => "replace_block_settings",
        }
    }
}

/// Outcome of an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Nothing referenced by the edit existed, or it would not change anything
    Unchanged,
    /// The document changed in place
    Updated,
    /// A section or block with this id was created
    Created(String),
}

impl Change {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Change::Unchanged)
    }

    pub fn created_id(&self) -> Option<&str> {
        match self {
            Change::Created(id) => Some(id),
            _ => None,
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub change: Change,

    /// Mutation that reverts this one (absent when nothing changed)
    pub inverse: Option<Mutation>,

    /// Mutation that reproduces exactly this result when reapplied
    pub resolved: Option<Mutation>,
}

impl Applied {
    pub(crate) fn unchanged() -> Self {
        Self {
            change: Change::Unchanged,
            inverse: None,
            resolved: None,
        }
    }

    pub(crate) fn changed(change: Change, resolved: Mutation, inverse: Mutation) -> Self {
        Self {
            change,
            inverse: Some(inverse),
            resolved: Some(resolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::SetSectionVisibility {
            section_id: "section-1".to_string(),
            visible: false,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_wire_shape_is_tagged_camel_case() {
        let value = serde_json::to_value(Mutation::ReorderBlocks {
            section_id: "s".to_string(),
            from: 0,
            to: 1,
        })
        .unwrap();

        assert_eq!(value, json!({ "kind": "reorderBlocks", "sectionId": "s", "from": 0, "to": 1 }));
    }

    #[test]
    fn test_change_helpers() {
        assert!(!Change::Unchanged.is_changed());
        assert!(Change::Updated.is_changed());
        assert_eq!(Change::Created("x".to_string()).created_id(), Some("x"));
    }
}
