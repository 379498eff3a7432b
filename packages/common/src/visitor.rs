use serde_json::Value;
use std::collections::BTreeMap;
use storefront_schema::{LayoutDocument, PlacedBlock, PlacedSection};

/// Visitor pattern for traversing a layout immutably
///
/// The default implementations walk the whole document. Override specific
/// visit_* methods to act on the nodes you care about.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &LayoutDocument) {
        walk_document(self, doc);
    }

    fn visit_section(&mut self, section: &PlacedSection) {
        walk_section(self, section);
    }

    fn visit_block(&mut self, section: &PlacedSection, block: &PlacedBlock) {
        walk_block(self, section, block);
    }

    /// Called for each settings entry of a section (`block` is `None`) or block
    fn visit_setting(&mut self, _section: &PlacedSection, _block: Option<&PlacedBlock>, _key: &str, _value: &Value) {
        // Leaf, nothing to walk
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &LayoutDocument) {
    for section in &doc.sections {
        visitor.visit_section(section);
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, section: &PlacedSection) {
    for (key, value) in &section.settings {
        visitor.visit_setting(section, None, key, value);
    }
    for block in &section.blocks {
        visitor.visit_block(section, block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, section: &PlacedSection, block: &PlacedBlock) {
    for (key, value) in &block.settings {
        visitor.visit_setting(section, Some(block), key, value);
    }
}

/// Per-type counts for a layout
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeUsage {
    pub sections: BTreeMap<String, usize>,
    pub blocks: BTreeMap<String, usize>,
    pub hidden: usize,
}

impl TypeUsage {
    pub fn collect(doc: &LayoutDocument) -> Self {
        let mut usage = Self::default();
        usage.visit_document(doc);
        usage
    }
}

impl Visitor for TypeUsage {
    fn visit_section(&mut self, section: &PlacedSection) {
        *self.sections.entry(section.type_id.clone()).or_default() += 1;
        if !section.visible {
            self.hidden += 1;
        }
        walk_section(self, section);
    }

    fn visit_block(&mut self, _section: &PlacedSection, block: &PlacedBlock) {
        *self.blocks.entry(block.type_id.clone()).or_default() += 1;
    }
}
