//! # Composer
//!
//! The composition engine: every structural edit to a [`LayoutDocument`]
//! goes through here, so identity assignment and default seeding live in one
//! place.
//!
//! A composer is bound to one document for one editing session. Ids are
//! `section-<seed>-<n>` / `block-<seed>-<n>`, where the seed is derived from
//! the tenant and `n` only grows; every candidate is also checked against the
//! ids already in the document.

use crate::errors::MutationError;
use crate::mutations::{Applied, Change, Mutation};
use crate::placement::{insertion_index, move_item};
use std::sync::Arc;
use storefront_schema::{
    merge_settings, IdGenerator, LayoutDocument, PlacedBlock, PlacedSection, SchemaRegistry,
    SectionCategory, SectionVariant, Settings,
};
use tracing::debug;

/// Direction for [`Composer::move_section`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

pub struct Composer {
    registry: Arc<SchemaRegistry>,
    ids: IdGenerator,
}

impl Composer {
    /// Composer for a fresh document of `tenant_id`
    pub fn new(registry: Arc<SchemaRegistry>, tenant_id: &str) -> Self {
        Self {
            registry,
            ids: IdGenerator::new(tenant_id),
        }
    }

    /// Composer for an existing (loaded) document
    pub fn for_document(registry: Arc<SchemaRegistry>, doc: &LayoutDocument) -> Self {
        let mut ids = IdGenerator::new(&doc.tenant_id);
        ids.resume_after(doc.all_ids());
        Self { registry, ids }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn registry_arc(&self) -> Arc<SchemaRegistry> {
        self.registry.clone()
    }

    /// Re-bind id generation to a replacement document
    pub fn rebind(&mut self, doc: &LayoutDocument) {
        self.ids = IdGenerator::new(&doc.tenant_id);
        self.ids.resume_after(doc.all_ids());
    }

    // -- Convenience operations ---------------------------------------------

    pub fn add_section(
        &mut self,
        doc: &mut LayoutDocument,
        type_id: &str,
        preset_settings: Option<&Settings>,
    ) -> Result<Change, MutationError> {
        let mutation = Mutation::AddSection {
            type_id: type_id.to_string(),
            preset_settings: preset_settings.cloned(),
            display_name: None,
        };
        Ok(self.apply(doc, &mutation)?.change)
    }

    pub fn add_section_from_variant(
        &mut self,
        doc: &mut LayoutDocument,
        variant: &SectionVariant,
    ) -> Result<Change, MutationError> {
        let mutation = Self::variant_mutation(variant);
        Ok(self.apply(doc, &mutation)?.change)
    }

    /// The mutation that instantiates `variant`
    pub fn variant_mutation(variant: &SectionVariant) -> Mutation {
        Mutation::AddSection {
            type_id: variant.target_type_id.clone(),
            preset_settings: Some(variant.preset_settings.clone()),
            display_name: Some(variant.display_name.clone()),
        }
    }

    pub fn remove_section(&mut self, doc: &mut LayoutDocument, section_id: &str) -> Change {
        self.apply_infallible(
            doc,
            Mutation::RemoveSection {
                section_id: section_id.to_string(),
            },
        )
    }

    pub fn reorder_sections(&mut self, doc: &mut LayoutDocument, from: usize, to: usize) -> Change {
        self.apply_infallible(doc, Mutation::ReorderSections { from, to })
    }

    /// Move a section one slot up or down
    pub fn move_section(&mut self, doc: &mut LayoutDocument, section_id: &str, direction: Direction) -> Change {
        let Some(from) = doc.position(section_id) else {
            return Change::Unchanged;
        };
        let to = match direction {
            Direction::Up if from > 0 => from - 1,
            Direction::Down => from + 1,
            _ => return Change::Unchanged,
        };
        self.reorder_sections(doc, from, to)
    }

    pub fn set_section_visibility(&mut self, doc: &mut LayoutDocument, section_id: &str, visible: bool) -> Change {
        self.apply_infallible(
            doc,
            Mutation::SetSectionVisibility {
                section_id: section_id.to_string(),
                visible,
            },
        )
    }

    pub fn replace_section_settings(
        &mut self,
        doc: &mut LayoutDocument,
        section_id: &str,
        settings: Settings,
    ) -> Change {
        self.apply_infallible(
            doc,
            Mutation::ReplaceSectionSettings {
                section_id: section_id.to_string(),
                settings,
            },
        )
    }

    pub fn rename_section(&mut self, doc: &mut LayoutDocument, section_id: &str, name: &str) -> Change {
        self.apply_infallible(
            doc,
            Mutation::RenameSection {
                section_id: section_id.to_string(),
                name: name.to_string(),
            },
        )
    }

    pub fn duplicate_section(&mut self, doc: &mut LayoutDocument, section_id: &str) -> Change {
        self.apply_infallible(
            doc,
            Mutation::DuplicateSection {
                section_id: section_id.to_string(),
            },
        )
    }

    pub fn add_block(&mut self, doc: &mut LayoutDocument, section_id: &str, block_type: &str) -> Change {
        self.apply_infallible(
            doc,
            Mutation::AddBlock {
                section_id: section_id.to_string(),
                block_type: block_type.to_string(),
            },
        )
    }

    pub fn remove_block(&mut self, doc: &mut LayoutDocument, section_id: &str, block_id: &str) -> Change {
        self.apply_infallible(
            doc,
            Mutation::RemoveBlock {
                section_id: section_id.to_string(),
                block_id: block_id.to_string(),
            },
        )
    }

    pub fn reorder_blocks(&mut self, doc: &mut LayoutDocument, section_id: &str, from: usize, to: usize) -> Change {
        self.apply_infallible(
            doc,
            Mutation::ReorderBlocks {
                section_id: section_id.to_string(),
                from,
                to,
            },
        )
    }

    pub fn replace_block_settings(
        &mut self,
        doc: &mut LayoutDocument,
        section_id: &str,
        block_id: &str,
        settings: Settings,
    ) -> Change {
        self.apply_infallible(
            doc,
            Mutation::ReplaceBlockSettings {
                section_id: section_id.to_string(),
                block_id: block_id.to_string(),
                settings,
            },
        )
    }

    fn apply_infallible(&mut self, doc: &mut LayoutDocument, mutation: Mutation) -> Change {
        // Only AddSection can fail, and none of the callers build one.
        self.apply(doc, &mutation)
            .map(|applied| applied.change)
            .unwrap_or(Change::Unchanged)
    }

    // -- Core ---------------------------------------------------------------

    /// Apply a mutation, returning its outcome, inverse and resolved form
    pub fn apply(&mut self, doc: &mut LayoutDocument, mutation: &Mutation) -> Result<Applied, MutationError> {
        let applied = match mutation {
            Mutation::AddSection {
                type_id,
                preset_settings,
                display_name,
            } => self.apply_add_section(doc, type_id, preset_settings.as_ref(), display_name.as_deref())?,

            Mutation::RestoreSection { index, section } => Self::apply_restore_section(doc, *index, section),

            Mutation::RemoveSection { section_id } => Self::apply_remove_section(doc, section_id),

            Mutation::ReorderSections { from, to } => {
                if move_item(&mut doc.sections, *from, *to) {
                    Applied::changed(
                        Change::Updated,
                        mutation.clone(),
                        Mutation::ReorderSections { from: *to, to: *from },
                    )
                } else {
                    Applied::unchanged()
                }
            }

            Mutation::SetSectionVisibility { section_id, visible } => match doc.section_mut(section_id) {
                Some(section) if section.visible != *visible => {
                    section.visible = *visible;
                    Applied::changed(
                        Change::Updated,
                        mutation.clone(),
                        Mutation::SetSectionVisibility {
                            section_id: section_id.clone(),
                            visible: !*visible,
                        },
                    )
                }
                _ => Applied::unchanged(),
            },

            Mutation::ReplaceSectionSettings { section_id, settings } => match doc.section_mut(section_id) {
                Some(section) if section.settings != *settings => {
                    let previous = std::mem::replace(&mut section.settings, settings.clone());
                    Applied::changed(
                        Change::Updated,
                        mutation.clone(),
                        Mutation::ReplaceSectionSettings {
                            section_id: section_id.clone(),
                            settings: previous,
                        },
                    )
                }
                _ => Applied::unchanged(),
            },

            Mutation::RenameSection { section_id, name } => match doc.section_mut(section_id) {
                Some(section) if section.display_name != *name => {
                    let previous = std::mem::replace(&mut section.display_name, name.clone());
                    Applied::changed(
                        Change::Updated,
                        mutation.clone(),
                        Mutation::RenameSection {
                            section_id: section_id.clone(),
                            name: previous,
                        },
                    )
                }
                _ => Applied::unchanged(),
            },

            Mutation::DuplicateSection { section_id } => self.apply_duplicate(doc, section_id),

            Mutation::AddBlock { section_id, block_type } => self.apply_add_block(doc, section_id, block_type),

            Mutation::RestoreBlock {
                section_id,
                index,
                block,
            } => Self::apply_restore_block(doc, section_id, *index, block),

            Mutation::RemoveBlock { section_id, block_id } => {
                let Some(section) = doc.section_mut(section_id) else {
                    return Ok(Applied::unchanged());
                };
                match section.block_position(block_id) {
                    Some(index) => {
                        let block = section.blocks.remove(index);
                        Applied::changed(
                            Change::Updated,
                            mutation.clone(),
                            Mutation::RestoreBlock {
                                section_id: section_id.clone(),
                                index,
                                block,
                            },
                        )
                    }
                    None => Applied::unchanged(),
                }
            }

            Mutation::ReorderBlocks { section_id, from, to } => match doc
                .section_mut(section_id)
                .map(|section| move_item(&mut section.blocks, *from, *to))
            {
                Some(true) => Applied::changed(
                    Change::Updated,
                    mutation.clone(),
                    Mutation::ReorderBlocks {
                        section_id: section_id.clone(),
                        from: *to,
                        to: *from,
                    },
                ),
                _ => Applied::unchanged(),
            },

            Mutation::ReplaceBlockSettings {
                section_id,
                block_id,
                settings,
            } => {
                let block = doc
                    .section_mut(section_id)
                    .and_then(|section| section.block_mut(block_id));
                match block {
                    Some(block) if block.settings != *settings => {
                        let previous = std::mem::replace(&mut block.settings, settings.clone());
                        Applied::changed(
                            Change::Updated,
                            mutation.clone(),
                            Mutation::ReplaceBlockSettings {
                                section_id: section_id.clone(),
                                block_id: block_id.clone(),
                                settings: previous,
                            },
                        )
                    }
                    _ => Applied::unchanged(),
                }
            }
        };

        debug!(
            mutation = mutation.name(),
            changed = applied.change.is_changed(),
            sections = doc.sections.len(),
            "Applied mutation"
        );

        Ok(applied)
    }

    fn apply_add_section(
        &mut self,
        doc: &mut LayoutDocument,
        type_id: &str,
        preset: Option<&Settings>,
        display_name: Option<&str>,
    ) -> Result<Applied, MutationError> {
        let definition = self
            .registry
            .lookup_section(type_id)
            .ok_or_else(|| MutationError::UnknownSectionType(type_id.to_string()))?;

        let section = PlacedSection {
            id: self.ids.fresh_id("section", |id| doc.contains_id(id)),
            type_id: definition.type_id.clone(),
            display_name: display_name.unwrap_or(definition.label.as_str()).to_string(),
            visible: true,
            settings: merge_settings(&definition.default_settings, preset),
            blocks: Vec::new(),
        };

        let registry = &self.registry;
        let index = insertion_index(
            &doc.sections,
            definition.category,
            |s| registry.category_of(&s.type_id) == SectionCategory::Header,
            |s| registry.category_of(&s.type_id) == SectionCategory::Footer,
        );

        let id = section.id.clone();
        doc.sections.insert(index, section.clone());

        Ok(Applied::changed(
            Change::Created(id.clone()),
            Mutation::RestoreSection { index, section },
            Mutation::RemoveSection { section_id: id },
        ))
    }

    fn apply_restore_section(doc: &mut LayoutDocument, index: usize, section: &PlacedSection) -> Applied {
        let collides = doc.contains_id(&section.id)
            || section.blocks.iter().any(|b| doc.contains_id(&b.id));
        if collides {
            return Applied::unchanged();
        }

        let index = index.min(doc.sections.len());
        doc.sections.insert(index, section.clone());

        Applied::changed(
            Change::Created(section.id.clone()),
            Mutation::RestoreSection {
                index,
                section: section.clone(),
            },
            Mutation::RemoveSection {
                section_id: section.id.clone(),
            },
        )
    }

    fn apply_remove_section(doc: &mut LayoutDocument, section_id: &str) -> Applied {
        match doc.position(section_id) {
            Some(index) => {
                // Blocks are owned by the section and go with it.
                let section = doc.sections.remove(index);
                Applied::changed(
                    Change::Updated,
                    Mutation::RemoveSection {
                        section_id: section_id.to_string(),
                    },
                    Mutation::RestoreSection { index, section },
                )
            }
            None => Applied::unchanged(),
        }
    }

    fn apply_duplicate(&mut self, doc: &mut LayoutDocument, section_id: &str) -> Applied {
        let Some(index) = doc.position(section_id) else {
            return Applied::unchanged();
        };

        let mut copy = doc.sections[index].clone();
        copy.id = self.ids.fresh_id("section", |id| doc.contains_id(id));
        copy.display_name = format!("{} (copy)", copy.display_name);
        for block in &mut copy.blocks {
            block.id = self.ids.fresh_id("block", |id| doc.contains_id(id));
        }

        let id = copy.id.clone();
        doc.sections.insert(index + 1, copy.clone());

        Applied::changed(
            Change::Created(id.clone()),
            Mutation::RestoreSection {
                index: index + 1,
                section: copy,
            },
            Mutation::RemoveSection { section_id: id },
        )
    }

    fn apply_add_block(&mut self, doc: &mut LayoutDocument, section_id: &str, block_type: &str) -> Applied {
        let Some(position) = doc.position(section_id) else {
            return Applied::unchanged();
        };

        let section_type = &doc.sections[position].type_id;
        let allowed = self.registry.section_or_fallback(section_type).allows_block(block_type);
        let Some(definition) = self.registry.lookup_block(block_type).filter(|_| allowed) else {
            debug!(section_type = %section_type, block_type, "Block type not allowed in section");
            return Applied::unchanged();
        };

        let block = PlacedBlock {
            id: self.ids.fresh_id("block", |id| doc.contains_id(id)),
            type_id: definition.type_id.clone(),
            settings: definition.default_settings.clone(),
        };

        let section = &mut doc.sections[position];
        let index = section.blocks.len();
        let id = block.id.clone();
        section.blocks.push(block.clone());

        Applied::changed(
            Change::Created(id.clone()),
            Mutation::RestoreBlock {
                section_id: section_id.to_string(),
                index,
                block,
            },
            Mutation::RemoveBlock {
                section_id: section_id.to_string(),
                block_id: id,
            },
        )
    }

    fn apply_restore_block(doc: &mut LayoutDocument, section_id: &str, index: usize, block: &PlacedBlock) -> Applied {
        if doc.contains_id(&block.id) {
            return Applied::unchanged();
        }
        let Some(section) = doc.section_mut(section_id) else {
            return Applied::unchanged();
        };

        let index = index.min(section.blocks.len());
        section.blocks.insert(index, block.clone());

        Applied::changed(
            Change::Created(block.id.clone()),
            Mutation::RestoreBlock {
                section_id: section_id.to_string(),
                index,
                block: block.clone(),
            },
            Mutation::RemoveBlock {
                section_id: section_id.to_string(),
                block_id: block.id.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_schema::types;

    fn composer() -> (Composer, LayoutDocument) {
        let registry = Arc::new(SchemaRegistry::builtin());
        (Composer::new(registry, "acme"), LayoutDocument::new("acme"))
    }

    fn type_order(doc: &LayoutDocument) -> Vec<&str> {
        doc.sections.iter().map(|s| s.type_id.as_str()).collect()
    }

    #[test]
    fn test_add_section_seeds_defaults_and_name() {
        let (mut composer, mut doc) = composer();

        let change = composer.add_section(&mut doc, types::PRODUCT_GRID, None).unwrap();
        let id = change.created_id().unwrap();

        let section = doc.section(id).unwrap();
        assert_eq!(section.display_name, "Product grid");
        assert!(section.visible);
        assert!(section.blocks.is_empty());
        assert_eq!(section.settings.get("productsToShow"), Some(&json!(8)));
    }

    #[test]
    fn test_add_section_overlays_preset() {
        let (mut composer, mut doc) = composer();
        let preset = match json!({ "filterType": "bestseller", "extra": true }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let change = composer.add_section(&mut doc, types::PRODUCT_GRID, Some(&preset)).unwrap();
        let section = doc.section(change.created_id().unwrap()).unwrap();

        assert_eq!(section.settings.get("filterType"), Some(&json!("bestseller")));
        assert_eq!(section.settings.get("extra"), Some(&json!(true)));
        assert_eq!(section.settings.get("productsToShow"), Some(&json!(8)));
    }

    #[test]
    fn test_add_unknown_type_is_an_error_signal() {
        let (mut composer, mut doc) = composer();
        let result = composer.add_section(&mut doc, "mega-carousel", None);

        assert_eq!(result, Err(MutationError::UnknownSectionType("mega-carousel".to_string())));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_category_placement() {
        let (mut composer, mut doc) = composer();

        composer.add_section(&mut doc, types::FOOTER, None).unwrap();
        composer.add_section(&mut doc, types::HERO, None).unwrap();
        composer.add_section(&mut doc, types::HEADER, None).unwrap();
        composer.add_section(&mut doc, types::PRODUCT_GRID, None).unwrap();
        composer.add_section(&mut doc, types::ANNOUNCEMENT_BAR, None).unwrap();

        assert_eq!(
            type_order(&doc),
            vec![
                types::HEADER,
                types::ANNOUNCEMENT_BAR,
                types::HERO,
                types::PRODUCT_GRID,
                types::FOOTER
            ]
        );
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids() {
        let (mut composer, mut doc) = composer();
        let id = composer
            .add_section(&mut doc, types::HERO, None)
            .unwrap()
            .created_id()
            .unwrap()
            .to_string();
        composer.add_block(&mut doc, &id, types::BLOCK_BUTTON);

        let copy_id = composer.duplicate_section(&mut doc, &id).created_id().unwrap().to_string();

        assert_eq!(doc.position(&copy_id), Some(1));
        let original = doc.section(&id).unwrap();
        let copy = doc.section(&copy_id).unwrap();
        assert_eq!(copy.display_name, "Hero banner (copy)");
        assert_eq!(copy.settings, original.settings);
        assert_ne!(copy.blocks[0].id, original.blocks[0].id);
    }

    #[test]
    fn test_move_section_up_and_down() {
        let (mut composer, mut doc) = composer();
        let a = composer.add_section(&mut doc, types::HERO, None).unwrap().created_id().unwrap().to_string();
        let b = composer.add_section(&mut doc, types::RICH_TEXT, None).unwrap().created_id().unwrap().to_string();

        assert_eq!(composer.move_section(&mut doc, &a, Direction::Up), Change::Unchanged);
        assert_eq!(composer.move_section(&mut doc, &b, Direction::Down), Change::Unchanged);
        assert_eq!(composer.move_section(&mut doc, &b, Direction::Up), Change::Updated);
        assert_eq!(doc.section_ids(), vec![b.as_str(), a.as_str()]);
    }

    #[test]
    fn test_ids_skip_existing_document_ids() {
        let registry = Arc::new(SchemaRegistry::builtin());
        let seed = storefront_schema::tenant_seed("acme");
        let json = format!(
            r#"{{ "sections": [ {{ "id": "section-{seed}-1", "type": "hero" }} ] }}"#
        );
        let mut doc = LayoutDocument::from_json("acme", &json).unwrap();

        let mut fresh = Composer::new(registry.clone(), "acme");
        let id = fresh.add_section(&mut doc, types::HERO, None).unwrap();
        assert_eq!(id.created_id(), Some(format!("section-{seed}-2").as_str()));

        let mut resumed = Composer::for_document(registry, &doc);
        let id = resumed.add_section(&mut doc, types::HERO, None).unwrap();
        assert_eq!(id.created_id(), Some(format!("section-{seed}-3").as_str()));
    }

    #[test]
    fn test_inverse_of_remove_restores_position_and_blocks() {
        let (mut composer, mut doc) = composer();
        composer.add_section(&mut doc, types::HEADER, None).unwrap();
        let hero = composer.add_section(&mut doc, types::HERO, None).unwrap().created_id().unwrap().to_string();
        composer.add_section(&mut doc, types::FOOTER, None).unwrap();
        composer.add_block(&mut doc, &hero, types::BLOCK_HEADING);
        let before = doc.clone();

        let applied = composer
            .apply(&mut doc, &Mutation::RemoveSection { section_id: hero.clone() })
            .unwrap();
        assert_eq!(doc.len(), 2);

        composer.apply(&mut doc, &applied.inverse.unwrap()).unwrap();
        assert_eq!(doc, before);
    }
}
