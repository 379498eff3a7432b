//! # Edit Session Management
//!
//! One merchant's working copy of a tenant layout.
//!
//! An EditSession owns exactly one document, the composer bound to it, the
//! undo history, the current selection and the set of uploads in flight.
//! Every edit goes through [`EditSession::apply`], so undo and the dirty
//! flag see all of them.

use crate::uploads::{restore_value, UploadTarget, UploadTicket, UploadTracker};
use crate::{Change, Composer, EditorError, Mutation, UndoStack};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use storefront_schema::{LayoutDocument, SchemaRegistry, SectionVariant, Settings};
use tracing::{debug, info, warn};

/// What the merchant has selected in the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub section_id: String,
    pub block_id: Option<String>,
}

pub struct EditSession {
    document: LayoutDocument,
    composer: Composer,
    undo: UndoStack,
    selection: Option<Selection>,
    uploads: UploadTracker,

    /// Bumped on every change to the document
    revision: u64,

    /// Revision at the last successful save (or load)
    saved_revision: u64,

    /// Persisted version the document was loaded at
    loaded_version: u64,
}

impl EditSession {
    /// Start editing a loaded (or new) document
    pub fn new(registry: Arc<SchemaRegistry>, document: LayoutDocument) -> Self {
        let composer = Composer::for_document(registry, &document);
        let loaded_version = document.version;
        Self {
            document,
            composer,
            undo: UndoStack::new(),
            selection: None,
            uploads: UploadTracker::default(),
            revision: 0,
            saved_revision: 0,
            loaded_version,
        }
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub fn tenant_id(&self) -> &str {
        &self.document.tenant_id
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.composer.registry()
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn loaded_version(&self) -> u64 {
        self.loaded_version
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    /// The document as it should be stored.
    ///
    /// Fields with an upload in flight hold their pre-upload value here, so
    /// a preview never reaches the store.
    pub fn persistable_document(&self) -> LayoutDocument {
        let mut document = self.document.clone();
        for (target, pending) in self.uploads.pending() {
            if let Some(settings) = target.settings_mut(&mut document) {
                restore_value(settings, &target.key, pending.previous.clone());
            }
        }
        document
    }

    // -- Editing ------------------------------------------------------------

    /// Apply a mutation through the undo stack
    pub fn apply(&mut self, mutation: &Mutation) -> Result<Change, EditorError> {
        let change = self.undo.apply(mutation, &mut self.composer, &mut self.document)?;
        self.after_change(&change);
        Ok(change)
    }

    /// Apply several mutations as a single undo step
    pub fn apply_batch(
        &mut self,
        description: &str,
        mutations: impl IntoIterator<Item = Mutation>,
    ) -> Result<Vec<Change>, EditorError> {
        self.undo.begin_batch();
        self.undo.set_batch_description(description);

        let mut changes = Vec::new();
        let mut result = Ok(());
        for mutation in mutations {
            match self.apply(&mutation) {
                Ok(change) => changes.push(change),
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        self.undo.end_batch();
        result.map(|_| changes)
    }

    pub fn add_section(&mut self, type_id: &str, preset_settings: Option<Settings>) -> Result<Change, EditorError> {
        self.apply(&Mutation::AddSection {
            type_id: type_id.to_string(),
            preset_settings,
            display_name: None,
        })
    }

    /// Instantiate a variant from the catalog
    pub fn add_variant(&mut self, variant: &SectionVariant) -> Result<Change, EditorError> {
        let change = self.apply(&Composer::variant_mutation(variant))?;
        if let Some(id) = change.created_id() {
            self.select(id, None);
        }
        Ok(change)
    }

    pub fn remove_section(&mut self, section_id: &str) -> Result<Change, EditorError> {
        self.apply(&Mutation::RemoveSection {
            section_id: section_id.to_string(),
        })
    }

    pub fn reorder_sections(&mut self, from: usize, to: usize) -> Result<Change, EditorError> {
        self.apply(&Mutation::ReorderSections { from, to })
    }

    pub fn set_section_visibility(&mut self, section_id: &str, visible: bool) -> Result<Change, EditorError> {
        self.apply(&Mutation::SetSectionVisibility {
            section_id: section_id.to_string(),
            visible,
        })
    }

    pub fn replace_section_settings(&mut self, section_id: &str, settings: Settings) -> Result<Change, EditorError> {
        self.apply(&Mutation::ReplaceSectionSettings {
            section_id: section_id.to_string(),
            settings,
        })
    }

    pub fn add_block(&mut self, section_id: &str, block_type: &str) -> Result<Change, EditorError> {
        self.apply(&Mutation::AddBlock {
            section_id: section_id.to_string(),
            block_type: block_type.to_string(),
        })
    }

    pub fn remove_block(&mut self, section_id: &str, block_id: &str) -> Result<Change, EditorError> {
        self.apply(&Mutation::RemoveBlock {
            section_id: section_id.to_string(),
            block_id: block_id.to_string(),
        })
    }

    pub fn replace_block_settings(
        &mut self,
        section_id: &str,
        block_id: &str,
        settings: Settings,
    ) -> Result<Change, EditorError> {
        self.apply(&Mutation::ReplaceBlockSettings {
            section_id: section_id.to_string(),
            block_id: block_id.to_string(),
            settings,
        })
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.undo.undo(&mut self.composer, &mut self.document)?;
        if undone {
            self.after_change(&Change::Updated);
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.undo.redo(&mut self.composer, &mut self.document)?;
        if redone {
            self.after_change(&Change::Updated);
        }
        Ok(redone)
    }

    fn after_change(&mut self, change: &Change) {
        if !change.is_changed() {
            return;
        }
        self.revision += 1;
        self.prune_selection();
    }

    // -- Selection ----------------------------------------------------------

    /// Select a section (and optionally one of its blocks); unknown ids clear
    /// the selection
    pub fn select(&mut self, section_id: &str, block_id: Option<&str>) {
        self.selection = Some(Selection {
            section_id: section_id.to_string(),
            block_id: block_id.map(str::to_string),
        });
        self.prune_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn prune_selection(&mut self) {
        let Some(selection) = &mut self.selection else {
            return;
        };
        let Some(section) = self.document.section(&selection.section_id) else {
            self.selection = None;
            return;
        };
        if let Some(block_id) = &selection.block_id {
            if section.block(block_id).is_none() {
                selection.block_id = None;
            }
        }
    }

    // -- Persistence hooks --------------------------------------------------

    /// Swap in a document that changed elsewhere.
    ///
    /// Undo history is discarded, a selection pointing at a section that no
    /// longer exists is dropped and every pending upload is cancelled.
    pub fn replace_document(&mut self, document: LayoutDocument) {
        info!(
            tenant = %document.tenant_id,
            version = document.version,
            sections = document.len(),
            "Replacing document"
        );

        if !self.uploads.is_empty() {
            warn!(pending = self.uploads.len(), "Cancelling pending uploads");
        }

        self.composer.rebind(&document);
        self.loaded_version = document.version;
        self.document = document;
        self.undo.clear();
        self.uploads.cancel_all();
        self.prune_selection();

        self.revision += 1;
        self.saved_revision = self.revision;
    }

    /// Record that the document as of `revision` was persisted as `version`
    ///
    /// Edits made after `revision` keep the session dirty.
    pub fn mark_saved(&mut self, revision: u64, version: u64, at: DateTime<Utc>) {
        self.document.version = version;
        self.document.updated_at = at;
        self.loaded_version = version;
        self.saved_revision = revision;
        debug!(version, revision, dirty = self.is_dirty(), "Marked saved");
    }

    // -- Uploads ------------------------------------------------------------

    pub fn is_upload_pending(&self, target: &UploadTarget) -> bool {
        self.uploads.is_pending(target)
    }

    /// Start an upload into `target`, optionally showing `preview` meanwhile
    pub fn begin_upload(&mut self, target: UploadTarget, preview: Option<Value>) -> Result<UploadTicket, EditorError> {
        if self.uploads.is_pending(&target) {
            return Err(EditorError::UploadPending(target.to_string()));
        }
        let Some(settings) = target.settings_mut(&mut self.document) else {
            return Err(EditorError::UploadTargetMissing(target.to_string()));
        };

        let previous = settings.get(&target.key).cloned();
        if let Some(preview) = preview {
            settings.insert(target.key.clone(), preview);
        }

        debug!(target = %target, "Upload started");
        Ok(self.uploads.insert(target, previous))
    }

    /// Commit the uploaded URL as an undoable settings replacement
    pub fn complete_upload(&mut self, ticket: &UploadTicket, url: &str) -> Result<Change, EditorError> {
        let Some(pending) = self.uploads.take(ticket) else {
            debug!(target = %ticket.target, "Ignoring stale upload ticket");
            return Ok(Change::Unchanged);
        };
        let target = &ticket.target;
        let Some(settings) = target.settings_mut(&mut self.document) else {
            return Ok(Change::Unchanged);
        };

        // The undo entry must revert to the pre-upload value, not the preview.
        restore_value(settings, &target.key, pending.previous);
        let mut next = settings.clone();
        next.insert(target.key.clone(), Value::String(url.to_string()));

        let mutation = match &target.block_id {
            Some(block_id) => Mutation::ReplaceBlockSettings {
                section_id: target.section_id.clone(),
                block_id: block_id.clone(),
                settings: next,
            },
            None => Mutation::ReplaceSectionSettings {
                section_id: target.section_id.clone(),
                settings: next,
            },
        };
        self.apply(&mutation)
    }

    /// Abandon an upload, putting back whatever the field held before
    pub fn fail_upload(&mut self, ticket: &UploadTicket) -> Change {
        let Some(pending) = self.uploads.take(ticket) else {
            return Change::Unchanged;
        };
        let target = &ticket.target;
        warn!(target = %target, "Upload failed, restoring previous value");

        let restored = target
            .settings_mut(&mut self.document)
            .map(|settings| restore_value(settings, &target.key, pending.previous))
            .unwrap_or(false);
        if restored {
            self.revision += 1;
            Change::Updated
        } else {
            Change::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_schema::types;

    fn session() -> EditSession {
        EditSession::new(Arc::new(SchemaRegistry::builtin()), LayoutDocument::new("acme"))
    }

    fn add(session: &mut EditSession, type_id: &str) -> String {
        session
            .add_section(type_id, None)
            .unwrap()
            .created_id()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_dirty_tracks_revisions() {
        let mut session = session();
        assert!(!session.is_dirty());

        add(&mut session, types::HERO);
        assert!(session.is_dirty());

        let revision = session.revision();
        session.mark_saved(revision, 1, Utc::now());
        assert!(!session.is_dirty());
        assert_eq!(session.loaded_version(), 1);
    }

    #[test]
    fn test_edit_during_save_stays_dirty() {
        let mut session = session();
        add(&mut session, types::HERO);
        let snapshot_revision = session.revision();

        add(&mut session, types::FOOTER);
        session.mark_saved(snapshot_revision, 1, Utc::now());

        assert!(session.is_dirty());
    }

    #[test]
    fn test_noop_does_not_dirty() {
        let mut session = session();
        session.remove_section("missing").unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_selection_dropped_when_section_removed() {
        let mut session = session();
        let id = add(&mut session, types::HERO);
        session.select(&id, None);

        session.remove_section(&id).unwrap();
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_replace_document_resets_history() {
        let mut session = session();
        let id = add(&mut session, types::HERO);
        session.select(&id, None);

        let mut incoming = LayoutDocument::new("acme");
        incoming.version = 7;
        session.replace_document(incoming);

        assert!(session.document().is_empty());
        assert!(!session.undo_stack().can_undo());
        assert_eq!(session.selection(), None);
        assert_eq!(session.loaded_version(), 7);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_upload_complete_is_undoable() {
        let mut session = session();
        let id = add(&mut session, types::HERO);
        let target = UploadTarget::section(&id, "backgroundImage");

        let ticket = session
            .begin_upload(target.clone(), Some(json!("blob:preview")))
            .unwrap();
        assert_eq!(
            session.document().section(&id).unwrap().settings.get("backgroundImage"),
            Some(&json!("blob:preview"))
        );

        let change = session.complete_upload(&ticket, "https://cdn.example/hero.jpg").unwrap();
        assert_eq!(change, Change::Updated);
        assert_eq!(
            session.document().section(&id).unwrap().setting_str("backgroundImage"),
            Some("https://cdn.example/hero.jpg")
        );

        session.undo().unwrap();
        assert_eq!(
            session.document().section(&id).unwrap().setting_str("backgroundImage"),
            Some("")
        );
    }

    #[test]
    fn test_persistable_document_hides_pending_preview() {
        let mut session = session();
        let id = add(&mut session, types::HERO);
        let header_id = add(&mut session, types::HEADER);
        let saved_revision = session.revision();
        session.mark_saved(saved_revision, 1, Utc::now());

        let hero = session
            .begin_upload(UploadTarget::section(&id, "backgroundImage"), Some(json!("blob:hero")))
            .unwrap();
        let header = session
            .begin_upload(UploadTarget::section(&header_id, "logoUrl"), Some(json!("blob:logo")))
            .unwrap();

        let stored = session.persistable_document();
        assert_eq!(stored.section(&id).unwrap().setting_str("backgroundImage"), Some(""));
        assert_eq!(stored.section(&header_id).unwrap().setting_str("logoUrl"), Some(""));
        assert_eq!(
            session.document().section(&id).unwrap().setting_str("backgroundImage"),
            Some("blob:hero")
        );

        assert_eq!(session.fail_upload(&hero), Change::Updated);
        assert!(session.is_dirty());
        session.fail_upload(&header);
        assert_eq!(&session.persistable_document().sections, &session.document().sections);
    }

    #[test]
    fn test_second_upload_to_same_target_is_rejected() {
        let mut session = session();
        let id = add(&mut session, types::HERO);
        let target = UploadTarget::section(&id, "backgroundImage");

        session.begin_upload(target.clone(), None).unwrap();
        assert!(matches!(
            session.begin_upload(target, None),
            Err(EditorError::UploadPending(_))
        ));
    }

    #[test]
    fn test_upload_to_missing_target() {
        let mut session = session();
        let result = session.begin_upload(UploadTarget::section("nope", "image"), None);
        assert!(matches!(result, Err(EditorError::UploadTargetMissing(_))));
    }
}
