//! Async orchestration over one tenant's editing session.
//!
//! The session itself is synchronous; this layer owns the I/O around it.
//! Neither a save nor an upload holds the session lock while waiting on the
//! gateway or the uploader, so editing continues meanwhile. Saves are
//! sequenced by their own lock and each one serialises the document as it
//! stands when the save starts.

use std::sync::Arc;
use storefront_editor::{Change, EditSession, UploadTarget};
use storefront_evaluator::{DataContext, RenderTable, RenderedPage, Renderer};
use storefront_schema::{LayoutDocument, SchemaRegistry};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::StudioError;
use crate::gateway::{ChangedDocument, ExternalChange, LayoutGateway, SaveReceipt};
use crate::uploader::ImageUploader;

/// What [`StudioService::save`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to save
    Clean,
    Saved(SaveReceipt),
}

pub struct StudioService<G: LayoutGateway> {
    tenant_id: String,
    gateway: Arc<G>,
    renderer: Renderer,
    session: Mutex<EditSession>,
    save_lock: Mutex<()>,
}

impl<G: LayoutGateway + 'static> StudioService<G> {
    /// Load the tenant's layout; a tenant with nothing stored starts empty
    #[instrument(skip(gateway, registry))]
    pub async fn open(gateway: Arc<G>, registry: Arc<SchemaRegistry>, tenant_id: &str) -> Result<Self, StudioError> {
        let document = match gateway.load_document(tenant_id).await {
            Ok(document) => document,
            Err(err) if err.is_not_found() => {
                info!("No stored layout, starting empty");
                LayoutDocument::new(tenant_id)
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            tenant_id: tenant_id.to_string(),
            gateway,
            renderer: Renderer::new(registry.clone(), RenderTable::builtin()),
            session: Mutex::new(EditSession::new(registry, document)),
            save_lock: Mutex::new(()),
        })
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Run `f` against the session under its lock
    pub async fn edit<R>(&self, f: impl FnOnce(&mut EditSession) -> R) -> R {
        let mut session = self.session.lock().await;
        f(&mut session)
    }

    pub async fn snapshot(&self) -> LayoutDocument {
        self.session.lock().await.document().clone()
    }

    pub async fn is_dirty(&self) -> bool {
        self.session.lock().await.is_dirty()
    }

    /// Persist the current document.
    ///
    /// On failure the session stays dirty and its document is untouched.
    #[instrument(skip(self), fields(tenant = %self.tenant_id))]
    pub async fn save(&self) -> Result<SaveOutcome, StudioError> {
        let _sequence = self.save_lock.lock().await;

        let (snapshot, revision) = {
            let session = self.session.lock().await;
            if !session.is_dirty() {
                debug!("Nothing to save");
                return Ok(SaveOutcome::Clean);
            }
            let mut snapshot = session.persistable_document();
            snapshot.version = session.loaded_version();
            (snapshot, session.revision())
        };

        let receipt = match self.gateway.save_document(&snapshot).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "Save failed");
                return Err(err.into());
            }
        };

        let mut session = self.session.lock().await;
        if session.loaded_version() == snapshot.version {
            session.mark_saved(revision, receipt.version, receipt.updated_at);
        } else {
            // Replaced by a reload while the save was in flight
            debug!(version = receipt.version, "Session moved on during save");
        }
        info!(version = receipt.version, dirty = session.is_dirty(), "Saved");
        Ok(SaveOutcome::Saved(receipt))
    }

    /// Replace the session document with the stored one
    #[instrument(skip(self), fields(tenant = %self.tenant_id))]
    pub async fn reload(&self) -> Result<(), StudioError> {
        let _sequence = self.save_lock.lock().await;
        let document = self.gateway.load_document(&self.tenant_id).await?;
        self.session.lock().await.replace_document(document);
        Ok(())
    }

    /// React to a change notification.
    ///
    /// Returns true when the session document was replaced. A layout change
    /// whose version is the one already loaded (our own save) is ignored.
    pub async fn handle_external_change(&self, change: &ExternalChange) -> Result<bool, StudioError> {
        if change.tenant_id != self.tenant_id || change.document != ChangedDocument::Layout {
            return Ok(false);
        }
        // A save in flight may be the source of this change; let it finish
        // recording its version first.
        let _sequence = self.save_lock.lock().await;
        let loaded = self.session.lock().await.loaded_version();
        if change.version == Some(loaded) {
            return Ok(false);
        }

        let document = self.gateway.load_document(&self.tenant_id).await?;
        let mut session = self.session.lock().await;
        if document.version == session.loaded_version() {
            return Ok(false);
        }
        if session.is_dirty() {
            warn!(
                stored = document.version,
                loaded = session.loaded_version(),
                "Discarding unsaved edits for newer stored layout"
            );
        }
        session.replace_document(document);
        Ok(true)
    }

    /// Reload on every external layout change until the feed closes
    pub fn follow_changes(self: Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.gateway.subscribe(&self.tenant_id);
        tokio::spawn(async move {
            while let Some(change) = changes.recv().await {
                match self.handle_external_change(&change).await {
                    Ok(true) => info!(tenant = %self.tenant_id, "Reloaded after external change"),
                    Ok(false) => {}
                    Err(err) => warn!(tenant = %self.tenant_id, error = %err, "Reload failed"),
                }
            }
        })
    }

    /// Upload an image into a settings field.
    ///
    /// The field shows `preview` (if any) while the upload runs; a failed
    /// upload puts the previous value back and returns the error.
    pub async fn upload_image(
        &self,
        target: UploadTarget,
        file_name: &str,
        bytes: Vec<u8>,
        preview: Option<serde_json::Value>,
        uploader: &dyn ImageUploader,
    ) -> Result<Change, StudioError> {
        let ticket = self.session.lock().await.begin_upload(target, preview)?;

        let result = uploader.upload(&self.tenant_id, file_name, bytes).await;

        let mut session = self.session.lock().await;
        match result {
            Ok(url) => Ok(session.complete_upload(&ticket, &url)?),
            Err(err) => {
                session.fail_upload(&ticket);
                Err(err.into())
            }
        }
    }

    /// Render the session document, or `None` when the studio is disabled
    /// for this tenant and the caller should serve its default page
    #[instrument(skip_all, fields(tenant = %self.tenant_id))]
    pub async fn render(
        &self,
        ctx: DataContext,
        fallback: Option<&LayoutDocument>,
    ) -> Result<Option<RenderedPage>, StudioError> {
        let config = self.gateway.load_studio_config(&self.tenant_id).await?;
        if !config.enabled {
            debug!("Studio disabled");
            return Ok(None);
        }

        let ctx = ctx.with_studio_config(&config);
        let session = self.session.lock().await;
        let page = match fallback {
            Some(fallback) => self.renderer.render_with_fallback(session.document(), fallback, &ctx),
            None => self.renderer.render(session.document(), &ctx),
        };
        Ok(Some(page))
    }
}
