use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::file_store::{LAYOUT_FILE, STUDIO_CONFIG_FILE};
use crate::gateway::{validate_tenant, ChangedDocument, ExternalChange};

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to create watcher: {0}")]
    CreateError(#[from] notify::Error),

    #[error("Watch error: {0}")]
    WatchError(String),
}

pub type WatcherResult<T> = Result<T, WatcherError>;

/// Maps file-system events under a store root to [`ExternalChange`]s.
///
/// Stops watching when dropped.
pub struct LayoutWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl LayoutWatcher {
    pub fn new(root: PathBuf, sender: broadcast::Sender<ExternalChange>) -> WatcherResult<Self> {
        std::fs::create_dir_all(&root)
            .map_err(|err| WatcherError::WatchError(format!("{}: {err}", root.display())))?;

        let event_root = root.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for change in changes_for_event(&event_root, &event) {
                        let _ = sender.send(change);
                    }
                }
                Err(err) => warn!(error = %err, "Watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        debug!(root = %root.display(), "Watching layout store");

        Ok(Self {
            _watcher: watcher,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Changes implied by one notify event; empty for unrelated files
pub fn changes_for_event(root: &Path, event: &Event) -> Vec<ExternalChange> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)) {
        return Vec::new();
    }

    let mut changes: Vec<ExternalChange> = Vec::new();
    for path in &event.paths {
        if let Some(change) = change_for_path(root, path) {
            if !changes.contains(&change) {
                changes.push(change);
            }
        }
    }
    changes
}

fn change_for_path(root: &Path, path: &Path) -> Option<ExternalChange> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = relative.components().map(|c| c.as_os_str().to_str());
    let tenant_id = parts.next()??;
    let file = parts.next()??;
    if parts.next().is_some() || validate_tenant(tenant_id).is_err() {
        return None;
    }

    let document = match file {
        LAYOUT_FILE => ChangedDocument::Layout,
        STUDIO_CONFIG_FILE => ChangedDocument::StudioConfig,
        _ => return None,
    };

    Some(ExternalChange {
        tenant_id: tenant_id.to_string(),
        document,
        version: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::time::Duration;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn test_maps_store_files() {
        let root = Path::new("/store");
        let changes = changes_for_event(
            root,
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                &["/store/acme/store_layout.json", "/store/beta/store_studio_config.json"],
            ),
        );

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].tenant_id, "acme");
        assert_eq!(changes[0].document, ChangedDocument::Layout);
        assert_eq!(changes[1].tenant_id, "beta");
        assert_eq!(changes[1].document, ChangedDocument::StudioConfig);
    }

    #[test]
    fn test_ignores_unrelated_paths() {
        let root = Path::new("/store");
        let kind = EventKind::Create(CreateKind::File);

        assert!(changes_for_event(root, &event(kind, &["/store/acme/.store_layout.json.tmp"])).is_empty());
        assert!(changes_for_event(root, &event(kind, &["/store/acme/assets/store_layout.json"])).is_empty());
        assert!(changes_for_event(root, &event(kind, &["/elsewhere/acme/store_layout.json"])).is_empty());
        assert!(changes_for_event(root, &event(EventKind::Any, &["/store/acme/store_layout.json"])).is_empty());
    }

    #[test]
    fn test_duplicate_paths_collapse() {
        let root = Path::new("/store");
        let changes = changes_for_event(
            root,
            &event(
                EventKind::Create(CreateKind::File),
                &["/store/acme/store_layout.json", "/store/acme/store_layout.json"],
            ),
        );
        assert_eq!(changes.len(), 1);
    }

    #[tokio::test]
    async fn test_watcher_reports_external_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let (tx, mut rx) = broadcast::channel(16);
        let _watcher = LayoutWatcher::new(root.clone(), tx).unwrap();

        std::fs::create_dir_all(root.join("acme")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::fs::write(root.join("acme").join(LAYOUT_FILE), "{}").unwrap();

        let change = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no change event")
            .unwrap();
        assert_eq!(change.tenant_id, "acme");
        assert_eq!(change.document, ChangedDocument::Layout);
    }
}
