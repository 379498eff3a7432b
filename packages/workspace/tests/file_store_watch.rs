use std::sync::Arc;
use std::time::Duration;
use storefront_schema::{types, SchemaRegistry};
use storefront_workspace::{FileLayoutStore, LayoutGateway, StudioService};

#[tokio::test]
async fn test_write_from_other_process_reaches_session() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let registry = Arc::new(SchemaRegistry::builtin());

    // Two stores over one directory stand in for two processes
    let local = Arc::new(FileLayoutStore::new(&root));
    let remote = FileLayoutStore::new(&root);
    let _watcher = local.watch().unwrap();

    let service = Arc::new(StudioService::open(local.clone(), registry.clone(), "acme").await.unwrap());
    let follow = service.clone().follow_changes();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut remote_doc = storefront_editor::starter_layout(registry, "acme").unwrap();
    let mut composer = storefront_editor::Composer::for_document(
        Arc::new(SchemaRegistry::builtin()),
        &remote_doc,
    );
    let id = composer
        .add_section(&mut remote_doc, types::NEWSLETTER, None)
        .unwrap()
        .created_id()
        .unwrap()
        .to_string();
    remote.save_document(&remote_doc).await.unwrap();

    let reloaded = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if service.snapshot().await.contains_id(&id) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;

    assert!(reloaded.is_ok(), "session never saw the remote save");
    assert_eq!(service.snapshot().await.version, 1);
    follow.abort();
}
