//! Tests for longer mutation sequences
//!
//! This tests:
//! - Add + duplicate + remove chains
//! - Undo/redo sequences
//! - Batched mutations
//! - Document integrity after operations

use serde_json::json;
use std::sync::Arc;
use storefront_editor::{validate, Change, Composer, EditSession, Mutation, UndoStack};
use storefront_schema::{types, LayoutDocument, SchemaRegistry};

fn setup() -> (Composer, LayoutDocument, UndoStack) {
    let registry = Arc::new(SchemaRegistry::builtin());
    (
        Composer::new(registry, "acme"),
        LayoutDocument::new("acme"),
        UndoStack::new(),
    )
}

fn add(type_id: &str) -> Mutation {
    Mutation::AddSection {
        type_id: type_id.to_string(),
        preset_settings: None,
        display_name: None,
    }
}

#[test]
fn test_duplicate_then_remove_original_then_undo_all() {
    let (mut composer, mut doc, mut stack) = setup();

    let hero = stack.apply(&add(types::HERO), &mut composer, &mut doc).unwrap();
    let hero = hero.created_id().unwrap().to_string();
    stack
        .apply(
            &Mutation::AddBlock {
                section_id: hero.clone(),
                block_type: types::BLOCK_HEADING.to_string(),
            },
            &mut composer,
            &mut doc,
        )
        .unwrap();
    let after_setup = doc.clone();

    let copy = stack
        .apply(
            &Mutation::DuplicateSection {
                section_id: hero.clone(),
            },
            &mut composer,
            &mut doc,
        )
        .unwrap();
    let copy = copy.created_id().unwrap().to_string();
    stack
        .apply(
            &Mutation::RemoveSection {
                section_id: hero.clone(),
            },
            &mut composer,
            &mut doc,
        )
        .unwrap();

    assert_eq!(doc.section_ids(), vec![copy.as_str()]);
    assert_eq!(doc.block_count(), 1);

    stack.undo(&mut composer, &mut doc).unwrap();
    stack.undo(&mut composer, &mut doc).unwrap();
    assert_eq!(doc, after_setup);

    // Redo reproduces the same copy id
    stack.redo(&mut composer, &mut doc).unwrap();
    assert_eq!(doc.position(&copy), Some(1));
}

#[test]
fn test_settings_undo_restores_whole_map() {
    let (mut composer, mut doc, mut stack) = setup();
    let id = stack
        .apply(&add(types::NEWSLETTER), &mut composer, &mut doc)
        .unwrap()
        .created_id()
        .unwrap()
        .to_string();
    let defaults = doc.section(&id).unwrap().settings.clone();

    let replacement = match json!({ "heading": "Join us" }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    stack
        .apply(
            &Mutation::ReplaceSectionSettings {
                section_id: id.clone(),
                settings: replacement,
            },
            &mut composer,
            &mut doc,
        )
        .unwrap();
    assert_eq!(doc.section(&id).unwrap().settings.len(), 1);

    stack.undo(&mut composer, &mut doc).unwrap();
    assert_eq!(doc.section(&id).unwrap().settings, defaults);
}

#[test]
fn test_reorder_blocks_and_undo() {
    let (mut composer, mut doc, mut stack) = setup();
    let footer = stack
        .apply(&add(types::FOOTER), &mut composer, &mut doc)
        .unwrap()
        .created_id()
        .unwrap()
        .to_string();

    let mut block_ids = Vec::new();
    for block_type in [types::BLOCK_LINK, types::BLOCK_SOCIAL_LINK, types::BLOCK_TEXT] {
        let change = stack
            .apply(
                &Mutation::AddBlock {
                    section_id: footer.clone(),
                    block_type: block_type.to_string(),
                },
                &mut composer,
                &mut doc,
            )
            .unwrap();
        block_ids.push(change.created_id().unwrap().to_string());
    }

    stack
        .apply(
            &Mutation::ReorderBlocks {
                section_id: footer.clone(),
                from: 2,
                to: 0,
            },
            &mut composer,
            &mut doc,
        )
        .unwrap();

    let order = |doc: &LayoutDocument| -> Vec<String> {
        doc.section(&footer)
            .unwrap()
            .blocks
            .iter()
            .map(|b| b.id.clone())
            .collect()
    };
    assert_eq!(
        order(&doc),
        vec![block_ids[2].clone(), block_ids[0].clone(), block_ids[1].clone()]
    );

    stack.undo(&mut composer, &mut doc).unwrap();
    assert_eq!(order(&doc), block_ids);
}

#[test]
fn test_batched_page_scaffold_undoes_in_one_step() {
    let registry = Arc::new(SchemaRegistry::builtin());
    let mut session = EditSession::new(registry.clone(), LayoutDocument::new("acme"));

    let changes = session
        .apply_batch(
            "Scaffold",
            vec![
                add(types::FOOTER),
                add(types::HEADER),
                add(types::HERO),
                add(types::PRODUCT_GRID),
            ],
        )
        .unwrap();
    assert_eq!(changes.len(), 4);
    assert!(validate(session.document(), &registry).is_empty());

    assert!(session.undo().unwrap());
    assert!(session.document().is_empty());
    assert!(!session.undo().unwrap());
}

#[test]
fn test_batch_stops_at_unknown_type() {
    let registry = Arc::new(SchemaRegistry::builtin());
    let mut session = EditSession::new(registry, LayoutDocument::new("acme"));

    let result = session.apply_batch("Broken", vec![add(types::HERO), add("mystery"), add(types::FOOTER)]);

    assert!(result.is_err());
    assert_eq!(session.document().len(), 1);
    // The part that did apply is still one undo step
    assert_eq!(session.undo_stack().undo_levels(), 1);
}

#[test]
fn test_reorder_blocks_out_of_range_is_noop() {
    let (mut composer, mut doc, _) = setup();
    let footer = composer
        .add_section(&mut doc, types::FOOTER, None)
        .unwrap()
        .created_id()
        .unwrap()
        .to_string();
    composer.add_block(&mut doc, &footer, types::BLOCK_LINK);
    composer.add_block(&mut doc, &footer, types::BLOCK_TEXT);
    let before = doc.clone();

    assert_eq!(composer.reorder_blocks(&mut doc, &footer, 0, 5), Change::Unchanged);
    assert_eq!(composer.reorder_blocks(&mut doc, "missing", 0, 1), Change::Unchanged);
    assert_eq!(doc, before);

    assert_eq!(composer.reorder_blocks(&mut doc, &footer, 1, 0), Change::Updated);
    assert_ne!(doc, before);
}
