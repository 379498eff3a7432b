//! Property tests for section placement and reordering

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_editor::Composer;
use storefront_schema::{LayoutDocument, SchemaRegistry, SectionCategory};

fn registered_types() -> Vec<String> {
    SchemaRegistry::builtin()
        .sections()
        .iter()
        .map(|s| s.type_id.clone())
        .collect()
}

fn build(type_ids: &[String]) -> (LayoutDocument, Arc<SchemaRegistry>, Vec<String>) {
    let registry = Arc::new(SchemaRegistry::builtin());
    let mut composer = Composer::new(registry.clone(), "acme");
    let mut doc = LayoutDocument::new("acme");
    let mut created = Vec::new();
    for type_id in type_ids {
        let change = composer.add_section(&mut doc, type_id, None).unwrap();
        created.push(change.created_id().unwrap().to_string());
    }
    (doc, registry, created)
}

proptest! {
    #[test]
    fn headers_lead_and_footers_trail(picks in prop::collection::vec(0usize..13, 0..30)) {
        let types = registered_types();
        let chosen: Vec<String> = picks.iter().map(|i| types[i % types.len()].clone()).collect();
        let (doc, registry, created) = build(&chosen);

        let categories: Vec<SectionCategory> = doc
            .sections
            .iter()
            .map(|s| registry.category_of(&s.type_id))
            .collect();
        let rank = |c: &SectionCategory| match c {
            SectionCategory::Header => 0,
            SectionCategory::Body => 1,
            SectionCategory::Footer => 2,
        };
        prop_assert!(categories.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));

        // Within each category, document order == insertion order
        let position: HashMap<&str, usize> = created
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        for category in [SectionCategory::Header, SectionCategory::Body, SectionCategory::Footer] {
            let order: Vec<usize> = doc
                .sections
                .iter()
                .filter(|s| registry.category_of(&s.type_id) == category)
                .map(|s| position[s.id.as_str()])
                .collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn reorder_preserves_the_section_set(
        picks in prop::collection::vec(0usize..13, 1..15),
        from_seed in any::<usize>(),
        to_seed in any::<usize>(),
    ) {
        let types = registered_types();
        let chosen: Vec<String> = picks.iter().map(|i| types[i % types.len()].clone()).collect();
        let (mut doc, registry, _) = build(&chosen);
        let mut composer = Composer::for_document(registry, &doc);

        let len = doc.len();
        let (from, to) = (from_seed % len, to_seed % len);
        let mut before: Vec<String> = doc.section_ids().into_iter().map(String::from).collect();

        composer.reorder_sections(&mut doc, from, to);

        let mut after: Vec<String> = doc.section_ids().into_iter().map(String::from).collect();
        prop_assert_eq!(after.len(), len);
        prop_assert_eq!(&after[to], &before[from]);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn remove_section_drops_all_its_blocks(
        picks in prop::collection::vec((0usize..13, 0usize..6), 1..12),
        victim_seed in any::<usize>(),
    ) {
        let types = registered_types();
        let registry = Arc::new(SchemaRegistry::builtin());
        let mut composer = Composer::new(registry.clone(), "acme");
        let mut doc = LayoutDocument::new("acme");

        for (pick, block_count) in &picks {
            let type_id = &types[pick % types.len()];
            let section_id = composer
                .add_section(&mut doc, type_id, None)
                .unwrap()
                .created_id()
                .unwrap()
                .to_string();
            let allowed = registry.lookup_section(type_id).unwrap().allowed_block_types.clone();
            for i in 0..*block_count {
                if let Some(block_type) = allowed.get(i % allowed.len().max(1)) {
                    composer.add_block(&mut doc, &section_id, block_type);
                }
            }
        }

        let victim = doc.sections[victim_seed % doc.len()].clone();
        let block_ids = |doc: &LayoutDocument, skip: &str| -> Vec<String> {
            doc.sections
                .iter()
                .filter(|s| s.id != skip)
                .flat_map(|s| s.blocks.iter().map(|b| b.id.clone()))
                .collect()
        };
        let survivors = block_ids(&doc, &victim.id);

        composer.remove_section(&mut doc, &victim.id);

        prop_assert!(!doc.contains_id(&victim.id));
        for block in &victim.blocks {
            prop_assert!(!doc.contains_id(&block.id));
        }
        prop_assert_eq!(block_ids(&doc, ""), survivors);
    }
}
