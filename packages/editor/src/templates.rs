//! Starter layouts.

use crate::{Composer, MutationError};
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_schema::{types, LayoutDocument, SchemaRegistry, Settings};

fn preset(value: Value) -> Option<Settings> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// The default storefront: announcement bar, header, hero, a featured
/// product grid and a footer.
///
/// Used as the fallback a tenant sees before saving anything, and by
/// `storefront new --starter`.
pub fn starter_layout(registry: Arc<SchemaRegistry>, tenant_id: &str) -> Result<LayoutDocument, MutationError> {
    let mut doc = LayoutDocument::new(tenant_id);
    let mut composer = Composer::new(registry, tenant_id);

    composer.add_section(&mut doc, types::ANNOUNCEMENT_BAR, None)?;
    composer.add_section(&mut doc, types::HEADER, None)?;

    let hero = composer.add_section(&mut doc, types::HERO, None)?;
    if let Some(hero_id) = hero.created_id() {
        composer.add_block(&mut doc, hero_id, types::BLOCK_SLIDE);
    }

    composer.add_section(
        &mut doc,
        types::PRODUCT_GRID,
        preset(json!({ "title": "Featured products", "filterType": "featured" })).as_ref(),
    )?;

    let footer = composer.add_section(&mut doc, types::FOOTER, None)?;
    if let Some(footer_id) = footer.created_id() {
        composer.add_block(&mut doc, footer_id, types::BLOCK_LINK);
        composer.add_block(&mut doc, footer_id, types::BLOCK_SOCIAL_LINK);
    }

    Ok(doc)
}
