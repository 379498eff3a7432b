//! Type id → render procedure lookup.
//!
//! Each built-in section type registers one [`SectionRenderer`]. Anything
//! without an entry resolves to the table's default entry, which emits a
//! placeholder carrying the section's stored name.

use crate::context::{DataContext, Product};
use crate::sections;
use crate::vdom::VNode;
use std::collections::HashMap;
use storefront_schema::{types, PlacedSection};

/// Data available to one section render
pub struct RenderScope<'a> {
    pub ctx: &'a DataContext,

    /// Catalog in merchant display order
    pub products: Vec<&'a Product>,
}

impl<'a> RenderScope<'a> {
    pub fn new(ctx: &'a DataContext) -> Self {
        Self {
            ctx,
            products: ctx.ordered_products(),
        }
    }
}

/// Renders one section type.
///
/// Returning `None` hides the section entirely (its data came up empty).
pub trait SectionRenderer: Send + Sync {
    fn render(&self, section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode>;
}

impl<F> SectionRenderer for F
where
    F: Fn(&PlacedSection, &RenderScope<'_>) -> Option<VNode> + Send + Sync,
{
    fn render(&self, section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
        self(section, scope)
    }
}

/// The default entry: a neutral stand-in for unresolvable types
pub fn placeholder(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let label = if section.display_name.is_empty() {
        section.type_id.clone()
    } else {
        section.display_name.clone()
    };
    Some(VNode::placeholder(section.type_id.clone(), label))
}

pub struct RenderTable {
    entries: HashMap<String, Box<dyn SectionRenderer>>,
    default_entry: Box<dyn SectionRenderer>,
}

impl RenderTable {
    /// A table with only the placeholder default
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            default_entry: Box::new(placeholder),
        }
    }

    /// Renderers for every built-in section type
    pub fn builtin() -> Self {
        Self::empty()
            .register(types::ANNOUNCEMENT_BAR, sections::chrome::announcement_bar)
            .register(types::HEADER, sections::chrome::header)
            .register(types::FOOTER, sections::chrome::footer)
            .register(types::HERO, sections::hero::hero)
            .register(types::CATEGORY_GRID, sections::catalog::category_grid)
            .register(types::PRODUCT_GRID, sections::catalog::product_grid)
            .register(types::FLASH_SALE, sections::catalog::flash_sale)
            .register(types::TAGS_PRODUCTS, sections::catalog::tags_products)
            .register(types::BRAND_SHOWCASE, sections::catalog::brand_showcase)
            .register(types::RICH_TEXT, sections::content::rich_text)
            .register(types::IMAGE_WITH_TEXT, sections::content::image_with_text)
            .register(types::TESTIMONIALS, sections::content::testimonials)
            .register(types::NEWSLETTER, sections::content::newsletter)
    }

    pub fn register(mut self, type_id: impl Into<String>, renderer: impl SectionRenderer + 'static) -> Self {
        self.entries.insert(type_id.into(), Box::new(renderer));
        self
    }

    /// Replace the default entry
    pub fn with_default(mut self, renderer: impl SectionRenderer + 'static) -> Self {
        self.default_entry = Box::new(renderer);
        self
    }

    pub fn get(&self, type_id: &str) -> Option<&dyn SectionRenderer> {
        self.entries.get(type_id).map(|r| r.as_ref())
    }

    pub fn default_entry(&self) -> &dyn SectionRenderer {
        self.default_entry.as_ref()
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RenderTable {
    fn default() -> Self {
        Self::builtin()
    }
}
