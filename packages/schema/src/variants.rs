//! # Section Variants
//!
//! Named, pre-filled section configurations offered in the "add section"
//! library. A variant has no lifecycle of its own: the composer turns it into
//! a fresh placed section and forgets it.

use crate::registry::{SchemaRegistry, SectionCategory};
use crate::settings::Settings;
use crate::types;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// A preset section configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionVariant {
    pub variant_id: String,
    pub display_name: String,
    pub description: String,
    pub target_type_id: String,
    /// Category of the target type, resolved when the catalog is built
    pub category: SectionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub preset_settings: Settings,
}

impl SectionVariant {
    pub fn new(
        variant_id: impl Into<String>,
        display_name: impl Into<String>,
        target_type_id: impl Into<String>,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            display_name: display_name.into(),
            description: String::new(),
            target_type_id: target_type_id.into(),
            category: SectionCategory::Body,
            thumbnail: None,
            preset_settings: Settings::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Preset settings from a JSON object literal; other values are ignored
    pub fn with_preset(mut self, preset: Value) -> Self {
        if let Value::Object(map) = preset {
            self.preset_settings = map;
        }
        self
    }

    fn matches(&self, needle: &str) -> bool {
        self.display_name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Static, ordered catalog of variants
#[derive(Debug, Clone, Default)]
pub struct VariantCatalog {
    variants: Vec<SectionVariant>,
}

impl VariantCatalog {
    /// Build a catalog, resolving each variant's category against `registry`.
    ///
    /// Variants targeting a type the registry does not know are left out.
    pub fn new(registry: &SchemaRegistry, variants: impl IntoIterator<Item = SectionVariant>) -> Self {
        let variants = variants
            .into_iter()
            .filter_map(|mut variant| match registry.lookup_section(&variant.target_type_id) {
                Some(def) => {
                    variant.category = def.category;
                    Some(variant)
                }
                None => {
                    warn!(
                        variant_id = %variant.variant_id,
                        target = %variant.target_type_id,
                        "Skipping variant for unregistered section type"
                    );
                    None
                }
            })
            .collect();

        Self { variants }
    }

    /// Variants in catalog order, optionally restricted to one category
    pub fn list(&self, category: Option<SectionCategory>) -> Vec<&SectionVariant> {
        self.variants
            .iter()
            .filter(|v| category.map_or(true, |c| v.category == c))
            .collect()
    }

    /// Case-insensitive substring search over name and description
    pub fn filter(&self, query: &str) -> Vec<&SectionVariant> {
        let needle = query.trim().to_lowercase();
        self.variants
            .iter()
            .filter(|v| needle.is_empty() || v.matches(&needle))
            .collect()
    }

    pub fn get(&self, variant_id: &str) -> Option<&SectionVariant> {
        self.variants.iter().find(|v| v.variant_id == variant_id)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn builtin(registry: &SchemaRegistry) -> Self {
        Self::new(registry, builtin_variants())
    }
}

fn builtin_variants() -> Vec<SectionVariant> {
    vec![
        SectionVariant::new("promo-announcement", "Promo Announcement", types::ANNOUNCEMENT_BAR)
            .with_description("Bold strip for a store-wide promotion")
            .with_preset(json!({
                "text": "Summer sale: 20% off everything",
                "backgroundColor": "#dc2626"
            })),
        SectionVariant::new("classic-header", "Classic Header", types::HEADER)
            .with_description("Logo on the left, menu and cart on the right")
            .with_thumbnail("/thumbnails/classic-header.svg")
            .with_preset(json!({ "menuAlignment": "left", "sticky": true })),
        SectionVariant::new("centered-header", "Centered Logo Header", types::HEADER)
            .with_description("Centered logo with the menu underneath")
            .with_thumbnail("/thumbnails/centered-header.svg")
            .with_preset(json!({ "menuAlignment": "center" })),
        SectionVariant::new("minimal-header", "Minimal Header", types::HEADER)
            .with_description("Just the logo and the cart, no search")
            .with_preset(json!({ "showSearch": false, "showCategories": false })),
        SectionVariant::new("full-width-hero", "Full-width Hero", types::HERO)
            .with_description("Edge-to-edge background image with a centered call to action")
            .with_thumbnail("/thumbnails/full-width-hero.svg")
            .with_preset(json!({ "height": "full", "textAlignment": "center", "overlayOpacity": 50 })),
        SectionVariant::new("split-hero", "Split Hero", types::HERO)
            .with_description("Left-aligned text over a medium banner")
            .with_preset(json!({ "height": "medium", "textAlignment": "left" })),
        SectionVariant::new("minimal-hero", "Minimal Hero", types::HERO)
            .with_description("Short banner without overlay")
            .with_preset(json!({ "height": "small", "overlayOpacity": 0 })),
        SectionVariant::new("shop-by-category", "Shop by Category", types::CATEGORY_GRID)
            .with_description("Category tiles in a three column grid")
            .with_preset(json!({ "columns": 3, "categoriesToShow": 6 })),
        SectionVariant::new("featured-products", "Featured Products", types::PRODUCT_GRID)
            .with_description("Hand-picked featured products")
            .with_thumbnail("/thumbnails/featured-products.svg")
            .with_preset(json!({ "title": "Featured products", "filterType": "featured" })),
        SectionVariant::new("best-sellers", "Best Sellers", types::PRODUCT_GRID)
            .with_description("Your most popular products")
            .with_preset(json!({ "title": "Best sellers", "filterType": "bestseller" })),
        SectionVariant::new("new-arrivals", "New Arrivals", types::PRODUCT_GRID)
            .with_description("The latest additions to your catalog")
            .with_preset(json!({ "title": "New arrivals", "filterType": "new", "productsToShow": 4 })),
        SectionVariant::new("flash-sale-countdown", "Flash Sale Countdown", types::FLASH_SALE)
            .with_description("Sale products with a live countdown timer")
            .with_preset(json!({ "title": "Flash sale", "showCountdown": true })),
        SectionVariant::new("trending-tag", "Trending Tag", types::TAGS_PRODUCTS)
            .with_description("Products tagged as trending")
            .with_preset(json!({ "title": "Trending now", "tagName": "trending" })),
        SectionVariant::new("brand-wall", "Brand Wall", types::BRAND_SHOWCASE)
            .with_description("Grayscale grid of brand logos")
            .with_preset(json!({ "grayscale": true })),
        SectionVariant::new("store-story", "Store Story", types::RICH_TEXT)
            .with_description("Tell customers who you are")
            .with_preset(json!({ "heading": "Our story", "alignment": "center" })),
        SectionVariant::new("image-left", "Image Left", types::IMAGE_WITH_TEXT)
            .with_description("Image on the left, text on the right")
            .with_preset(json!({ "imagePosition": "left" })),
        SectionVariant::new("image-right", "Image Right", types::IMAGE_WITH_TEXT)
            .with_description("Text on the left, image on the right")
            .with_preset(json!({ "imagePosition": "right" })),
        SectionVariant::new("customer-reviews", "Customer Reviews", types::TESTIMONIALS)
            .with_description("Quotes from happy customers")
            .with_preset(json!({ "title": "Loved by customers", "columns": 3 })),
        SectionVariant::new("newsletter-signup", "Newsletter Signup", types::NEWSLETTER)
            .with_description("Collect email addresses for marketing")
            .with_preset(json!({ "heading": "Join our newsletter" })),
        SectionVariant::new("classic-footer", "Classic Footer", types::FOOTER)
            .with_description("Category links, social profiles and payment icons")
            .with_thumbnail("/thumbnails/classic-footer.svg")
            .with_preset(json!({ "showCategories": true, "showSocialLinks": true })),
        SectionVariant::new("minimal-footer", "Minimal Footer", types::FOOTER)
            .with_description("Copyright line only")
            .with_preset(json!({
                "showCategories": false,
                "showSocialLinks": false,
                "showPaymentIcons": false
            })),
    ]
}
