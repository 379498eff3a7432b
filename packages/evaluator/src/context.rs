//! Store data handed to section renderers.
//!
//! Everything a render depends on besides the layout itself lives here,
//! including the clock: `now` is part of the snapshot, so flash-sale
//! windows evaluate the same way every time the same context is rendered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use storefront_schema::StudioConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub image: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub is_bestseller: bool,
    pub is_new: bool,
    pub on_sale: bool,
}

impl Product {
    /// Case-insensitive exact tag match
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }

    pub fn url(&self) -> String {
        let handle = if self.slug.is_empty() { &self.id } else { &self.slug };
        format!("/products/{handle}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub product_count: usize,
}

impl Category {
    pub fn url(&self) -> String {
        let handle = if self.slug.is_empty() { &self.id } else { &self.slug };
        format!("/categories/{handle}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
}

/// Snapshot of live catalog data for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataContext {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub tags: Vec<String>,

    /// Theme tokens (`primaryColor` → `#2563eb`), emitted as CSS custom
    /// properties by the HTML compiler
    pub theme: BTreeMap<String, String>,

    pub currency: String,

    pub now: DateTime<Utc>,

    /// Product ids to show first, in this order
    pub product_display_order: Vec<String>,
}

impl Default for DataContext {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            brands: Vec::new(),
            tags: Vec::new(),
            theme: BTreeMap::new(),
            currency: "$".to_string(),
            now: DateTime::<Utc>::default(),
            product_display_order: Vec::new(),
        }
    }
}

impl DataContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_brands(mut self, brands: Vec<Brand>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_theme_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.theme.insert(name.into(), value.into());
        self
    }

    /// Apply the merchant's studio configuration
    pub fn with_studio_config(mut self, config: &StudioConfig) -> Self {
        self.product_display_order = config.product_display_order.clone();
        self
    }

    /// Catalog in display order: listed ids first (in listed order), then
    /// everything else in catalog order
    pub fn ordered_products(&self) -> Vec<&Product> {
        if self.product_display_order.is_empty() {
            return self.products.iter().collect();
        }

        let rank: HashMap<&str, usize> = self
            .product_display_order
            .iter()
            .enumerate()
            .rev()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut products: Vec<&Product> = self.products.iter().collect();
        // Stable sort keeps catalog order among unlisted products.
        products.sort_by_key(|p| rank.get(p.id.as_str()).copied().unwrap_or(usize::MAX));
        products
    }

    pub fn brand(&self, brand_id: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == brand_id)
    }
}
