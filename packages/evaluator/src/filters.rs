//! Candidate selection for product-driven sections.
//!
//! All filters take the catalog already in display order and preserve it.

use crate::context::Product;
use chrono::{DateTime, Utc};
use storefront_schema::settings::ProductFilter;

/// Apply a grid's `filterType`, then its optional category restriction
pub fn filter_products<'a>(
    products: &[&'a Product],
    filter: ProductFilter,
    category_id: Option<&str>,
) -> Vec<&'a Product> {
    let category_id = category_id.map(str::trim).filter(|id| !id.is_empty());
    products
        .iter()
        .copied()
        .filter(|p| match filter {
            ProductFilter::All => true,
            ProductFilter::Featured => p.is_featured,
            ProductFilter::Bestseller => p.is_bestseller,
            ProductFilter::New => p.is_new,
        })
        .filter(|p| match category_id {
            Some(id) => p.category_id.as_deref() == Some(id),
            None => true,
        })
        .collect()
}

/// Products flagged on sale, or carrying `sale_tag`
pub fn sale_products<'a>(products: &[&'a Product], sale_tag: &str) -> Vec<&'a Product> {
    let sale_tag = sale_tag.trim();
    products
        .iter()
        .copied()
        .filter(|p| p.on_sale || (!sale_tag.is_empty() && p.has_tag(sale_tag)))
        .collect()
}

/// Products carrying `tag` (case-insensitive exact); nothing for a blank tag
pub fn tagged_products<'a>(products: &[&'a Product], tag: &str) -> Vec<&'a Product> {
    if tag.trim().is_empty() {
        return Vec::new();
    }
    products.iter().copied().filter(|p| p.has_tag(tag)).collect()
}

/// `start <= now <= end`, where a missing bound is open
pub fn window_active(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    start.map_or(true, |start| start <= now) && end.map_or(true, |end| now <= end)
}
