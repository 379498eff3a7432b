//! Built-in section renderers.
//!
//! Every renderer reads its settings through the typed view for its type,
//! so missing or malformed keys fall back to defaults instead of failing.
//! Blocks are read the same way; a block type a renderer does not handle is
//! skipped.

pub mod catalog;
pub mod chrome;
pub mod content;
pub mod hero;

use crate::context::Product;
use crate::vdom::VNode;
use storefront_schema::settings::ButtonStyle;
use storefront_schema::{BlockSettings, PlacedBlock, PlacedSection};
use tracing::debug;

/// Outer element shared by every section
pub(crate) fn section_shell(section: &PlacedSection, tag: &str) -> VNode {
    VNode::element(tag)
        .with_class(format!("sf-section sf-{}", section.type_id))
        .with_attr("data-section-id", section.id.clone())
        .with_attr("data-section-type", section.type_id.clone())
        .with_key(section.id.clone())
}

/// `<h{level}>`, or nothing for blank text
pub(crate) fn heading(level: u8, text: &str, class: &str) -> Option<VNode> {
    if text.trim().is_empty() {
        return None;
    }
    let level = level.clamp(1, 6);
    Some(VNode::element(format!("h{level}")).with_class(class).with_child(VNode::text(text)))
}

pub(crate) fn paragraph(text: &str, class: &str) -> Option<VNode> {
    if text.trim().is_empty() {
        return None;
    }
    Some(VNode::element("p").with_class(class).with_child(VNode::text(text)))
}

pub(crate) fn link_button(label: &str, url: &str, style: ButtonStyle) -> Option<VNode> {
    if label.trim().is_empty() {
        return None;
    }
    let href = if url.is_empty() { "#" } else { url };
    Some(
        VNode::element("a")
            .with_class(format!("sf-button sf-button--{}", style.as_str()))
            .with_attr("href", href)
            .with_child(VNode::text(label)),
    )
}

pub(crate) fn image(src: &str, alt: &str, class: &str) -> Option<VNode> {
    if src.trim().is_empty() {
        return None;
    }
    Some(
        VNode::element("img")
            .with_class(class)
            .with_attr("src", src)
            .with_attr("alt", alt)
            .with_attr("loading", "lazy"),
    )
}

/// Typed view of every block in order
pub(crate) fn typed_blocks(section: &PlacedSection) -> impl Iterator<Item = (&PlacedBlock, BlockSettings)> {
    section
        .blocks
        .iter()
        .map(|block| (block, BlockSettings::read(&block.type_id, &block.settings)))
}

/// Render a generic content block (heading, text, button, image)
pub(crate) fn content_block(block: &PlacedBlock, settings: &BlockSettings) -> Option<VNode> {
    let node = match settings {
        BlockSettings::Heading(s) => heading(s.level, &s.text, "sf-block-heading"),
        BlockSettings::Text(s) => paragraph(&s.content, "sf-block-text"),
        BlockSettings::Button(s) => link_button(&s.label, &s.url, s.style),
        BlockSettings::Image(s) => image(&s.src, &s.alt, "sf-block-image").map(|img| {
            if s.link.is_empty() {
                img
            } else {
                VNode::element("a").with_attr("href", s.link.clone()).with_child(img)
            }
        }),
        _ => {
            debug!(block_type = %block.type_id, "Skipping block type in content position");
            None
        }
    };
    node.map(|node| node.with_key(block.id.clone()))
}

/// Money with the store currency prefix
pub(crate) fn format_price(amount: f64, currency: &str) -> String {
    format!("{currency}{amount:.2}")
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CardOptions {
    pub show_price: bool,
    pub show_compare_at: bool,
    pub show_add_to_cart: bool,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            show_price: true,
            show_compare_at: true,
            show_add_to_cart: false,
        }
    }
}

pub(crate) fn product_card(product: &Product, options: CardOptions, currency: &str) -> VNode {
    let mut card = VNode::element("article")
        .with_class("sf-product-card")
        .with_attr("data-product-id", product.id.clone())
        .with_key(product.id.clone());

    if let Some(src) = product.image.as_deref() {
        card = card.with_optional_child(image(src, &product.name, "sf-product-card__image"));
    }

    card = card.with_child(
        VNode::element("a")
            .with_class("sf-product-card__name")
            .with_attr("href", product.url())
            .with_child(VNode::text(product.name.clone())),
    );

    if options.show_price {
        let mut price = VNode::element("div").with_class("sf-product-card__price").with_child(
            VNode::element("span")
                .with_class("sf-price")
                .with_child(VNode::text(format_price(product.price, currency))),
        );
        if let Some(compare_at) = product.compare_at_price.filter(|c| options.show_compare_at && *c > product.price) {
            price = price.with_child(
                VNode::element("s")
                    .with_class("sf-price sf-price--compare")
                    .with_child(VNode::text(format_price(compare_at, currency))),
            );
        }
        card = card.with_child(price);
    }

    if options.show_add_to_cart {
        card = card.with_child(
            VNode::element("button")
                .with_class("sf-button sf-button--primary")
                .with_attr("type", "button")
                .with_attr("data-add-to-cart", product.id.clone())
                .with_child(VNode::text("Add to cart")),
        );
    }

    card
}

/// Responsive grid container
pub(crate) fn grid(columns: u8, class: &str) -> VNode {
    VNode::element("div")
        .with_class(class)
        .with_style("display", "grid")
        .with_style("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", columns.clamp(1, 6)))
        .with_style("gap", "1rem")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_is_clamped() {
        assert_eq!(heading(9, "Hi", "h").unwrap().tag(), Some("h6"));
        assert_eq!(heading(0, "Hi", "h").unwrap().tag(), Some("h1"));
        assert!(heading(2, "   ", "h").is_none());
    }

    #[test]
    fn test_product_card_compare_at_only_when_higher() {
        let product = Product {
            id: "p1".to_string(),
            name: "Tee".to_string(),
            price: 10.0,
            compare_at_price: Some(8.0),
            ..Product::default()
        };

        let card = product_card(&product, CardOptions::default(), "$");
        assert_eq!(card.text_content(), "Tee$10.00");

        let discounted = Product {
            compare_at_price: Some(15.0),
            ..product
        };
        let card = product_card(&discounted, CardOptions::default(), "€");
        assert_eq!(card.text_content(), "Tee€10.00€15.00");
    }
}
