//! Data-driven sections. Each one hides itself when its candidate list
//! comes up empty.

use super::{content_block, grid, heading, image, paragraph, product_card, section_shell, typed_blocks, CardOptions};
use crate::context::Product;
use crate::dispatch::RenderScope;
use crate::filters::{filter_products, sale_products, tagged_products, window_active};
use crate::vdom::VNode;
use storefront_schema::settings::{
    BrandShowcaseSettings, CategoryGridSettings, FlashSaleSettings, ProductGridSettings, TagsProductsSettings,
};
use storefront_schema::{read_lenient, BlockSettings, PlacedSection};
use tracing::{debug, warn};

fn product_list(products: &[&Product], limit: usize, columns: u8, options: CardOptions, currency: &str) -> VNode {
    grid(columns, "sf-product-grid").with_children(
        products
            .iter()
            .take(limit)
            .map(|product| product_card(product, options, currency)),
    )
}

/// Heading blocks above the grid, and the price block's display options
fn grid_blocks(section: &PlacedSection, options: &mut CardOptions) -> Vec<VNode> {
    let mut nodes = Vec::new();
    for (block, typed) in typed_blocks(section) {
        match &typed {
            BlockSettings::Price(price) => options.show_compare_at = price.show_compare_at,
            _ => nodes.extend(content_block(block, &typed)),
        }
    }
    nodes
}

pub fn category_grid(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: CategoryGridSettings = read_lenient(&section.settings);
    let categories = &scope.ctx.categories;
    if categories.is_empty() || settings.categories_to_show == 0 {
        return None;
    }

    let cards = categories.iter().take(settings.categories_to_show).map(|category| {
        let mut card = VNode::element("a")
            .with_class("sf-category-card")
            .with_attr("href", category.url())
            .with_key(category.id.clone());
        if let Some(src) = category.image.as_deref() {
            card = card.with_optional_child(image(src, &category.name, "sf-category-card__image"));
        }
        card = card.with_child(
            VNode::element("span")
                .with_class("sf-category-card__name")
                .with_child(VNode::text(category.name.clone())),
        );
        if settings.show_product_count {
            card = card.with_child(
                VNode::element("span")
                    .with_class("sf-category-card__count")
                    .with_child(VNode::text(format!("{} products", category.product_count))),
            );
        }
        card
    });

    Some(
        section_shell(section, "section")
            .with_optional_child(heading(2, &settings.title, "sf-section__title"))
            .with_child(grid(settings.columns, "sf-category-grid").with_children(cards)),
    )
}

pub fn product_grid(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: ProductGridSettings = read_lenient(&section.settings);
    let candidates = filter_products(&scope.products, settings.filter_type, settings.category_id.as_deref());
    if candidates.is_empty() || settings.products_to_show == 0 {
        debug!(section_id = %section.id, "Hiding product grid with no matching products");
        return None;
    }

    let mut options = CardOptions {
        show_price: settings.show_price,
        show_add_to_cart: settings.show_add_to_cart,
        ..CardOptions::default()
    };
    let blocks = grid_blocks(section, &mut options);

    Some(
        section_shell(section, "section")
            .with_optional_child(heading(2, &settings.title, "sf-section__title"))
            .with_children(blocks)
            .with_child(product_list(
                &candidates,
                settings.products_to_show,
                settings.columns,
                options,
                &scope.ctx.currency,
            )),
    )
}

pub fn flash_sale(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: FlashSaleSettings = read_lenient(&section.settings);
    if settings.start_date.is_invalid() || settings.end_date.is_invalid() {
        warn!(section_id = %section.id, "Unreadable flash sale date, hiding section");
        return None;
    }
    if !window_active(settings.start_date.as_start(), settings.end_date.as_end(), scope.ctx.now) {
        debug!(section_id = %section.id, "Flash sale window not active");
        return None;
    }

    let candidates = sale_products(&scope.products, &settings.sale_tag);
    if candidates.is_empty() || settings.products_to_show == 0 {
        return None;
    }

    let mut options = CardOptions::default();
    let blocks = grid_blocks(section, &mut options);

    let mut shell = section_shell(section, "section")
        .with_optional_child(heading(2, &settings.title, "sf-section__title"))
        .with_optional_child(paragraph(&settings.subtitle, "sf-section__subtitle"));

    // The ticking itself is client-side; only the deadline is rendered.
    if let Some(end) = settings.end_date.as_end().filter(|_| settings.show_countdown) {
        shell = shell.with_child(
            VNode::element("div")
                .with_class("sf-countdown")
                .with_attr("data-countdown-end", end.to_rfc3339()),
        );
    }

    Some(
        shell
            .with_children(blocks)
            .with_child(product_list(&candidates, settings.products_to_show, 4, options, &scope.ctx.currency)),
    )
}

pub fn tags_products(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: TagsProductsSettings = read_lenient(&section.settings);
    let candidates = tagged_products(&scope.products, &settings.tag_name);
    if candidates.is_empty() || settings.products_to_show == 0 {
        return None;
    }

    let title = if settings.title.trim().is_empty() {
        settings.tag_name.trim().to_string()
    } else {
        settings.title.clone()
    };

    let mut options = CardOptions::default();
    let blocks = grid_blocks(section, &mut options);

    Some(
        section_shell(section, "section")
            .with_attr("data-tag", settings.tag_name.trim())
            .with_optional_child(heading(2, &title, "sf-section__title"))
            .with_children(blocks)
            .with_child(product_list(&candidates, settings.products_to_show, 4, options, &scope.ctx.currency)),
    )
}

pub fn brand_showcase(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: BrandShowcaseSettings = read_lenient(&section.settings);
    let brands = &scope.ctx.brands;
    if brands.is_empty() || settings.brands_to_show == 0 {
        return None;
    }

    let logos = brands.iter().take(settings.brands_to_show).map(|brand| {
        let inner = match brand.logo.as_deref().and_then(|src| image(src, &brand.name, "sf-brand__logo")) {
            Some(logo) => logo,
            None => VNode::element("span")
                .with_class("sf-brand__name")
                .with_child(VNode::text(brand.name.clone())),
        };
        VNode::element("div")
            .with_class("sf-brand")
            .with_key(brand.id.clone())
            .with_child(inner)
    });

    // Image blocks add merchant-supplied logos after the catalog brands.
    let extra = typed_blocks(section).filter_map(|(block, typed)| match &typed {
        BlockSettings::Image(_) => content_block(block, &typed),
        _ => None,
    });

    let mut wall = VNode::element("div")
        .with_class("sf-brand-wall")
        .with_children(logos)
        .with_children(extra);
    if settings.grayscale {
        wall = wall.with_style("filter", "grayscale(100%)");
    }

    Some(
        section_shell(section, "section")
            .with_optional_child(heading(2, &settings.title, "sf-section__title"))
            .with_child(wall),
    )
}
