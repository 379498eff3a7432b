//! Page chrome: announcement bar, header, footer.

use super::{image, section_shell, typed_blocks};
use crate::dispatch::RenderScope;
use crate::vdom::VNode;
use chrono::Datelike;
use storefront_schema::settings::{AnnouncementBarSettings, FooterSettings, HeaderSettings};
use storefront_schema::{read_lenient, BlockSettings, PlacedSection};

pub fn announcement_bar(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: AnnouncementBarSettings = read_lenient(&section.settings);
    if settings.text.trim().is_empty() {
        return None;
    }

    let text = VNode::text(settings.text.clone());
    let body = if settings.link.is_empty() {
        VNode::element("p").with_child(text)
    } else {
        VNode::element("a").with_attr("href", settings.link.clone()).with_child(text)
    };

    Some(
        section_shell(section, "div")
            .with_attr("role", "region")
            .with_style("background-color", settings.background_color)
            .with_style("color", settings.text_color)
            .with_style("text-align", "center")
            .with_child(body),
    )
}

pub fn header(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: HeaderSettings = read_lenient(&section.settings);

    let brand = match image(&settings.logo_url, &settings.store_name, "sf-header__logo") {
        Some(logo) => logo,
        None => VNode::element("span")
            .with_class("sf-header__store-name")
            .with_child(VNode::text(settings.store_name.clone())),
    };

    let mut nav = VNode::element("nav")
        .with_class("sf-header__nav")
        .with_style("justify-content", settings.menu_alignment.as_str());

    if settings.show_categories {
        nav = nav.with_children(scope.ctx.categories.iter().map(|category| {
            VNode::element("a")
                .with_attr("href", category.url())
                .with_key(category.id.clone())
                .with_child(VNode::text(category.name.clone()))
        }));
    }

    nav = nav.with_children(typed_blocks(section).filter_map(|(block, typed)| match typed {
        BlockSettings::Link(link) => Some(
            VNode::element("a")
                .with_attr("href", link.url)
                .with_key(block.id.clone())
                .with_child(VNode::text(link.label)),
        ),
        _ => None,
    }));

    let mut actions = VNode::element("div").with_class("sf-header__actions");
    if settings.show_search {
        actions = actions.with_child(
            VNode::element("a")
                .with_attr("href", "/search")
                .with_attr("aria-label", "Search")
                .with_class("sf-icon sf-icon--search"),
        );
    }
    if settings.show_cart {
        actions = actions.with_child(
            VNode::element("a")
                .with_attr("href", "/cart")
                .with_attr("aria-label", "Cart")
                .with_class("sf-icon sf-icon--cart"),
        );
    }

    let mut shell = section_shell(section, "header");
    if settings.sticky {
        shell = shell.with_style("position", "sticky").with_style("top", "0");
    }

    Some(
        shell
            .with_child(VNode::element("a").with_attr("href", "/").with_child(brand))
            .with_child(nav)
            .with_child(actions),
    )
}

pub fn footer(section: &PlacedSection, scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: FooterSettings = read_lenient(&section.settings);

    let mut columns = VNode::element("div").with_class("sf-footer__columns").with_child(
        VNode::element("div")
            .with_class("sf-footer__store")
            .with_child(VNode::element("strong").with_child(VNode::text(settings.store_name.clone()))),
    );

    if settings.show_categories && !scope.ctx.categories.is_empty() {
        columns = columns.with_child(
            VNode::element("ul").with_class("sf-footer__categories").with_children(
                scope.ctx.categories.iter().map(|category| {
                    VNode::element("li").with_key(category.id.clone()).with_child(
                        VNode::element("a")
                            .with_attr("href", category.url())
                            .with_child(VNode::text(category.name.clone())),
                    )
                }),
            ),
        );
    }

    let mut links = Vec::new();
    let mut socials = Vec::new();
    let mut texts = Vec::new();
    for (block, typed) in typed_blocks(section) {
        match typed {
            BlockSettings::Link(link) => links.push(
                VNode::element("li").with_key(block.id.clone()).with_child(
                    VNode::element("a")
                        .with_attr("href", link.url)
                        .with_child(VNode::text(link.label)),
                ),
            ),
            BlockSettings::SocialLink(social) if !social.url.is_empty() => socials.push(
                VNode::element("a")
                    .with_class(format!("sf-social sf-social--{}", social.platform))
                    .with_attr("href", social.url)
                    .with_attr("aria-label", social.platform.clone())
                    .with_attr("rel", "noopener")
                    .with_key(block.id.clone()),
            ),
            BlockSettings::Text(text) if !text.content.trim().is_empty() => texts.push(
                VNode::element("p")
                    .with_key(block.id.clone())
                    .with_child(VNode::text(text.content)),
            ),
            _ => {}
        }
    }

    if !links.is_empty() {
        columns = columns.with_child(VNode::element("ul").with_class("sf-footer__links").with_children(links));
    }
    columns = columns.with_children(texts);

    let mut shell = section_shell(section, "footer")
        .with_style("background-color", settings.background_color.clone())
        .with_child(columns);

    if settings.show_social_links && !socials.is_empty() {
        shell = shell.with_child(VNode::element("div").with_class("sf-footer__social").with_children(socials));
    }

    if settings.show_payment_icons {
        shell = shell.with_child(
            VNode::element("div")
                .with_class("sf-footer__payments")
                .with_children(["visa", "mastercard", "paypal"].into_iter().map(|method| {
                    VNode::element("span")
                        .with_class(format!("sf-payment sf-payment--{method}"))
                        .with_attr("aria-label", method)
                })),
        );
    }

    let year = scope.ctx.now.year();
    let copyright = format!("© {year} {}. {}", settings.store_name, settings.copyright_text);
    Some(
        shell.with_child(
            VNode::element("p")
                .with_class("sf-footer__copyright")
                .with_child(VNode::text(copyright.trim_end())),
        ),
    )
}
