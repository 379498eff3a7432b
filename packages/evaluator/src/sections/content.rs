use super::{content_block, grid, heading, image, link_button, paragraph, section_shell, typed_blocks};
use crate::dispatch::RenderScope;
use crate::vdom::VNode;
use storefront_schema::settings::{
    ButtonStyle, ImagePosition, ImageWithTextSettings, NewsletterSettings, RichTextSettings, TestimonialsSettings,
};
use storefront_schema::{read_lenient, BlockSettings, PlacedSection};

pub fn rich_text(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: RichTextSettings = read_lenient(&section.settings);

    let blocks: Vec<VNode> = typed_blocks(section)
        .filter_map(|(block, typed)| content_block(block, &typed))
        .collect();
    let title = heading(2, &settings.heading, "sf-rich-text__heading");
    let body = paragraph(&settings.content, "sf-rich-text__content");
    if title.is_none() && body.is_none() && blocks.is_empty() {
        return None;
    }

    Some(
        section_shell(section, "section")
            .with_style("text-align", settings.alignment.as_str())
            .with_optional_child(title)
            .with_optional_child(body)
            .with_children(blocks),
    )
}

pub fn image_with_text(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: ImageWithTextSettings = read_lenient(&section.settings);

    let media = VNode::element("div")
        .with_class("sf-image-with-text__media")
        .with_optional_child(image(&settings.image, &settings.heading, "sf-image-with-text__image"));

    let text = VNode::element("div")
        .with_class("sf-image-with-text__text")
        .with_optional_child(heading(2, &settings.heading, "sf-section__title"))
        .with_optional_child(paragraph(&settings.text, "sf-image-with-text__body"))
        .with_children(typed_blocks(section).filter_map(|(block, typed)| content_block(block, &typed)))
        .with_optional_child(link_button(&settings.button_label, &settings.button_url, ButtonStyle::Primary));

    let (first, second, position) = match settings.image_position {
        ImagePosition::Left => (media, text, "left"),
        ImagePosition::Right => (text, media, "right"),
    };

    Some(
        section_shell(section, "section")
            .with_attr("data-image-position", position)
            .with_style("display", "grid")
            .with_style("grid-template-columns", "1fr 1fr")
            .with_child(first)
            .with_child(second),
    )
}

pub fn testimonials(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: TestimonialsSettings = read_lenient(&section.settings);

    let quotes: Vec<VNode> = typed_blocks(section)
        .filter_map(|(block, typed)| match typed {
            BlockSettings::Testimonial(t) if !t.quote.trim().is_empty() => {
                let rating = t.rating.min(5);
                Some(
                    VNode::element("figure")
                        .with_class("sf-testimonial")
                        .with_key(block.id.clone())
                        .with_child(VNode::element("blockquote").with_child(VNode::text(t.quote)))
                        .with_child(
                            VNode::element("div")
                                .with_class("sf-rating")
                                .with_attr("aria-label", format!("{rating} out of 5"))
                                .with_child(VNode::text("★".repeat(rating as usize))),
                        )
                        .with_child(VNode::element("figcaption").with_child(VNode::text(t.author))),
                )
            }
            _ => None,
        })
        .collect();

    if quotes.is_empty() {
        return None;
    }

    Some(
        section_shell(section, "section")
            .with_optional_child(heading(2, &settings.title, "sf-section__title"))
            .with_child(grid(settings.columns, "sf-testimonials").with_children(quotes)),
    )
}

pub fn newsletter(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: NewsletterSettings = read_lenient(&section.settings);

    let form = VNode::element("form")
        .with_class("sf-newsletter__form")
        .with_attr("method", "post")
        .with_attr("action", "/newsletter")
        .with_child(
            VNode::element("input")
                .with_attr("type", "email")
                .with_attr("name", "email")
                .with_attr("required", "required")
                .with_attr("placeholder", settings.placeholder.clone()),
        )
        .with_child(
            VNode::element("button")
                .with_attr("type", "submit")
                .with_class("sf-button sf-button--primary")
                .with_child(VNode::text(settings.button_label.clone())),
        );

    Some(
        section_shell(section, "section")
            .with_optional_child(heading(2, &settings.heading, "sf-section__title"))
            .with_optional_child(paragraph(&settings.subheading, "sf-section__subtitle"))
            .with_children(typed_blocks(section).filter_map(|(block, typed)| content_block(block, &typed)))
            .with_child(form),
    )
}
