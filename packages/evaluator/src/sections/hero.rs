use super::{content_block, heading, link_button, paragraph, section_shell, typed_blocks};
use crate::dispatch::RenderScope;
use crate::vdom::VNode;
use storefront_schema::settings::{ButtonStyle, HeroHeight, HeroSettings, SlideBlockSettings};
use storefront_schema::{read_lenient, BlockSettings, PlacedSection};

fn min_height(height: HeroHeight) -> &'static str {
    match height {
        HeroHeight::Small => "320px",
        HeroHeight::Medium => "480px",
        HeroHeight::Large => "640px",
        HeroHeight::Full => "100vh",
    }
}

fn slide(id: &str, index: usize, slide: &SlideBlockSettings) -> VNode {
    let mut node = VNode::element("div")
        .with_class("sf-hero__slide")
        .with_attr("data-slide-index", index.to_string())
        .with_key(id.to_string());
    if !slide.image.is_empty() {
        node = node.with_style("background-image", format!("url(\"{}\")", slide.image));
    }
    node.with_optional_child(heading(2, &slide.heading, "sf-hero__heading"))
        .with_optional_child(paragraph(&slide.subheading, "sf-hero__subheading"))
        .with_optional_child(link_button(&slide.button_label, &slide.button_url, ButtonStyle::Primary))
}

/// Banner, or a carousel when the section carries slide blocks.
///
/// Never hidden: with nothing configured it still shows the default copy.
pub fn hero(section: &PlacedSection, _scope: &RenderScope<'_>) -> Option<VNode> {
    let settings: HeroSettings = read_lenient(&section.settings);

    let mut slides = Vec::new();
    let mut extras = Vec::new();
    for (block, typed) in typed_blocks(section) {
        match &typed {
            BlockSettings::Slide(s) => slides.push(slide(&block.id, slides.len(), s)),
            _ => extras.extend(content_block(block, &typed)),
        }
    }

    let mut shell = section_shell(section, "section")
        .with_attr("data-height", settings.height.as_str())
        .with_style("min-height", min_height(settings.height))
        .with_style("text-align", settings.text_alignment.as_str());

    if !slides.is_empty() {
        return Some(
            shell.with_child(
                VNode::element("div")
                    .with_class("sf-hero__carousel")
                    .with_attr("data-slide-count", slides.len().to_string())
                    .with_children(slides),
            ),
        );
    }

    if !settings.background_image.is_empty() {
        shell = shell.with_style("background-image", format!("url(\"{}\")", settings.background_image));
    }

    let overlay = VNode::element("div")
        .with_class("sf-hero__overlay")
        .with_style("opacity", format!("{:.2}", f64::from(settings.overlay_opacity.min(100)) / 100.0));

    let content = VNode::element("div")
        .with_class("sf-hero__content")
        .with_optional_child(heading(1, &settings.heading, "sf-hero__heading"))
        .with_optional_child(paragraph(&settings.subheading, "sf-hero__subheading"))
        .with_optional_child(link_button(&settings.button_label, &settings.button_url, ButtonStyle::Primary))
        .with_children(extras);

    Some(shell.with_child(overlay).with_child(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DataContext;
    use serde_json::json;
    use storefront_schema::{PlacedBlock, Settings};

    fn settings(value: serde_json::Value) -> Settings {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Settings::new(),
        }
    }

    fn hero_section(blocks: Vec<PlacedBlock>) -> PlacedSection {
        PlacedSection {
            id: "hero-1".to_string(),
            type_id: "hero".to_string(),
            display_name: "Hero".to_string(),
            visible: true,
            settings: settings(json!({ "heading": "Summer", "height": "large", "overlayOpacity": 250 })),
            blocks,
        }
    }

    #[test]
    fn test_banner_uses_settings() {
        let ctx = DataContext::default();
        let node = hero(&hero_section(vec![]), &RenderScope::new(&ctx)).unwrap();

        assert_eq!(node.style("min-height"), Some("640px"));
        assert_eq!(node.find_by_class("sf-hero__overlay")[0].style("opacity"), Some("1.00"));
        assert!(node.text_content().starts_with("Summer"));
    }

    #[test]
    fn test_slides_make_a_carousel() {
        let ctx = DataContext::default();
        let blocks = vec![
            PlacedBlock {
                id: "b1".to_string(),
                type_id: "slide".to_string(),
                settings: settings(json!({ "heading": "One" })),
            },
            PlacedBlock {
                id: "b2".to_string(),
                type_id: "slide".to_string(),
                settings: settings(json!({ "heading": "Two" })),
            },
        ];

        let node = hero(&hero_section(blocks), &RenderScope::new(&ctx)).unwrap();
        let carousel = node.find_by_class("sf-hero__carousel")[0];

        assert_eq!(carousel.attr("data-slide-count"), Some("2"));
        assert_eq!(carousel.text_content(), "OneTwo");
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let ctx = DataContext::default();
        let blocks = vec![PlacedBlock {
            id: "b1".to_string(),
            type_id: "price".to_string(),
            settings: Settings::new(),
        }];

        let node = hero(&hero_section(blocks), &RenderScope::new(&ctx)).unwrap();
        let content = node.find_by_class("sf-hero__content")[0];
        // heading + subheading + button only
        assert_eq!(content.children().len(), 3);
    }
}
