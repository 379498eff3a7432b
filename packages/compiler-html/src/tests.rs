use crate::{compile_fragment, compile_to_html, css_variable_name, CompileError, CompileOptions};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use storefront_evaluator::{DataContext, RenderKind, RenderedPage, RenderedSection, Renderer, VNode};
use storefront_schema::LayoutDocument;

fn page(nodes: Vec<VNode>) -> RenderedPage {
    RenderedPage {
        sections: nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| RenderedSection {
                section_id: format!("s{i}"),
                type_id: "test".to_string(),
                kind: if node.is_placeholder() {
                    RenderKind::Placeholder
                } else {
                    RenderKind::Rendered
                },
                node,
            })
            .collect(),
        theme: BTreeMap::new(),
    }
}

#[test]
fn test_compile_document_shell() {
    let html = compile_to_html(&page(vec![]), &CompileOptions::default()).expect("Failed to compile");

    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n"));
    assert!(html.contains("  <head>\n"));
    assert!(html.contains("    <title>Store</title>\n"));
    assert!(html.contains("    <main class=\"sf-page\">\n"));
    assert!(html.ends_with("</html>\n"));
    assert!(!html.contains("<style>"));
}

#[test]
fn test_text_only_children_stay_inline() {
    let node = VNode::element("h2").with_class("title").with_child(VNode::text("Hello"));
    let html = compile_fragment(&node, &CompileOptions::default()).unwrap();

    assert_eq!(html, "<h2 class=\"title\">Hello</h2>\n");
}

#[test]
fn test_nested_elements_are_indented() {
    let node = VNode::element("div")
        .with_child(VNode::element("p").with_child(VNode::text("one")))
        .with_child(VNode::element("span"));
    let html = compile_fragment(&node, &CompileOptions::default()).unwrap();

    assert_eq!(html, "<div>\n  <p>one</p>\n  <span></span>\n</div>\n");
}

#[test]
fn test_compact_output() {
    let node = VNode::element("div").with_child(VNode::element("p").with_child(VNode::text("one")));
    let options = CompileOptions {
        pretty: false,
        ..CompileOptions::default()
    };

    assert_eq!(compile_fragment(&node, &options).unwrap(), "<div><p>one</p></div>");
}

#[test]
fn test_void_elements_self_close() {
    let node = VNode::element("img").with_attr("src", "a.png").with_attr("alt", "A");
    let html = compile_fragment(&node, &CompileOptions::default()).unwrap();

    assert_eq!(html, "<img alt=\"A\" src=\"a.png\" />\n");
}

#[test]
fn test_styles_are_ordered_and_merged() {
    let node = VNode::element("div")
        .with_attr("style", "color: red;")
        .with_style("gap", "1rem")
        .with_style("display", "grid");
    let html = compile_fragment(&node, &CompileOptions::default()).unwrap();

    assert_eq!(html, "<div style=\"color: red; display: grid; gap: 1rem\"></div>\n");
}

#[test]
fn test_escapes_text_and_attributes() {
    let node = VNode::element("a")
        .with_attr("title", "Say \"hi\" & <bye>")
        .with_child(VNode::text("<script>alert('x')</script>"));
    let html = compile_fragment(&node, &CompileOptions::default()).unwrap();

    assert!(html.contains("title=\"Say &quot;hi&quot; &amp; &lt;bye&gt;\""));
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_comment_cannot_close_early() {
    let html = compile_fragment(&VNode::comment("a --> b"), &CompileOptions::default()).unwrap();
    assert_eq!(html, "<!-- a - -&gt; b -->\n");
}

#[test]
fn test_placeholder_output() {
    let html = compile_fragment(
        &VNode::placeholder("mega-carousel", "Spring <carousel>"),
        &CompileOptions::default(),
    )
    .unwrap();

    assert_eq!(
        html,
        "<!-- Unknown section type: mega-carousel -->\n\
         <section class=\"sf-section sf-placeholder\" data-placeholder=\"mega-carousel\">\n  \
         <p>Spring &lt;carousel&gt;</p>\n\
         </section>\n"
    );
}

#[test]
fn test_theme_tokens_become_css_variables() {
    let mut rendered = page(vec![]);
    rendered.theme.insert("primaryColor".to_string(), "#2563eb".to_string());
    rendered.theme.insert("font_family".to_string(), "Inter, sans-serif".to_string());
    rendered.theme.insert("evil".to_string(), "red}</style><script>".to_string());

    let html = compile_to_html(&rendered, &CompileOptions::default()).unwrap();

    assert!(html.contains(":root {"));
    assert!(html.contains("--primary-color: #2563eb;"));
    assert!(html.contains("--font-family: Inter, sans-serif;"));
    assert!(!html.contains("--evil"));

    let without = CompileOptions {
        theme_variables: false,
        ..CompileOptions::default()
    };
    assert!(!compile_to_html(&rendered, &without).unwrap().contains(":root"));
}

#[test]
fn test_css_variable_names() {
    assert_eq!(css_variable_name("primaryColor").as_deref(), Some("--primary-color"));
    assert_eq!(css_variable_name("font_family").as_deref(), Some("--font-family"));
    assert_eq!(css_variable_name("radius-lg").as_deref(), Some("--radius-lg"));
    assert_eq!(css_variable_name("bad name"), None);
    assert_eq!(css_variable_name(""), None);
}

#[test]
fn test_invalid_tag_is_an_error() {
    let node = VNode::element("div onclick=x");
    assert_eq!(
        compile_fragment(&node, &CompileOptions::default()),
        Err(CompileError::InvalidTagName("div onclick=x".to_string()))
    );
}

#[test]
fn test_invalid_attribute_name_is_an_error() {
    let node = VNode::element("div").with_attr("x\"y", "1");
    assert!(matches!(
        compile_fragment(&node, &CompileOptions::default()),
        Err(CompileError::InvalidAttributeName { .. })
    ));
}

#[test]
fn test_invalid_indent_option() {
    let options = CompileOptions {
        indent: "->".to_string(),
        ..CompileOptions::default()
    };
    assert!(matches!(
        compile_to_html(&page(vec![]), &options),
        Err(CompileError::InvalidOption(_))
    ));
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: CompileOptions = serde_json::from_value(json!({ "title": "Acme", "pretty": false })).unwrap();

    assert_eq!(options.title, "Acme");
    assert!(!options.pretty);
    assert_eq!(options.indent, "  ");
    assert!(options.theme_variables);
}

#[test]
fn test_compile_rendered_layout() {
    let doc = LayoutDocument::from_value(
        "acme",
        json!({ "sections": [
            { "id": "s1", "type": "announcement-bar", "settings": { "text": "Free shipping & returns" } },
            { "id": "s2", "type": "retired-widget", "name": "Old widget" },
            { "id": "s3", "type": "newsletter" }
        ] }),
    )
    .unwrap();
    let ctx = DataContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let rendered = Renderer::builtin().render(&doc, &ctx);

    let html = compile_to_html(&rendered, &CompileOptions::default()).expect("Failed to compile");

    assert!(html.contains("Free shipping &amp; returns"));
    assert!(html.contains("data-placeholder=\"retired-widget\""));
    assert!(html.contains("data-section-id=\"s3\""));
    let announcement = html.find("data-section-id=\"s1\"").unwrap();
    let newsletter = html.find("data-section-id=\"s3\"").unwrap();
    assert!(announcement < newsletter);
}
