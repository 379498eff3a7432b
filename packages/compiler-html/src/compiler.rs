use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storefront_evaluator::{RenderedPage, VNode};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Invalid attribute name {name:?} on <{tag}>")]
    InvalidAttributeName { tag: String, name: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string (whitespace only)
    pub indent: String,
    /// Document `<title>`
    pub title: String,
    /// `lang` attribute on `<html>`
    pub lang: String,
    /// Emit theme tokens as CSS custom properties
    pub theme_variables: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Store".to_string(),
            lang: "en".to_string(),
            theme_variables: true,
        }
    }
}

impl CompileOptions {
    pub fn validate(&self) -> Result<(), CompileError> {
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(CompileError::InvalidOption(format!(
                "indent must be spaces or tabs, got {:?}",
                self.indent
            )));
        }
        if !self.lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(CompileError::InvalidOption(format!("invalid lang {:?}", self.lang)));
        }
        Ok(())
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a rendered page to a complete HTML document
pub fn compile_to_html(page: &RenderedPage, options: &CompileOptions) -> Result<String, CompileError> {
    options.validate()?;
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line(&format!("<html lang=\"{}\">", options.lang));
    ctx.indent();

    compile_head(&page.theme, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_line("<main class=\"sf-page\">");
    ctx.indent();

    for section in &page.sections {
        compile_node(&section.node, &mut ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</main>");
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    let html = ctx.get_output();
    debug!(sections = page.sections.len(), bytes = html.len(), "Compiled page to HTML");
    Ok(html)
}

/// Compile a single node without the document wrapper
pub fn compile_fragment(node: &VNode, options: &CompileOptions) -> Result<String, CompileError> {
    options.validate()?;
    let mut ctx = Context::new(options);
    compile_node(node, &mut ctx)?;
    Ok(ctx.get_output())
}

fn compile_head(theme: &BTreeMap<String, String>, ctx: &mut Context<'_>) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);

    if ctx.options.theme_variables {
        let variables: Vec<String> = theme
            .iter()
            .filter_map(|(name, value)| theme_declaration(name, value))
            .collect();

        if !variables.is_empty() {
            ctx.add_line("<style>");
            ctx.indent();
            ctx.add_line(":root {");
            ctx.indent();
            for declaration in &variables {
                ctx.add_line(declaration);
            }
            ctx.dedent();
            ctx.add_line("}");
            ctx.dedent();
            ctx.add_line("</style>");
        }
    }

    ctx.dedent();
    ctx.add_line("</head>");
}

fn theme_declaration(name: &str, value: &str) -> Option<String> {
    let Some(variable) = css_variable_name(name) else {
        warn!(token = %name, "Skipping theme token with unusable name");
        return None;
    };
    if value.trim().is_empty() || value.chars().any(|c| matches!(c, '<' | '>' | '{' | '}' | ';')) {
        warn!(token = %name, "Skipping theme token with unsafe value");
        return None;
    }
    Some(format!("{variable}: {};", value.trim()))
}

/// `primaryColor` → `--primary-color`; `None` for names that cannot be a
/// CSS identifier
pub fn css_variable_name(token: &str) -> Option<String> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return None;
    }

    let mut name = String::from("--");
    for (i, c) in token.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                name.push('-');
            }
            name.push(c.to_ascii_lowercase());
        } else if c == '_' {
            name.push('-');
        } else {
            name.push(c);
        }
    }
    Some(name)
}

fn compile_node(node: &VNode, ctx: &mut Context<'_>) -> Result<(), CompileError> {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            key: _,
        } => compile_element(tag, attributes, styles, children, ctx),

        VNode::Text { content } => {
            ctx.add_line(&escape_html(content));
            Ok(())
        }

        VNode::Comment { content } => {
            ctx.add_line(&format!("<!-- {} -->", escape_comment(content)));
            Ok(())
        }

        VNode::Placeholder { type_id, label } => {
            ctx.add_line(&format!("<!-- Unknown section type: {} -->", escape_comment(type_id)));
            ctx.add_line(&format!(
                "<section class=\"sf-section sf-placeholder\" data-placeholder=\"{}\">",
                escape_html(type_id)
            ));
            ctx.indent();
            ctx.add_line(&format!("<p>{}</p>", escape_html(label)));
            ctx.dedent();
            ctx.add_line("</section>");
            Ok(())
        }
    }
}

fn compile_element(
    tag: &str,
    attributes: &BTreeMap<String, String>,
    styles: &BTreeMap<String, String>,
    children: &[VNode],
    ctx: &mut Context<'_>,
) -> Result<(), CompileError> {
    if !is_valid_name(tag) || !tag.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(CompileError::InvalidTagName(tag.to_string()));
    }

    let mut open = format!("<{tag}");
    for (name, value) in attributes {
        if name == "style" {
            continue;
        }
        if !is_valid_name(name) {
            return Err(CompileError::InvalidAttributeName {
                tag: tag.to_string(),
                name: name.clone(),
            });
        }
        open.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }

    let style = style_attribute(attributes.get("style"), styles);
    if !style.is_empty() {
        open.push_str(&format!(" style=\"{}\"", escape_html(&style)));
    }

    if children.is_empty() && is_self_closing(tag) {
        open.push_str(" />");
        ctx.add_line(&open);
        return Ok(());
    }
    open.push('>');

    // Text-only content stays on the tag's line
    if !has_element_children(children) {
        let text: String = children
            .iter()
            .map(|child| match child {
                VNode::Text { content } => escape_html(content),
                _ => String::new(),
            })
            .collect();
        ctx.add_line(&format!("{open}{text}</{tag}>"));
        return Ok(());
    }

    ctx.add_line(&open);
    ctx.indent();
    for child in children {
        compile_node(child, ctx)?;
    }
    ctx.dedent();
    ctx.add_line(&format!("</{tag}>"));

    Ok(())
}

/// Inline `style` attribute followed by the node's style map
fn style_attribute(inline: Option<&String>, styles: &BTreeMap<String, String>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(inline) = inline.map(|s| s.trim().trim_end_matches(';')).filter(|s| !s.is_empty()) {
        parts.push(inline.to_string());
    }
    parts.extend(styles.iter().map(|(key, value)| format!("{key}: {value}")));
    parts.join("; ")
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_comment(text: &str) -> String {
    text.replace("--", "- -").replace('>', "&gt;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn has_element_children(children: &[VNode]) -> bool {
    children.iter().any(|child| !matches!(child, VNode::Text { .. }))
}
