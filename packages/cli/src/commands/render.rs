use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storefront_common::RealFileSystem;
use storefront_compiler_html::compile_to_html;
use storefront_editor::starter_layout;
use storefront_evaluator::{DataContext, RenderTable, Renderer};
use storefront_schema::{LayoutDocument, SchemaRegistry};
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Layout document (store_layout JSON)
    pub layout: PathBuf,

    /// Store data (products, categories, brands, theme, now)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Tenant id (overrides config)
    #[arg(short, long)]
    pub tenant: Option<String>,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let cwd = Path::new(cwd);
    let config = Config::load(&RealFileSystem, cwd)?;
    let tenant = config.tenant(args.tenant.as_deref());

    let layout_path = cwd.join(&args.layout);
    let content = fs::read_to_string(&layout_path)
        .with_context(|| format!("Cannot read layout {}", layout_path.display()))?;
    let document = LayoutDocument::from_json(tenant, &content)?;

    let ctx = match &args.data {
        Some(path) => load_data_context(&cwd.join(path))?,
        None => DataContext::new(Utc::now()),
    };

    let html = render_html(&document, &ctx, &config)?;

    match &args.out {
        Some(out) => {
            let out_path = cwd.join(out);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&out_path, html)?;
            println!(
                "  {} {} → {}",
                "✓".green(),
                args.layout.display(),
                out.display()
            );
        }
        None => print!("{html}"),
    }

    Ok(())
}

/// Read a data context; a context without `now` renders at the current time
pub fn load_data_context(path: &Path) -> Result<DataContext> {
    let content = fs::read_to_string(path).with_context(|| format!("Cannot read data {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let has_now = value.get("now").is_some();

    let mut ctx: DataContext = serde_json::from_value(value)?;
    if !has_now {
        ctx.now = Utc::now();
    }
    Ok(ctx)
}

/// Render a layout to a full HTML page, falling back to the starter layout
/// when the document has no sections
pub fn render_html(document: &LayoutDocument, ctx: &DataContext, config: &Config) -> Result<String> {
    let registry = Arc::new(SchemaRegistry::builtin());
    let fallback = starter_layout(registry.clone(), &document.tenant_id)?;
    let renderer = Renderer::new(registry, RenderTable::builtin());

    let page = renderer.render_with_fallback(document, &fallback, ctx);
    for placeholder in page.placeholders() {
        warn!(section = %placeholder.section_id, type_id = %placeholder.type_id, "Rendered placeholder");
    }
    info!(sections = page.sections.len(), "Rendered layout");

    Ok(compile_to_html(&page, &config.html)?)
}
