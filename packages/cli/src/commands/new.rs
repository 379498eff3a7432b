use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use storefront_common::RealFileSystem;
use storefront_editor::starter_layout;
use storefront_schema::{LayoutDocument, SchemaRegistry, StudioConfig};
use storefront_workspace::{FileLayoutStore, LayoutGateway};
use tracing::debug;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Tenant id
    pub tenant: String,

    /// Start from the starter layout instead of an empty one
    #[arg(short, long)]
    pub starter: bool,

    /// Overwrite an existing layout
    #[arg(short, long)]
    pub force: bool,

    /// Also enable the studio for this tenant
    #[arg(short, long)]
    pub enable: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let cwd = Path::new(cwd);
    let config = Config::load(&RealFileSystem, cwd)?;
    let store = FileLayoutStore::new(config.store_root(cwd)).with_conflict_policy(config.conflict_policy);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(create_layout(&store, &args))
}

async fn create_layout(store: &FileLayoutStore, args: &NewArgs) -> Result<()> {
    let path = store.layout_path(&args.tenant)?;

    match store.load_document(&args.tenant).await {
        Ok(existing) if !args.force => {
            println!(
                "{} {} already has a layout (version {})",
                "⚠️".yellow(),
                args.tenant.bright_white(),
                existing.version
            );
            println!("Use --force to overwrite");
            return Ok(());
        }
        Ok(_) => debug!(tenant = %args.tenant, "Overwriting layout"),
        Err(err) if err.is_not_found() => {}
        // An unreadable layout can still be replaced on request
        Err(err) if args.force => debug!(error = %err, "Replacing unreadable layout"),
        Err(err) => return Err(anyhow!(err)),
    }

    let document = if args.starter {
        starter_layout(Arc::new(SchemaRegistry::builtin()), &args.tenant)?
    } else {
        LayoutDocument::new(&args.tenant)
    };

    let receipt = store.save_document(&document).await?;
    println!(
        "  {} Created {} ({} sections, version {})",
        "✓".green(),
        path.display(),
        document.len(),
        receipt.version
    );

    if args.enable {
        store.save_studio_config(&args.tenant, &StudioConfig::enabled()).await?;
        println!("  {} Enabled studio for {}", "✓".green(), args.tenant);
    }

    Ok(())
}
