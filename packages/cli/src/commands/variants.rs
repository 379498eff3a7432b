use super::sections::parse_category;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::HashSet;
use storefront_schema::{SchemaRegistry, SectionCategory, SectionVariant, VariantCatalog};

#[derive(Debug, Args)]
pub struct VariantsArgs {
    /// Only list variants whose target type is in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive search over name and description
    #[arg(short, long)]
    pub search: Option<String>,
}

pub fn variants(args: VariantsArgs, _cwd: &str) -> Result<()> {
    let registry = SchemaRegistry::builtin();
    let catalog = VariantCatalog::builtin(&registry);
    let category = parse_category(args.category.as_deref())?;

    let matches = select(&catalog, category, args.search.as_deref());
    if matches.is_empty() {
        println!("{}", "⚠️  No variants match".yellow());
        return Ok(());
    }

    for variant in matches {
        println!(
            "{} {} {}",
            variant.variant_id.bright_white().bold(),
            format!("→ {}", variant.target_type_id).dimmed(),
            variant.display_name
        );
        if !variant.description.is_empty() {
            println!("    {}", variant.description);
        }
    }

    Ok(())
}

fn select<'a>(
    catalog: &'a VariantCatalog,
    category: Option<SectionCategory>,
    search: Option<&str>,
) -> Vec<&'a SectionVariant> {
    let listed = catalog.list(category);
    match search {
        Some(query) => {
            let found: HashSet<&str> = catalog.filter(query).into_iter().map(|v| v.variant_id.as_str()).collect();
            listed
                .into_iter()
                .filter(|v| found.contains(v.variant_id.as_str()))
                .collect()
        }
        None => listed,
    }
}
