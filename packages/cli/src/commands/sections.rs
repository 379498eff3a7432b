use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use storefront_schema::{SchemaRegistry, SectionCategory, SectionTypeDefinition};

#[derive(Debug, Args)]
pub struct SectionsArgs {
    /// Only list one category (header, body, footer)
    #[arg(short, long)]
    pub category: Option<String>,
}

pub fn sections(args: SectionsArgs, _cwd: &str) -> Result<()> {
    let registry = SchemaRegistry::builtin();
    let category = parse_category(args.category.as_deref())?;

    for def in select(&registry, category) {
        println!(
            "{} {} {}",
            def.type_id.bright_white().bold(),
            format!("[{}]", def.category.as_str()).dimmed(),
            def.label
        );
        if !def.description.is_empty() {
            println!("    {}", def.description);
        }
        if !def.allowed_block_types.is_empty() {
            println!("    blocks: {}", def.allowed_block_types.join(", ").cyan());
        }
    }

    Ok(())
}

pub fn parse_category(value: Option<&str>) -> Result<Option<SectionCategory>> {
    value
        .map(|value| {
            SectionCategory::parse(value)
                .ok_or_else(|| anyhow!("Unknown category: {value}. Use: header, body, or footer"))
        })
        .transpose()
}

fn select(registry: &SchemaRegistry, category: Option<SectionCategory>) -> Vec<&SectionTypeDefinition> {
    match category {
        Some(category) => registry.list_by_category(category),
        None => registry.sections().iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_category() {
        let registry = SchemaRegistry::builtin();

        let footers: Vec<_> = select(&registry, Some(SectionCategory::Footer))
            .into_iter()
            .map(|def| def.type_id.as_str())
            .collect();
        assert_eq!(footers, vec!["footer"]);
        assert_eq!(select(&registry, None).len(), registry.sections().len());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(Some("Header")).unwrap(), Some(SectionCategory::Header));
        assert_eq!(parse_category(None).unwrap(), None);
        assert!(parse_category(Some("sidebar")).is_err());
    }
}
