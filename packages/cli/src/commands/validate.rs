use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use storefront_common::TypeUsage;
use storefront_editor::{validate as check_drift, DriftIssue};
use storefront_schema::{LayoutDocument, SchemaRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Layout document to check against the built-in registry
    pub layout: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    sections: usize,
    hidden: usize,
    issues: &'a [DriftIssue],
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let path = Path::new(cwd).join(&args.layout);
    let content = fs::read_to_string(&path).with_context(|| format!("Cannot read layout {}", path.display()))?;
    let document = LayoutDocument::from_json("", &content)?;

    let registry = SchemaRegistry::builtin();
    let issues = check_drift(&document, &registry);
    let usage = TypeUsage::collect(&document);

    match args.format {
        ReportFormat::Json => {
            let report = Report {
                sections: document.len(),
                hidden: usage.hidden,
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => print_text_report(&args.layout, &usage, &issues),
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("{} problem(s) in {}", issues.len(), args.layout.display()))
    }
}

fn print_text_report(layout: &Path, usage: &TypeUsage, issues: &[DriftIssue]) {
    println!("{} {}", "🔍 Checking".bright_blue().bold(), layout.display());

    for (type_id, count) in &usage.sections {
        println!("  {} × {}", count, type_id);
    }
    if usage.hidden > 0 {
        println!("  {} hidden", usage.hidden.to_string().dimmed());
    }
    println!();

    if issues.is_empty() {
        println!("{}", "✅ No problems found".green().bold());
        return;
    }

    for issue in issues {
        println!("  {} {}", "✗".red(), issue);
    }
}
