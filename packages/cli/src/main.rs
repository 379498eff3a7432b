mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    init, new, render, sections, validate, variants, InitArgs, NewArgs, RenderArgs, SectionsArgs, ValidateArgs,
    VariantsArgs,
};
use tracing_subscriber::EnvFilter;

/// Storefront CLI - compose, check and render store layouts
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a storefront.config.json
    Init(InitArgs),

    /// Render a layout to HTML
    Render(RenderArgs),

    /// Report schema drift in a layout
    Validate(ValidateArgs),

    /// List registered section types
    Sections(SectionsArgs),

    /// List section variants
    Variants(VariantsArgs),

    /// Create a tenant layout in the store
    New(NewArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Sections(args) => sections(args, &cwd),
        Command::Variants(args) => variants(args, &cwd),
        Command::New(args) => new(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
