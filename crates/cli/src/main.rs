//! CLI tool for converting a marketing webpage into a slide deck.
//!
//! With no arguments this reads `index.html` from the current directory and
//! writes `MailingPigeon_Presentation.pptx` beside it, overwriting any
//! earlier run's output.

use anyhow::{Context, Result};
use clap::Parser;
use deck_html::SectionExtractor;
use deck_pptx::DeckRenderer;
use std::path::{Path, PathBuf};

/// Convert a marketing webpage into a PowerPoint deck.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input HTML file
    #[arg(default_value = "index.html")]
    input: PathBuf,

    /// Output presentation file
    #[arg(short, long, default_value = "MailingPigeon_Presentation.pptx")]
    output: PathBuf,

    /// Print extracted sections as JSON and exit without rendering
    #[arg(long)]
    sections: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    println!("Parsing {}...", args.input.display());
    let extractor = SectionExtractor::new();
    let sections = extractor
        .extract_file(&args.input)
        .with_context(|| format!("Failed to extract sections from {}", args.input.display()))?;
    println!("Found {} sections", sections.len());

    if args.sections {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    println!("Creating presentation...");
    let base_dir = asset_base_dir(&args.input);
    log::debug!("resolving image assets against {}", base_dir.display());

    let renderer = DeckRenderer::new(base_dir);
    let package = renderer.render(&sections).context("Failed to render deck")?;

    package
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    println!("Presentation saved to: {}", args.output.display());
    println!("Total slides: {}", package.slide_count());

    Ok(())
}

/// Image paths in the page are relative to the page itself.
fn asset_base_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
