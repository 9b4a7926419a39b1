pub mod libs;
use crate::libs::{batch, magick::MagickConverter, presets};

use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use magick_rust::magick_wand_genesis;

#[derive(ValueEnum, Clone, Debug)]
enum Preset {
    /// Small web preview jpegs (quality 85, max width 1200px)
    Preview,
    /// Full-size shop upload jpegs (quality 98, srgb)
    Shopify,
}

#[derive(Parser, Debug)]
#[command(version, about = "Batch-converts tiff product photos to jpeg", long_about = None)]
struct Args {
    #[arg(value_enum, required_unless_present = "config", conflicts_with = "config")]
    preset: Option<Preset>,

    #[arg(help = "source directory, defaults to the current directory")]
    source_dir: Option<String>,

    #[arg(short, long, help = "answer yes to the confirmation prompt")]
    yes: bool,

    #[arg(short, long, help = "load a custom preset from a json file")]
    config: Option<String>,
}

fn main() -> Result<()> {
    magick_wand_genesis();
    let args = Args::parse();

    let mut config = match (&args.preset, &args.config) {
        (_, Some(path)) => presets::from_file(path)?,
        (Some(Preset::Preview), None) => presets::preview(),
        (Some(Preset::Shopify), None) => presets::shopify(),
        (None, None) => unreachable!("clap requires a preset or a config file"),
    };
    if let Some(source_dir) = args.source_dir {
        config.source_dir = source_dir;
    }

    println!("Welcome to {}!", "tiffpress".yellow().bold());
    println!(
        "{} run in {} ({})",
        config.label, config.source_dir,
        config.describe()
    );

    if !args.yes && !confirm("Convert all pending tiff files to jpeg?")? {
        println!("nothing converted");
        return Ok(());
    }

    let converter = MagickConverter::new();
    let summary = batch::run(&config, &converter)?;

    println!();
    println!(
        "{} converted, {} skipped, {} failed",
        summary.converted.to_string().green(),
        summary.skipped.to_string().yellow(),
        summary.failed.to_string().red()
    );
    Ok(())
}

/// Asks on the terminal; anything but y/yes declines. Non-interactive runs
/// proceed without asking.
fn confirm(question: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(true);
    }
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
