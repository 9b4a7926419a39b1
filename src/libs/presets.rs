use std::fs;

use anyhow::{Context, Result};

use crate::libs::batch::BatchConfig;

/// Small web preview jpegs, written next to the tiffs they came from.
pub fn preview() -> BatchConfig {
    BatchConfig {
        label: String::from("web preview"),
        source_dir: String::from("."),
        output_subdir: None,
        quality: 85,
        max_width: Some(1200),
        force_rgb: false,
    }
}

/// Full-size upload jpegs for the shop. CMYK scans get normalized to srgb
/// so they render correctly on screen.
pub fn shopify() -> BatchConfig {
    BatchConfig {
        label: String::from("shopify upload"),
        source_dir: String::from("."),
        output_subdir: Some(String::from("shopify_upload")),
        quality: 98,
        max_width: None,
        force_rgb: true,
    }
}

/// Loads a custom preset from a json file.
pub fn from_file(path: &str) -> Result<BatchConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("could not read config {path}"))?;
    let config = serde_json::from_str::<BatchConfig>(&content)
        .with_context(|| format!("config {path} is not valid"))?;
    Ok(config)
}
