use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Error, Result};
use colored::Colorize;
use serde::Deserialize;

use crate::libs::convert::{ConvertOptions, ImageConverter, OutputMeta};

/// One conversion run: where to read, where to write, how to encode.
/// The built-in presets live in `presets`; a custom record can be loaded
/// from json.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub label: String,
    pub source_dir: String,
    #[serde(default)]
    pub output_subdir: Option<String>,
    pub quality: usize,
    #[serde(default)]
    pub max_width: Option<usize>,
    #[serde(default)]
    pub force_rgb: bool,
}

impl BatchConfig {
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_subdir {
            Some(subdir) => Path::new(&self.source_dir).join(subdir),
            None => PathBuf::from(&self.source_dir),
        }
    }

    /// Deterministic output path for a source: same base name, `.jpg`
    /// extension, inside the output directory.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let mut name = source.file_stem().unwrap_or_default().to_os_string();
        name.push(".jpg");
        self.output_dir().join(name)
    }

    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            quality: self.quality,
            max_width: self.max_width,
            force_rgb: self.force_rgb,
        }
    }

    pub fn describe(&self) -> String {
        let resize = match self.max_width {
            Some(width) => format!("max width {width}px"),
            None => String::from("no resize"),
        };
        let colorspace = if self.force_rgb { ", srgb" } else { "" };
        format!("quality {}, {}{}", self.quality, resize, colorspace)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl RunSummary {
    pub fn total(&self) -> u32 {
        self.converted + self.skipped + self.failed
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Converted { .. } => self.converted += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }
}

enum FileOutcome {
    Converted {
        meta: OutputMeta,
        source_bytes: u64,
        output_bytes: u64,
    },
    Skipped,
    Failed(Error),
}

/// Immediate children of `source_dir` with a `.tif`/`.tiff` extension,
/// sorted by name so runs are deterministic.
pub fn scan(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source_dir)
        .with_context(|| format!("could not read source directory {}", source_dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if is_tiff(&path) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

fn is_tiff(path: &Path) -> bool {
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"),
        None => false,
    }
}

/// Converts every pending tiff in the configured directory, one at a time.
/// Outputs that already exist are skipped, so an interrupted run can simply
/// be started again. A conversion only counts once the output file exists
/// and is non-empty; anything less is a failure and the partial output is
/// removed so the next run retries it. Per-file failures never stop the
/// batch.
pub fn run(config: &BatchConfig, converter: &dyn ImageConverter) -> Result<RunSummary> {
    converter.ensure_available()?;

    let sources = scan(Path::new(&config.source_dir))?;
    let mut summary = RunSummary::default();
    if sources.is_empty() {
        println!("no tiff files found in {}", config.source_dir);
        return Ok(summary);
    }

    fs::create_dir_all(config.output_dir())?;

    let total = sources.len();
    for (index, source) in sources.iter().enumerate() {
        let outcome = process_file(config, converter, source);
        print_progress(index + 1, total, source, &outcome);
        summary.record(&outcome);
    }
    Ok(summary)
}

fn process_file(
    config: &BatchConfig,
    converter: &dyn ImageConverter,
    source: &Path,
) -> FileOutcome {
    let output = config.output_path(source);
    if output.exists() {
        return FileOutcome::Skipped;
    }

    let result = (|| -> Result<(OutputMeta, u64, u64)> {
        let source_bytes = fs::metadata(source)?.len();
        let meta = converter.convert(source, &output, &config.options())?;
        let output_bytes = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
        if output_bytes == 0 {
            return Err(anyhow!("output file is missing or empty"));
        }
        Ok((meta, source_bytes, output_bytes))
    })();

    match result {
        Ok((meta, source_bytes, output_bytes)) => FileOutcome::Converted {
            meta,
            source_bytes,
            output_bytes,
        },
        Err(e) => {
            // Leave nothing behind that a rerun would mistake for a finished
            // conversion.
            if output.exists() {
                let _ = fs::remove_file(&output);
            }
            FileOutcome::Failed(e)
        }
    }
}

fn print_progress(done: usize, total: usize, source: &Path, outcome: &FileOutcome) {
    let name = source.file_name().unwrap_or_default().to_string_lossy();
    match outcome {
        FileOutcome::Converted {
            meta,
            source_bytes,
            output_bytes,
        } => println!(
            "{:-6}/{} {} {} {}x{} ({})",
            done,
            total,
            name,
            "converted".green(),
            meta.width,
            meta.height,
            size_change(*source_bytes, *output_bytes)
        ),
        FileOutcome::Skipped => {
            println!("{:-6}/{} {} {}", done, total, name, "skipped".yellow())
        }
        FileOutcome::Failed(e) => {
            println!("{:-6}/{} {} {} {}", done, total, name, "failed".red(), e)
        }
    }
}

fn size_change(source_bytes: u64, output_bytes: u64) -> String {
    if source_bytes == 0 {
        return String::from("size unknown");
    }
    if output_bytes <= source_bytes {
        format!(
            "{}% smaller",
            (source_bytes - output_bytes) * 100 / source_bytes
        )
    } else {
        format!(
            "{}% larger",
            (output_bytes - source_bytes) * 100 / source_bytes
        )
    }
}
