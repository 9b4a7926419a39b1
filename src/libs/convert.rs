use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("image converter is not available: {0}")]
    Unavailable(String),
    #[error("conversion failed: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Encoding parameters for one conversion. First-frame selection, metadata
/// stripping and auto-orientation are always applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub quality: usize,
    pub max_width: Option<usize>,
    pub force_rgb: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct OutputMeta {
    pub width: usize,
    pub height: usize,
}

/// The conversion capability the batch loop drives. Backends decode the
/// source, apply the options and write the jpeg to `output`.
pub trait ImageConverter {
    fn ensure_available(&self) -> Result<(), ConversionError>;

    fn convert(
        &self,
        input: &Path,
        output: &Path,
        options: &ConvertOptions,
    ) -> Result<OutputMeta, ConversionError>;
}
