use std::path::Path;

use magick_rust::{ColorspaceType, InterlaceType, MagickWand};

use crate::libs::convert::{ConversionError, ConvertOptions, ImageConverter, OutputMeta};

/// ImageMagick-backed converter. `magick_wand_genesis` must have run before
/// the first conversion; `main` does this at startup.
pub struct MagickConverter;

impl MagickConverter {
    pub fn new() -> Self {
        MagickConverter
    }
}

impl Default for MagickConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageConverter for MagickConverter {
    fn ensure_available(&self) -> Result<(), ConversionError> {
        // The wand library is linked at build time, so there is no absent-tool
        // case to probe for here.
        Ok(())
    }

    fn convert(
        &self,
        input: &Path,
        output: &Path,
        options: &ConvertOptions,
    ) -> Result<OutputMeta, ConversionError> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();

        let mut wand = MagickWand::new();
        // "[0]" keeps only the first frame of a multi-page tiff.
        wand.read_image(&format!("{input}[0]")).map_err(backend)?;

        if !wand.auto_orient() {
            return Err(ConversionError::Backend(String::from(
                "could not apply embedded orientation",
            )));
        }

        if options.force_rgb {
            wand.transform_image_colorspace(ColorspaceType::sRGB)
                .map_err(backend)?;
        }

        if let Some(max_width) = options.max_width {
            let width = wand.get_image_width();
            if width > max_width {
                let height = (wand.get_image_height() * max_width) / width;
                wand.fit(max_width, height.max(1));
            }
        }

        wand.strip_image().map_err(backend)?;
        wand.set_interlace_scheme(InterlaceType::No).map_err(backend)?;
        wand.set_image_format("JPEG").map_err(backend)?;
        wand.set_compression_quality(options.quality).map_err(backend)?;
        wand.write_image(&output).map_err(backend)?;

        Ok(OutputMeta {
            width: wand.get_image_width(),
            height: wand.get_image_height(),
        })
    }
}

fn backend(e: magick_rust::MagickError) -> ConversionError {
    ConversionError::Backend(e.to_string())
}
