//! Core background replacement engine.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::background::{fit_background, synthesize_fallback_background};
use crate::compositor::{composite, CompositeOptions};
use crate::detection::{detect_regions, DetectorConfig};
use crate::error::{Error, Result};
use crate::region::{Region, RegionSet};

/// Default JPEG quality for saved output.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Options controlling file-level processing behavior.
///
/// Detection and compositing parameters belong to [`GeoMaskEngine`].
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Replacement background image. The gradient fallback is used when unset
    /// or when the file cannot be loaded.
    pub background: Option<PathBuf>,
    /// JPEG quality (1-100) for `.jpg`/`.jpeg` output.
    pub jpeg_quality: u8,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            background: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Number of regions that were composited.
    pub regions: usize,
    /// Whether no region was detected and the whole image was replaced.
    pub whole_image: bool,
    /// Whether the synthesized gradient stood in for the background.
    pub fallback_background: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            regions: 0,
            whole_image: false,
            fallback_background: false,
            message,
        }
    }
}

/// Outcome of an in-memory [`GeoMaskEngine::process`] run.
#[derive(Debug)]
pub struct Replacement {
    /// The composited image.
    pub image: RgbImage,
    /// Regions the background was blended into.
    pub regions: RegionSet,
    /// Whether detection found nothing and the whole image was used.
    pub whole_image: bool,
    /// Whether the synthesized gradient was used as background.
    pub fallback_background: bool,
}

/// The background replacement engine.
///
/// Holds only configuration; every call detects and blends afresh, so one
/// engine can be shared across threads and reused for any number of images.
#[derive(Debug, Clone, Default)]
pub struct GeoMaskEngine {
    detector: DetectorConfig,
    composite: CompositeOptions,
}

impl GeoMaskEngine {
    /// Create an engine with the given detection and compositing parameters.
    #[must_use]
    pub fn new(detector: DetectorConfig, composite: CompositeOptions) -> Self {
        Self {
            detector,
            composite,
        }
    }

    /// Detect candidate regions. May be empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] if the image has a zero dimension.
    pub fn detect(&self, image: &RgbImage) -> Result<RegionSet> {
        detect_regions(image, &self.detector)
    }

    /// Detect regions, falling back to a single whole-image region when none are found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] if the image has a zero dimension.
    pub fn regions_or_whole(&self, image: &RgbImage) -> Result<RegionSet> {
        self.detect_with_fallback(image).map(|(regions, _)| regions)
    }

    fn detect_with_fallback(&self, image: &RgbImage) -> Result<(RegionSet, bool)> {
        let regions = self.detect(image)?;
        if regions.is_empty() {
            log::warn!("No windows detected, processing entire image");
            return Ok((vec![Region::whole(image.width(), image.height())], true));
        }
        Ok((regions, false))
    }

    /// Run the full pipeline on an in-memory image.
    ///
    /// `background` may be any size; it is resized to match `image`. When it is
    /// `None` the deterministic gradient is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] for zero-sized inputs and
    /// [`Error::InvalidKernelSize`] for a bad blur configuration.
    pub fn process(&self, image: &RgbImage, background: Option<&RgbImage>) -> Result<Replacement> {
        let (width, height) = image.dimensions();
        let (regions, whole_image) = self.detect_with_fallback(image)?;

        let (background, fallback_background) = match background {
            Some(bg) => (fit_background(bg, width, height)?, false),
            None => (synthesize_fallback_background(width, height)?, true),
        };

        let image = composite(image, &background, &regions, &self.composite)?;
        Ok(Replacement {
            image,
            regions,
            whole_image,
            fallback_background,
        })
    }

    /// Process a single image file: load, detect, composite, save.
    ///
    /// Returns a [`ProcessResult`] indicating success or failure. A background
    /// file that cannot be loaded is replaced by the gradient fallback rather
    /// than failing the run.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
        let rgb_img = match image::open(input) {
            Ok(img) => img.to_rgb8(),
            Err(e) => return ProcessResult::failed(input, format!("Failed to load: {e}")),
        };

        let background = opts.background.as_deref().and_then(|p| match image::open(p) {
            Ok(bg) => Some(bg.to_rgb8()),
            Err(e) => {
                log::warn!(
                    "Could not load background {}: {e}; using gradient fallback",
                    p.display()
                );
                None
            }
        });

        let replacement = match self.process(&rgb_img, background.as_ref()) {
            Ok(r) => r,
            Err(e) => return ProcessResult::failed(input, format!("Failed to process: {e}")),
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failed(
                        input,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        if let Err(e) = save_image(&replacement.image, output, opts.jpeg_quality) {
            return ProcessResult::failed(input, format!("Failed to save: {e}"));
        }
        log::info!("Processed image saved: {}", output.display());

        let mut message = format!("Replaced {} region(s)", replacement.regions.len());
        if replacement.whole_image {
            message.push_str(", whole image");
        }
        if replacement.fallback_background {
            message.push_str(", gradient background");
        }

        ProcessResult {
            path: input.to_path_buf(),
            success: true,
            regions: replacement.regions.len(),
            whole_image: replacement.whole_image,
            fallback_background: replacement.fallback_background,
            message,
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `parallel` feature is enabled (via rayon).
    /// Returns a [`ProcessResult`] for each image found.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let process_one = |input_path: &PathBuf| match input_path.file_name() {
            Some(filename) => self.process_file(input_path, &output_dir.join(filename), opts),
            None => ProcessResult::failed(input_path, "Entry has no file name".to_string()),
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(process_one).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            entries.iter().map(process_one).collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tif" | "tiff" | "gif"
        ),
        None => false,
    }
}

/// Save an RGB image, using `jpeg_quality` for JPEG output.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::io::BufWriter::new(std::fs::File::create(path)?);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(file, jpeg_quality.clamp(1, 100));
            encoder.encode_image(img)?;
        }
        ImageFormat::Png
        | ImageFormat::WebP
        | ImageFormat::Bmp
        | ImageFormat::Tiff
        | ImageFormat::Gif => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_geomasked.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_geomasked.{ext}"))
}
