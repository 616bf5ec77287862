//! Replacement backgrounds: the procedural fallback and call-site resizing.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::error::{ensure_non_empty, Result};

/// Top-row color of the fallback gradient.
const GRADIENT_TOP: [f32; 3] = [100.0, 150.0, 200.0];

/// Per-channel increase from the top row towards the (never reached) bottom edge.
const GRADIENT_SPAN: [f32; 3] = [155.0, 105.0, 55.0];

/// Produce the deterministic fallback background of the given size.
///
/// Every pixel of row `y` is `top + span * (y / height)`, truncated, running
/// from a cool blue at the top towards a light tone at the bottom. The ratio
/// uses `height` (not `height - 1`) as denominator, so the last row stops just
/// short of the maximum channel values.
///
/// # Errors
///
/// Returns [`Error::InvalidImage`](crate::Error::InvalidImage) if either
/// dimension is zero.
pub fn synthesize_fallback_background(width: u32, height: u32) -> Result<RgbImage> {
    ensure_non_empty(width, height)?;

    let rows: Vec<Rgb<u8>> = (0..height).map(|y| gradient_row_color(y, height)).collect();
    Ok(RgbImage::from_fn(width, height, |_, y| rows[y as usize]))
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn gradient_row_color(y: u32, height: u32) -> Rgb<u8> {
    let ratio = y as f32 / height as f32;
    Rgb(std::array::from_fn(|ch| {
        let value = GRADIENT_TOP[ch] + GRADIENT_SPAN[ch] * ratio;
        value.clamp(0.0, 255.0) as u8
    }))
}

/// Resize an externally supplied background to exactly `width x height`.
///
/// Uses bilinear filtering and ignores aspect ratio, matching the original's
/// dimensions is all that matters for compositing. Returns a copy when the
/// sizes already agree.
///
/// # Errors
///
/// Returns [`Error::InvalidImage`](crate::Error::InvalidImage) if the target
/// or the source has a zero dimension.
pub fn fit_background(background: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    ensure_non_empty(width, height)?;
    ensure_non_empty(background.width(), background.height())?;

    if background.dimensions() == (width, height) {
        return Ok(background.clone());
    }
    log::debug!(
        "Resizing background {}x{} -> {width}x{height}",
        background.width(),
        background.height()
    );
    Ok(imageops::resize(background, width, height, FilterType::Triangle))
}
