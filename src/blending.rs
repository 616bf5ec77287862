//! Alpha blending math for background replacement.
//!
//! Each region is composited with forward alpha blending:
//! `output = mask * original + (1 - mask) * background`
//!
//! The mask is radial: 1 at the block centre (keep the original), falling to 0
//! at the corners (take the background), then Gaussian-smoothed to hide seams.

use crate::error::{Error, Result};

/// A per-region weight map in `[0, 1]`, stored row-major.
///
/// Weight 1 keeps the original pixel, weight 0 takes the background.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendMask {
    weights: Vec<f32>,
    width: u32,
    height: u32,
}

impl BlendMask {
    /// Build the smoothed radial mask for a `width x height` block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKernelSize`] if `kernel_size` is even or zero.
    pub fn radial(width: u32, height: u32, kernel_size: u32) -> Result<Self> {
        let kernel = gaussian_kernel(kernel_size)?;
        let raw = radial_weights(width, height);
        let mut weights = separable_blur(&raw, width as usize, height as usize, &kernel);
        for w in &mut weights {
            *w = w.clamp(0.0, 1.0);
        }
        Ok(Self {
            weights,
            width,
            height,
        })
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Weight at `(x, y)` within the block.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.weights[y as usize * self.width as usize + x as usize]
    }

    /// All weights, row-major.
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Unsmoothed radial weights: `1 - d / max_distance`, clamped at 0.
///
/// The centre is `(width / 2, height / 2)` in integer division. A 1x1 block has
/// no extent to fade over and keeps the original.
#[allow(clippy::cast_precision_loss)]
fn radial_weights(width: u32, height: u32) -> Vec<f32> {
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;
    let max_distance = (cx * cx + cy * cy).sqrt();

    let mut weights = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            if max_distance <= f32::EPSILON {
                weights.push(1.0);
                continue;
            }
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let distance = (dx * dx + dy * dy).sqrt();
            weights.push((1.0 - distance / max_distance).max(0.0));
        }
    }
    weights
}

/// Normalized 1D Gaussian kernel of odd length `size`.
///
/// Sigma follows the usual "derive from kernel size" rule:
/// `sigma = 0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
fn gaussian_kernel(size: u32) -> Result<Vec<f32>> {
    if size == 0 || size % 2 == 0 {
        return Err(Error::InvalidKernelSize(size));
    }
    #[allow(clippy::cast_precision_loss)]
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    #[allow(clippy::cast_possible_wrap)]
    let half = (size / 2) as i32;

    #[allow(clippy::cast_precision_loss)]
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    Ok(kernel)
}

/// Map an out-of-range index back inside `[0, len)` by mirroring about the
/// edge samples without repeating them (`-1 -> 1`, `len -> len - 2`).
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

/// Convolve a row-major 2D field with `kernel` horizontally, then vertically.
#[allow(clippy::cast_possible_wrap)]
fn separable_blur(data: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    if kernel.len() <= 1 || data.is_empty() {
        return data.to_vec();
    }
    let half = (kernel.len() / 2) as isize;

    let mut horizontal = vec![0.0_f32; data.len()];
    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        for x in 0..width {
            let centre = x as isize;
            horizontal[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let offset = k as isize - half;
                    weight * row[reflect_101(centre + offset, width)]
                })
                .sum();
        }
    }

    let mut result = vec![0.0_f32; data.len()];
    for y in 0..height {
        let centre = y as isize;
        for x in 0..width {
            result[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let offset = k as isize - half;
                    weight * horizontal[reflect_101(centre + offset, height) * width + x]
                })
                .sum();
        }
    }
    result
}

/// Blend one channel value: `original * mask + background * (1 - mask)`, truncated.
///
/// Evaluated as `background + (original - background) * mask` so identical
/// inputs come back unchanged for any mask value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend_channel(original: u8, background: u8, mask: f32) -> u8 {
    let o = f32::from(original);
    let b = f32::from(background);
    let value = b + (o - b) * mask;
    value.clamp(0.0, 255.0) as u8
}
