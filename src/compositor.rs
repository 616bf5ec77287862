//! Region compositing: blend a background into the original at each region.

use image::{Rgb, RgbImage};

use crate::blending::{blend_channel, BlendMask};
use crate::error::{ensure_non_empty, Error, Result};
use crate::region::Region;

/// Options controlling region compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeOptions {
    /// Side of the square Gaussian kernel used to smooth each mask. Must be odd.
    pub blur_kernel_size: u32,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            blur_kernel_size: 15,
        }
    }
}

/// A blended block ready to be written back into the output.
struct BlendedBlock {
    region: Region,
    pixels: Vec<Rgb<u8>>,
}

/// Extract, mask and blend one (already clamped) region.
fn blend_region(
    original: &RgbImage,
    background: &RgbImage,
    region: Region,
    kernel_size: u32,
) -> Result<BlendedBlock> {
    let mask = BlendMask::radial(region.width, region.height, kernel_size)?;

    let mut pixels = Vec::with_capacity(region.area() as usize);
    for dy in 0..region.height {
        for dx in 0..region.width {
            let o = original.get_pixel(region.x + dx, region.y + dy);
            let b = background.get_pixel(region.x + dx, region.y + dy);
            let m = mask.get(dx, dy);
            pixels.push(Rgb([
                blend_channel(o[0], b[0], m),
                blend_channel(o[1], b[1], m),
                blend_channel(o[2], b[2], m),
            ]));
        }
    }
    Ok(BlendedBlock { region, pixels })
}

fn write_block(output: &mut RgbImage, block: &BlendedBlock) {
    let r = block.region;
    for (i, px) in block.pixels.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let (dx, dy) = ((i as u32) % r.width, (i as u32) / r.width);
        output.put_pixel(r.x + dx, r.y + dy, *px);
    }
}

/// Blend `background` into a copy of `original` at every region.
///
/// Regions are clipped to the image first; those left with no area are
/// skipped. Every block is computed from the untouched original, so where
/// regions overlap the later region in `regions` wins. `original` is never
/// modified.
///
/// With the `parallel` feature, blocks are blended concurrently on the rayon
/// pool and written back in region order once all of them are done.
///
/// # Errors
///
/// - [`Error::InvalidImage`] if `original` has a zero dimension.
/// - [`Error::DimensionMismatch`] if `background` is not the same size as `original`.
/// - [`Error::InvalidKernelSize`] if the configured blur kernel is even or zero.
pub fn composite(
    original: &RgbImage,
    background: &RgbImage,
    regions: &[Region],
    opts: &CompositeOptions,
) -> Result<RgbImage> {
    let (width, height) = original.dimensions();
    ensure_non_empty(width, height)?;
    if background.dimensions() != (width, height) {
        return Err(Error::DimensionMismatch {
            expected: (width, height),
            actual: background.dimensions(),
        });
    }

    let clamped: Vec<Region> = regions
        .iter()
        .filter_map(|r| {
            let c = r.clamp_to(width, height);
            if c.is_none() {
                log::debug!("Skipping region {r:?}: nothing inside {width}x{height}");
            }
            c
        })
        .collect();

    let kernel = opts.blur_kernel_size;

    #[cfg(feature = "parallel")]
    let blocks: Vec<BlendedBlock> = {
        use rayon::prelude::*;
        clamped
            .par_iter()
            .map(|&r| blend_region(original, background, r, kernel))
            .collect::<Result<_>>()?
    };

    #[cfg(not(feature = "parallel"))]
    let blocks: Vec<BlendedBlock> = clamped
        .iter()
        .map(|&r| blend_region(original, background, r, kernel))
        .collect::<Result<_>>()?;

    let mut output = original.clone();
    for block in &blocks {
        write_block(&mut output, block);
    }
    log::debug!("Composited {} of {} regions", blocks.len(), regions.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::synthesize_fallback_background;

    fn checker(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgb([v, v.wrapping_mul(3), 255 - v])
        })
    }

    #[test]
    fn black_original_white_background_scenario() {
        let original = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let background = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let regions = [Region::new(25, 25, 50, 50)];

        let out = composite(&original, &background, &regions, &CompositeOptions::default()).unwrap();

        let centre = out.get_pixel(50, 50);
        let corner = out.get_pixel(25, 25);
        for ch in 0..3 {
            assert!(centre[ch] < 128, "centre should stay dark, got {centre:?}");
            assert!(corner[ch] > 128, "corner should take background, got {corner:?}");
        }
        // Outside every region the original survives.
        assert_eq!(*out.get_pixel(10, 10), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(80, 80), Rgb([0, 0, 0]));
    }

    #[test]
    fn identical_background_leaves_image_unchanged() {
        let img = checker(64, 48);
        let regions = [Region::new(5, 5, 30, 20), Region::new(20, 10, 40, 35)];
        let out = composite(&img, &img, &regions, &CompositeOptions::default()).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn original_is_not_mutated() {
        let img = checker(40, 40);
        let before = img.clone();
        let bg = synthesize_fallback_background(40, 40).unwrap();
        let out = composite(&img, &bg, &[Region::whole(40, 40)], &CompositeOptions::default())
            .unwrap();
        assert_eq!(img.as_raw(), before.as_raw());
        assert_ne!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn mismatched_background_is_rejected() {
        let img = checker(40, 30);
        let bg = checker(30, 40);
        let err = composite(&img, &bg, &[], &CompositeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: (40, 30),
                actual: (30, 40)
            }
        ));
    }

    #[test]
    fn out_of_bounds_regions_are_clipped_or_skipped() {
        let original = RgbImage::from_pixel(50, 50, Rgb([0, 0, 0]));
        let background = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        let regions = [
            Region::new(40, 40, 100, 100),
            Region::new(60, 0, 10, 10),
            Region::new(0, 0, 0, 10),
        ];
        let out = composite(&original, &background, &regions, &CompositeOptions::default())
            .unwrap();
        assert_eq!(out.dimensions(), (50, 50));
        // Corner of the clipped 10x10 block fades to background.
        assert!(out.get_pixel(40, 40)[0] > 128);
        assert_eq!(*out.get_pixel(10, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn empty_region_set_returns_copy() {
        let img = checker(16, 16);
        let bg = synthesize_fallback_background(16, 16).unwrap();
        let out = composite(&img, &bg, &[], &CompositeOptions::default()).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn even_kernel_size_is_rejected() {
        let img = checker(16, 16);
        let opts = CompositeOptions {
            blur_kernel_size: 8,
        };
        let err = composite(&img, &img, &[Region::whole(16, 16)], &opts).unwrap_err();
        assert!(matches!(err, Error::InvalidKernelSize(8)));
    }

    #[test]
    fn later_region_wins_where_regions_overlap() {
        let original = RgbImage::from_pixel(60, 60, Rgb([0, 0, 0]));
        let background = RgbImage::from_pixel(60, 60, Rgb([255, 255, 255]));
        let a = Region::new(0, 0, 40, 40);
        let b = Region::new(20, 20, 40, 40);

        let opts = CompositeOptions::default();
        let ab = composite(&original, &background, &[a, b], &opts).unwrap();
        let only_b = composite(&original, &background, &[b], &opts).unwrap();
        for y in 20..60 {
            for x in 20..60 {
                assert_eq!(ab.get_pixel(x, y), only_b.get_pixel(x, y));
            }
        }
    }
}
