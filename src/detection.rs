//! Window-like region detection from raw pixels.
//!
//! Detection is a classical edge/contour heuristic:
//! 1. **Luminance**: reduce RGB to a single channel (`0.299*R + 0.587*G + 0.114*B`)
//! 2. **Canny**: dual-threshold hysteresis edge map
//! 3. **Outer contours**: boundaries of connected edge groups, holes ignored
//! 4. **Filters**: enclosed area and bounding-box aspect ratio
//! 5. **Merge**: overlapping survivors are consolidated (see [`crate::merge`])
//!
//! The result is best-effort: real windows may be missed and other rectangular
//! structures may be reported.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::edges::canny;
use imageproc::point::Point;

use crate::error::{ensure_non_empty, Result};
use crate::merge::{merge_regions, MergeMode};
use crate::region::{Region, RegionSet};

/// Tunable parameters for region detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Canny low hysteresis threshold (8-bit scale).
    pub canny_low: f32,
    /// Canny high hysteresis threshold (8-bit scale).
    pub canny_high: f32,
    /// Contours enclosing fewer pixels than this are treated as noise.
    pub min_area: f64,
    /// Exclusive lower bound on bounding-box `width / height`.
    pub min_aspect: f64,
    /// Exclusive upper bound on bounding-box `width / height`.
    pub max_aspect: f64,
    /// How surviving candidates are consolidated.
    pub merge_mode: MergeMode,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            min_area: 1000.0,
            min_aspect: 0.5,
            max_aspect: 3.0,
            merge_mode: MergeMode::Greedy,
        }
    }
}

/// Convert an RGB image to 8-bit luminance.
///
/// Uses the BT.601 weights `0.299*R + 0.587*G + 0.114*B`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_luminance(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let px = img.get_pixel(x, y);
        let lum = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
        Luma([lum.round().clamp(0.0, 255.0) as u8])
    })
}

/// Area enclosed by a closed polygon (shoelace formula).
fn polygon_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0_f64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y);
    }
    twice_area.abs() / 2.0
}

/// Inclusive-pixel bounding rectangle of a point set.
fn bounding_rect(points: &[Point<u32>]) -> Option<Region> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Region::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Outer contours of the edge map, skipping holes and anything nested in them.
fn outer_contours(edges: &GrayImage) -> impl Iterator<Item = Contour<u32>> {
    find_contours::<u32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
}

/// Apply the area and aspect-ratio filters to a single contour.
fn candidate_from_contour(contour: &Contour<u32>, config: &DetectorConfig) -> Option<Region> {
    let area = polygon_area(&contour.points);
    if !area.is_finite() || area < config.min_area {
        return None;
    }

    let rect = bounding_rect(&contour.points)?;
    let aspect = f64::from(rect.width) / f64::from(rect.height);
    (aspect > config.min_aspect && aspect < config.max_aspect).then_some(rect)
}

/// Detect candidate replaceable regions in an image.
///
/// Returns an empty set when nothing survives the filters; callers decide how
/// to treat that (the engine falls back to the whole image).
///
/// # Errors
///
/// Returns [`Error::InvalidImage`](crate::Error::InvalidImage) if either
/// dimension of `image` is zero.
pub fn detect_regions(image: &RgbImage, config: &DetectorConfig) -> Result<RegionSet> {
    ensure_non_empty(image.width(), image.height())?;

    let gray = to_luminance(image);
    let edges = canny(&gray, config.canny_low, config.canny_high);

    let mut contour_count = 0usize;
    let candidates: Vec<Region> = outer_contours(&edges)
        .inspect(|_| contour_count += 1)
        .filter_map(|c| candidate_from_contour(&c, config))
        .collect();
    log::debug!(
        "{contour_count} outer contours, {} candidates after filtering",
        candidates.len()
    );

    let regions = merge_regions(&candidates, config.merge_mode);
    log::info!("Detected {} window regions", regions.len());
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn pt(x: u32, y: u32) -> Point<u32> {
        Point::new(x, y)
    }

    #[test]
    fn luminance_uses_bt601_weights() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        assert_eq!(to_luminance(&img).get_pixel(0, 0)[0], 76);

        let white = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        assert_eq!(to_luminance(&white).get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn polygon_area_of_square_outline() {
        let square = [pt(0, 0), pt(10, 0), pt(10, 10), pt(0, 10)];
        assert!((polygon_area(&square) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn polygon_area_of_degenerate_shapes_is_zero() {
        assert!(polygon_area(&[]).abs() < f64::EPSILON);
        assert!(polygon_area(&[pt(1, 1), pt(5, 5)]).abs() < f64::EPSILON);
        assert!(polygon_area(&[pt(0, 0), pt(5, 0), pt(10, 0)]).abs() < f64::EPSILON);
    }

    #[test]
    fn bounding_rect_includes_both_end_pixels() {
        let pts = [pt(3, 4), pt(12, 4), pt(12, 9), pt(3, 9)];
        assert_eq!(bounding_rect(&pts), Some(Region::new(3, 4, 10, 6)));
        assert_eq!(bounding_rect(&[]), None);
    }

    #[test]
    fn candidate_filter_rejects_small_and_elongated_shapes() {
        let config = DetectorConfig::default();
        let contour = |points: Vec<Point<u32>>| Contour {
            points,
            border_type: BorderType::Outer,
            parent: None,
        };

        let small = contour(vec![pt(0, 0), pt(20, 0), pt(20, 20), pt(0, 20)]);
        assert_eq!(candidate_from_contour(&small, &config), None);

        let wide = contour(vec![pt(0, 0), pt(200, 0), pt(200, 40), pt(0, 40)]);
        assert_eq!(candidate_from_contour(&wide, &config), None);

        let tall = contour(vec![pt(0, 0), pt(40, 0), pt(40, 200), pt(0, 200)]);
        assert_eq!(candidate_from_contour(&tall, &config), None);

        let window = contour(vec![pt(10, 10), pt(70, 10), pt(70, 60), pt(10, 60)]);
        assert_eq!(
            candidate_from_contour(&window, &config),
            Some(Region::new(10, 10, 61, 51))
        );
    }

    #[test]
    fn uniform_image_has_no_regions() {
        let img = RgbImage::from_pixel(120, 90, Rgb([90, 140, 200]));
        let regions = detect_regions(&img, &DetectorConfig::default()).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let img = RgbImage::new(0, 10);
        assert!(detect_regions(&img, &DetectorConfig::default()).is_err());
    }

    #[test]
    fn bright_rectangle_on_dark_field_is_detected() {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([20, 20, 20]));
        draw_filled_rect_mut(&mut img, Rect::at(50, 60).of_size(80, 60), Rgb([240, 240, 240]));

        let regions = detect_regions(&img, &DetectorConfig::default()).unwrap();
        assert!(!regions.is_empty());
        for r in &regions {
            assert!(r.fits_within(200, 200), "{r:?} escapes the image");
        }
        let hit = regions
            .iter()
            .find(|r| r.x <= 90 && r.y <= 90 && r.right() > 90 && r.bottom() > 90)
            .expect("rectangle centre should be covered");
        assert!(hit.width >= 70 && hit.width <= 90, "{hit:?}");
        assert!(hit.height >= 50 && hit.height <= 70, "{hit:?}");
    }

    #[test]
    fn raising_min_area_suppresses_detection() {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([20, 20, 20]));
        draw_filled_rect_mut(&mut img, Rect::at(50, 60).of_size(80, 60), Rgb([240, 240, 240]));

        let config = DetectorConfig {
            min_area: 50_000.0,
            ..DetectorConfig::default()
        };
        assert!(detect_regions(&img, &config).unwrap().is_empty());
    }
}
