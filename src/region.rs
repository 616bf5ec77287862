//! Axis-aligned rectangular regions in image coordinates.

/// An axis-aligned rectangle `(x, y, width, height)` eligible for background replacement.
///
/// Regions produced by detection always lie fully inside the image they were
/// detected in and have non-zero size. Regions supplied by callers are clipped
/// with [`Region::clamp_to`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// X coordinate of the top-left corner.
    pub x: u32,
    /// Y coordinate of the top-left corner.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// An ordered sequence of regions produced by one detection pass.
pub type RegionSet = Vec<Region>;

impl Region {
    /// Create a region from its top-left corner and size.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region covering an entire `width x height` image.
    #[must_use]
    pub const fn whole(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Pixel area, `width * height`.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the region has a zero dimension.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Strict axis-aligned box intersection. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Region) -> bool {
        u64::from(self.x) < other.right()
            && self.right() > u64::from(other.x)
            && u64::from(self.y) < other.bottom()
            && self.bottom() > u64::from(other.y)
    }

    /// Smallest region containing both `self` and `other`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn union(&self, other: &Region) -> Region {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Region::new(
            x,
            y,
            (right - u64::from(x)).min(u64::from(u32::MAX)) as u32,
            (bottom - u64::from(y)).min(u64::from(u32::MAX)) as u32,
        )
    }

    /// Whether the region lies fully inside a `width x height` image.
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty() && self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }

    /// Clip the region to a `width x height` image.
    ///
    /// Returns `None` when nothing of the region remains inside the image.
    #[must_use]
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Region> {
        if self.x >= width || self.y >= height {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let x2 = self.right().min(u64::from(width)) as u32;
        #[allow(clippy::cast_possible_truncation)]
        let y2 = self.bottom().min(u64::from(height)) as u32;
        let clipped = Region::new(self.x, self.y, x2 - self.x, y2 - self.y);
        (!clipped.is_empty()).then_some(clipped)
    }
}

impl From<(u32, u32, u32, u32)> for Region {
    fn from((x, y, width, height): (u32, u32, u32, u32)) -> Self {
        Region::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_shared_interior() {
        let a = Region::new(0, 0, 100, 100);
        assert!(a.overlaps(&Region::new(50, 50, 100, 100)));
        assert!(!a.overlaps(&Region::new(100, 0, 10, 10)), "touching edges");
        assert!(!a.overlaps(&Region::new(0, 200, 10, 10)));
    }

    #[test]
    fn union_is_bounding_rectangle() {
        let a = Region::new(0, 0, 100, 100);
        let b = Region::new(50, 50, 100, 100);
        assert_eq!(a.union(&b), Region::new(0, 0, 150, 150));
        assert_eq!(b.union(&a), Region::from((0, 0, 150, 150)));
    }

    #[test]
    fn clamp_clips_to_image_bounds() {
        let r = Region::new(80, 90, 50, 50);
        assert_eq!(r.clamp_to(100, 100), Some(Region::new(80, 90, 20, 10)));
        assert_eq!(Region::new(10, 10, 5, 5).clamp_to(100, 100), Some(Region::new(10, 10, 5, 5)));
    }

    #[test]
    fn clamp_drops_regions_outside_or_degenerate() {
        assert_eq!(Region::new(100, 0, 10, 10).clamp_to(100, 100), None);
        assert_eq!(Region::new(0, 0, 0, 10).clamp_to(100, 100), None);
    }

    #[test]
    fn fits_within_checks_every_edge() {
        assert!(Region::whole(64, 48).fits_within(64, 48));
        assert!(!Region::new(1, 0, 64, 48).fits_within(64, 48));
        assert!(!Region::new(0, 0, 0, 1).fits_within(64, 48));
    }

    #[test]
    fn area_does_not_overflow() {
        let r = Region::new(0, 0, u32::MAX, u32::MAX);
        assert_eq!(r.area(), u64::from(u32::MAX) * u64::from(u32::MAX));
    }
}
