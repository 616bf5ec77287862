//! Replace window-like background regions in photos to strip geolocation cues.
//!
//! The engine finds rectangular, window-like regions with a classical
//! edge/contour heuristic, then blends a replacement background into each one
//! through a smooth radial mask, so the centre of a region keeps more of the
//! original and its edges fade into the replacement.
//!
//! # Quick Start
//!
//! ```no_run
//! use geomask::GeoMaskEngine;
//!
//! let engine = GeoMaskEngine::default();
//! let img = image::open("photo.jpg").unwrap().to_rgb8();
//! let out = engine.process(&img, None).expect("processing failed");
//! out.image.save("masked.jpg").unwrap();
//! ```
//!
//! # Building blocks
//!
//! The pipeline stages are usable on their own. Detection may return an empty
//! set; deciding what to do then is up to the caller.
//!
//! ```no_run
//! use geomask::{composite, detect_regions, synthesize_fallback_background};
//! use geomask::{CompositeOptions, DetectorConfig, Region};
//!
//! let img = image::open("photo.jpg").unwrap().to_rgb8();
//! let (w, h) = img.dimensions();
//! let mut regions = detect_regions(&img, &DetectorConfig::default()).unwrap();
//! if regions.is_empty() {
//!     regions.push(Region::whole(w, h));
//! }
//! let bg = synthesize_fallback_background(w, h).unwrap();
//! let out = composite(&img, &bg, &regions, &CompositeOptions::default()).unwrap();
//! ```

#![deny(missing_docs)]

pub mod background;
pub mod blending;
pub mod compositor;
pub mod detection;
mod engine;
pub mod error;
pub mod merge;
pub mod region;

pub use background::{fit_background, synthesize_fallback_background};
pub use blending::BlendMask;
pub use compositor::{composite, CompositeOptions};
pub use detection::{detect_regions, DetectorConfig};
pub use engine::{
    default_output_path, is_supported_image, save_image, GeoMaskEngine, ProcessOptions,
    ProcessResult, Replacement, DEFAULT_JPEG_QUALITY,
};
pub use error::{Error, Result};
pub use merge::{merge_regions, MergeMode};
pub use region::{Region, RegionSet};
