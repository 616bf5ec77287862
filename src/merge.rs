//! Consolidation of overlapping candidate regions.
//!
//! The default [`MergeMode::Greedy`] pass sorts candidates by area (largest
//! first) and folds each one into the first accumulated region it overlaps.
//! A candidate is merged against at most one accumulated region, so chains of
//! three or more mutually overlapping rectangles can leave residual overlap.
//! [`MergeMode::Strict`] repeats the pass until the set stops shrinking.

use crate::region::{Region, RegionSet};

/// Strategy used to consolidate overlapping regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Single greedy pass; order-dependent, may leave overlaps.
    #[default]
    Greedy,
    /// Greedy passes repeated to a fixed point; no two output regions overlap.
    Strict,
}

/// Merge overlapping regions using the given strategy.
///
/// The output never holds more regions than the input.
#[must_use]
pub fn merge_regions(regions: &[Region], mode: MergeMode) -> RegionSet {
    match mode {
        MergeMode::Greedy => merge_greedy(regions),
        MergeMode::Strict => merge_strict(regions),
    }
}

/// One greedy merge pass, largest regions first.
#[must_use]
pub fn merge_greedy(regions: &[Region]) -> RegionSet {
    let mut sorted = regions.to_vec();
    // Stable sort keeps input order among equal areas.
    sorted.sort_by(|a, b| b.area().cmp(&a.area()));

    let mut merged: RegionSet = Vec::with_capacity(sorted.len());
    for region in sorted {
        match merged.iter_mut().find(|m| region.overlaps(m)) {
            Some(existing) => *existing = region.union(existing),
            None => merged.push(region),
        }
    }
    merged
}

fn merge_strict(regions: &[Region]) -> RegionSet {
    let mut current = merge_greedy(regions);
    loop {
        let next = merge_greedy(&current);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}
