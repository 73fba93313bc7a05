// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Region subtraction: slabs minus voids, re-partitioned into rectangles
//!
//! The pipeline for one axis is:
//! 1. subtract the void union from every structural rectangle
//! 2. slice each residual shape into bands along the minor axis
//! 3. merge bands with the same major span back into tall rectangles
//! 4. cut merged rectangles along split lines from void and rectangle edges
//! 5. drop rectangles below the size thresholds
//!
//! The same sweep, without step 4, turns the space between slabs inside the
//! building enclosure into beam rectangles.

use crate::bands::{band_decomposition, merge_bands};
use crate::bool2d::subtract_voids;
use crate::error::{Error, Result};
use crate::rect::{Axis, Rect};
use crate::split_lines::{generate_split_lines, merge_similar_lines, split_by_lines};
use serde::{Deserialize, Serialize};

/// Minimum size a rectangle must reach to be kept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeFilter {
    pub min_width: f64,
    pub min_height: f64,
    pub min_area: f64,
}

impl Default for SizeFilter {
    fn default() -> Self {
        Self {
            min_width: 20.0,
            min_height: 20.0,
            min_area: 500.0,
        }
    }
}

impl SizeFilter {
    pub fn accepts(&self, rect: &Rect) -> bool {
        rect.width() >= self.min_width
            && rect.height() >= self.min_height
            && rect.area() >= self.min_area
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("min_area", self.min_area),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for [`subtract`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtractOptions {
    #[serde(flatten)]
    pub size: SizeFilter,
    /// Largest minor-axis gap closed when merging bands (pixels)
    pub band_merge_epsilon: f64,
    /// Split lines closer than this collapse into one (pixels)
    pub split_line_tolerance: f64,
}

impl Default for SubtractOptions {
    fn default() -> Self {
        Self {
            size: SizeFilter::default(),
            band_merge_epsilon: 10.0,
            split_line_tolerance: 20.0,
        }
    }
}

impl SubtractOptions {
    pub fn validate(&self) -> Result<()> {
        self.size.validate()?;
        for (name, value) in [
            ("band_merge_epsilon", self.band_merge_epsilon),
            ("split_line_tolerance", self.split_line_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Remove void area from structural rectangles and re-partition the rest
///
/// Output rectangles never overlap a void with positive area. Rectangles
/// derived from one structural rectangle never overlap each other. An empty
/// input yields an empty output; a structural rectangle that a void covers
/// completely contributes nothing.
pub fn subtract(
    structural: &[Rect],
    voids: &[Rect],
    options: &SubtractOptions,
    axis: Axis,
) -> Vec<Rect> {
    if structural.is_empty() {
        return Vec::new();
    }

    let bands: Vec<Rect> = structural
        .iter()
        .flat_map(|rect| subtract_voids(rect, voids))
        .flat_map(|shape| band_decomposition(&shape, axis))
        .collect();

    let merged = merge_bands(&bands, axis, options.band_merge_epsilon, voids);

    let mut lines = generate_split_lines(voids, voids, axis);
    lines.extend(generate_split_lines(&merged, voids, axis));
    let lines = merge_similar_lines(lines, options.split_line_tolerance);

    let split = split_by_lines(&merged, &lines, axis, options.split_line_tolerance);
    let kept: Vec<Rect> = split
        .into_iter()
        .filter(|r| options.size.accepts(r))
        .collect();

    tracing::debug!(
        ?axis,
        input = structural.len(),
        voids = voids.len(),
        bands = bands.len(),
        merged = merged.len(),
        split_lines = lines.len(),
        kept = kept.len(),
        "Region subtraction complete"
    );

    kept
}

/// Decompose the part of `enclosure` not covered by `slabs` into beam rectangles
///
/// Uses the band sweep and merge of [`subtract`] without split lines.
pub fn derive_beams(
    enclosure: &Rect,
    slabs: &[Rect],
    filter: &SizeFilter,
    band_merge_epsilon: f64,
    axis: Axis,
) -> Vec<Rect> {
    let bands: Vec<Rect> = subtract_voids(enclosure, slabs)
        .iter()
        .flat_map(|shape| band_decomposition(shape, axis))
        .collect();

    let beams: Vec<Rect> = merge_bands(&bands, axis, band_merge_epsilon, slabs)
        .into_iter()
        .filter(|r| filter.accepts(r))
        .collect();

    tracing::debug!(?axis, slabs = slabs.len(), beams = beams.len(), "Derived beams");

    beams
}
