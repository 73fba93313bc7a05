// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Void Subtraction
//!
//! Subtracts the union of void rectangles from a structural rectangle using
//! the i_overlay crate. The residual region may be non-rectangular, have
//! holes, or fall apart into several shapes; callers re-partition it into
//! rectangles with [`crate::bands`].

use crate::rect::Rect;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Boolean results are snapped back onto input edge coordinates within this distance
const SNAP_TOLERANCE: f64 = 1e-3;

/// Minimum area threshold - contours smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-6;

/// One connected piece of a residual region: outer contour first, then holes
pub type Shape = Vec<Vec<Point2<f64>>>;

/// Subtract the union of `voids` from `rect`
///
/// Returns an empty list when the voids cover the rectangle entirely.
/// Voids that do not overlap the rectangle with positive area are ignored,
/// and a rectangle without overlapping voids comes back as a single
/// rectangular shape without going through the boolean engine.
pub fn subtract_voids(rect: &Rect, voids: &[Rect]) -> Vec<Shape> {
    if !rect.has_area() {
        return Vec::new();
    }

    let relevant: Vec<&Rect> = voids.iter().filter(|v| v.overlaps(rect)).collect();

    if relevant.is_empty() {
        return vec![vec![rect.corners().to_vec()]];
    }

    if relevant.iter().any(|v| v.contains(rect)) {
        return Vec::new();
    }

    let clip = union_voids(&relevant);
    let subject = vec![rect_to_path(rect)];

    // NonZero so that the clip contours act as the union computed above
    let result = subject.overlay(&clip, OverlayRule::Difference, FillRule::NonZero);

    let snap = SnapGrid::new(rect, &relevant);
    result
        .into_iter()
        .filter_map(|shape| {
            let contours: Shape = shape
                .into_iter()
                .map(|contour| {
                    contour
                        .into_iter()
                        .map(|p| Point2::new(snap.x(p[0]), snap.y(p[1])))
                        .collect::<Vec<_>>()
                })
                .filter(|c| is_valid_contour(c))
                .collect();
            (!contours.is_empty()).then_some(contours)
        })
        .collect()
}

/// Union overlapping voids into a set of clip contours
///
/// Every input path is counter-clockwise; the union output keeps holes
/// opposite to their outer contour, so NonZero filling of the flattened
/// contours reproduces the union exactly.
fn union_voids(voids: &[&Rect]) -> Vec<Vec<[f64; 2]>> {
    let paths: Vec<Vec<[f64; 2]>> = voids.iter().map(|v| rect_to_path(v)).collect();
    if paths.len() == 1 {
        return paths;
    }

    let subject = vec![paths[0].clone()];
    let clip: Vec<Vec<[f64; 2]>> = paths[1..].to_vec();
    let union = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    union.into_iter().flatten().filter(|c| c.len() >= 3).collect()
}

/// Total area of a shape (outer area minus holes)
pub fn shape_area(shape: &[Vec<Point2<f64>>]) -> f64 {
    let mut contours = shape.iter();
    let outer = contours
        .next()
        .map(|c| compute_signed_area(c).abs())
        .unwrap_or(0.0);
    let holes: f64 = contours.map(|c| compute_signed_area(c).abs()).sum();
    outer - holes
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }
    compute_signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Convert a rectangle to a counter-clockwise i_overlay path
fn rect_to_path(rect: &Rect) -> Vec<[f64; 2]> {
    rect.corners().iter().map(|p| [p.x, p.y]).collect()
}

/// Edge coordinates of the operands; every vertex of a rectilinear boolean
/// result lies on one of them.
struct SnapGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SnapGrid {
    fn new(rect: &Rect, voids: &[&Rect]) -> Self {
        let mut xs = vec![rect.x_min, rect.x_max];
        let mut ys = vec![rect.y_min, rect.y_max];
        for v in voids {
            xs.extend([v.x_min, v.x_max]);
            ys.extend([v.y_min, v.y_max]);
        }
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        ys.sort_by(f64::total_cmp);
        ys.dedup();
        Self { xs, ys }
    }

    fn x(&self, value: f64) -> f64 {
        snap_to(&self.xs, value)
    }

    fn y(&self, value: f64) -> f64 {
        snap_to(&self.ys, value)
    }
}

fn snap_to(sorted: &[f64], value: f64) -> f64 {
    let idx = sorted.partition_point(|&v| v < value);
    let below = idx.checked_sub(1).map(|i| sorted[i]);
    let above = sorted.get(idx).copied();
    [below, above]
        .into_iter()
        .flatten()
        .filter(|c| (c - value).abs() <= SNAP_TOLERANCE)
        .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
        .unwrap_or(value)
}
