// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned rectangles, 1D spans and the axis abstraction
//!
//! Every algorithm in this workspace is written once against [`Axis`]:
//! the *major* coordinate runs along the axis being processed (the
//! direction annotation lines are drawn in) and the *minor* coordinate
//! runs across it. A horizontal pass therefore reads `x` as major and
//! `y` as minor; a vertical pass swaps the two.

use crate::error::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A closed interval `[lo, hi]` on one coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    /// Create a span, swapping the bounds if they are given reversed
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn len(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    pub fn center(&self) -> f64 {
        (self.lo + self.hi) * 0.5
    }

    /// Length of the intersection with `other` (zero when disjoint or touching)
    pub fn overlap(&self, other: &Span) -> f64 {
        (self.hi.min(other.hi) - self.lo.max(other.lo)).max(0.0)
    }

    /// Smallest span covering both
    pub fn union(&self, other: &Span) -> Span {
        Span {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }
}

/// Processing axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Extent of `rect` along this axis
    pub fn major(self, rect: &Rect) -> Span {
        match self {
            Axis::Horizontal => Span { lo: rect.x_min, hi: rect.x_max },
            Axis::Vertical => Span { lo: rect.y_min, hi: rect.y_max },
        }
    }

    /// Extent of `rect` across this axis
    pub fn minor(self, rect: &Rect) -> Span {
        self.perpendicular().major(rect)
    }

    /// Build a rectangle from its major and minor extents
    pub fn rect(self, major: Span, minor: Span) -> Rect {
        match self {
            Axis::Horizontal => Rect::from_spans(major, minor),
            Axis::Vertical => Rect::from_spans(minor, major),
        }
    }

    pub fn major_of(self, p: &Point2<f64>) -> f64 {
        match self {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        }
    }

    pub fn minor_of(self, p: &Point2<f64>) -> f64 {
        self.perpendicular().major_of(p)
    }

    /// Point with the given major/minor coordinates, in x/y space
    pub fn point(self, major: f64, minor: f64) -> Point2<f64> {
        match self {
            Axis::Horizontal => Point2::new(major, minor),
            Axis::Vertical => Point2::new(minor, major),
        }
    }
}

/// Axis-aligned rectangle `(x_min, y_min, x_max, y_max)` in page pixels
///
/// Serializes as a 4-element array, the format produced by the external
/// rectangle and void detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    /// Create a rectangle from two opposite corners in any order
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::from_spans(Span::new(x1, x2), Span::new(y1, y2))
    }

    pub fn from_spans(x: Span, y: Span) -> Self {
        Self {
            x_min: x.lo,
            y_min: y.lo,
            x_max: x.hi,
            y_max: y.hi,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }

    /// True when the rectangle encloses a positive area
    pub fn has_area(&self) -> bool {
        self.x_max > self.x_min && self.y_max > self.y_min
    }

    /// Wider than tall: the orientation used for the load-direction heuristic
    pub fn is_wide(&self) -> bool {
        self.width() > self.height()
    }

    /// Area shared with `other`; touching edges share none
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = Axis::Horizontal.major(self).overlap(&Axis::Horizontal.major(other));
        let h = Axis::Vertical.major(self).overlap(&Axis::Vertical.major(other));
        w * h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlap_area(other) > 0.0
    }

    /// True when `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        self.x_min <= other.x_min
            && self.y_min <= other.y_min
            && self.x_max >= other.x_max
            && self.y_max >= other.y_max
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Bounding rectangle of a set, `None` when the set is empty
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc, r| match acc {
            None => Some(*r),
            Some(b) => Some(b.union(r)),
        })
    }

    /// Counter-clockwise corner loop (y pointing up)
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.x_min, self.y_min),
            Point2::new(self.x_max, self.y_min),
            Point2::new(self.x_max, self.y_max),
            Point2::new(self.x_min, self.y_max),
        ]
    }

    /// Total order on the coordinates, major extent first
    pub fn cmp_along(&self, other: &Rect, axis: Axis) -> Ordering {
        let (a_major, b_major) = (axis.major(self), axis.major(other));
        let (a_minor, b_minor) = (axis.minor(self), axis.minor(other));
        a_major
            .lo
            .total_cmp(&b_major.lo)
            .then(a_minor.lo.total_cmp(&b_minor.lo))
            .then(a_major.hi.total_cmp(&b_major.hi))
            .then(a_minor.hi.total_cmp(&b_minor.hi))
    }
}

impl TryFrom<[f64; 4]> for Rect {
    type Error = Error;

    fn try_from(value: [f64; 4]) -> Result<Self> {
        if let Some(bad) = value.iter().find(|v| !v.is_finite()) {
            return Err(Error::Format(format!(
                "coordinate {} is not finite in {:?}",
                bad, value
            )));
        }
        Ok(Rect::new(value[0], value[1], value[2], value[3]))
    }
}

impl TryFrom<&[f64]> for Rect {
    type Error = Error;

    fn try_from(value: &[f64]) -> Result<Self> {
        let coords: [f64; 4] = value.try_into().map_err(|_| {
            Error::Format(format!(
                "expected 4 coordinates (x_min, y_min, x_max, y_max), got {}",
                value.len()
            ))
        })?;
        Rect::try_from(coords)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x_min, r.y_min, r.x_max, r.y_max]
    }
}
