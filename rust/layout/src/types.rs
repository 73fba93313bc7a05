// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for page input and layout output

use loadspan_geometry::{Axis, Point2, Rect, Span};
use serde::{Deserialize, Serialize};

/// A 2D point (simplified for serialization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Span line segment drawn along the group's axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub start: Point2D,
    pub end: Point2D,
}

/// Double-headed arrow across the group, perpendicular to its span line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Arrow {
    pub start: Point2D,
    pub end: Point2D,
}

impl Arrow {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Triangular heads at both ends, tips pointing outward
    ///
    /// Head size is `max_size`, shrunk to a third of the arrow length for
    /// short arrows. Returns `[start_head, end_head]`, each as
    /// `[tip, base_left, base_right]`.
    pub fn heads(&self, max_size: f64) -> [[Point2D; 3]; 2] {
        let len = self.length();
        if len <= f64::EPSILON {
            return [[self.start; 3], [self.end; 3]];
        }
        let size = max_size.min(len / 3.0);
        let (dx, dy) = ((self.end.x - self.start.x) / len, (self.end.y - self.start.y) / len);
        let (nx, ny) = (-dy * size * 0.5, dx * size * 0.5);

        let head = |tip: Point2D, inward: f64| {
            let bx = tip.x + dx * size * inward;
            let by = tip.y + dy * size * inward;
            [
                tip,
                Point2D::new(bx + nx, by + ny),
                Point2D::new(bx - nx, by - ny),
            ]
        };

        [head(self.start, 1.0), head(self.end, -1.0)]
    }
}

/// Span marker: a circle at `center` annotated with the group's cross extent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub center: Point2D,
    pub bounds: Span,
}

/// Whether a group's lines reach its far bound
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Coverage {
    Complete,
    /// Lines stop at `reached`; no feasible split covers `(reached, target]`
    Partial { reached: f64, target: f64 },
}

impl Coverage {
    pub fn is_complete(&self) -> bool {
        matches!(self, Coverage::Complete)
    }
}

/// Planned primitives for one group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupLayout {
    pub group_id: usize,
    pub axis: Axis,
    /// Bounding envelope of the group's rectangles
    pub envelope: Rect,
    pub lines: Vec<Line>,
    pub arrows: Vec<Arrow>,
    pub markers: Vec<Marker>,
    pub coverage: Coverage,
}

/// All groups planned along one axis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisLayout {
    pub axis: Axis,
    /// Rectangles left after void subtraction, in grouping input order
    pub rectangles: Vec<Rect>,
    pub groups: Vec<GroupLayout>,
}

impl AxisLayout {
    pub fn empty(axis: Axis) -> Self {
        Self {
            axis,
            rectangles: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Groups whose lines stop short of their far bound
    pub fn incomplete_groups(&self) -> impl Iterator<Item = &GroupLayout> {
        self.groups.iter().filter(|g| !g.coverage.is_complete())
    }
}

/// Layout result for a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageLayout {
    /// Bounding box of all slabs, `None` for an empty page
    pub domain: Option<Rect>,
    pub axes: Vec<AxisLayout>,
}

impl PageLayout {
    pub fn axis(&self, axis: Axis) -> Option<&AxisLayout> {
        self.axes.iter().find(|a| a.axis == axis)
    }
}

/// Detector output for one page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageInput {
    /// Structural rectangles (slabs)
    pub slabs: Vec<Rect>,
    /// Excluded regions (openings, ducts, shafts)
    pub voids: Vec<Rect>,
    /// Building outline; when present, the space between slabs inside it is
    /// treated as beams that block chains
    pub enclosure: Option<Rect>,
}

impl PageInput {
    pub fn new(slabs: Vec<Rect>, voids: Vec<Rect>) -> Self {
        Self {
            slabs,
            voids,
            enclosure: None,
        }
    }

    pub fn with_enclosure(mut self, enclosure: Rect) -> Self {
        self.enclosure = Some(enclosure);
        self
    }

    /// Parse a page from JSON, rejecting malformed rectangles
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_heads_point_outward() {
        let arrow = Arrow {
            start: Point2D::new(50.0, 0.0),
            end: Point2D::new(50.0, 90.0),
        };
        let [top, bottom] = arrow.heads(10.0);

        assert_eq!(top[0], Point2D::new(50.0, 0.0));
        assert!(top[1].y > 0.0 && top[2].y > 0.0);
        assert_eq!(bottom[0], Point2D::new(50.0, 90.0));
        assert!((bottom[1].y - 80.0).abs() < 1e-9);
        assert!(((top[1].x - top[2].x).abs() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_arrow_shrinks_heads() {
        let arrow = Arrow {
            start: Point2D::new(0.0, 0.0),
            end: Point2D::new(12.0, 0.0),
        };
        let [left, _] = arrow.heads(10.0);
        assert!((left[1].x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_input_from_json() {
        let page = PageInput::from_json(
            r#"{ "slabs": [[0, 0, 100, 50]], "voids": [], "enclosure": [0, 0, 200, 200] }"#,
        )
        .unwrap();
        assert_eq!(page.slabs, vec![Rect::new(0.0, 0.0, 100.0, 50.0)]);
        assert_eq!(page.enclosure, Some(Rect::new(0.0, 0.0, 200.0, 200.0)));

        assert!(PageInput::from_json(r#"{ "slabs": [[0, 0, 100]] }"#).is_err());
    }

    #[test]
    fn test_coverage_serializes_with_status_tag() {
        let json = serde_json::to_string(&Coverage::Partial {
            reached: 10.0,
            target: 20.0,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"partial","reached":10.0,"target":20.0}"#);
    }
}
