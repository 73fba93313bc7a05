// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Span line planning for one group
//!
//! Lines are cut at the centers of the group's rectangles. Among all ways
//! to cover the group from its left bound to its right bound with pieces no
//! longer than the maximum segment length, the planner picks the one whose
//! shortest piece is longest (a maximin path over the candidate points).

use crate::config::PlanningOptions;
use crate::grouping::Chain;
use crate::types::{Arrow, Coverage, GroupLayout, Line, Marker, Point2D};
use loadspan_geometry::{Axis, Span};

/// Candidate coordinates closer than this are the same point
const POINT_QUANTUM: f64 = 1e-3;

/// Plans span lines, arrows and markers for a group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlanner {
    pub perp_offset: f64,
    pub overlap_margin: f64,
    pub edge_tolerance: f64,
    pub max_segment_length: f64,
    pub split_at_direction_change: bool,
}

impl Default for LinePlanner {
    fn default() -> Self {
        Self::from_options(&PlanningOptions::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    at: f64,
    /// Orientation differs from the previous interior point
    switch: bool,
}

impl LinePlanner {
    pub fn from_options(options: &PlanningOptions) -> Self {
        Self {
            perp_offset: options.perp_offset,
            overlap_margin: options.overlap_margin,
            edge_tolerance: options.edge_tolerance,
            max_segment_length: options.max_segment_length(),
            split_at_direction_change: options.split_at_direction_change,
        }
    }

    /// Plan the layout of `chain` along `axis`
    ///
    /// `domain` is the page-wide extent along the axis. A group side within
    /// `edge_tolerance` of the domain extends to the domain bound; any other
    /// side stops at the group's own extent.
    pub fn plan(&self, chain: &Chain, axis: Axis, domain: Span) -> GroupLayout {
        let envelope = chain.envelope();
        let (left, right) = self.effective_bounds(axis.major(&envelope), domain);
        let cross = axis.minor(&envelope);

        let mut layout = GroupLayout {
            group_id: chain.id(),
            axis,
            envelope,
            lines: Vec::new(),
            arrows: Vec::new(),
            markers: Vec::new(),
            coverage: Coverage::Complete,
        };
        if right - left <= POINT_QUANTUM {
            return layout;
        }

        let points = self.candidates(chain, axis, left, right);
        let best = self.maximin(&points);
        let last = points.len() - 1;

        let reached = if best[last].is_some() {
            last
        } else {
            // Farthest reachable point; index 0 always is
            let reached = best.iter().rposition(Option::is_some).unwrap_or(0);
            tracing::warn!(
                group = chain.id(),
                ?axis,
                reached = points[reached].at,
                target = right,
                max_segment_length = self.max_segment_length,
                "Span lines cannot reach the far bound of the group"
            );
            layout.coverage = Coverage::Partial {
                reached: points[reached].at,
                target: right,
            };
            reached
        };

        let path = reconstruct(&best, reached);
        self.emit(&mut layout, &points, &path, axis, cross);
        layout
    }

    fn effective_bounds(&self, extent: Span, domain: Span) -> (f64, f64) {
        let left = if (extent.lo - domain.lo).abs() <= self.edge_tolerance {
            domain.lo
        } else {
            extent.lo
        };
        let right = if (extent.hi - domain.hi).abs() <= self.edge_tolerance {
            domain.hi
        } else {
            extent.hi
        };
        (left, right)
    }

    /// Sorted, deduplicated cut points: left bound, member centers, right bound
    fn candidates(&self, chain: &Chain, axis: Axis, left: f64, right: f64) -> Vec<Candidate> {
        let mut centers: Vec<(f64, bool)> = chain
            .rects()
            .map(|r| (axis.major(r).center(), r.is_wide()))
            .filter(|(at, _)| *at > left + POINT_QUANTUM && *at < right - POINT_QUANTUM)
            .collect();
        centers.sort_by(|a, b| a.0.total_cmp(&b.0));
        centers.dedup_by_key(|(at, _)| (*at / POINT_QUANTUM).round() as i64);

        let mut points = Vec::with_capacity(centers.len() + 2);
        points.push(Candidate {
            at: left,
            switch: false,
        });
        let mut previous: Option<bool> = None;
        for (at, wide) in centers {
            let switch = self.split_at_direction_change && previous.is_some_and(|p| p != wide);
            points.push(Candidate { at, switch });
            previous = Some(wide);
        }
        points.push(Candidate {
            at: right,
            switch: false,
        });
        points
    }

    /// `best[k]` holds the largest achievable minimum segment length of a
    /// path from point 0 to point `k`, and the predecessor on that path
    fn maximin(&self, points: &[Candidate]) -> Vec<Option<(f64, usize)>> {
        let mut best: Vec<Option<(f64, usize)>> = vec![None; points.len()];
        best[0] = Some((f64::INFINITY, 0));
        let last = points.len() - 1;

        for i in 0..last {
            let Some((reached_min, _)) = best[i] else {
                continue;
            };
            for j in i + 1..points.len() {
                let len = points[j].at - points[i].at;
                if len > self.max_segment_length {
                    break;
                }
                let value = reached_min.min(len);
                if best[j].map_or(true, |(stored, _)| value > stored) {
                    best[j] = Some((value, i));
                }
                // A segment may end on a direction change but not run past it
                if points[j].switch && j < last {
                    break;
                }
            }
        }

        best
    }

    fn emit(&self, layout: &mut GroupLayout, points: &[Candidate], path: &[usize], axis: Axis, cross: Span) {
        let last = points.len() - 1;
        let middle = cross.center();

        for (i, pair) in path.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let start = if from == 0 {
                points[from].at
            } else {
                points[from].at - self.overlap_margin
            };
            let end = if to == last {
                points[to].at
            } else {
                points[to].at + self.overlap_margin
            };
            let offset = if i % 2 == 0 { self.perp_offset } else { -self.perp_offset };
            let at = middle + offset;
            let mid = 0.5 * (start + end);

            layout.lines.push(Line {
                start: Point2D::from_nalgebra(&axis.point(start, at)),
                end: Point2D::from_nalgebra(&axis.point(end, at)),
            });
            layout.arrows.push(Arrow {
                start: Point2D::from_nalgebra(&axis.point(mid, cross.lo)),
                end: Point2D::from_nalgebra(&axis.point(mid, cross.hi)),
            });
            layout.markers.push(Marker {
                center: Point2D::from_nalgebra(&axis.point(mid, at)),
                bounds: cross,
            });
        }
    }
}

/// Indices of the path from point 0 to `target`, in order
fn reconstruct(best: &[Option<(f64, usize)>], target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut k = target;
    while k != 0 {
        match best[k] {
            Some((_, prev)) => {
                path.push(prev);
                k = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadspan_geometry::Rect;

    fn planner(max_segment_length: f64) -> LinePlanner {
        LinePlanner {
            perp_offset: 6.0,
            overlap_margin: 40.0,
            edge_tolerance: 60.0,
            max_segment_length,
            split_at_direction_change: false,
        }
    }

    /// Rectangles of width 20 centered at `centers`, all 100 tall
    fn row(centers: &[f64]) -> Chain {
        let rects: Vec<Rect> = centers
            .iter()
            .map(|c| Rect::new(c - 10.0, 0.0, c + 10.0, 100.0))
            .collect();
        Chain::from_rects(0, &rects).unwrap()
    }

    /// Split points along the axis, without margins
    fn cuts(layout: &GroupLayout, margin: f64, left: f64, right: f64) -> Vec<f64> {
        let mut cuts = vec![left];
        for line in &layout.lines {
            let end = if (line.end.x - right).abs() < 1e-9 { right } else { line.end.x - margin };
            cuts.push(end);
        }
        cuts
    }

    #[test]
    fn test_maximin_prefers_even_split() {
        // Greedy cutting at the farthest reachable point gives 0-100-240-300
        // (minimum 60); the even split 0-100-200-300 keeps every piece at 100.
        let chain = row(&[60.0, 100.0, 200.0, 240.0]);
        let layout = planner(150.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 300.0));

        assert!(layout.coverage.is_complete());
        assert_eq!(cuts(&layout, 40.0, 0.0, 300.0), vec![0.0, 100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_three_centers_use_every_point() {
        let chain = row(&[50.0, 150.0, 250.0]);
        let layout = planner(120.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 300.0));

        // 0-150 and 150-300 exceed 120, so every center is a cut point
        assert_eq!(cuts(&layout, 40.0, 0.0, 300.0), vec![0.0, 50.0, 150.0, 250.0, 300.0]);
    }

    #[test]
    fn test_single_segment_when_short_enough() {
        let chain = row(&[50.0, 150.0, 250.0]);
        let layout = planner(1000.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 300.0));

        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].start, Point2D::new(0.0, 56.0));
        assert_eq!(layout.lines[0].end, Point2D::new(300.0, 56.0));
        assert_eq!(layout.arrows[0].start, Point2D::new(150.0, 0.0));
        assert_eq!(layout.arrows[0].end, Point2D::new(150.0, 100.0));
        assert_eq!(layout.markers[0].bounds, Span::new(0.0, 100.0));
    }

    #[test]
    fn test_inner_endpoints_overlap_and_offsets_alternate() {
        let chain = row(&[50.0, 150.0, 250.0]);
        let layout = planner(200.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 300.0));

        assert_eq!(layout.lines.len(), 2);
        let (a, b) = (layout.lines[0], layout.lines[1]);
        assert_eq!(a.start.x, 0.0);
        assert_eq!(a.end.x, 190.0);
        assert_eq!(b.start.x, 110.0);
        assert_eq!(b.end.x, 300.0);
        assert_eq!(a.start.y, 56.0);
        assert_eq!(b.start.y, 44.0);
        assert_eq!(layout.markers[1].center, Point2D::new(205.0, 44.0));
    }

    #[test]
    fn test_interior_group_uses_own_extent() {
        let chain = row(&[200.0, 300.0]);
        let layout = planner(1000.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 1000.0));
        assert_eq!(layout.lines[0].start.x, 190.0);
        assert_eq!(layout.lines[0].end.x, 310.0);

        // within tolerance of the left page edge
        let chain = row(&[30.0, 300.0]);
        let layout = planner(1000.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 1000.0));
        assert_eq!(layout.lines[0].start.x, 0.0);
        assert_eq!(layout.lines[0].end.x, 310.0);
    }

    #[test]
    fn test_unreachable_far_bound_keeps_prefix() {
        let chain = row(&[50.0, 100.0, 400.0]);
        let layout = planner(120.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 410.0));

        assert_eq!(
            layout.coverage,
            Coverage::Partial {
                reached: 100.0,
                target: 410.0
            }
        );
        // 0-100 in one piece, since it already fits
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].start.x, 0.0);
        assert_eq!(layout.lines[0].end.x, 140.0);
    }

    #[test]
    fn test_nothing_reachable_gives_no_lines() {
        let chain = Chain::from_rects(0, &[Rect::new(0.0, 0.0, 600.0, 100.0)]).unwrap();
        let layout = planner(50.0).plan(&chain, Axis::Horizontal, Span::new(0.0, 600.0));
        assert!(layout.lines.is_empty());
        assert_eq!(
            layout.coverage,
            Coverage::Partial {
                reached: 0.0,
                target: 600.0
            }
        );
    }

    #[test]
    fn test_direction_change_stops_segment() {
        // Two wide slabs followed by a tall one
        let rects = [
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Rect::new(200.0, 0.0, 400.0, 100.0),
            Rect::new(400.0, 0.0, 480.0, 100.0),
            Rect::new(480.0, 0.0, 680.0, 100.0),
        ];
        let chain = Chain::from_rects(0, &rects).unwrap();
        let domain = Span::new(0.0, 680.0);

        let free = planner(1000.0).plan(&chain, Axis::Horizontal, domain);
        assert_eq!(free.lines.len(), 1);

        let mut split = planner(1000.0);
        split.split_at_direction_change = true;
        let layout = split.plan(&chain, Axis::Horizontal, domain);
        // 0 -> 440 (switch to tall) -> 580 (switch back to wide) -> 680
        assert_eq!(cuts(&layout, 40.0, 0.0, 680.0), vec![0.0, 440.0, 580.0, 680.0]);
    }

    #[test]
    fn test_vertical_axis_swaps_coordinates() {
        let rects = [
            Rect::new(0.0, 0.0, 100.0, 20.0),
            Rect::new(0.0, 20.0, 100.0, 300.0),
        ];
        let chain = Chain::from_rects(3, &rects).unwrap();
        let layout = planner(1000.0).plan(&chain, Axis::Vertical, Span::new(0.0, 300.0));

        assert_eq!(layout.group_id, 3);
        assert_eq!(layout.lines[0].start, Point2D::new(56.0, 0.0));
        assert_eq!(layout.lines[0].end, Point2D::new(56.0, 300.0));
        assert_eq!(layout.arrows[0].start, Point2D::new(0.0, 150.0));
        assert_eq!(layout.arrows[0].end, Point2D::new(100.0, 150.0));
    }
}
