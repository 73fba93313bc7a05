// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Split lines inferred from void and rectangle edges
//!
//! Each minor-axis edge of a source rectangle (top/bottom in a horizontal
//! pass, left/right in a vertical pass) is extended along the major axis in
//! both directions until it runs into a void, or forever when nothing stops
//! it. Merged rectangles are then cut wherever such a line crosses them, so
//! rectangles on either side of a void line up with its edges.

use crate::rect::{Axis, Rect, Span};
use smallvec::SmallVec;

/// A cutting line at minor coordinate `at`, valid over `range` on the major axis
///
/// `range` bounds may be infinite when the extension was never blocked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLine {
    pub at: f64,
    pub range: Span,
}

/// Extend both minor-axis edges of every source rectangle until blocked by a void
pub fn generate_split_lines(sources: &[Rect], voids: &[Rect], axis: Axis) -> Vec<SplitLine> {
    let mut lines = Vec::with_capacity(sources.len() * 2);

    for source in sources {
        let major = axis.major(source);
        let minor = axis.minor(source);

        for at in [minor.lo, minor.hi] {
            // Voids that straddle the edge line
            let crossing = voids.iter().filter(|v| {
                let vm = axis.minor(v);
                vm.lo < at && at < vm.hi
            });

            let mut start = f64::NEG_INFINITY;
            let mut end = f64::INFINITY;
            for v in crossing {
                let vj = axis.major(v);
                if vj.hi <= major.lo {
                    start = start.max(vj.hi);
                }
                if vj.lo >= major.hi {
                    end = end.min(vj.lo);
                }
            }

            lines.push(SplitLine {
                at,
                range: Span { lo: start, hi: end },
            });
        }
    }

    lines
}

/// Collapse lines whose coordinates lie within `tolerance` of each other
///
/// Lines are sorted by coordinate and grouped greedily: a line joins the
/// current group when it is within `tolerance` of the group's last line.
/// Each group becomes one line at the mean coordinate, spanning the union
/// of the group's ranges.
pub fn merge_similar_lines(mut lines: Vec<SplitLine>, tolerance: f64) -> Vec<SplitLine> {
    lines.sort_by(|a, b| {
        a.at.total_cmp(&b.at)
            .then(a.range.lo.total_cmp(&b.range.lo))
            .then(a.range.hi.total_cmp(&b.range.hi))
    });

    let mut merged = Vec::new();
    let mut group: Vec<SplitLine> = Vec::new();

    for line in lines {
        if let Some(last) = group.last() {
            if (line.at - last.at).abs() > tolerance {
                merged.push(collapse(&group));
                group.clear();
            }
        }
        group.push(line);
    }
    if !group.is_empty() {
        merged.push(collapse(&group));
    }

    merged
}

fn collapse(group: &[SplitLine]) -> SplitLine {
    let at = group.iter().map(|l| l.at).sum::<f64>() / group.len() as f64;
    let lo = group.iter().map(|l| l.range.lo).fold(f64::INFINITY, f64::min);
    let hi = group.iter().map(|l| l.range.hi).fold(f64::NEG_INFINITY, f64::max);
    SplitLine {
        at,
        range: Span { lo, hi },
    }
}

/// Cut rectangles along every line that crosses their interior
///
/// A cut closer than `tolerance` to the rectangle's own edge or to a cut
/// already taken is skipped, so no piece thinner than `tolerance` is made.
pub fn split_by_lines(rects: &[Rect], lines: &[SplitLine], axis: Axis, tolerance: f64) -> Vec<Rect> {
    let mut result = Vec::with_capacity(rects.len());

    for rect in rects {
        let major = axis.major(rect);
        let minor = axis.minor(rect);

        let mut candidates: SmallVec<[f64; 8]> = lines
            .iter()
            .filter(|l| {
                minor.lo < l.at && l.at < minor.hi && l.range.lo < major.hi && l.range.hi > major.lo
            })
            .map(|l| l.at)
            .collect();
        candidates.sort_by(f64::total_cmp);

        let mut cuts: SmallVec<[f64; 8]> = SmallVec::new();
        cuts.push(minor.lo);
        for at in candidates {
            let last = cuts[cuts.len() - 1];
            if at - last > tolerance && minor.hi - at > tolerance {
                cuts.push(at);
            }
        }
        cuts.push(minor.hi);

        result.extend(
            cuts.windows(2)
                .map(|w| axis.rect(major, Span::new(w[0], w[1]))),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unblocked_edges_extend_to_infinity() {
        let voids = [Rect::new(40.0, 40.0, 60.0, 60.0)];
        let lines = generate_split_lines(&voids, &voids, Axis::Horizontal);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].at, 40.0);
        assert_eq!(lines[1].at, 60.0);
        assert!(lines.iter().all(|l| l.range.lo.is_infinite() && l.range.hi.is_infinite()));
    }

    #[test]
    fn test_extension_stops_at_nearest_void() {
        let source = Rect::new(100.0, 50.0, 120.0, 80.0);
        let voids = [
            Rect::new(0.0, 0.0, 20.0, 100.0),
            Rect::new(40.0, 0.0, 60.0, 100.0),
            Rect::new(200.0, 0.0, 220.0, 100.0),
            // does not straddle y = 50 or y = 80
            Rect::new(150.0, 90.0, 160.0, 120.0),
        ];
        let lines = generate_split_lines(&[source], &voids, Axis::Horizontal);
        for line in &lines {
            assert_eq!(line.range, Span { lo: 60.0, hi: 200.0 });
        }
    }

    #[test]
    fn test_merge_similar_lines_averages_and_unions() {
        let lines = vec![
            SplitLine { at: 100.0, range: Span { lo: 0.0, hi: 50.0 } },
            SplitLine { at: 110.0, range: Span { lo: 40.0, hi: 90.0 } },
            SplitLine { at: 300.0, range: Span { lo: 0.0, hi: 10.0 } },
        ];
        let merged = merge_similar_lines(lines, 20.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].at, 105.0);
        assert_eq!(merged[0].range, Span { lo: 0.0, hi: 90.0 });
        assert_eq!(merged[1].at, 300.0);
    }

    #[test]
    fn test_split_only_where_range_overlaps() {
        let rects = [Rect::new(0.0, 0.0, 100.0, 100.0)];
        let lines = [
            SplitLine { at: 30.0, range: Span { lo: 50.0, hi: 500.0 } },
            SplitLine { at: 60.0, range: Span { lo: 200.0, hi: 500.0 } },
            // on the boundary: no cut
            SplitLine { at: 100.0, range: Span { lo: f64::NEG_INFINITY, hi: f64::INFINITY } },
        ];
        let pieces = split_by_lines(&rects, &lines, Axis::Horizontal, 20.0);
        assert_eq!(
            pieces,
            vec![Rect::new(0.0, 0.0, 100.0, 30.0), Rect::new(0.0, 30.0, 100.0, 100.0)]
        );
    }

    #[test]
    fn test_vertical_split_cuts_along_x() {
        let rects = [Rect::new(0.0, 0.0, 100.0, 100.0)];
        let lines = [SplitLine { at: 25.0, range: Span { lo: f64::NEG_INFINITY, hi: f64::INFINITY } }];
        let pieces = split_by_lines(&rects, &lines, Axis::Vertical, 20.0);
        assert_eq!(
            pieces,
            vec![Rect::new(0.0, 0.0, 25.0, 100.0), Rect::new(25.0, 0.0, 100.0, 100.0)]
        );
    }

    #[test]
    fn test_cut_near_edge_or_previous_cut_is_skipped() {
        let rects = [Rect::new(0.0, 0.0, 100.0, 210.0)];
        let everywhere = Span { lo: f64::NEG_INFINITY, hi: f64::INFINITY };
        let lines = [
            SplitLine { at: 10.0, range: everywhere },
            SplitLine { at: 100.0, range: everywhere },
            SplitLine { at: 115.0, range: everywhere },
            SplitLine { at: 205.0, range: everywhere },
        ];
        let pieces = split_by_lines(&rects, &lines, Axis::Horizontal, 20.0);
        assert_eq!(
            pieces,
            vec![Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(0.0, 100.0, 100.0, 210.0)]
        );
    }
}
