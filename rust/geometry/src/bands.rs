// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Band decomposition and band merging
//!
//! A residual region is sliced into rectangular bands at the minor-axis
//! coordinates of its own vertices. Between two consecutive breakpoints the
//! region's cross-section is a fixed set of major-axis intervals, so one
//! scanline per band is exact for rectilinear regions. Bands are then merged
//! back into tall rectangles wherever they share the same major-axis span.

use crate::bool2d::Shape;
use crate::rect::{Axis, Rect, Span};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Coordinates closer than this are treated as the same breakpoint
const EPSILON: f64 = 1e-9;

/// Quantization used to key bands by their major-axis span
const KEY_SCALE: f64 = 1e6;

/// Slice a residual shape into bands stacked along the minor axis
pub fn band_decomposition(shape: &Shape, axis: Axis) -> Vec<Rect> {
    let mut breaks: Vec<f64> = shape
        .iter()
        .flatten()
        .map(|p| axis.minor_of(p))
        .collect();
    breaks.sort_by(f64::total_cmp);
    breaks.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);

    let mut bands = Vec::new();
    for w in breaks.windows(2) {
        let minor = Span::new(w[0], w[1]);
        if minor.len() <= EPSILON {
            continue;
        }
        let mid = minor.center();

        let mut crossings: SmallVec<[f64; 8]> = SmallVec::new();
        for contour in shape {
            let n = contour.len();
            for i in 0..n {
                let a = &contour[i];
                let b = &contour[(i + 1) % n];
                let (ma, mb) = (axis.minor_of(a), axis.minor_of(b));
                if (ma > mid) != (mb > mid) {
                    let t = (mid - ma) / (mb - ma);
                    let (ja, jb) = (axis.major_of(a), axis.major_of(b));
                    crossings.push(ja + t * (jb - ja));
                }
            }
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let major = Span::new(pair[0], pair[1]);
            if major.len() > EPSILON {
                bands.push(axis.rect(major, minor));
            }
        }
    }

    bands
}

/// Merge bands that share a major-axis span and continue each other
///
/// Two bands in the same column join when the gap between them on the minor
/// axis is at most `epsilon` and no `blocker` occupies that gap. Output is
/// ordered by major span, then by minor position.
pub fn merge_bands(bands: &[Rect], axis: Axis, epsilon: f64, blockers: &[Rect]) -> Vec<Rect> {
    let mut columns: FxHashMap<(i64, i64), (Span, Vec<Span>)> = FxHashMap::default();
    for band in bands {
        let major = axis.major(band);
        columns
            .entry((quantize(major.lo), quantize(major.hi)))
            .or_insert_with(|| (major, Vec::new()))
            .1
            .push(axis.minor(band));
    }

    let mut columns: Vec<_> = columns.into_iter().collect();
    columns.sort_unstable_by_key(|(key, _)| *key);

    let mut merged = Vec::new();
    for (_, (major, mut spans)) in columns {
        spans.sort_by(|a, b| a.lo.total_cmp(&b.lo).then(a.hi.total_cmp(&b.hi)));

        let mut iter = spans.into_iter();
        let Some(mut current) = iter.next() else {
            continue;
        };
        for next in iter {
            let gap = next.lo - current.hi;
            let blocked = gap > 0.0 && {
                let gap_rect = axis.rect(major, Span::new(current.hi, next.lo));
                blockers.iter().any(|b| b.overlaps(&gap_rect))
            };
            if gap <= epsilon && !blocked {
                current.hi = current.hi.max(next.hi);
            } else {
                merged.push(axis.rect(major, current));
                current = next;
            }
        }
        merged.push(axis.rect(major, current));
    }

    merged
}

fn quantize(value: f64) -> i64 {
    (value * KEY_SCALE).round() as i64
}
