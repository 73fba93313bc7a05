// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chain grouping of partitioned rectangles
//!
//! Grouping runs in two phases:
//! 1. Chain building: rectangles sorted along the axis are linked greedily.
//!    A chain grows from its current end to the next rectangle ahead of it
//!    that overlaps it across the axis, as long as that rectangle is aligned
//!    with the end, close enough, and no void or blocker sits between them.
//!    The first in-line candidate that fails ends the chain.
//! 2. Cross-axis merge: chains whose envelopes line up along the axis and
//!    touch across it are combined into one group.

use loadspan_geometry::{Axis, Rect};
use serde::{Deserialize, Serialize};

/// Rectangles may overlap this much along the axis and still count as "ahead"
const OVERLAP_EPSILON: f64 = 1e-6;

/// Parameters for [`group`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingOptions {
    /// Maximum edge misalignment between neighbours (pixels)
    pub alignment_tolerance: f64,
    /// Single-rectangle chains smaller than this are dropped (square pixels)
    pub min_lone_box_area: f64,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            alignment_tolerance: 30.0,
            min_lone_box_area: 4000.0,
        }
    }
}

/// An ordered run of rectangles along one axis
///
/// Members keep the index they had in the grouping input. The envelope
/// always covers every member.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    id: usize,
    members: Vec<(usize, Rect)>,
    envelope: Rect,
}

impl Chain {
    pub fn new(id: usize, index: usize, rect: Rect) -> Self {
        Self {
            id,
            members: vec![(index, rect)],
            envelope: rect,
        }
    }

    /// Chain over `rects` with indices `0..n`, `None` when `rects` is empty
    pub fn from_rects(id: usize, rects: &[Rect]) -> Option<Self> {
        let (first, rest) = rects.split_first()?;
        let mut chain = Chain::new(id, 0, *first);
        for (i, rect) in rest.iter().enumerate() {
            chain.push(i + 1, *rect);
        }
        Some(chain)
    }

    pub fn push(&mut self, index: usize, rect: Rect) {
        self.envelope = self.envelope.union(&rect);
        self.members.push((index, rect));
    }

    /// Append all members of `other`
    pub fn absorb(&mut self, other: Chain) {
        self.envelope = self.envelope.union(&other.envelope);
        self.members.extend(other.members);
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn members(&self) -> &[(usize, Rect)] {
        &self.members
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.members.iter().map(|(_, r)| r)
    }

    pub fn envelope(&self) -> Rect {
        self.envelope
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group rectangles into chains along `axis`, then merge adjacent chains
///
/// `voids` and the optional `blockers` (beams) both stop a chain when they
/// sit between its end and the next candidate. `max_chain_length` is the
/// largest gap along the axis a chain may bridge between two members.
///
/// Group ids are dense, in output order. Membership does not depend on the
/// order of `rects`.
pub fn group(
    rects: &[Rect],
    voids: &[Rect],
    blockers: Option<&[Rect]>,
    max_chain_length: f64,
    axis: Axis,
    options: &GroupingOptions,
) -> Vec<Chain> {
    let obstacles = Obstacles {
        voids,
        blockers: blockers.unwrap_or(&[]),
    };
    let chains = build_chains(rects, &obstacles, max_chain_length, axis, options);
    let chain_count = chains.len();
    let groups = merge_adjacent_chains(chains, axis, options.alignment_tolerance);

    tracing::debug!(
        ?axis,
        rectangles = rects.len(),
        chains = chain_count,
        groups = groups.len(),
        "Grouped rectangles"
    );

    groups
}

struct Obstacles<'a> {
    voids: &'a [Rect],
    blockers: &'a [Rect],
}

impl Obstacles<'_> {
    fn between(&self, end: &Rect, next: &Rect, axis: Axis) -> bool {
        self.voids
            .iter()
            .chain(self.blockers)
            .any(|o| lies_between(o, end, next, axis))
    }
}

fn build_chains(
    rects: &[Rect],
    obstacles: &Obstacles<'_>,
    max_chain_length: f64,
    axis: Axis,
    options: &GroupingOptions,
) -> Vec<Chain> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| rects[a].cmp_along(&rects[b], axis).then(a.cmp(&b)));

    let mut used = vec![false; rects.len()];
    let mut chains = Vec::new();

    for (pos, &start) in order.iter().enumerate() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let mut chain = Chain::new(chains.len(), start, rects[start]);
        let mut end = rects[start];

        for &j in &order[pos + 1..] {
            if used[j] {
                continue;
            }
            let next = rects[j];
            let (end_major, next_major) = (axis.major(&end), axis.major(&next));

            // Not in line with the chain end: look further
            if next_major.lo < end_major.hi - OVERLAP_EPSILON {
                continue;
            }
            if axis.minor(&end).overlap(&axis.minor(&next)) <= 0.0 {
                continue;
            }

            // In line: the first failure ends the chain
            if !is_aligned(&end, &next, axis, options.alignment_tolerance) {
                break;
            }
            if next_major.lo - end_major.hi > max_chain_length {
                break;
            }
            if obstacles.between(&end, &next, axis) {
                break;
            }

            chain.push(j, next);
            used[j] = true;
            end = next;
        }

        if chain.len() == 1 && chain.envelope().area() < options.min_lone_box_area {
            continue;
        }
        chains.push(chain);
    }

    chains
}

fn merge_adjacent_chains(chains: Vec<Chain>, axis: Axis, tolerance: f64) -> Vec<Chain> {
    let envelopes: Vec<Rect> = chains.iter().map(Chain::envelope).collect();
    let across = axis.perpendicular();

    let mut order: Vec<usize> = (0..chains.len()).collect();
    order.sort_by(|&a, &b| envelopes[a].cmp_along(&envelopes[b], across).then(a.cmp(&b)));

    let mut slots: Vec<Option<Chain>> = chains.into_iter().map(Some).collect();
    let mut merged: Vec<Chain> = Vec::with_capacity(slots.len());

    for &i in &order {
        let Some(mut current) = slots[i].take() else {
            continue;
        };
        for &j in &order {
            if slots[j].is_none() || !is_adjacent(&envelopes[i], &envelopes[j], axis, tolerance) {
                continue;
            }
            if let Some(other) = slots[j].take() {
                current.absorb(other);
            }
        }
        current.id = merged.len();
        merged.push(current);
    }

    merged
}

/// Edges across the axis match within `tolerance`
fn is_aligned(a: &Rect, b: &Rect, axis: Axis, tolerance: f64) -> bool {
    let (am, bm) = (axis.minor(a), axis.minor(b));
    (am.lo - bm.lo).abs() <= tolerance && (am.hi - bm.hi).abs() <= tolerance
}

/// Envelopes line up along the axis and touch across it
fn is_adjacent(a: &Rect, b: &Rect, axis: Axis, tolerance: f64) -> bool {
    let (aj, bj) = (axis.major(a), axis.major(b));
    let (am, bm) = (axis.minor(a), axis.minor(b));
    let aligned = (aj.lo - bj.lo).abs() <= tolerance && (aj.hi - bj.hi).abs() <= tolerance;
    let gap = (bm.lo - am.hi).abs().min((am.lo - bm.hi).abs());
    aligned && gap <= tolerance
}

/// `obstacle` sits in the stretch from `end` to `next` and overlaps both across the axis
fn lies_between(obstacle: &Rect, end: &Rect, next: &Rect, axis: Axis) -> bool {
    let om = axis.major(obstacle);
    if om.lo < axis.major(end).lo || om.hi > axis.major(next).hi {
        return false;
    }
    let ox = axis.minor(obstacle);
    ox.overlap(&axis.minor(end)) > 0.0 && ox.overlap(&axis.minor(next)) > 0.0
}
