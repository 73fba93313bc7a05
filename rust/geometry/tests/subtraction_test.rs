// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use loadspan_geometry::{subtract, Axis, Rect, SizeFilter, SubtractOptions};

/// Options that keep every piece, so area accounting is exact
fn keep_everything() -> SubtractOptions {
    SubtractOptions {
        size: SizeFilter {
            min_width: 0.0,
            min_height: 0.0,
            min_area: 0.0,
        },
        ..Default::default()
    }
}

fn total_area(rects: &[Rect]) -> f64 {
    rects.iter().map(Rect::area).sum()
}

fn assert_pairwise_disjoint(rects: &[Rect]) {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(
                !a.overlaps(b),
                "rectangles overlap: {:?} and {:?}",
                a,
                b
            );
        }
    }
}

#[test]
fn void_free_subtraction_preserves_area() {
    let slabs = [
        Rect::new(0.0, 0.0, 400.0, 300.0),
        Rect::new(450.0, 0.0, 900.0, 300.0),
        Rect::new(0.0, 350.0, 900.0, 700.0),
    ];
    let input_area = total_area(&slabs);

    for axis in Axis::BOTH {
        let rects = subtract(&slabs, &[], &keep_everything(), axis);
        assert_relative_eq!(total_area(&rects), input_area, epsilon = 1e-6);
        assert_pairwise_disjoint(&rects);
    }
}

#[test]
fn near_coincident_slab_edges_keep_area_with_default_filter() {
    // The 200 and 210 edges merge into one line at 205, which must not shave
    // a 5 px strip off the taller slab.
    let slabs = [
        Rect::new(0.0, 0.0, 300.0, 200.0),
        Rect::new(300.0, 0.0, 600.0, 210.0),
    ];
    let input_area = total_area(&slabs);

    for axis in Axis::BOTH {
        let rects = subtract(&slabs, &[], &SubtractOptions::default(), axis);
        assert_relative_eq!(total_area(&rects), input_area, epsilon = 1e-6);
        assert_pairwise_disjoint(&rects);
    }

    let rects = subtract(&slabs, &[], &SubtractOptions::default(), Axis::Horizontal);
    assert!(rects.contains(&Rect::new(300.0, 0.0, 600.0, 210.0)));
}

#[test]
fn interior_void_coverage_law() {
    let slab = Rect::new(0.0, 0.0, 600.0, 400.0);
    let void = Rect::new(250.0, 120.0, 330.0, 260.0);
    let expected = slab.area() - slab.overlap_area(&void);

    for axis in Axis::BOTH {
        let rects = subtract(&[slab], &[void], &keep_everything(), axis);
        println!("{:?}: {} rectangles", axis, rects.len());
        assert_relative_eq!(total_area(&rects), expected, epsilon = 1e-6);
        assert_pairwise_disjoint(&rects);
        assert!(rects.iter().all(|r| slab.contains(r)));
        assert!(rects.iter().all(|r| !r.overlaps(&void)));
    }
}

#[test]
fn overlapping_voids_are_subtracted_once() {
    let slab = Rect::new(0.0, 0.0, 500.0, 500.0);
    let voids = [
        Rect::new(100.0, 100.0, 250.0, 250.0),
        Rect::new(200.0, 200.0, 350.0, 350.0),
    ];
    // 150x150 twice, minus the 50x50 overlap
    let expected = 250000.0 - (22500.0 * 2.0 - 2500.0);

    for axis in Axis::BOTH {
        let rects = subtract(&[slab], &voids, &keep_everything(), axis);
        assert_relative_eq!(total_area(&rects), expected, epsilon = 1e-6);
        for void in &voids {
            assert!(rects.iter().all(|r| !r.overlaps(void)));
        }
    }
}

#[test]
fn covering_void_removes_slab() {
    let slabs = [
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Rect::new(200.0, 0.0, 300.0, 100.0),
    ];
    let void = Rect::new(-10.0, -10.0, 110.0, 110.0);

    let rects = subtract(&slabs, &[void], &SubtractOptions::default(), Axis::Horizontal);
    assert_eq!(rects, vec![Rect::new(200.0, 0.0, 300.0, 100.0)]);
}

#[test]
fn void_edges_split_neighbouring_slab() {
    // A stair opening sits in the left slab; its bottom edge line continues
    // into the right slab and cuts it at the same height.
    let slabs = [
        Rect::new(0.0, 0.0, 300.0, 300.0),
        Rect::new(300.0, 0.0, 600.0, 300.0),
    ];
    let void = Rect::new(100.0, 0.0, 200.0, 120.0);

    let rects = subtract(&slabs, &[void], &SubtractOptions::default(), Axis::Horizontal);

    assert!(rects.contains(&Rect::new(300.0, 0.0, 600.0, 120.0)));
    assert!(rects.contains(&Rect::new(300.0, 120.0, 600.0, 300.0)));
    assert_relative_eq!(total_area(&rects), 180000.0 - 12000.0, epsilon = 1e-6);
}

#[test]
fn size_thresholds_filter_slivers() {
    let slab = Rect::new(0.0, 0.0, 300.0, 300.0);
    // leaves a 10 px sliver on the left
    let void = Rect::new(10.0, -5.0, 150.0, 305.0);

    let rects = subtract(&[slab], &[void], &SubtractOptions::default(), Axis::Vertical);
    assert_eq!(rects, vec![Rect::new(150.0, 0.0, 300.0, 300.0)]);
}
