// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Page pipeline: subtraction, grouping and planning for both axes

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::grouping::group;
use crate::planner::LinePlanner;
use crate::types::{AxisLayout, GroupLayout, PageInput, PageLayout};
use loadspan_geometry::{derive_beams, subtract, Axis, Rect};
use rayon::prelude::*;

/// Runs the full layout for a page with one validated configuration
#[derive(Debug, Clone)]
pub struct LayoutPipeline {
    config: LayoutConfig,
    planner: LinePlanner,
}

impl LayoutPipeline {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let planner = LinePlanner::from_options(&config.planning);
        Ok(Self { config, planner })
    }

    /// Lay out both axes; they run concurrently
    pub fn run(&self, page: &PageInput) -> PageLayout {
        let (horizontal, vertical) = rayon::join(
            || self.run_axis(page, Axis::Horizontal),
            || self.run_axis(page, Axis::Vertical),
        );
        PageLayout {
            domain: Rect::bounding(&page.slabs),
            axes: vec![horizontal, vertical],
        }
    }

    /// Lay out the given axes only, in the order given
    pub fn run_axes(&self, page: &PageInput, axes: &[Axis]) -> PageLayout {
        PageLayout {
            domain: Rect::bounding(&page.slabs),
            axes: axes.par_iter().map(|&axis| self.run_axis(page, axis)).collect(),
        }
    }

    pub fn run_axis(&self, page: &PageInput, axis: Axis) -> AxisLayout {
        let Some(domain) = Rect::bounding(&page.slabs) else {
            return AxisLayout::empty(axis);
        };

        let rectangles = subtract(&page.slabs, &page.voids, &self.config.subtraction, axis);

        // Beams run across the chains, so they are swept along the other axis
        let beams = page.enclosure.map(|enclosure| {
            derive_beams(
                &enclosure,
                &page.slabs,
                &self.config.beams,
                self.config.subtraction.band_merge_epsilon,
                axis.perpendicular(),
            )
        });

        let chains = group(
            &rectangles,
            &page.voids,
            beams.as_deref(),
            self.config.max_segment_length(),
            axis,
            &self.config.grouping,
        );

        let major = axis.major(&domain);
        let groups: Vec<GroupLayout> = chains
            .par_iter()
            .map(|chain| self.planner.plan(chain, axis, major))
            .collect();

        let incomplete = groups.iter().filter(|g| !g.coverage.is_complete()).count();
        tracing::debug!(
            ?axis,
            rectangles = rectangles.len(),
            beams = beams.as_ref().map_or(0, Vec::len),
            groups = groups.len(),
            incomplete,
            "Axis layout complete"
        );

        AxisLayout {
            axis,
            rectangles,
            groups,
        }
    }
}
