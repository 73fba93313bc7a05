// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout configuration
//!
//! All lengths are in input pixels except `max_span`, which is a real-world
//! distance converted with `scale` (real units per pixel).

use crate::error::{Error, Result};
use crate::grouping::GroupingOptions;
use loadspan_geometry::{SizeFilter, SubtractOptions};
use serde::{Deserialize, Serialize};

/// Parameters for the line layout planner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningOptions {
    /// Perpendicular jitter between successive lines of a group
    pub perp_offset: f64,
    /// Distance inner line endpoints are pushed past their split point
    pub overlap_margin: f64,
    /// A group closer than this to the page edge extends to the edge
    pub edge_tolerance: f64,
    /// Longest span a single line may cover, in real-world units
    pub max_span: f64,
    /// Real-world units per pixel
    pub scale: f64,
    /// Do not run a line across a change of slab orientation
    pub split_at_direction_change: bool,
}

impl Default for PlanningOptions {
    fn default() -> Self {
        Self {
            perp_offset: 6.0,
            overlap_margin: 40.0,
            edge_tolerance: 30.0,
            max_span: 12.0,
            scale: 0.005,
            split_at_direction_change: true,
        }
    }
}

impl PlanningOptions {
    /// Longest line in pixels: `floor(max_span / scale)`
    pub fn max_segment_length(&self) -> f64 {
        (self.max_span / self.scale).floor()
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub subtraction: SubtractOptions,
    /// Size thresholds for beams derived from the enclosure
    pub beams: SizeFilter,
    pub grouping: GroupingOptions,
    pub planning: PlanningOptions,
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn max_segment_length(&self) -> f64 {
        self.planning.max_segment_length()
    }

    /// Check every value is usable before running the pipeline
    pub fn validate(&self) -> Result<()> {
        self.subtraction
            .validate()
            .map_err(|e| Error::InvalidConfig(format!("subtraction: {}", e)))?;
        self.beams
            .validate()
            .map_err(|e| Error::InvalidConfig(format!("beams: {}", e)))?;

        let planning = &self.planning;
        non_negative("grouping.alignment_tolerance", self.grouping.alignment_tolerance)?;
        non_negative("grouping.min_lone_box_area", self.grouping.min_lone_box_area)?;
        non_negative("planning.perp_offset", planning.perp_offset)?;
        non_negative("planning.overlap_margin", planning.overlap_margin)?;
        non_negative("planning.edge_tolerance", planning.edge_tolerance)?;
        non_negative("planning.max_span", planning.max_span)?;

        if !(planning.scale.is_finite() && planning.scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "planning.scale must be positive, got {}",
                planning.scale
            )));
        }
        if self.max_segment_length() < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "max_span {} at scale {} allows no line of at least one pixel",
                planning.max_span, planning.scale
            )));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}
