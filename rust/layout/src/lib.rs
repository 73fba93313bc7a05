// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # LoadSpan Layout
//!
//! Span line layout for structural floor plans.
//!
//! ## Overview
//!
//! Given slab and void rectangles from a detector, this crate works out where
//! to draw span lines, perpendicular arrows and span markers:
//!
//! - **Region subtraction**: voids are cut out of the slabs and the rest is
//!   re-partitioned into rectangles ([`loadspan_geometry::subtract`])
//! - **Chain grouping**: aligned, unobstructed rectangles are chained along
//!   the axis and neighbouring chains merged ([`group`])
//! - **Line planning**: each group is split at rectangle centers so that no
//!   line exceeds the maximum span and the shortest line is as long as
//!   possible ([`LinePlanner`])
//!
//! Both axes are processed in parallel, as are the groups of an axis.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loadspan_layout::{LayoutConfig, LayoutPipeline, PageInput};
//! use loadspan_geometry::{Axis, Rect};
//!
//! let page = PageInput::new(
//!     vec![Rect::new(0.0, 0.0, 600.0, 400.0)],
//!     vec![Rect::new(250.0, 150.0, 330.0, 250.0)],
//! );
//!
//! let pipeline = LayoutPipeline::new(LayoutConfig::default())?;
//! let layout = pipeline.run(&page);
//!
//! for group in &layout.axis(Axis::Horizontal).unwrap().groups {
//!     println!("group {}: {} lines", group.group_id, group.lines.len());
//! }
//! ```
//!
//! ## Incomplete groups
//!
//! When no combination of cut points keeps every line under the maximum
//! span, the group gets lines up to the farthest reachable point and its
//! [`Coverage`] is `Partial`. Other groups are unaffected.

pub mod config;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod planner;
pub mod types;

pub use config::{LayoutConfig, PlanningOptions};
pub use error::{Error, Result};
pub use grouping::{group, Chain, GroupingOptions};
pub use pipeline::LayoutPipeline;
pub use planner::LinePlanner;
pub use types::{
    Arrow, AxisLayout, Coverage, GroupLayout, Line, Marker, PageInput, PageLayout, Point2D,
};
