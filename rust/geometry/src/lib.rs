// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LoadSpan Geometry
//!
//! Rectangle model and void subtraction for structural floor-plan regions.
//! Slabs and voids arrive as axis-aligned rectangles from an external
//! detector; [`subtract`] removes the voids and re-partitions what is left
//! into clean, non-overlapping rectangles ready for chain grouping.
//!
//! All operations are parameterized by an [`Axis`] so that the horizontal
//! and the vertical pass share one implementation.

pub mod bands;
pub mod bool2d;
pub mod error;
pub mod rect;
pub mod split_lines;
pub mod subtract;

// Re-export nalgebra point type for convenience
pub use nalgebra::Point2;

pub use error::{Error, Result};
pub use rect::{Axis, Rect, Span};
pub use split_lines::SplitLine;
pub use subtract::{derive_beams, subtract, SizeFilter, SubtractOptions};
