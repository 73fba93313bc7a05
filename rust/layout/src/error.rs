// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout configuration and page input.

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur before the layout pipeline runs.
///
/// The pipeline itself does not fail on well-formed geometry; a group whose
/// lines cannot reach the far bound is reported through
/// [`crate::types::Coverage`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rectangle conversion or geometry parameter error.
    #[error(transparent)]
    Geometry(#[from] loadspan_geometry::Error),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
