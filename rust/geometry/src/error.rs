// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when converting external coordinates into geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Malformed rectangle: {0}")]
    Format(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
