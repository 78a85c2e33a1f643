// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Planar geometry shared by the sandbox crates: the rectangular simulation [`Domain`], its
//! [`BoundaryMode`], and axis-aligned [`BoundingBox`] regions.

mod bounding_box;
mod domain;

pub use bounding_box::BoundingBox;
pub use domain::{BoundaryMode, Domain};

/// Padding added to distances before they are used as denominators.
pub const DISTANCE_EPSILON: f64 = 1e-9;

// End of File
