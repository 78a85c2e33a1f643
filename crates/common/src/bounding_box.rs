// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle defined by two opposite corners (`min` and `max`).
/// `min.x <= max.x`, `min.y <= max.y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Creates a `BoundingBox` from two arbitrary corners, sorting the components so that the
    /// `min <= max` invariant holds.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns true if the provided `point` is inside this `BoundingBox` (edges included).
    /// Otherwise returns false.
    pub fn contains(&self, point: DVec2) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }
}


// End of File
