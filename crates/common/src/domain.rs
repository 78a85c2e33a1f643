// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// How particles interact with the edges of the simulation domain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Walls on all four sides; particles bounce off them.
    #[default]
    Reflect,
    /// Opposite edges are identified; particles leaving one side re-enter on the other.
    Periodic,
}

/// The rectangular simulation domain, spanning `[0, width] x [0, height]`.  The y axis points
/// up: `y = 0` is the floor and `y = height` the top of the container.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 420.0,
        }
    }
}

impl Domain {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_corners(DVec2::ZERO, self.size())
    }

    /// Maps a point back into `[0, width) x [0, height)`.
    pub fn wrap(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            wrap_coordinate(point.x, self.width),
            wrap_coordinate(point.y, self.height),
        )
    }

    /// Returns the shortest periodic image of a displacement vector.
    pub fn minimum_image(&self, delta: DVec2) -> DVec2 {
        DVec2::new(
            minimum_image_coordinate(delta.x, self.width),
            minimum_image_coordinate(delta.y, self.height),
        )
    }

    /// Displacement `to - from`, taking the nearest periodic image when `mode` is periodic.
    pub fn displacement(&self, from: DVec2, to: DVec2, mode: BoundaryMode) -> DVec2 {
        let delta = to - from;
        match mode {
            BoundaryMode::Reflect => delta,
            BoundaryMode::Periodic => self.minimum_image(delta),
        }
    }
}

fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

fn minimum_image_coordinate(delta: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return delta;
    }
    delta - extent * (delta / extent).round()
}


// End of File
