// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use common::BoundingBox;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// A hot plate: particles inside `region` soak up heat, everyone else cools off.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaterConfig {
    pub enabled: bool,
    /// Thermal load gained per second inside the region.
    pub heat_rate: f64,
    /// Thermal load lost per second outside the region, or everywhere while disabled.
    pub cool_rate: f64,
    /// Upward acceleration at full thermal load.
    pub buoyancy: f64,
    /// Standard deviation of the positional jitter per second at full thermal load.
    pub jitter: f64,
    pub region: BoundingBox,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heat_rate: 0.35,
            cool_rate: 0.15,
            buoyancy: 120.0,
            jitter: 6.0,
            region: BoundingBox::from_corners(DVec2::new(200.0, 0.0), DVec2::new(440.0, 30.0)),
        }
    }
}

impl HeaterConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether `particle` currently sits inside an active heating region.
    pub fn is_heating(&self, particle: &Particle) -> bool {
        self.enabled && self.region.contains(particle.position)
    }

    /// Accumulates or bleeds off heat over `dt` seconds.
    pub fn update_thermal_load(&self, particle: &mut Particle, dt: f64) {
        let load = particle.thermal_load();
        let next = if self.is_heating(particle) {
            load + self.heat_rate * dt
        } else {
            load - self.cool_rate * dt
        };
        particle.set_thermal_load(next);
    }

    /// Extra upward acceleration contributed by a particle's stored heat.
    pub fn buoyancy(&self, particle: &Particle) -> DVec2 {
        if !self.enabled {
            return DVec2::ZERO;
        }
        DVec2::new(0.0, self.buoyancy * particle.thermal_load())
    }
}


// End of File
