// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Aggregation state of a single particle.  Only the phase classifier
/// ([`crate::phase::update_phases`]) moves a particle between phases.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Liquid,
    Gas,
}

/// A circular point particle.  Every field is initialized at creation; nothing is filled in
/// lazily by later passes.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Net acceleration from the most recent force pass.  Recomputed from scratch every substep.
    pub acceleration: DVec2,
    /// Number of neighbors inside the density-sensing radius, refreshed by each force pass.
    pub local_density: u32,
    mass: f64,
    radius: f64,
    pub(crate) phase: Phase,
    pub(crate) phase_entered_at: f64,
    pub(crate) phase_expiry: Option<f64>,
    thermal_load: f64,
}

impl Particle {
    /// Creates a liquid particle at rest in the phase sense: it entered the liquid phase at
    /// `now` and carries no heat.
    ///
    /// `mass` and `radius` are floored at a tiny positive value so that the `> 0` invariant holds
    /// even for degenerate inputs.
    pub fn new(position: DVec2, velocity: DVec2, mass: f64, radius: f64, now: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: DVec2::ZERO,
            mass: mass.max(f64::EPSILON),
            radius: radius.max(f64::EPSILON),
            local_density: 0,
            phase: Phase::Liquid,
            phase_entered_at: now,
            phase_expiry: None,
            thermal_load: 0.0,
        }
    }

    /// Always positive.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Always positive; fixed at creation.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_gas(&self) -> bool {
        self.phase == Phase::Gas
    }

    /// Simulated time of the last phase transition (or of creation).
    pub fn phase_entered_at(&self) -> f64 {
        self.phase_entered_at
    }

    /// Time after which a gas particle may condense regardless of its energy.
    pub fn phase_expiry(&self) -> Option<f64> {
        self.phase_expiry
    }

    /// Accumulated heat in `[0, 1]`.
    pub fn thermal_load(&self) -> f64 {
        self.thermal_load
    }

    pub fn set_thermal_load(&mut self, load: f64) {
        self.thermal_load = if load.is_nan() {
            0.0
        } else {
            load.clamp(0.0, 1.0)
        };
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn inverse_mass(&self) -> f64 {
        1.0 / self.mass
    }

    pub(crate) fn enter_phase(&mut self, phase: Phase, now: f64, expiry: Option<f64>) {
        self.phase = phase;
        self.phase_entered_at = now;
        self.phase_expiry = expiry;
    }
}


// End of File
