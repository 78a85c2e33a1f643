// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Short-range pair forces between particles.
//
// Three independent terms are summed for every pair:
// - a Lennard-Jones-like core that repels at short range and attracts in a
//   shallow well, cut off at 2.5 sigma,
// - a hydrogen-bond proxy: linear attraction cut off at 1.8 sigma,
// - a dipole proxy: inverse-square attraction with a linear taper, cut off at
//   2.2 sigma.
// Each term is weighted by a per-scenario coefficient; a zero coefficient
// switches the term off. All terms are damped when either particle is gas.

use common::DISTANCE_EPSILON;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

pub const LENNARD_JONES_CUTOFF: f64 = 2.5;
pub const HYDROGEN_BOND_CUTOFF: f64 = 1.8;
pub const DIPOLE_CUTOFF: f64 = 2.2;

/// Scenario-specific weights for the three force terms.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceCoefficients {
    /// Multiplies the base well depth of the Lennard-Jones term.
    pub pair_strength: f64,
    /// Peak attraction of the hydrogen-bond proxy, reached at zero separation.
    pub hydrogen_bond: f64,
    /// Attraction of the dipole proxy at a separation of one sigma, before tapering.
    pub dipole: f64,
}

impl Default for ForceCoefficients {
    fn default() -> Self {
        Self {
            pair_strength: 1.0,
            hydrogen_bond: 0.0,
            dipole: 0.0,
        }
    }
}

/// Fixed parameters of the pair potential shared by every scenario.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Base Lennard-Jones well depth, scaled by [`ForceCoefficients::pair_strength`].
    pub epsilon: f64,
    /// Length scale of every term.
    pub sigma: f64,
    /// Magnitude limit applied to each term.
    pub max_force: f64,
    /// Factor applied to every term when either particle of the pair is gas.
    pub gas_scale: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            epsilon: 20.0,
            sigma: 10.0,
            max_force: 60.0,
            gas_scale: 0.2,
        }
    }
}

/// Pair force evaluator, derived from a [`ForceConfig`] and the active [`ForceCoefficients`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceModel {
    epsilon: f64,
    sigma: f64,
    max_force: f64,
    gas_scale: f64,
    hydrogen_bond: f64,
    dipole: f64,
}

impl ForceModel {
    pub fn new(config: &ForceConfig, coefficients: &ForceCoefficients) -> Self {
        Self {
            epsilon: config.epsilon * coefficients.pair_strength,
            sigma: config.sigma.max(DISTANCE_EPSILON),
            max_force: config.max_force.abs(),
            gas_scale: config.gas_scale,
            hydrogen_bond: coefficients.hydrogen_bond,
            dipole: coefficients.dipole,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Distance beyond which every term is zero.
    pub fn cutoff(&self) -> f64 {
        self.sigma * LENNARD_JONES_CUTOFF.max(HYDROGEN_BOND_CUTOFF).max(DIPOLE_CUTOFF)
    }

    /// Signed Lennard-Jones magnitude at separation `r`: positive repels, negative attracts.
    pub fn lennard_jones(&self, r: f64) -> f64 {
        let r = r + DISTANCE_EPSILON;
        if r > LENNARD_JONES_CUTOFF * self.sigma || self.epsilon == 0.0 {
            return 0.0;
        }
        let sr6 = (self.sigma / r).powi(6);
        let magnitude = 24.0 * self.epsilon * (2.0 * sr6 * sr6 - sr6) / r;
        magnitude.clamp(-self.max_force, self.max_force)
    }

    /// Attractive magnitude of the hydrogen-bond proxy at separation `r`.
    pub fn hydrogen_bond(&self, r: f64) -> f64 {
        let cutoff = HYDROGEN_BOND_CUTOFF * self.sigma;
        if self.hydrogen_bond <= 0.0 || r >= cutoff {
            return 0.0;
        }
        (self.hydrogen_bond * (1.0 - r / cutoff)).min(self.max_force)
    }

    /// Attractive magnitude of the dipole proxy at separation `r`.
    pub fn dipole(&self, r: f64) -> f64 {
        let cutoff = DIPOLE_CUTOFF * self.sigma;
        if self.dipole <= 0.0 || r >= cutoff {
            return 0.0;
        }
        let r = r + DISTANCE_EPSILON;
        let falloff = (self.sigma / r).powi(2);
        (self.dipole * falloff * (1.0 - r / cutoff)).min(self.max_force)
    }

    /// Force exerted on `a` by `b`, where `displacement` is `b - a` (the nearest periodic image
    /// when the domain wraps).
    ///
    /// Swapping the particles and negating the displacement negates the result.
    pub fn pair_force(&self, a: &Particle, b: &Particle, displacement: DVec2) -> DVec2 {
        let r = displacement.length();
        if r > self.cutoff() {
            return DVec2::ZERO;
        }
        let direction = displacement / (r + DISTANCE_EPSILON);

        // Positive means "toward b".
        let mut magnitude = -self.lennard_jones(r) + self.hydrogen_bond(r) + self.dipole(r);
        if a.is_gas() || b.is_gas() {
            magnitude *= self.gas_scale;
        }
        direction * magnitude
    }
}


// End of File
