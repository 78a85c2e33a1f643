// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Temperature control.
//
// Two mechanisms work together:
// - a Langevin kick: every force pass adds a Gaussian random force of
//   intensity sqrt(2 gamma kT) per axis, balanced by the linear drag -gamma v
//   applied in the integrator. Over a step of length dt the force is held
//   constant, so its per-step standard deviation is sqrt(2 gamma kT / dt);
//   with that scaling the drag and the kick settle at a mean kinetic energy
//   of kT whatever the frame rate,
// - a periodic velocity rescale: every `interval` seconds the mean kinetic
//   energy is compared with the target kT (two degrees of freedom of kT/2
//   each) and velocities are scaled by a clamped factor toward it.
// Neither conserves energy exactly; they are tuned for a plausible picture.

use glam::DVec2;
use log::debug;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Which particles the periodic rescale touches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermostatScope {
    #[default]
    All,
    /// Only liquid particles are measured and rescaled; gas is left to fly.
    LiquidOnly,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    pub enabled: bool,
    /// Seconds of simulated time between rescales.
    pub interval: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub scope: ThermostatScope,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 0.5,
            min_scale: 0.9,
            max_scale: 1.1,
            scope: ThermostatScope::All,
        }
    }
}

/// Random force for one particle held over a step of `dt` seconds, drawn independently per
/// axis with standard deviation `sqrt(2 gamma kt / dt)`.  Zero when `gamma`, `kt` or `dt` is not
/// positive.
pub fn langevin_force<R: Rng + ?Sized>(rng: &mut R, gamma: f64, kt: f64, dt: f64) -> DVec2 {
    let variance = 2.0 * gamma * kt / dt;
    // A zero or negative dt lands here as an infinite, NaN or negative variance.
    if !variance.is_finite() || variance <= 0.0 {
        return DVec2::ZERO;
    }
    let sigma = variance.sqrt();
    let x: f64 = rng.sample(StandardNormal);
    let y: f64 = rng.sample(StandardNormal);
    DVec2::new(x, y) * sigma
}

/// Mean kinetic energy of the particles selected by `scope`, or `None` if none are selected.
pub fn mean_kinetic_energy(particles: &[Particle], scope: ThermostatScope) -> Option<f64> {
    let (sum, count) = particles
        .iter()
        .filter(|p| in_scope(p, scope))
        .fold((0.0, 0usize), |(sum, count), p| {
            (sum + p.kinetic_energy(), count + 1)
        });
    (count > 0).then(|| sum / count as f64)
}

fn in_scope(particle: &Particle, scope: ThermostatScope) -> bool {
    match scope {
        ThermostatScope::All => true,
        ThermostatScope::LiquidOnly => !particle.is_gas(),
    }
}

/// Schedule state of the periodic velocity rescale.
#[derive(Clone, Debug, Default)]
pub struct Thermostat {
    last_adjusted_at: f64,
}

impl Thermostat {
    pub fn new(now: f64) -> Self {
        Self {
            last_adjusted_at: now,
        }
    }

    pub fn last_adjusted_at(&self) -> f64 {
        self.last_adjusted_at
    }

    /// Rescales velocities toward the target temperature `kt` if at least `interval` seconds
    /// have passed since the last correction.  Returns the applied factor.
    ///
    /// A zero target temperature or a motionless population is left alone.
    pub fn maybe_rescale(
        &mut self,
        now: f64,
        particles: &mut [Particle],
        kt: f64,
        config: &ThermostatConfig,
    ) -> Option<f64> {
        if !config.enabled || now - self.last_adjusted_at < config.interval {
            return None;
        }
        self.last_adjusted_at = now;

        if kt <= 0.0 {
            return None;
        }
        let mean = mean_kinetic_energy(particles, config.scope)?;
        if mean <= f64::EPSILON {
            return None;
        }

        let scale = (kt / mean)
            .sqrt()
            .clamp(config.min_scale, config.max_scale);
        for particle in particles.iter_mut().filter(|p| in_scope(p, config.scope)) {
            particle.velocity *= scale;
        }
        debug!(
            "thermostat: mean kinetic energy {:.2} vs target {:.2}, scaled by {:.3}",
            mean, kt, scale
        );
        Some(scale)
    }
}


// End of File
