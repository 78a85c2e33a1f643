// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Liquid/gas classification with hysteresis.
//
// A particle evaporates when its kinetic energy beats a threshold that grows
// with the number of close neighbors; particles buried in a dense cluster must
// also have soaked up heat before they can leave ("boiling"). Gas condenses
// again at a lower energy threshold, on reaching the top of the container, on
// re-entering a dense neighborhood, or when its gas lease expires. Both
// directions are gated by a minimum dwell time in the current phase.

use common::Domain;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::heater::HeaterConfig;
use crate::particle::{Particle, Phase};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Minimum seconds in the liquid phase before evaporating.
    pub liquid_dwell: f64,
    /// Shorter liquid dwell for particles with at least `hot_load` thermal load.
    pub hot_liquid_dwell: f64,
    pub hot_load: f64,
    /// Minimum seconds in the gas phase before condensing.
    pub gas_dwell: f64,
    /// Seconds after evaporating at which a gas particle may condense unconditionally.
    pub gas_lifetime: f64,
    /// Neighbors counted within this distance make up a particle's local density.
    pub density_radius: f64,
    /// Local density at which a particle counts as embedded rather than on the surface.
    pub dense_neighbors: u32,
    /// Thermal load an embedded particle needs before it may boil off.
    pub boil_load: f64,
    /// Evaporation threshold in units of the energy scale, for an isolated cold particle.
    pub gas_enter_factor: f64,
    /// Condensation threshold in units of the energy scale.  Below `gas_enter_factor`.
    pub gas_exit_factor: f64,
    /// Relative increase of the evaporation threshold per neighbor.
    pub density_weight: f64,
    /// Relative decrease of the evaporation threshold at full thermal load.
    pub thermal_relief: f64,
    /// Floor of the energy scale, so a zero temperature does not make every moving particle gas.
    pub min_energy_scale: f64,
    /// Upward velocity added on evaporating.
    pub gas_nudge: f64,
    /// Fraction of the domain height, measured from the top, where gas condenses when slow.
    pub top_fraction: f64,
    /// Speed below which a gas particle near the top counts as slow.
    pub top_slow_speed: f64,
    /// Fraction of thermal load kept on condensing inside a heating region.
    pub condense_retain: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            liquid_dwell: 0.6,
            hot_liquid_dwell: 0.25,
            hot_load: 0.6,
            gas_dwell: 0.5,
            gas_lifetime: 4.0,
            density_radius: 15.0,
            dense_neighbors: 4,
            boil_load: 0.5,
            gas_enter_factor: 3.0,
            gas_exit_factor: 1.2,
            density_weight: 0.25,
            thermal_relief: 0.5,
            min_energy_scale: 50.0,
            gas_nudge: 15.0,
            top_fraction: 0.1,
            top_slow_speed: 30.0,
            condense_retain: 0.5,
        }
    }
}

impl PhaseConfig {
    /// Shortest time a particle can spend in any phase.
    pub fn min_dwell(&self) -> f64 {
        self.liquid_dwell.min(self.hot_liquid_dwell).min(self.gas_dwell)
    }
}

/// Everything the classifier reads besides the particle itself.
#[derive(Copy, Clone, Debug)]
pub struct PhaseContext<'a> {
    pub config: &'a PhaseConfig,
    pub heater: &'a HeaterConfig,
    pub domain: &'a Domain,
    /// Target temperature kT.
    pub temperature: f64,
}

impl PhaseContext<'_> {
    fn energy_scale(&self) -> f64 {
        self.temperature.max(self.config.min_energy_scale)
    }

    /// Kinetic energy a liquid particle must exceed to evaporate.
    pub fn gas_entry_threshold(&self, particle: &Particle) -> f64 {
        let config = self.config;
        let crowding = 1.0 + config.density_weight * particle.local_density as f64;
        let relief = (1.0 - config.thermal_relief * particle.thermal_load()).max(0.0);
        self.energy_scale() * config.gas_enter_factor * crowding * relief
    }

    /// Kinetic energy a gas particle must drop below to condense on cooling.
    pub fn liquid_entry_threshold(&self) -> f64 {
        self.energy_scale() * self.config.gas_exit_factor
    }

    fn liquid_dwell(&self, particle: &Particle) -> f64 {
        if particle.thermal_load() >= self.config.hot_load {
            self.config.hot_liquid_dwell
        } else {
            self.config.liquid_dwell
        }
    }

    fn is_dense(&self, particle: &Particle) -> bool {
        particle.local_density >= self.config.dense_neighbors
    }

    fn at_top(&self, particle: &Particle) -> bool {
        particle.position.y >= self.domain.height * (1.0 - self.config.top_fraction)
    }
}

/// Whether a liquid particle may become gas at time `now`.
pub fn can_enter_gas(particle: &Particle, now: f64, ctx: &PhaseContext) -> bool {
    if particle.phase() != Phase::Liquid {
        return false;
    }
    if now - particle.phase_entered_at() < ctx.liquid_dwell(particle) {
        return false;
    }
    if particle.kinetic_energy() <= ctx.gas_entry_threshold(particle) {
        return false;
    }
    // Surface particles escape on energy alone; embedded ones have to boil.
    !ctx.is_dense(particle) || particle.thermal_load() >= ctx.config.boil_load
}

/// Whether a gas particle may become liquid at time `now`.
pub fn can_enter_liquid(particle: &Particle, now: f64, ctx: &PhaseContext) -> bool {
    if particle.phase() != Phase::Gas {
        return false;
    }
    if now - particle.phase_entered_at() < ctx.config.gas_dwell {
        return false;
    }

    let expired = particle.phase_expiry().is_some_and(|expiry| now >= expiry);
    let energy = particle.kinetic_energy();
    let rising = particle.velocity.y > 0.0;
    let cold = energy < ctx.liquid_entry_threshold();
    let cool = energy < ctx.gas_entry_threshold(particle);

    expired
        || (cold && !rising)
        || (ctx.at_top(particle) && cool && particle.speed() < ctx.config.top_slow_speed)
        || (ctx.is_dense(particle) && cool && !rising)
}

/// Number of particles that changed phase in one classifier pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseTransitions {
    pub evaporated: usize,
    pub condensed: usize,
}

/// Runs the classifier over every particle.  This is the only place phases change.
pub fn update_phases(particles: &mut [Particle], now: f64, ctx: &PhaseContext) -> PhaseTransitions {
    let mut transitions = PhaseTransitions::default();
    for (i, particle) in particles.iter_mut().enumerate() {
        if can_enter_gas(particle, now, ctx) {
            particle.enter_phase(Phase::Gas, now, Some(now + ctx.config.gas_lifetime));
            particle.velocity.y += ctx.config.gas_nudge;
            transitions.evaporated += 1;
            trace!("particle {} evaporated at t={:.3}", i, now);
        } else if can_enter_liquid(particle, now, ctx) {
            particle.enter_phase(Phase::Liquid, now, None);
            let kept = if ctx.heater.is_heating(particle) {
                particle.thermal_load() * ctx.config.condense_retain
            } else {
                0.0
            };
            particle.set_thermal_load(kept);
            transitions.condensed += 1;
            trace!("particle {} condensed at t={:.3}", i, now);
        }
    }
    transitions
}


// End of File
