// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::fs;
use std::path::Path;

use common::{BoundaryMode, Domain};
use serde::{Deserialize, Serialize};

use crate::collision::CollisionConfig;
use crate::error::ConfigError;
use crate::forces::{ForceCoefficients, ForceConfig};
use crate::heater::HeaterConfig;
use crate::integrator::IntegratorConfig;
use crate::phase::PhaseConfig;
use crate::scenario::Substance;
use crate::thermostat::ThermostatConfig;

/// Upper bound on the particle population.
pub const MAX_PARTICLES: usize = 2000;

/// Longest frame the integrator will accept, whatever the configuration says.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Largest share of the gas entry threshold a fully heated particle may shed.
const MAX_THERMAL_RELIEF: f64 = 0.9;

/// Liquid entry threshold as a fraction, at most, of the lowest gas entry threshold.
const HYSTERESIS_MARGIN: f64 = 0.9;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Target population.
    pub count: usize,
    pub radius: f64,
    pub mass: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 150,
            radius: 5.0,
            mass: 1.0,
        }
    }
}

/// Everything the engine reads from its host, as one plain value.
///
/// Every field has a default, so a TOML file only needs to name what it changes:
///
/// ```toml
/// substance = "water"
/// temperature = 600.0
/// gravity = 0.0
/// boundary = "periodic"
///
/// [particles]
/// count = 200
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for spawn positions, Langevin kicks and heater jitter.
    pub seed: u64,
    /// When set, the preset's coefficients replace `coefficients`.
    pub substance: Option<Substance>,
    /// Target temperature kT, in the same energy units as the kinetic energy.
    pub temperature: f64,
    /// Downward acceleration; zero disables gravity.
    pub gravity: f64,
    pub boundary: BoundaryMode,
    pub domain: Domain,
    pub particles: ParticleConfig,
    pub coefficients: ForceCoefficients,
    pub forces: ForceConfig,
    pub integrator: IntegratorConfig,
    pub thermostat: ThermostatConfig,
    pub phase: PhaseConfig,
    pub collision: CollisionConfig,
    pub heater: HeaterConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            substance: None,
            temperature: 400.0,
            gravity: 40.0,
            boundary: BoundaryMode::Reflect,
            domain: Domain::default(),
            particles: ParticleConfig::default(),
            coefficients: ForceCoefficients::default(),
            forces: ForceConfig::default(),
            integrator: IntegratorConfig::default(),
            thermostat: ThermostatConfig::default(),
            phase: PhaseConfig::default(),
            collision: CollisionConfig::default(),
            heater: HeaterConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn for_substance(substance: Substance) -> Self {
        Self {
            substance: Some(substance),
            coefficients: substance.coefficients(),
            ..Self::default()
        }
    }

    /// The force coefficients in effect: the substance preset if one is selected.
    pub fn coefficients(&self) -> ForceCoefficients {
        self.substance
            .map(|substance| substance.coefficients())
            .unwrap_or(self.coefficients)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Whether moving from `self` to `next` invalidates the current particles.  Geometry, the
    /// particle template, the substance and the seed define a scenario; everything else can be
    /// changed under a running simulation.
    pub fn is_scenario_change(&self, next: &SimulationConfig) -> bool {
        self.domain != next.domain
            || self.boundary != next.boundary
            || self.particles.radius != next.particles.radius
            || self.particles.mass != next.particles.mass
            || self.substance != next.substance
            || self.seed != next.seed
    }

    /// Clamps every value into its valid range.  The engine assumes its configuration went
    /// through here.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut c = self.clone();

        c.temperature = non_negative(c.temperature);
        c.gravity = finite_or(c.gravity, 0.0);

        c.particles.count = c.particles.count.min(MAX_PARTICLES);
        c.particles.radius = positive_or(c.particles.radius, defaults.particles.radius);
        c.particles.mass = positive_or(c.particles.mass, defaults.particles.mass);

        let min_extent = 2.0 * c.particles.radius;
        c.domain.width = finite_or(c.domain.width, defaults.domain.width).max(min_extent);
        c.domain.height = finite_or(c.domain.height, defaults.domain.height).max(min_extent);

        c.coefficients.pair_strength = non_negative(c.coefficients.pair_strength);
        c.coefficients.hydrogen_bond = non_negative(c.coefficients.hydrogen_bond);
        c.coefficients.dipole = non_negative(c.coefficients.dipole);

        c.forces.epsilon = non_negative(c.forces.epsilon);
        c.forces.sigma = positive_or(c.forces.sigma, defaults.forces.sigma);
        c.forces.max_force = non_negative(c.forces.max_force);
        c.forces.gas_scale = unit(c.forces.gas_scale);

        let integrator = &mut c.integrator;
        integrator.max_dt =
            positive_or(integrator.max_dt, defaults.integrator.max_dt).min(MAX_FRAME_DT);
        integrator.drag = non_negative(integrator.drag);
        integrator.wall_restitution = unit(integrator.wall_restitution);
        integrator.floor_friction = unit(integrator.floor_friction);
        integrator.min_substeps = integrator.min_substeps.max(1);
        integrator.max_substeps = integrator.max_substeps.max(integrator.min_substeps);
        integrator.stable_displacement = positive_or(
            integrator.stable_displacement,
            defaults.integrator.stable_displacement,
        );

        let thermostat = &mut c.thermostat;
        thermostat.interval = non_negative(thermostat.interval);
        thermostat.min_scale = non_negative(thermostat.min_scale);
        thermostat.max_scale = non_negative(thermostat.max_scale).max(thermostat.min_scale);

        let phase = &mut c.phase;
        phase.liquid_dwell = non_negative(phase.liquid_dwell);
        phase.hot_liquid_dwell = non_negative(phase.hot_liquid_dwell).min(phase.liquid_dwell);
        phase.hot_load = unit(phase.hot_load);
        phase.gas_dwell = non_negative(phase.gas_dwell);
        phase.gas_lifetime = non_negative(phase.gas_lifetime).max(phase.gas_dwell);
        phase.density_radius = non_negative(phase.density_radius);
        phase.boil_load = unit(phase.boil_load);
        phase.gas_enter_factor =
            positive_or(phase.gas_enter_factor, defaults.phase.gas_enter_factor);
        phase.density_weight = non_negative(phase.density_weight);
        phase.thermal_relief = unit(phase.thermal_relief).min(MAX_THERMAL_RELIEF);
        // The fully loaded, uncrowded gas threshold still has to clear the liquid one.
        let lowest_entry = phase.gas_enter_factor * (1.0 - phase.thermal_relief);
        phase.gas_exit_factor =
            non_negative(phase.gas_exit_factor).min(HYSTERESIS_MARGIN * lowest_entry);
        phase.min_energy_scale =
            positive_or(phase.min_energy_scale, defaults.phase.min_energy_scale);
        phase.gas_nudge = finite_or(phase.gas_nudge, 0.0);
        phase.top_fraction = unit(phase.top_fraction);
        phase.top_slow_speed = non_negative(phase.top_slow_speed);
        phase.condense_retain = unit(phase.condense_retain);

        let collision = &mut c.collision;
        collision.restitution = unit(collision.restitution);
        collision.friction = non_negative(collision.friction);
        collision.conduction = non_negative(collision.conduction).min(0.5);
        collision.ground_tolerance = non_negative(collision.ground_tolerance);

        let heater = &mut c.heater;
        heater.heat_rate = non_negative(heater.heat_rate);
        heater.cool_rate = non_negative(heater.cool_rate);
        heater.buoyancy = finite_or(heater.buoyancy, 0.0);
        heater.jitter = non_negative(heater.jitter);

        c
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn non_negative(value: f64) -> f64 {
    finite_or(value, 0.0).max(0.0)
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn unit(value: f64) -> f64 {
    non_negative(value).min(1.0)
}


// End of File
