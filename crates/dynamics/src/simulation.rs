// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use common::{BoundaryMode, Domain};
use glam::DVec2;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::collision::{relax_collisions, CollisionStats};
use crate::config::SimulationConfig;
use crate::forces::ForceModel;
use crate::integrator::{
    accumulate_forces, apply_boundaries, apply_external_forces, clamp_dt, integrate,
    substep_count, Environment,
};
use crate::particle::Particle;
use crate::phase::{update_phases, PhaseContext, PhaseTransitions};
use crate::thermostat::Thermostat;

/// What a single [`Simulation::step`] call did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Frame length actually integrated, after clamping.  Zero for an idle step.
    pub dt: f64,
    /// Zero for an idle step.
    pub substeps: u32,
    pub collisions: CollisionStats,
    pub transitions: PhaseTransitions,
    /// Factor applied by the periodic thermostat, if it fired during this step.
    pub thermostat_scale: Option<f64>,
}

/// Population summary for display.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SimulationStats {
    pub particle_count: usize,
    pub gas_fraction: f64,
    pub mean_kinetic_energy: f64,
    /// Instantaneous kT: in two dimensions the mean kinetic energy per particle equals kT.
    pub temperature: f64,
    pub mean_thermal_load: f64,
    pub time: f64,
}

/// The particle simulation step engine.
///
/// The host owns one of these, calls [`step`](Self::step) once per frame and reads
/// [`particles`](Self::particles) back to draw them.  Configuration changes are staged with
/// [`set_config`](Self::set_config) and take effect at the start of the next step.
pub struct Simulation {
    config: SimulationConfig,
    pending: Option<SimulationConfig>,
    particles: Vec<Particle>,
    rng: StdRng,
    time: f64,
    thermostat: Thermostat,
}

impl Simulation {
    /// Creates a simulation and spawns its particles.
    pub fn new(config: SimulationConfig) -> Self {
        let config = config.sanitized();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let particles = spawn_population(&config, &mut rng, 0.0);
        info!(
            "spawned {} particles ({})",
            particles.len(),
            scenario_label(&config)
        );
        Self {
            config,
            pending: None,
            particles,
            rng,
            time: 0.0,
            thermostat: Thermostat::new(0.0),
        }
    }

    /// Creates a simulation around an explicit particle list instead of spawning one.  The
    /// target count follows the list.
    pub fn with_particles(config: SimulationConfig, particles: Vec<Particle>) -> Self {
        let mut config = config.sanitized();
        config.particles.count = particles.len();
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            pending: None,
            particles,
            rng,
            time: 0.0,
            thermostat: Thermostat::new(0.0),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The current particles, for drawing.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Simulated seconds since creation.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Stages a configuration to be swapped in at the start of the next step.  A later call
    /// before that step replaces the staged one.
    pub fn set_config(&mut self, config: SimulationConfig) {
        self.pending = Some(config);
    }

    pub fn has_pending_config(&self) -> bool {
        self.pending.is_some()
    }

    /// Throws away every particle and spawns a fresh population for the current configuration.
    pub fn reset(&mut self) {
        self.particles = spawn_population(&self.config, &mut self.rng, self.time);
        self.thermostat = Thermostat::new(self.time);
        info!(
            "respawned {} particles ({})",
            self.particles.len(),
            scenario_label(&self.config)
        );
    }

    /// Advances the simulation by one frame of `dt` seconds.
    ///
    /// `dt` is clamped to the configured maximum; a zero, negative or NaN `dt` and an empty
    /// population make the step a no-op apart from swapping in a staged configuration.
    pub fn step(&mut self, dt: f64) -> StepReport {
        self.apply_pending_config();

        let dt = clamp_dt(dt, &self.config.integrator);
        if dt <= 0.0 || self.particles.is_empty() {
            return StepReport::default();
        }

        let config = &self.config;
        let substeps = substep_count(&self.particles, dt, &config.integrator);
        let h = dt / substeps as f64;
        if substeps > 1 {
            trace!("integrating {:.4}s in {} substeps", dt, substeps);
        }

        let model = ForceModel::new(&config.forces, &config.coefficients());
        let env = Environment {
            temperature: config.temperature,
            drag: config.integrator.drag,
            gravity: config.gravity,
            heater: &config.heater,
        };
        let phase_ctx = PhaseContext {
            config: &config.phase,
            heater: &config.heater,
            domain: &config.domain,
            temperature: config.temperature,
        };

        let mut report = StepReport {
            dt,
            substeps,
            ..StepReport::default()
        };

        for _ in 0..substeps {
            accumulate_forces(
                &mut self.particles,
                &model,
                &config.domain,
                config.boundary,
                config.phase.density_radius,
            );
            apply_external_forces(&mut self.particles, &mut self.rng, &env, h);
            integrate(&mut self.particles, &mut self.rng, &config.heater, h);
            apply_boundaries(
                &mut self.particles,
                &config.domain,
                config.boundary,
                &config.integrator,
            );
            report.collisions += relax_collisions(
                &mut self.particles,
                &config.domain,
                config.boundary,
                &config.collision,
            );

            self.time += h;
            let transitions = update_phases(&mut self.particles, self.time, &phase_ctx);
            report.transitions.evaporated += transitions.evaporated;
            report.transitions.condensed += transitions.condensed;
        }

        report.thermostat_scale = self.thermostat.maybe_rescale(
            self.time,
            &mut self.particles,
            config.temperature,
            &config.thermostat,
        );

        report
    }

    /// Population summary of the current state.
    pub fn statistics(&self) -> SimulationStats {
        let n = self.particles.len();
        if n == 0 {
            return SimulationStats {
                time: self.time,
                ..SimulationStats::default()
            };
        }
        let count = n as f64;
        let gas = self.particles.iter().filter(|p| p.is_gas()).count();
        let kinetic: f64 = self.particles.iter().map(Particle::kinetic_energy).sum();
        let load: f64 = self.particles.iter().map(Particle::thermal_load).sum();
        SimulationStats {
            particle_count: n,
            gas_fraction: gas as f64 / count,
            mean_kinetic_energy: kinetic / count,
            temperature: kinetic / count,
            mean_thermal_load: load / count,
            time: self.time,
        }
    }

    fn apply_pending_config(&mut self) {
        let Some(next) = self.pending.take() else {
            return;
        };
        let next = next.sanitized();
        if next == self.config {
            return;
        }

        let scenario_change = self.config.is_scenario_change(&next);
        let reseed = self.config.seed != next.seed;
        let target = next.particles.count;
        self.config = next;

        if scenario_change {
            if reseed {
                self.rng = StdRng::seed_from_u64(self.config.seed);
            }
            self.reset();
        } else if target != self.particles.len() {
            self.resize_population(target);
        } else {
            info!("configuration updated ({})", scenario_label(&self.config));
        }
    }

    /// Grows or truncates the population to `target` particles.  Newcomers are dropped in at
    /// random positions and sorted out by the collision resolver.
    fn resize_population(&mut self, target: usize) {
        let before = self.particles.len();
        if target < before {
            self.particles.truncate(target);
        } else {
            let extra = target - before;
            self.particles.reserve(extra);
            for _ in 0..extra {
                let position = random_position(&self.config, &mut self.rng);
                let particle = new_particle(&self.config, &mut self.rng, position, self.time);
                self.particles.push(particle);
            }
        }
        info!("particle count {} -> {}", before, self.particles.len());
    }
}

fn scenario_label(config: &SimulationConfig) -> String {
    let substance = config
        .substance
        .map(|s| s.to_string())
        .unwrap_or_else(|| "custom".to_string());
    let boundary = match config.boundary {
        BoundaryMode::Reflect => "walls",
        BoundaryMode::Periodic => "periodic",
    };
    format!("{}, {}, kT={:.1}", substance, boundary, config.temperature)
}

/// Initial population: a loose liquid block stacked up from the floor, spilling over into random
/// positions once the lattice is full.
fn spawn_population(config: &SimulationConfig, rng: &mut StdRng, now: f64) -> Vec<Particle> {
    let count = config.particles.count;
    let radius = config.particles.radius;
    let Domain { width, height } = config.domain;

    let spacing = 2.2 * radius;
    let margin = 1.1 * radius;
    let columns = (((width - 2.0 * margin) / spacing).floor() as usize + 1).max(1);
    let rows = (((height - 2.0 * margin) / spacing).floor() as usize + 1).max(1);
    let x_offset = 0.5 * (width - (columns - 1) as f64 * spacing);
    debug!(
        "spawn lattice {}x{} for {} particles, spacing {:.2}",
        columns, rows, count, spacing
    );

    (0..count)
        .map(|k| {
            let (column, row) = (k % columns, k / columns);
            let position = if row < rows {
                let jitter = DVec2::new(rng.gen_range(-0.1..=0.1), rng.gen_range(-0.1..=0.1));
                DVec2::new(
                    x_offset + column as f64 * spacing,
                    margin + row as f64 * spacing,
                ) + jitter * radius
            } else {
                random_position(config, rng)
            };
            new_particle(config, rng, position, now)
        })
        .collect()
}

fn random_position(config: &SimulationConfig, rng: &mut StdRng) -> DVec2 {
    let r = config.particles.radius;
    let Domain { width, height } = config.domain;
    let x = if width > 2.0 * r {
        rng.gen_range(r..width - r)
    } else {
        0.5 * width
    };
    let y = if height > 2.0 * r {
        rng.gen_range(r..height - r)
    } else {
        0.5 * height
    };
    DVec2::new(x, y)
}

/// A particle with a Maxwell-Boltzmann velocity for the configured temperature.
fn new_particle(
    config: &SimulationConfig,
    rng: &mut StdRng,
    position: DVec2,
    now: f64,
) -> Particle {
    let mass = config.particles.mass;
    let sigma = (config.temperature / mass).sqrt();
    let velocity = if sigma > 0.0 {
        let vx: f64 = rng.sample(StandardNormal);
        let vy: f64 = rng.sample(StandardNormal);
        DVec2::new(vx, vy) * sigma
    } else {
        DVec2::ZERO
    };
    Particle::new(position, velocity, mass, config.particles.radius, now)
}


// End of File
