// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Semi-implicit Euler integration of the particle population.
//
// One substep is split into passes that the simulation runs in order:
// 1. `accumulate_forces`: pair forces from grid neighbors, plus local density,
// 2. `apply_external_forces`: drag, Langevin kick, gravity, heater buoyancy,
// 3. `integrate`: v += a dt, then x += v dt, plus heater jitter,
// 4. `apply_boundaries`: reflecting walls or periodic wrap.

use common::{BoundaryMode, Domain};
use glam::DVec2;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::forces::ForceModel;
use crate::heater::HeaterConfig;
use crate::particle::Particle;
use crate::spatial_grid::{CellMapping, SpatialGrid};
use crate::thermostat::langevin_force;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Longest frame, in seconds, integrated by a single `step` call.
    pub max_dt: f64,
    /// Linear drag coefficient gamma, shared with the Langevin kick.
    pub drag: f64,
    /// Fraction of the normal velocity kept when bouncing off a wall.
    pub wall_restitution: f64,
    /// Fraction of the tangential velocity lost on each floor contact.
    pub floor_friction: f64,
    pub substepping: bool,
    pub min_substeps: u32,
    pub max_substeps: u32,
    /// Largest displacement per substep, as a fraction of the smallest radius.
    pub stable_displacement: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_dt: 1.0 / 30.0,
            drag: 1.2,
            wall_restitution: 0.6,
            floor_friction: 0.05,
            substepping: true,
            min_substeps: 2,
            max_substeps: 12,
            stable_displacement: 0.5,
        }
    }
}

impl From<BoundaryMode> for CellMapping {
    fn from(mode: BoundaryMode) -> Self {
        match mode {
            BoundaryMode::Reflect => CellMapping::Clamp,
            BoundaryMode::Periodic => CellMapping::Wrap,
        }
    }
}

/// The frame length actually integrated: non-positive or NaN input becomes zero, long frames are
/// cut to `max_dt`.
pub fn clamp_dt(dt: f64, config: &IntegratorConfig) -> f64 {
    if dt > 0.0 {
        dt.min(config.max_dt)
    } else {
        0.0
    }
}

/// Number of substeps needed so that no particle moves more than `stable_displacement` radii in
/// one substep.  One when substepping is off or nothing is fast; otherwise clamped to
/// `[min_substeps, max_substeps]`.
pub fn substep_count(particles: &[Particle], dt: f64, config: &IntegratorConfig) -> u32 {
    if !config.substepping || particles.is_empty() || dt <= 0.0 {
        return 1;
    }
    let max_speed = particles.iter().map(Particle::speed).fold(0.0, f64::max);
    let min_radius = particles
        .iter()
        .map(|p| p.radius())
        .fold(f64::INFINITY, f64::min);
    let limit = config.stable_displacement * min_radius;
    if limit.is_nan() || limit <= 0.0 {
        return config.max_substeps.max(1);
    }

    let travel = max_speed * dt;
    if travel <= limit {
        return 1;
    }
    let needed = (travel / limit).ceil().min(u32::MAX as f64) as u32;
    needed.clamp(config.min_substeps.max(1), config.max_substeps.max(1))
}

/// Recomputes every particle's acceleration from pair forces and refreshes its local density.
pub fn accumulate_forces(
    particles: &mut [Particle],
    model: &ForceModel,
    domain: &Domain,
    boundary: BoundaryMode,
    density_radius: f64,
) {
    let cutoff = model.cutoff();
    let query_radius = cutoff.max(density_radius);
    let grid = SpatialGrid::from_particles(particles, domain, query_radius, boundary.into());

    let mut forces = vec![DVec2::ZERO; particles.len()];
    let mut densities = vec![0u32; particles.len()];
    for (i, a) in particles.iter().enumerate() {
        grid.for_each_neighbor(a.position, query_radius, |j| {
            if j == i {
                return;
            }
            let b = &particles[j];
            let displacement = domain.displacement(a.position, b.position, boundary);
            let r = displacement.length();
            if r < density_radius {
                densities[i] += 1;
            }
            if r <= cutoff {
                forces[i] += model.pair_force(a, b, displacement);
            }
        });
    }

    for ((particle, force), density) in particles.iter_mut().zip(forces).zip(densities) {
        particle.acceleration = force * particle.inverse_mass();
        particle.local_density = density;
    }
}

/// External influences common to every substep.
#[derive(Copy, Clone, Debug)]
pub struct Environment<'a> {
    pub temperature: f64,
    pub drag: f64,
    /// Downward acceleration; zero disables gravity.
    pub gravity: f64,
    pub heater: &'a HeaterConfig,
}

/// Adds drag, the Langevin kick, gravity and heater buoyancy to each particle's acceleration,
/// and updates its thermal load.
pub fn apply_external_forces<R: Rng + ?Sized>(
    particles: &mut [Particle],
    rng: &mut R,
    env: &Environment,
    dt: f64,
) {
    let gravity = DVec2::new(0.0, -env.gravity);
    for particle in particles.iter_mut() {
        let force = -env.drag * particle.velocity
            + langevin_force(rng, env.drag, env.temperature, dt);
        env.heater.update_thermal_load(particle, dt);
        particle.acceleration +=
            force * particle.inverse_mass() + gravity + env.heater.buoyancy(particle);
    }
}

/// Semi-implicit Euler: velocity first, then position with the new velocity.  Heated particles
/// also get a random positional jitter.
pub fn integrate<R: Rng + ?Sized>(
    particles: &mut [Particle],
    rng: &mut R,
    heater: &HeaterConfig,
    dt: f64,
) {
    for particle in particles.iter_mut() {
        particle.velocity += particle.acceleration * dt;
        particle.position += particle.velocity * dt;

        let amplitude = heater.jitter * particle.thermal_load() * dt;
        if heater.enabled && amplitude > 0.0 {
            let x: f64 = rng.sample(StandardNormal);
            let y: f64 = rng.sample(StandardNormal);
            particle.position += DVec2::new(x, y) * amplitude;
        }
    }
}

/// Keeps particles inside the domain: bounce off the walls, or wrap around.
pub fn apply_boundaries(
    particles: &mut [Particle],
    domain: &Domain,
    boundary: BoundaryMode,
    config: &IntegratorConfig,
) {
    match boundary {
        BoundaryMode::Periodic => {
            for particle in particles.iter_mut() {
                particle.position = domain.wrap(particle.position);
            }
        }
        BoundaryMode::Reflect => {
            for particle in particles.iter_mut() {
                reflect(particle, domain, config);
            }
        }
    }
}

fn reflect(particle: &mut Particle, domain: &Domain, config: &IntegratorConfig) {
    let r = particle.radius();
    let e = config.wall_restitution;

    if particle.position.x < r {
        particle.position.x = r;
        if particle.velocity.x < 0.0 {
            particle.velocity.x = -particle.velocity.x * e;
        }
    } else if particle.position.x > domain.width - r {
        particle.position.x = domain.width - r;
        if particle.velocity.x > 0.0 {
            particle.velocity.x = -particle.velocity.x * e;
        }
    }

    if particle.position.y < r {
        particle.position.y = r;
        if particle.velocity.y < 0.0 {
            particle.velocity.y = -particle.velocity.y * e;
        }
        particle.velocity.x *= 1.0 - config.floor_friction;
    } else if particle.position.y > domain.height - r {
        particle.position.y = domain.height - r;
        if particle.velocity.y > 0.0 {
            particle.velocity.y = -particle.velocity.y * e;
        }
    }
}


// End of File
