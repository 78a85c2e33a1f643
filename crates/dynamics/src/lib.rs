// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Intermolecular-Forces Particle Engine
//!
//! A small 2D particle simulation of a liquid and its vapor.  Each frame the [`Simulation`]:
//!
//! 1. rebuilds a [`SpatialGrid`](spatial_grid::SpatialGrid) over the particles,
//! 2. sums short-range pair forces from the [`ForceModel`](forces::ForceModel): a
//!    Lennard-Jones-like core plus hydrogen-bond and dipole proxies,
//! 3. adds drag, a Langevin kick, gravity and heater buoyancy, then integrates with
//!    semi-implicit Euler, substepping fast frames,
//! 4. bounces particles off the walls or wraps them around,
//! 5. relaxes circle overlaps with the collision resolver,
//! 6. reclassifies particles as liquid or gas with hysteresis,
//!
//! and every half second of simulated time nudges the population's kinetic energy toward the
//! configured temperature.
//!
//! The engine is single-threaded and frame driven.  It never draws; hosts read
//! [`Simulation::particles`] after each step.

pub mod collision;
pub mod config;
pub mod error;
pub mod forces;
pub mod heater;
pub mod integrator;
pub mod particle;
pub mod phase;
pub mod scenario;
pub mod simulation;
pub mod spatial_grid;
pub mod thermostat;

pub use config::SimulationConfig;
pub use error::ConfigError;
pub use particle::{Particle, Phase};
pub use scenario::Substance;
pub use simulation::{Simulation, SimulationStats, StepReport};

/// A module which is typically glob imported.
pub mod prelude {
    pub use super::{
        ConfigError, Particle, Phase, Simulation, SimulationConfig, SimulationStats, StepReport,
        Substance,
    };
    pub use common::{BoundaryMode, Domain};
}

// End of File
