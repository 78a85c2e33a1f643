// End-to-end tests of the frame step.

use common::{BoundaryMode, Domain};
use glam::DVec2;
use imf_dynamics::forces::ForceCoefficients;
use imf_dynamics::heater::HeaterConfig;
use imf_dynamics::particle::Particle;
use imf_dynamics::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME: f64 = 1.0 / 60.0;

/// No heat, no gravity, no noise and no drag: particles only feel each other.
fn quiet_config(width: f64, height: f64, boundary: BoundaryMode) -> SimulationConfig {
    let mut config = SimulationConfig {
        temperature: 0.0,
        gravity: 0.0,
        boundary,
        domain: Domain::new(width, height),
        heater: HeaterConfig::disabled(),
        ..SimulationConfig::default()
    };
    config.integrator.drag = 0.0;
    config
}

fn at_rest(x: f64, y: f64) -> Particle {
    Particle::new(DVec2::new(x, y), DVec2::ZERO, 1.0, 5.0, 0.0)
}

// ============================================================================
// Frame step
// ============================================================================

#[test]
fn distant_particles_at_zero_temperature_stay_put() {
    let config = quiet_config(300.0, 200.0, BoundaryMode::Reflect);
    let start = vec![at_rest(100.0, 100.0), at_rest(200.0, 100.0)];
    let mut sim = Simulation::with_particles(config, start.clone());
    for _ in 0..300 {
        sim.step(FRAME);
    }
    for (p, q) in sim.particles().iter().zip(&start) {
        assert_eq!(p.position, q.position);
        assert_eq!(p.velocity, DVec2::ZERO);
    }
}

#[test]
fn free_particle_wraps_around_a_periodic_domain() {
    let mut config = quiet_config(200.0, 200.0, BoundaryMode::Periodic);
    config.coefficients = ForceCoefficients {
        pair_strength: 0.0,
        hydrogen_bond: 0.0,
        dipole: 0.0,
    };
    let start = Particle::new(DVec2::new(190.0, 100.0), DVec2::new(10.0, 0.0), 1.0, 5.0, 0.0);
    let mut sim = Simulation::with_particles(config, vec![start]);
    for _ in 0..60 {
        sim.step(FRAME);
    }

    let domain = sim.config().domain;
    let p = &sim.particles()[0];
    assert!(p.position.x >= 0.0 && p.position.x < domain.width);
    let error = domain.displacement(DVec2::new(0.0, 100.0), p.position, BoundaryMode::Periodic);
    assert!(error.length() < 1e-6, "ended at {}", p.position);
    assert!((p.velocity - DVec2::new(10.0, 0.0)).length() < 1e-12);
    assert!((sim.time() - 1.0).abs() < 1e-9);
}

#[test]
fn long_frames_are_clamped() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let max_dt = sim.config().integrator.max_dt;
    let report = sim.step(5.0);
    assert_eq!(report.dt, max_dt);
    assert!((sim.time() - max_dt).abs() < 1e-12);
}

#[test]
fn zero_and_negative_frames_do_nothing() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let before = sim.particles().to_vec();
    for dt in [0.0, -1.0, f64::NAN] {
        let report = sim.step(dt);
        assert_eq!(report.dt, 0.0);
        assert_eq!(report.substeps, 0);
    }
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.particles(), before.as_slice());
}

#[test]
fn empty_simulation_steps_cleanly() {
    let mut config = SimulationConfig::default();
    config.particles.count = 0;
    let mut sim = Simulation::new(config);
    let report = sim.step(FRAME);
    assert_eq!(report.substeps, 0);
    assert!(sim.particles().is_empty());
    let stats = sim.statistics();
    assert_eq!(stats.particle_count, 0);
    assert_eq!(stats.gas_fraction, 0.0);
}

#[test]
fn fast_particles_trigger_substeps() {
    let config = quiet_config(400.0, 400.0, BoundaryMode::Reflect);
    let fast = Particle::new(DVec2::new(200.0, 200.0), DVec2::new(600.0, 0.0), 1.0, 5.0, 0.0);
    let mut sim = Simulation::with_particles(config, vec![fast]);
    let report = sim.step(FRAME);
    assert!(report.substeps >= sim.config().integrator.min_substeps);
    assert!(report.substeps <= sim.config().integrator.max_substeps);
}

// ============================================================================
// Long runs
// ============================================================================

#[test]
fn heated_substances_stay_finite_and_contained() {
    for substance in Substance::ALL {
        let mut config = SimulationConfig::for_substance(substance);
        config.particles.count = 120;
        let mut sim = Simulation::new(config);
        for _ in 0..240 {
            sim.step(FRAME);
        }

        let domain = sim.config().domain;
        for p in sim.particles() {
            assert!(p.position.is_finite() && p.velocity.is_finite(), "{substance}");
            assert!(p.position.x >= 0.0 && p.position.x <= domain.width, "{substance}");
            assert!(p.position.y >= 0.0 && p.position.y <= domain.height, "{substance}");
            assert!((0.0..=1.0).contains(&p.thermal_load()));
        }
        let stats = sim.statistics();
        assert_eq!(stats.particle_count, 120);
        assert!((0.0..=1.0).contains(&stats.gas_fraction));
    }
}

#[test]
fn phases_never_flip_faster_than_the_dwell() {
    let mut config = SimulationConfig::for_substance(Substance::Acetone);
    config.particles.count = 200;
    config.temperature = 900.0;
    let min_dwell = config.phase.min_dwell();
    let mut sim = Simulation::new(config);

    let mut entered: Vec<f64> = sim.particles().iter().map(|p| p.phase_entered_at()).collect();
    let mut phases: Vec<Phase> = sim.particles().iter().map(|p| p.phase()).collect();
    let mut flips = 0;
    for _ in 0..600 {
        sim.step(FRAME);
        for (i, p) in sim.particles().iter().enumerate() {
            if p.phase() != phases[i] {
                assert!(p.phase_entered_at() - entered[i] >= min_dwell - 1e-9);
                entered[i] = p.phase_entered_at();
                phases[i] = p.phase();
                flips += 1;
            }
        }
    }
    assert!(flips > 0);
}

#[test]
fn same_seed_same_trajectory() {
    let config = SimulationConfig::for_substance(Substance::Ethanol);
    let mut a = Simulation::new(config.clone());
    let mut b = Simulation::new(config);
    for _ in 0..60 {
        a.step(FRAME);
        b.step(FRAME);
    }
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn free_gas_holds_its_temperature() {
    let mut config = SimulationConfig {
        temperature: 400.0,
        gravity: 0.0,
        boundary: BoundaryMode::Periodic,
        domain: Domain::new(800.0, 600.0),
        heater: HeaterConfig::disabled(),
        coefficients: ForceCoefficients {
            pair_strength: 0.0,
            hydrogen_bond: 0.0,
            dipole: 0.0,
        },
        ..SimulationConfig::default()
    };
    // Only drag and the random kick exchange energy with the bath.
    config.thermostat.enabled = false;
    config.phase.gas_nudge = 0.0;
    let target = config.temperature;

    // Scattered and at rest: all of the final energy comes from the kick.
    let mut rng = StdRng::seed_from_u64(17);
    let start = (0..200)
        .map(|_| at_rest(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0)))
        .collect();
    let mut sim = Simulation::with_particles(config, start);

    // Let it settle for a few relaxation times, then average.
    for _ in 0..180 {
        sim.step(FRAME);
    }
    let frames = 180;
    let mut sum = 0.0;
    for _ in 0..frames {
        sim.step(FRAME);
        sum += sim.statistics().temperature;
    }
    let mean = sum / frames as f64;
    assert!(
        (mean - target).abs() < 0.25 * target,
        "settled at kT={mean:.1}, expected about {target}"
    );
}

// ============================================================================
// Hot reconfiguration
// ============================================================================

#[test]
fn staged_config_applies_at_the_next_step() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let before = sim.particles().to_vec();

    let mut next = sim.config().clone();
    next.temperature = 150.0;
    next.gravity = 10.0;
    sim.set_config(next);
    assert!(sim.has_pending_config());
    assert_eq!(sim.config().temperature, 400.0);

    // A zero-length frame still swaps the configuration in, without moving anything.
    sim.step(0.0);
    assert!(!sim.has_pending_config());
    assert_eq!(sim.config().temperature, 150.0);
    assert_eq!(sim.config().gravity, 10.0);
    assert_eq!(sim.particles(), before.as_slice());
}

#[test]
fn latest_staged_config_wins() {
    let mut sim = Simulation::new(SimulationConfig::default());
    for temperature in [100.0, 200.0, 300.0] {
        let mut next = sim.config().clone();
        next.temperature = temperature;
        sim.set_config(next);
    }
    sim.step(0.0);
    assert_eq!(sim.config().temperature, 300.0);
}

#[test]
fn count_change_resizes_without_respawning() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let before = sim.particles().to_vec();

    let mut fewer = sim.config().clone();
    fewer.particles.count = 40;
    sim.set_config(fewer);
    sim.step(0.0);
    assert_eq!(sim.particles(), &before[..40]);

    let mut more = sim.config().clone();
    more.particles.count = 90;
    sim.set_config(more);
    sim.step(0.0);
    assert_eq!(sim.particles().len(), 90);
    assert_eq!(&sim.particles()[..40], &before[..40]);
}

#[test]
fn scenario_change_respawns() {
    let mut sim = Simulation::new(SimulationConfig::default());
    for _ in 0..30 {
        sim.step(FRAME);
    }
    let before = sim.particles().to_vec();

    let mut next = sim.config().clone();
    next.boundary = BoundaryMode::Periodic;
    sim.set_config(next);
    sim.step(0.0);
    assert_eq!(sim.particles().len(), before.len());
    assert_ne!(sim.particles(), before.as_slice());
    // Fresh particles start liquid, entering that phase now.
    let now = sim.time();
    assert!(sim
        .particles()
        .iter()
        .all(|p| p.phase() == Phase::Liquid && p.phase_entered_at() == now));
}

#[test]
fn invalid_staged_values_are_sanitized() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let mut next = sim.config().clone();
    next.temperature = -50.0;
    next.integrator.max_dt = 10.0;
    next.particles.count = 1_000_000;
    sim.set_config(next);
    sim.step(0.0);
    assert_eq!(sim.config().temperature, 0.0);
    assert!(sim.config().integrator.max_dt <= imf_dynamics::config::MAX_FRAME_DT);
    assert_eq!(sim.particles().len(), imf_dynamics::config::MAX_PARTICLES);
}
