// Tests for the pairwise force model and its accumulation over a population.

use common::{BoundaryMode, Domain};
use glam::DVec2;
use imf_dynamics::forces::{ForceCoefficients, ForceConfig, ForceModel, LENNARD_JONES_CUTOFF};
use imf_dynamics::integrator::accumulate_forces;
use imf_dynamics::particle::Particle;
use imf_dynamics::Substance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn particle_at(x: f64, y: f64) -> Particle {
    Particle::new(DVec2::new(x, y), DVec2::ZERO, 1.0, 5.0, 0.0)
}

fn water_model() -> ForceModel {
    ForceModel::new(&ForceConfig::default(), &Substance::Water.coefficients())
}

// ============================================================================
// Cutoffs
// ============================================================================

#[test]
fn lennard_jones_is_exactly_zero_past_cutoff() {
    let config = ForceConfig::default();
    for coefficients in Substance::ALL.map(|s| s.coefficients()) {
        let model = ForceModel::new(&config, &coefficients);
        let cutoff = LENNARD_JONES_CUTOFF * config.sigma;
        for k in 1..200 {
            let r = cutoff + k as f64 * 0.37;
            assert_eq!(model.lennard_jones(r), 0.0, "r = {r}");
            let a = particle_at(0.0, 0.0);
            let b = particle_at(r, 0.0);
            assert_eq!(model.pair_force(&a, &b, DVec2::new(r, 0.0)), DVec2::ZERO);
        }
    }
}

#[test]
fn pair_force_vanishes_past_every_cutoff() {
    let model = water_model();
    let r = model.cutoff() + 1e-6;
    let a = particle_at(0.0, 0.0);
    let b = particle_at(r, 0.0);
    assert_eq!(model.pair_force(&a, &b, DVec2::new(r, 0.0)), DVec2::ZERO);
}

#[test]
fn lennard_jones_repels_close_and_attracts_at_mid_range() {
    let model = water_model();
    let sigma = model.sigma();
    assert!(model.lennard_jones(0.9 * sigma) > 0.0);
    assert!(model.lennard_jones(1.5 * sigma) < 0.0);
}

#[test]
fn magnitudes_respect_the_force_cap() {
    let config = ForceConfig::default();
    let model = ForceModel::new(&config, &Substance::Water.coefficients());
    for k in 0..500 {
        let r = k as f64 * 0.06;
        assert!(model.lennard_jones(r).abs() <= config.max_force, "r = {r}");
        assert!(model.hydrogen_bond(r) <= config.max_force);
        assert!(model.dipole(r) <= config.max_force);
    }
}

#[test]
fn coincident_particles_produce_finite_forces() {
    let model = water_model();
    let a = particle_at(10.0, 10.0);
    let b = particle_at(10.0, 10.0);
    let force = model.pair_force(&a, &b, DVec2::ZERO);
    assert!(force.is_finite());
}

// ============================================================================
// Newton's third law
// ============================================================================

#[test]
fn swapping_a_pair_negates_the_force() {
    let model = water_model();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let a = particle_at(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0));
        let b = particle_at(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0));
        let d = b.position - a.position;
        let f_ab = model.pair_force(&a, &b, d);
        let f_ba = model.pair_force(&b, &a, -d);
        assert!((f_ab + f_ba).length() < 1e-12, "{f_ab} vs {f_ba}");
    }
}

fn total_force(particles: &[Particle]) -> DVec2 {
    particles.iter().map(|p| p.acceleration * p.mass()).sum()
}

fn random_cluster(rng: &mut StdRng, n: usize, domain: &Domain) -> Vec<Particle> {
    (0..n)
        .map(|_| {
            let mut p = Particle::new(
                DVec2::new(
                    rng.gen_range(0.0..domain.width),
                    rng.gen_range(0.0..domain.height),
                ),
                DVec2::ZERO,
                rng.gen_range(0.5..3.0),
                5.0,
                0.0,
            );
            p.set_thermal_load(rng.gen_range(0.0..1.0));
            p
        })
        .collect()
}

#[test]
fn accumulated_forces_sum_to_zero_with_walls() {
    let domain = Domain::new(120.0, 90.0);
    let model = water_model();
    let mut rng = StdRng::seed_from_u64(21);
    let mut particles = random_cluster(&mut rng, 120, &domain);
    accumulate_forces(&mut particles, &model, &domain, BoundaryMode::Reflect, 15.0);
    assert!(total_force(&particles).length() < 1e-9);
}

#[test]
fn accumulated_forces_sum_to_zero_across_periodic_seams() {
    let domain = Domain::new(120.0, 90.0);
    let model = ForceModel::new(
        &ForceConfig::default(),
        &ForceCoefficients {
            pair_strength: 1.2,
            hydrogen_bond: 30.0,
            dipole: 12.0,
        },
    );
    let mut rng = StdRng::seed_from_u64(22);
    let mut particles = random_cluster(&mut rng, 120, &domain);
    accumulate_forces(&mut particles, &model, &domain, BoundaryMode::Periodic, 15.0);
    assert!(total_force(&particles).length() < 1e-9);
}

#[test]
fn periodic_neighbors_interact_across_the_seam() {
    let domain = Domain::new(100.0, 100.0);
    let model = water_model();
    let mut particles = vec![particle_at(2.0, 50.0), particle_at(97.0, 50.0)];
    accumulate_forces(&mut particles, &model, &domain, BoundaryMode::Periodic, 15.0);
    assert!(particles[0].acceleration.length() > 0.0);
    assert_eq!(particles[0].local_density, 1);

    let mut walled = vec![particle_at(2.0, 50.0), particle_at(97.0, 50.0)];
    accumulate_forces(&mut walled, &model, &domain, BoundaryMode::Reflect, 15.0);
    assert_eq!(walled[0].acceleration, DVec2::ZERO);
    assert_eq!(walled[0].local_density, 0);
}
