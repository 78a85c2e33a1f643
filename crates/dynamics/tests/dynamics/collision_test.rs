// Tests for the overlap resolver.

use common::{BoundaryMode, Domain};
use glam::DVec2;
use imf_dynamics::collision::{relax_collisions, resolve_collisions, CollisionConfig};
use imf_dynamics::particle::Particle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
    Particle::new(DVec2::new(x, y), DVec2::new(vx, vy), 1.0, 5.0, 0.0)
}

fn domain() -> Domain {
    Domain::new(200.0, 200.0)
}

fn momentum(particles: &[Particle]) -> DVec2 {
    particles.iter().map(|p| p.velocity * p.mass()).sum()
}

fn worst_overlap(particles: &[Particle], domain: &Domain, boundary: BoundaryMode) -> f64 {
    let mut worst: f64 = 0.0;
    for i in 0..particles.len() {
        for j in i + 1..particles.len() {
            let a = &particles[i];
            let b = &particles[j];
            let distance = domain.displacement(a.position, b.position, boundary).length();
            worst = worst.max(a.radius() + b.radius() - distance);
        }
    }
    worst
}

// ============================================================================
// Single pair
// ============================================================================

#[test]
fn overlapping_pair_is_split_evenly() {
    // Radius 5 each, centers 8 apart: 2 units of overlap, 1 per particle.
    let mut particles = vec![particle(96.0, 100.0, 0.0, 0.0), particle(104.0, 100.0, 0.0, 0.0)];
    let config = CollisionConfig::default();
    let stats = resolve_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);

    assert_eq!(stats.contacts, 1);
    assert_eq!(stats.impulses, 0);
    assert!((particles[0].position - DVec2::new(95.0, 100.0)).length() < 1e-9);
    assert!((particles[1].position - DVec2::new(105.0, 100.0)).length() < 1e-9);
    assert_eq!(particles[0].velocity, DVec2::ZERO);
    assert_eq!(particles[1].velocity, DVec2::ZERO);
}

#[test]
fn touching_pair_is_left_alone() {
    let mut particles = vec![particle(95.0, 100.0, 1.0, 0.0), particle(105.0, 100.0, -1.0, 0.0)];
    let before = particles.clone();
    let config = CollisionConfig::default();
    let stats = resolve_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);
    assert_eq!(stats.contacts, 0);
    assert_eq!(particles, before);
}

#[test]
fn approaching_pair_bounces_with_restitution() {
    let mut particles = vec![particle(96.0, 100.0, 10.0, 0.0), particle(104.0, 100.0, -10.0, 0.0)];
    let config = CollisionConfig {
        conduction: 0.0,
        ..CollisionConfig::default()
    };
    let stats = resolve_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);

    assert_eq!(stats.impulses, 1);
    // Closing speed 20 comes back as 20 * restitution.
    let separating = particles[1].velocity.x - particles[0].velocity.x;
    assert!((separating - 20.0 * config.restitution).abs() < 1e-9);
}

#[test]
fn heavy_particle_moves_less() {
    let light = particle(96.0, 100.0, 0.0, 0.0);
    let heavy = Particle::new(DVec2::new(104.0, 100.0), DVec2::ZERO, 3.0, 5.0, 0.0);
    let mut particles = vec![light, heavy];
    let config = CollisionConfig::default();
    resolve_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);

    let moved_light = (particles[0].position.x - 96.0).abs();
    let moved_heavy = (particles[1].position.x - 104.0).abs();
    assert!((moved_light - 1.5).abs() < 1e-9);
    assert!((moved_heavy - 0.5).abs() < 1e-9);
}

// ============================================================================
// Iterated relaxation
// ============================================================================

#[test]
fn relaxation_separates_a_stationary_pair() {
    let mut particles = vec![particle(99.0, 100.0, 0.0, 0.0), particle(101.0, 100.0, 0.0, 0.0)];
    let config = CollisionConfig::default();
    relax_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);
    let distance = particles[0].position.distance(particles[1].position);
    assert!(distance >= 10.0 - 1e-3, "distance {distance}");
}

#[test]
fn relaxation_shrinks_overlaps_in_a_crowd() {
    let domain = domain();
    let mut rng = StdRng::seed_from_u64(8);
    let mut particles: Vec<Particle> = (0..60)
        .map(|_| {
            particle(
                rng.gen_range(70.0..130.0),
                rng.gen_range(70.0..130.0),
                0.0,
                0.0,
            )
        })
        .collect();
    let before = worst_overlap(&particles, &domain, BoundaryMode::Reflect);
    let config = CollisionConfig {
        iterations: 20,
        ..CollisionConfig::default()
    };
    relax_collisions(&mut particles, &domain, BoundaryMode::Reflect, &config);
    let after = worst_overlap(&particles, &domain, BoundaryMode::Reflect);
    assert!(after < before, "{after} >= {before}");
}

#[test]
fn relaxation_stops_once_nothing_overlaps() {
    let mut particles = vec![particle(50.0, 50.0, 0.0, 0.0), particle(150.0, 150.0, 0.0, 0.0)];
    let config = CollisionConfig::default();
    let stats = relax_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);
    assert_eq!(stats.contacts, 0);
}

#[test]
fn equal_mass_collisions_conserve_momentum() {
    let domain = domain();
    let mut rng = StdRng::seed_from_u64(13);
    let mut particles: Vec<Particle> = (0..40)
        .map(|_| {
            particle(
                rng.gen_range(60.0..140.0),
                rng.gen_range(60.0..140.0),
                rng.gen_range(-30.0..30.0),
                rng.gen_range(-30.0..30.0),
            )
        })
        .collect();
    let config = CollisionConfig {
        conduction: 0.0,
        ..CollisionConfig::default()
    };
    let before = momentum(&particles);
    let stats = relax_collisions(&mut particles, &domain, BoundaryMode::Periodic, &config);
    assert!(stats.impulses > 0);
    let after = momentum(&particles);
    assert!((after - before).length() < 1e-9, "{before} -> {after}");
}

#[test]
fn conduction_wakes_a_particle_at_rest() {
    let mut particles = vec![particle(96.0, 100.0, 0.0, 0.0), particle(104.0, 100.0, -20.0, 0.0)];
    let config = CollisionConfig {
        restitution: 1.0,
        friction: 0.0,
        conduction: 0.2,
        ..CollisionConfig::default()
    };
    let total_before: f64 = particles.iter().map(Particle::kinetic_energy).sum();
    resolve_collisions(&mut particles, &domain(), BoundaryMode::Reflect, &config);
    let total_after: f64 = particles.iter().map(Particle::kinetic_energy).sum();
    assert!(particles[0].kinetic_energy() > 0.0);
    assert!(particles[1].kinetic_energy() > 0.0);
    assert!((total_after - total_before).abs() < 1e-6 * total_before);
}
