// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Pairwise collision response between circular particles.
//
// Every overlapping pair is pushed apart along the contact normal, split by
// inverse mass, and, if the pair is approaching, receives a restitution
// impulse plus a Coulomb-limited friction impulse. A pass is only locally
// consistent when three or more circles overlap, so callers relax it several
// times per substep.

use common::{BoundaryMode, Domain, DISTANCE_EPSILON};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;
use crate::spatial_grid::SpatialGrid;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Resolver passes per substep.
    pub iterations: u32,
    pub restitution: f64,
    /// Friction coefficient bounding the tangential impulse by the normal one.
    pub friction: f64,
    /// Fraction of the kinetic energy difference handed from the hotter to the colder particle
    /// of an approaching pair.  Zero disables the exchange.
    pub conduction: f64,
    /// Distance from a wall within which a particle counts as resting against it.
    pub ground_tolerance: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            restitution: 0.2,
            friction: 0.1,
            conduction: 0.05,
            ground_tolerance: 0.5,
        }
    }
}

/// Tally of one or more resolver passes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Overlapping pairs that were separated.
    pub contacts: usize,
    /// Contacts that were approaching and received an impulse.
    pub impulses: usize,
}

impl std::ops::AddAssign for CollisionStats {
    fn add_assign(&mut self, other: Self) {
        self.contacts += other.contacts;
        self.impulses += other.impulses;
    }
}

/// Runs `config.iterations` resolver passes.
pub fn relax_collisions(
    particles: &mut [Particle],
    domain: &Domain,
    boundary: BoundaryMode,
    config: &CollisionConfig,
) -> CollisionStats {
    let mut stats = CollisionStats::default();
    for _ in 0..config.iterations {
        let pass = resolve_collisions(particles, domain, boundary, config);
        stats += pass;
        if pass.contacts == 0 {
            break;
        }
    }
    stats
}

/// One resolver pass over every overlapping pair.
///
/// The grid is rebuilt from the positions at the start of the pass with cells just large
/// enough to catch touching circles.  Each unordered pair is handled once: a pair is only
/// processed from its lower index.
pub fn resolve_collisions(
    particles: &mut [Particle],
    domain: &Domain,
    boundary: BoundaryMode,
    config: &CollisionConfig,
) -> CollisionStats {
    let mut stats = CollisionStats::default();
    if particles.len() < 2 {
        return stats;
    }

    let max_radius = particles.iter().map(|p| p.radius()).fold(0.0, f64::max);
    let reach = 2.0 * max_radius;
    let grid = SpatialGrid::from_particles(particles, domain, reach, boundary.into());

    let mut candidates = Vec::new();
    for i in 0..particles.len() {
        candidates.clear();
        grid.for_each_neighbor(particles[i].position, reach, |j| {
            if j > i {
                candidates.push(j);
            }
        });
        for &j in &candidates {
            let (a, b) = pair_mut(particles, i, j);
            if let Some(impulse) = resolve_pair(a, b, domain, boundary, config) {
                stats.contacts += 1;
                if impulse {
                    stats.impulses += 1;
                }
            }
        }
    }
    stats
}

/// Separates one pair if it overlaps.  Returns `None` when the circles do not touch, otherwise
/// whether an impulse was applied.
pub fn resolve_pair(
    a: &mut Particle,
    b: &mut Particle,
    domain: &Domain,
    boundary: BoundaryMode,
    config: &CollisionConfig,
) -> Option<bool> {
    let delta = domain.displacement(a.position, b.position, boundary);
    let distance = delta.length();
    let min_distance = a.radius() + b.radius();
    if distance >= min_distance {
        return None;
    }

    // Coincident centers have no direction; pick one.
    let normal = if distance > DISTANCE_EPSILON {
        delta / distance
    } else {
        DVec2::X
    };
    let overlap = min_distance - distance;

    separate(a, b, normal, overlap, domain, boundary, config);

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let total_inv = inv_a + inv_b;

    let relative = b.velocity - a.velocity;
    let approach = relative.dot(normal);
    if approach >= 0.0 {
        return Some(false);
    }

    let j = -(1.0 + config.restitution) * approach / total_inv;
    a.velocity -= normal * (j * inv_a);
    b.velocity += normal * (j * inv_b);

    let tangent_velocity = relative - normal * approach;
    let tangent_speed = tangent_velocity.length();
    if tangent_speed > DISTANCE_EPSILON {
        let tangent = tangent_velocity / tangent_speed;
        let limit = config.friction * j;
        let jt = (-tangent_speed / total_inv).clamp(-limit, limit);
        a.velocity -= tangent * (jt * inv_a);
        b.velocity += tangent * (jt * inv_b);
    }

    if config.conduction > 0.0 {
        conduct(a, b, normal, config.conduction);
    }

    Some(true)
}

/// Moves the pair apart by `overlap` along `normal`.  A particle resting against a wall never
/// gets pushed into it; its partner takes the whole correction instead.
fn separate(
    a: &mut Particle,
    b: &mut Particle,
    normal: DVec2,
    overlap: f64,
    domain: &Domain,
    boundary: BoundaryMode,
    config: &CollisionConfig,
) {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let share_a = inv_a / (inv_a + inv_b);

    let push_a = -normal * overlap;
    let push_b = normal * overlap;

    let (share_a, share_b) = match boundary {
        BoundaryMode::Periodic => (share_a, 1.0 - share_a),
        BoundaryMode::Reflect => {
            let a_blocked = pushes_into_wall(a, push_a, domain, config.ground_tolerance);
            let b_blocked = pushes_into_wall(b, push_b, domain, config.ground_tolerance);
            match (a_blocked, b_blocked) {
                (true, false) => (0.0, 1.0),
                (false, true) => (1.0, 0.0),
                _ => (share_a, 1.0 - share_a),
            }
        }
    };

    a.position += push_a * share_a;
    b.position += push_b * share_b;
}

/// Whether `particle` touches a wall and `push` points into that wall.
fn pushes_into_wall(particle: &Particle, push: DVec2, domain: &Domain, tolerance: f64) -> bool {
    let reach = particle.radius() + tolerance;
    let p = particle.position;
    (push.y < 0.0 && p.y <= reach)
        || (push.y > 0.0 && p.y >= domain.height - reach)
        || (push.x < 0.0 && p.x <= reach)
        || (push.x > 0.0 && p.x >= domain.width - reach)
}

/// Hands a fraction of the kinetic energy difference from the hotter particle to the colder one,
/// keeping each velocity's direction.  Total kinetic energy is unchanged.
fn conduct(a: &mut Particle, b: &mut Particle, normal: DVec2, conduction: f64) {
    let ke_a = a.kinetic_energy();
    let ke_b = b.kinetic_energy();
    let transfer = conduction * (ke_a - ke_b);
    set_kinetic_energy(a, ke_a - transfer, -normal);
    set_kinetic_energy(b, ke_b + transfer, normal);
}

fn set_kinetic_energy(particle: &mut Particle, target: f64, fallback_direction: DVec2) {
    let target_speed = (2.0 * target.max(0.0) / particle.mass()).sqrt();
    let speed = particle.speed();
    particle.velocity = if speed > DISTANCE_EPSILON {
        particle.velocity * (target_speed / speed)
    } else {
        fallback_direction * target_speed
    };
}

/// Two disjoint mutable borrows, `i < j`.
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert!(i < j);
    let (head, tail) = particles.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}


// End of File
