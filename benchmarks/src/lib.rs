//! Scene builders shared by the benchmarks.

use glam::DVec3;
use rein_dem::{CandidatePair, ContactSurface, Facet, GluedForce, Particle};

/// A flat `n x n` grid of unit quads in the z = 0 plane.
pub fn quad_floor(n: usize) -> Vec<Facet> {
    let mut facets = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f64, j as f64);
            facets.push(Facet::quad(
                DVec3::new(x, y, 0.0),
                DVec3::new(x + 1.0, y, 0.0),
                DVec3::new(x + 1.0, y + 1.0, 0.0),
                DVec3::new(x, y + 1.0, 0.0),
            ));
        }
    }
    facets
}

/// One particle hovering over every facet of [`quad_floor`], alternating
/// between touching and separated.
pub fn particles_over(n: usize, radius: f64) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let height = if (i + j) % 2 == 0 { radius * 0.5 } else { radius * 4.0 };
            // Keep the centres off the diagonal so both triangles get exercised.
            let (dx, dy) = if i % 3 == 0 { (0.7, 0.2) } else { (0.3, 0.6) };
            particles.push(Particle::new(
                DVec3::new(i as f64 + dx, j as f64 + dy, height),
                radius,
            ));
        }
    }
    particles
}

/// Pair every particle with the facet beneath it, using face weights.
pub fn face_pairs(count: usize) -> Vec<CandidatePair> {
    (0..count)
        .map(|k| CandidatePair {
            particle: k,
            facet: k,
            weights: [0.25; 4],
        })
        .collect()
}

/// Glue each particle to its facet and load it with a tangential force.
pub fn glued_scene(n: usize, radius: f64) -> (Vec<Particle>, Vec<GluedForce>) {
    let particles: Vec<Particle> = particles_over(n, radius)
        .into_iter()
        .map(|p| p.glued(radius, [0.5, 0.3, 0.2, 0.0]))
        .collect();
    let forces = (0..particles.len())
        .map(|k| GluedForce {
            particle: k,
            facet: k,
            force: DVec3::new(1.0, 0.5 * (k % 7) as f64, -2.0),
        })
        .collect();
    (particles, forces)
}

/// Spawn [`quad_floor`] and [`particles_over`] into a hecs world.
pub fn setup_wall_world(
    n: usize,
    radius: f64,
) -> anyhow::Result<(hecs::World, Vec<rein_dem::Candidate>)> {
    let mut world = hecs::World::new();
    let mut candidates = Vec::with_capacity(n * n);
    for (facet, particle) in quad_floor(n).into_iter().zip(particles_over(n, radius)) {
        let facet = rein_dem::spawn_facet(&mut world, facet.nodes())?;
        let particle = world.spawn((particle,));
        candidates.push(rein_dem::Candidate {
            particle,
            facet,
            weights: [0.25; 4],
        });
    }
    Ok((world, candidates))
}
