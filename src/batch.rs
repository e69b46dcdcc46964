//! Many-pair evaluation.
//!
//! Pair resolution is a pure map and runs on rayon with the `parallel`
//! feature. Nodal force accumulation is a separate sequential reduction, so no
//! buffer is shared between workers.

use glam::DVec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::contact::{ContactRecord, ContactRecordBuilder};
use crate::distribute;
use crate::error::WallResult;
use crate::facet::{ContactSurface, Facet, MAX_FACET_NODES};
use crate::kinematics::WallMotionSpec;
use crate::particle::Particle;

/// A particle/facet pair proposed by the broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePair {
    pub particle: usize,
    pub facet: usize,
    /// Broad-phase weight per facet node.
    pub weights: [f64; MAX_FACET_NODES],
}

/// An accepted contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    pub particle: usize,
    pub facet: usize,
    pub record: ContactRecord,
}

/// Contact force a glued particle exerts on its facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GluedForce {
    pub particle: usize,
    pub facet: usize,
    pub force: DVec3,
}

/// Per-facet nodal force accumulator, `[fx0, fy0, fz0, fx1, ...]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodalForceBuffer {
    values: Vec<f64>,
}

impl NodalForceBuffer {
    pub fn new(node_count: usize) -> Self {
        Self {
            values: vec![0.0; node_count * 3],
        }
    }

    pub fn for_facet(facet: &Facet) -> Self {
        Self::new(facet.node_count())
    }

    pub fn node_count(&self) -> usize {
        self.values.len() / 3
    }

    pub fn node_force(&self, node: usize) -> DVec3 {
        DVec3::from_slice(&self.values[node * 3..node * 3 + 3])
    }

    pub fn total(&self) -> DVec3 {
        (0..self.node_count()).map(|k| self.node_force(k)).sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }
}

fn resolve_one(
    builder: &ContactRecordBuilder,
    facets: &[Facet],
    particles: &[Particle],
    pair: &CandidatePair,
) -> Option<PairContact> {
    let (Some(facet), Some(particle)) = (facets.get(pair.facet), particles.get(pair.particle))
    else {
        tracing::warn!(
            particle = pair.particle,
            facet = pair.facet,
            "candidate pair out of range"
        );
        return None;
    };

    match builder.build(facet, particle, &pair.weights) {
        Ok(record) if record.has_contact() => Some(PairContact {
            particle: pair.particle,
            facet: pair.facet,
            record,
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(
                particle = pair.particle,
                facet = pair.facet,
                error = %e,
                "dropping contact pair"
            );
            None
        }
    }
}

/// Resolve every candidate pair and keep the ones in contact, in input order.
///
/// A pair whose geometry cannot be resolved is logged and skipped.
pub fn resolve_pairs(
    builder: &ContactRecordBuilder,
    facets: &[Facet],
    particles: &[Particle],
    pairs: &[CandidatePair],
) -> Vec<PairContact> {
    #[cfg(feature = "parallel")]
    let contacts: Vec<PairContact> = pairs
        .par_iter()
        .filter_map(|pair| resolve_one(builder, facets, particles, pair))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let contacts: Vec<PairContact> = pairs
        .iter()
        .filter_map(|pair| resolve_one(builder, facets, particles, pair))
        .collect();

    tracing::debug!(
        candidates = pairs.len(),
        contacts = contacts.len(),
        "resolved candidate pairs"
    );
    contacts
}

/// Apply the prescribed wall motion to every facet for this step.
pub fn apply_wall_motion(
    spec: &WallMotionSpec,
    facets: &mut [Facet],
    time: f64,
    delta_time: f64,
) -> WallResult<()> {
    let elapsed = spec.elapsed_since_start(time);
    #[cfg(feature = "parallel")]
    let applied = facets
        .par_iter_mut()
        .try_for_each(|facet| spec.apply_to_facet(facet, elapsed, delta_time));
    #[cfg(not(feature = "parallel"))]
    let applied = facets
        .iter_mut()
        .try_for_each(|facet| spec.apply_to_facet(facet, elapsed, delta_time));
    applied
}

/// Spread glued-particle forces onto facet nodes, one buffer per facet.
///
/// Returns how many forces were distributed; free particles and unresolvable
/// pairs are skipped.
pub fn accumulate_glued_forces(
    facets: &[Facet],
    particles: &[Particle],
    forces: &[GluedForce],
    buffers: &mut [NodalForceBuffer],
) -> usize {
    let mut distributed = 0;
    for glued in forces {
        let (Some(facet), Some(particle), Some(buffer)) = (
            facets.get(glued.facet),
            particles.get(glued.particle),
            buffers.get_mut(glued.facet),
        ) else {
            tracing::warn!(
                particle = glued.particle,
                facet = glued.facet,
                "glued force out of range"
            );
            continue;
        };
        let rhs = buffer.as_mut_slice();
        match distribute::add_forces_for_particle(facet, particle, glued.force, rhs) {
            Ok(Some(_)) => distributed += 1,
            Ok(None) => {}
            Err(e) => tracing::warn!(
                particle = glued.particle,
                facet = glued.facet,
                error = %e,
                "torque distribution skipped"
            ),
        }
    }
    distributed
}
