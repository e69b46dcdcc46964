//! hecs integration.
//!
//! Facets and particles live on entities as [`Facet`] and [`Particle`]
//! components. Each step the system moves the walls, resolves the candidate
//! pairs handed over by the broad phase, and keeps the accepted contacts until
//! the next step.

use anyhow::Context;
use glam::DVec3;

use crate::batch::{self, CandidatePair, NodalForceBuffer};
use crate::contact::{ContactConfig, ContactRecord, ContactRecordBuilder};
use crate::distribute;
use crate::facet::{Facet, WallNode, MAX_FACET_NODES};
use crate::kinematics::WallMotionSpec;
use crate::particle::Particle;

/// A particle/facet pair proposed by the broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub particle: hecs::Entity,
    pub facet: hecs::Entity,
    pub weights: [f64; MAX_FACET_NODES],
}

/// An accepted contact between two entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityContact {
    pub particle: hecs::Entity,
    pub facet: hecs::Entity,
    pub record: ContactRecord,
}

/// Spawn a wall facet with an empty nodal force buffer.
pub fn spawn_facet(world: &mut hecs::World, nodes: &[WallNode]) -> anyhow::Result<hecs::Entity> {
    let facet = Facet::new(nodes).context("Failed to build wall facet")?;
    let buffer = NodalForceBuffer::for_facet(&facet);
    Ok(world.spawn((facet, buffer)))
}

/// Per-step wall contact evaluation over a hecs world.
pub struct WallContactSystem {
    config: ContactConfig,
    motion: Option<WallMotionSpec>,
    contacts: Vec<EntityContact>,
}

impl WallContactSystem {
    pub fn new(config: ContactConfig) -> Self {
        Self {
            config,
            motion: None,
            contacts: Vec::new(),
        }
    }

    /// Drive every facet with a prescribed rigid motion.
    pub fn with_motion(mut self, motion: WallMotionSpec) -> anyhow::Result<Self> {
        motion.validate().context("Invalid wall motion")?;
        self.motion = Some(motion);
        Ok(self)
    }

    /// Contacts accepted during the last step.
    pub fn contacts(&self) -> &[EntityContact] {
        &self.contacts
    }

    /// Move the walls to `time`, then resolve `candidates`.
    pub fn step(
        &mut self,
        world: &mut hecs::World,
        time: f64,
        delta_time: f64,
        candidates: &[Candidate],
    ) -> anyhow::Result<()> {
        let mut builder = ContactRecordBuilder::new(self.config);
        if let Some(motion) = &self.motion {
            let elapsed = motion.elapsed_since_start(time);
            for (_, facet) in world.query_mut::<&mut Facet>() {
                motion
                    .apply_to_facet(facet, elapsed, delta_time)
                    .context("Failed to apply wall motion")?;
            }
            builder = builder.with_velocity_field(motion.field(elapsed)?);
        }

        // Snapshot the pairs so the map phase reads plain slices.
        let mut facets = Vec::with_capacity(candidates.len());
        let mut particles = Vec::with_capacity(candidates.len());
        let mut pairs = Vec::with_capacity(candidates.len());
        let mut entities = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let facet = world.get::<&Facet>(candidate.facet);
            let particle = world.get::<&Particle>(candidate.particle);
            let (Ok(facet), Ok(particle)) = (facet, particle) else {
                tracing::warn!(?candidate, "candidate entity missing facet or particle");
                continue;
            };
            let index = pairs.len();
            facets.push((*facet).clone());
            particles.push(*particle);
            pairs.push(CandidatePair {
                particle: index,
                facet: index,
                weights: candidate.weights,
            });
            entities.push((candidate.particle, candidate.facet));
        }

        self.contacts = batch::resolve_pairs(&builder, &facets, &particles, &pairs)
            .into_iter()
            .map(|c| {
                let (particle, facet) = entities[c.particle];
                EntityContact {
                    particle,
                    facet,
                    record: c.record,
                }
            })
            .collect();
        Ok(())
    }

    /// Spread glued-particle forces into each facet's [`NodalForceBuffer`].
    ///
    /// Returns how many forces were distributed.
    pub fn accumulate_glued_forces(
        &self,
        world: &mut hecs::World,
        forces: &[(hecs::Entity, hecs::Entity, DVec3)],
    ) -> usize {
        let mut distributed = 0;
        for &(particle_entity, facet_entity, force) in forces {
            let Ok(particle) = world.get::<&Particle>(particle_entity).map(|p| *p) else {
                continue;
            };
            let Ok(mut query) =
                world.query_one::<(&Facet, &mut NodalForceBuffer)>(facet_entity)
            else {
                continue;
            };
            let Some((facet, buffer)) = query.get() else {
                continue;
            };
            let rhs = buffer.as_mut_slice();
            match distribute::add_forces_for_particle(facet, &particle, force, rhs) {
                Ok(Some(_)) => distributed += 1,
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "torque distribution skipped"),
            }
        }
        distributed
    }

    /// Zero every facet's nodal force buffer.
    pub fn clear_nodal_forces(world: &mut hecs::World) {
        for (_, buffer) in world.query_mut::<&mut NodalForceBuffer>() {
            buffer.clear();
        }
    }
}
