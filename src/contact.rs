//! Contact records for particle/wall pairs.
//!
//! [`ContactRecordBuilder::build`] is the single entry point force laws call
//! per candidate pair. It scans the broad-phase weights, dispatches to the
//! face, edge or vertex test, and interpolates the wall motion at the contact
//! point.

use glam::DVec3;

use crate::classify::{self, LocalFrame, RadiusBoundary};
use crate::error::WallResult;
use crate::facet::{ContactSurface, Facet, MAX_FACET_NODES};
use crate::kinematics::VelocityField;
use crate::particle::Particle;

/// Where on the facet a contact happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactType {
    NoContact,
    Face,
    Edge,
    Vertex,
}

impl ContactType {
    /// Integer tag used by external force laws.
    pub fn code(self) -> i32 {
        match self {
            ContactType::NoContact => -1,
            ContactType::Face => 1,
            ContactType::Edge => 2,
            ContactType::Vertex => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(ContactType::NoContact),
            1 => Some(ContactType::Face),
            2 => Some(ContactType::Edge),
            3 => Some(ContactType::Vertex),
            _ => None,
        }
    }

    /// Number of nodes carrying weight for this contact type.
    pub fn node_count_range(self) -> std::ops::RangeInclusive<usize> {
        match self {
            ContactType::NoContact => 0..=0,
            ContactType::Face => 3..=4,
            ContactType::Edge => 2..=2,
            ContactType::Vertex => 1..=1,
        }
    }
}

/// Configuration for contact resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactConfig {
    /// Candidate weights above this mark participating nodes, and the weight
    /// scan stops once the running total is this close to 1. Default: 1e-12.
    pub candidate_threshold: f64,
    /// Whether touching at exactly the interaction radius counts. Default: inclusive.
    pub radius_boundary: RadiusBoundary,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            candidate_threshold: 1e-12,
            radius_boundary: RadiusBoundary::Inclusive,
        }
    }
}

/// Participating nodes found by the weight scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateScan {
    /// Number of positive weights seen before the scan stopped.
    pub points: usize,
    /// Index of the first and second participating node.
    pub first: usize,
    pub second: usize,
}

/// Count participating nodes, stopping as soon as the running total reaches 1.
pub fn scan_candidates(weights: &[f64], threshold: f64) -> CandidateScan {
    let mut scan = CandidateScan {
        points: 0,
        first: 0,
        second: 0,
    };
    let mut total = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        if w > threshold {
            total += w;
            scan.points += 1;
            match scan.points {
                1 => scan.first = i,
                2 => scan.second = i,
                _ => {}
            }
        }
        if (total - 1.0).abs() < threshold {
            break;
        }
    }
    scan
}

/// Resolved geometry of one particle/facet pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRecord {
    pub contact_type: ContactType,
    pub frame: LocalFrame,
    /// Distance from the particle centre to the contacted feature.
    pub distance: f64,
    /// Overlap with the interaction radius, `interaction_radius - distance`.
    pub indentation: f64,
    /// Final interpolation weights, one per facet node.
    pub weights: [f64; MAX_FACET_NODES],
    pub wall_velocity: DVec3,
    pub wall_delta_displacement: DVec3,
}

impl ContactRecord {
    pub fn no_contact() -> Self {
        Self {
            contact_type: ContactType::NoContact,
            frame: LocalFrame::default(),
            distance: f64::INFINITY,
            indentation: 0.0,
            weights: [0.0; MAX_FACET_NODES],
            wall_velocity: DVec3::ZERO,
            wall_delta_displacement: DVec3::ZERO,
        }
    }

    pub fn has_contact(&self) -> bool {
        self.contact_type != ContactType::NoContact
    }

    /// Number of nodes with a nonzero final weight.
    pub fn participating_nodes(&self) -> usize {
        self.weights.iter().filter(|w| **w != 0.0).count()
    }

    /// Point on the wall the weights interpolate.
    pub fn contact_point<S: ContactSurface + ?Sized>(&self, surface: &S) -> DVec3 {
        surface
            .nodes()
            .iter()
            .zip(self.weights)
            .map(|(node, w)| node.position * w)
            .sum()
    }
}

/// Builds [`ContactRecord`]s for candidate pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactRecordBuilder {
    config: ContactConfig,
    field: Option<VelocityField>,
}

impl ContactRecordBuilder {
    pub fn new(config: ContactConfig) -> Self {
        Self {
            config,
            field: None,
        }
    }

    /// Take wall velocities from a prescribed rigid motion instead of the node state.
    pub fn with_velocity_field(mut self, field: VelocityField) -> Self {
        self.field = Some(field);
        self
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Resolve one candidate pair. `candidate_weights` holds one broad-phase
    /// weight per facet node and is left untouched.
    pub fn build(
        &self,
        facet: &Facet,
        particle: &Particle,
        candidate_weights: &[f64],
    ) -> WallResult<ContactRecord> {
        let candidates = &candidate_weights[..candidate_weights.len().min(facet.node_count())];
        let scan = scan_candidates(candidates, self.config.candidate_threshold);
        let center = particle.center;
        let radius = particle.interaction_radius;
        let boundary = self.config.radius_boundary;

        let mut weights = [0.0; MAX_FACET_NODES];
        let (contact_type, proximity) = match scan.points {
            3 | 4 => {
                let hit = classify::facet_check(facet, center, radius, boundary)?;
                weights = hit.weights;
                (ContactType::Face, hit.proximity)
            }
            2 => {
                let hit = classify::edge_check(
                    facet.node_position(scan.first),
                    facet.node_position(scan.second),
                    center,
                    radius,
                    boundary,
                    facet.unit_normal().ok(),
                )?;
                weights[scan.first] = 1.0 - hit.eta;
                weights[scan.second] = hit.eta;
                (ContactType::Edge, hit.proximity)
            }
            1 => {
                let hit = classify::vertex_check(
                    facet.node_position(scan.first),
                    center,
                    radius,
                    boundary,
                    facet.unit_normal().ok(),
                )?;
                weights[scan.first] = 1.0;
                (ContactType::Vertex, hit)
            }
            _ => return Ok(ContactRecord::no_contact()),
        };

        if !proximity.contact {
            tracing::trace!(
                ?contact_type,
                distance = proximity.distance,
                "candidate rejected"
            );
            return Ok(ContactRecord::no_contact());
        }

        let (wall_velocity, wall_delta_displacement) = self.interpolate(facet, &weights);
        tracing::trace!(?contact_type, distance = proximity.distance, "contact");

        Ok(ContactRecord {
            contact_type,
            frame: proximity.frame,
            distance: proximity.distance,
            indentation: radius - proximity.distance,
            weights,
            wall_velocity,
            wall_delta_displacement,
        })
    }

    fn interpolate(&self, facet: &Facet, weights: &[f64]) -> (DVec3, DVec3) {
        let (velocity, displacement) = facet.interpolate(weights);
        match &self.field {
            Some(field) => {
                let prescribed: DVec3 = facet
                    .nodes()
                    .iter()
                    .zip(weights)
                    .map(|(node, w)| field.velocity_at(node.position) * *w)
                    .sum();
                (prescribed, displacement)
            }
            None => (velocity, displacement),
        }
    }
}
