//! Spherical particles as seen by the wall contact code.

use glam::DVec3;

use crate::facet::MAX_FACET_NODES;

/// How a particle's translation is integrated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IntegrationScheme {
    /// Free dynamics.
    #[default]
    Free,
    /// Rigidly bonded to a wall facet and carried by its motion.
    GluedToWall {
        /// Signed offset of the particle centre along the facet normal.
        distance_signed_with_normal: f64,
        /// Shape-function weights locating the glue point inside the facet.
        shape_function_weights: [f64; MAX_FACET_NODES],
    },
}

/// Particle state read by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub center: DVec3,
    pub velocity: DVec3,
    /// Geometric radius.
    pub radius: f64,
    /// Radius used for contact detection. May exceed `radius` to model a contact skin.
    pub interaction_radius: f64,
    pub scheme: IntegrationScheme,
}

impl Particle {
    /// A free particle at rest whose interaction radius equals its radius.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            velocity: DVec3::ZERO,
            radius,
            interaction_radius: radius,
            scheme: IntegrationScheme::Free,
        }
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_interaction_radius(mut self, interaction_radius: f64) -> Self {
        self.interaction_radius = interaction_radius;
        self
    }

    /// Glue the particle to a wall at the given normal offset and glue-point weights.
    pub fn glued(
        mut self,
        distance_signed_with_normal: f64,
        weights: [f64; MAX_FACET_NODES],
    ) -> Self {
        self.scheme = IntegrationScheme::GluedToWall {
            distance_signed_with_normal,
            shape_function_weights: weights,
        };
        self
    }
}
