//! Rein DEM wall contact
//!
//! Particle-to-rigid-wall contact for discrete element simulations: geometric
//! classification of a spherical particle against triangular or quadrilateral
//! wall facets, prescribed screw motion of the walls, and distribution of the
//! torque a glued particle exerts onto the facet nodes.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **geometry** - Vector helpers, local bases, coordinate transforms
//! 2. **facet** - Wall nodes and triangle/quad facets
//! 3. **particle** - Spherical particles and their integration scheme
//! 4. **classify** - Facet, edge and vertex proximity checks
//! 5. **kinematics** - Rotating/translating wall velocity field
//! 6. **distribute** - Torque to nodal force distribution
//! 7. **contact** - Contact record construction from broad-phase candidates
//! 8. **batch** - Many-pair evaluation (rayon with feature = "parallel")
//! 9. **ecs** - hecs ECS integration (feature = "ecs")

pub mod batch;
pub mod classify;
pub mod contact;
pub mod distribute;
pub mod error;
pub mod facet;
pub mod geometry;
pub mod kinematics;
pub mod particle;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use error::{WallError, WallResult};

pub use facet::{ContactSurface, Facet, WallNode, MAX_FACET_NODES};

pub use particle::{IntegrationScheme, Particle};

pub use classify::{
    check_side, edge_check, facet_check, projection_falls_inside, vertex_check, EdgeProximity,
    FacetProximity, LocalFrame, Proximity, RadiusBoundary, Side,
};

pub use kinematics::{VelocityField, WallMotionSpec};

pub use distribute::{
    add_forces_due_to_torque, add_forces_for_particle, distribute_torque, TorqueDistribution,
    TorqueForceInputs,
};

pub use contact::{ContactConfig, ContactRecord, ContactRecordBuilder, ContactType};

pub use batch::{
    accumulate_glued_forces, apply_wall_motion, resolve_pairs, CandidatePair, GluedForce,
    NodalForceBuffer, PairContact,
};

#[cfg(feature = "ecs")]
pub use ecs::{spawn_facet, Candidate, EntityContact, WallContactSystem};

// Re-export glam for convenience
pub use glam;
