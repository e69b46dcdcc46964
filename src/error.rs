//! Error types for wall contact resolution.

use thiserror::Error;

/// Failures raised while resolving particle/wall geometry.
///
/// A geometric test that finds no overlap is not an error: it is reported as
/// [`ContactType::NoContact`](crate::contact::ContactType::NoContact).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WallError {
    /// The facet does not have 3 or 4 nodes.
    #[error("facet with {node_count} nodes cannot define a plane (expected 3 or 4)")]
    DegenerateGeometry { node_count: usize },

    /// Normalization of a (near-)zero vector was requested.
    #[error("cannot normalize zero-length {0}")]
    DegenerateVector(&'static str),

    /// The torque distribution system has no solution.
    #[error("torque distribution is singular (pivot {pivot:.3e}, denominator {denominator:.3e})")]
    SingularDistribution { pivot: f64, denominator: f64 },

    /// A caller-supplied buffer does not match the facet's degrees of freedom.
    #[error("buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Prescribed wall motion parameters are unusable.
    #[error("invalid wall motion: {0}")]
    InvalidMotion(String),
}

/// Convenience alias for `Result<T, WallError>`.
pub type WallResult<T> = Result<T, WallError>;
