//! Nodal forces reproducing the torque a glued particle exerts on its facet.
//!
//! The tangential part of the particle force acts at a lever arm
//! `distance_signed_with_normal * n` above the glue point. Three forces along
//! the facet normal, one per triangle node, are chosen so that they cancel
//! (zero net force) and produce exactly that torque.

use glam::DVec3;

use crate::error::{WallError, WallResult};
use crate::facet::{ContactSurface, MAX_FACET_NODES};
use crate::geometry::{self, DEGENERATE_LENGTH};
use crate::particle::{IntegrationScheme, Particle};

/// Relative size below which the elimination pivot counts as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Inputs for one torque distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueForceInputs {
    /// Resultant contact force on the particle.
    pub force: DVec3,
    /// Signed offset of the particle centre from the glue point along the facet normal.
    pub distance_signed_with_normal: f64,
    /// Shape-function weights locating the glue point inside the facet.
    pub shape_function_weights: [f64; MAX_FACET_NODES],
}

impl TorqueForceInputs {
    /// Inputs for a glued particle; `None` for freely integrated ones.
    pub fn from_particle(particle: &Particle, force: DVec3) -> Option<Self> {
        match particle.scheme {
            IntegrationScheme::Free => None,
            IntegrationScheme::GluedToWall {
                distance_signed_with_normal,
                shape_function_weights,
            } => Some(Self {
                force,
                distance_signed_with_normal,
                shape_function_weights,
            }),
        }
    }
}

/// Result of a torque distribution over the first three facet nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueDistribution {
    /// Unit facet normal the forces act along.
    pub normal: DVec3,
    /// Signed force magnitudes, one per triangle node.
    pub magnitudes: [f64; 3],
    /// Torque the tangential force exerts about the glue point.
    pub torque: DVec3,
}

impl TorqueDistribution {
    fn zero(normal: DVec3) -> Self {
        Self {
            normal,
            magnitudes: [0.0; 3],
            torque: DVec3::ZERO,
        }
    }

    pub fn nodal_forces(&self) -> [DVec3; 3] {
        self.magnitudes.map(|f| self.normal * f)
    }

    /// Sum of the nodal forces.
    pub fn net_force(&self) -> DVec3 {
        self.nodal_forces().iter().sum()
    }

    /// Torque of the nodal forces about `point`, given the node positions.
    pub fn torque_about(&self, positions: &[DVec3], point: DVec3) -> DVec3 {
        positions
            .iter()
            .zip(self.nodal_forces())
            .map(|(x, f)| (*x - point).cross(f))
            .sum()
    }
}

/// Solve for the three normal nodal forces without touching any buffer.
pub fn distribute_torque<S: ContactSurface + ?Sized>(
    surface: &S,
    inputs: &TorqueForceInputs,
) -> WallResult<TorqueDistribution> {
    let nodes = surface.nodes();
    if nodes.len() < 3 {
        return Err(WallError::DegenerateGeometry {
            node_count: nodes.len(),
        });
    }
    let normal = surface.unit_normal()?;

    let inner_point: DVec3 = nodes
        .iter()
        .zip(inputs.shape_function_weights)
        .map(|(node, w)| node.position * w)
        .sum();

    let force = inputs.force;
    let tangential_force = force - normal * force.dot(normal);
    let tangential_modulus = tangential_force.length();
    if tangential_modulus <= DEGENERATE_LENGTH.max(SINGULAR_TOLERANCE * force.length()) {
        return Ok(TorqueDistribution::zero(normal));
    }

    let lever = normal * inputs.distance_signed_with_normal;
    let torque = lever.cross(tangential_force);
    let unit_tangential = tangential_force / tangential_modulus;
    let unit_perpendicular =
        geometry::try_normalize(normal.cross(tangential_force), "in-plane perpendicular")?;

    // Torque is always along the in-plane perpendicular; keep its sign.
    let signed_torque = torque.dot(unit_perpendicular);

    let mut d = [0.0; 3];
    let mut dp = [0.0; 3];
    for k in 0..3 {
        let inner_to_node = nodes[k].position - inner_point;
        d[k] = inner_to_node.dot(unit_tangential);
        dp[k] = inner_to_node.dot(unit_perpendicular);
    }

    // Rotate node order so the elimination divides by the largest dp difference.
    let rotation = (0..3)
        .max_by(|&a, &b| {
            let pa = (dp[(a + 1) % 3] - dp[(a + 2) % 3]).abs();
            let pb = (dp[(b + 1) % 3] - dp[(b + 2) % 3]).abs();
            pa.total_cmp(&pb)
        })
        .unwrap_or(0);
    let [i1, i2, i3] = [rotation, (rotation + 1) % 3, (rotation + 2) % 3];

    let scale = (0..3)
        .map(|k| (nodes[(k + 1) % 3].position - nodes[k].position).length())
        .fold(0.0, f64::max);
    let tolerance = SINGULAR_TOLERANCE * scale.max(DEGENERATE_LENGTH);

    let pivot = dp[i2] - dp[i3];
    let aux = 1.0 / pivot;
    let denominator = d[i1] - d[i3] + (dp[i3] - dp[i1]) * (d[i2] - d[i3]) * aux;
    if pivot.abs() < tolerance || !denominator.is_finite() || denominator.abs() < tolerance {
        return Err(WallError::SingularDistribution { pivot, denominator });
    }

    let f1 = -signed_torque / denominator;
    let f2 = (dp[i3] - dp[i1]) * f1 * aux;
    let f3 = -f1 - f2;

    let mut magnitudes = [0.0; 3];
    magnitudes[i1] = f1;
    magnitudes[i2] = f2;
    magnitudes[i3] = f3;

    Ok(TorqueDistribution {
        normal,
        magnitudes,
        torque,
    })
}

/// Distribute the torque and add the nodal forces into `rhs`, laid out as
/// `[fx0, fy0, fz0, fx1, ...]` over all facet nodes.
pub fn add_forces_due_to_torque<S: ContactSurface + ?Sized>(
    surface: &S,
    inputs: &TorqueForceInputs,
    rhs: &mut [f64],
) -> WallResult<TorqueDistribution> {
    let expected = surface.node_count() * 3;
    if rhs.len() != expected {
        return Err(WallError::BufferSize {
            expected,
            actual: rhs.len(),
        });
    }
    let distribution = distribute_torque(surface, inputs)?;
    for (k, f) in distribution.nodal_forces().iter().enumerate() {
        rhs[k * 3] += f.x;
        rhs[k * 3 + 1] += f.y;
        rhs[k * 3 + 2] += f.z;
    }
    Ok(distribution)
}

/// Torque distribution for `particle` if it is glued to the wall.
pub fn add_forces_for_particle<S: ContactSurface + ?Sized>(
    surface: &S,
    particle: &Particle,
    force: DVec3,
    rhs: &mut [f64],
) -> WallResult<Option<TorqueDistribution>> {
    match TorqueForceInputs::from_particle(particle, force) {
        Some(inputs) => add_forces_due_to_torque(surface, &inputs, rhs).map(Some),
        None => Ok(None),
    }
}
