//! Rigid wall facets: triangles and quads read by the contact classifier.

use glam::DVec3;

use crate::error::{WallError, WallResult};
use crate::geometry;

/// Largest facet handled (quad).
pub const MAX_FACET_NODES: usize = 4;

/// State of one wall node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WallNode {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Displacement accumulated over the current step.
    pub delta_displacement: DVec3,
}

impl WallNode {
    /// A node at rest at `position`.
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_delta_displacement(mut self, delta: DVec3) -> Self {
        self.delta_displacement = delta;
        self
    }
}

/// Capability the classifier needs from a wall surface element.
pub trait ContactSurface {
    /// Nodes in facet order.
    fn nodes(&self) -> &[WallNode];

    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    fn node_position(&self, index: usize) -> DVec3 {
        self.nodes()[index].position
    }

    /// Unit normal from the first three nodes, `(n1 - n0) x (n2 - n0)` normalized.
    fn unit_normal(&self) -> WallResult<DVec3> {
        let nodes = self.nodes();
        match nodes {
            [a, b, c, ..] => geometry::planar_normal(&[a.position, b.position, c.position]),
            _ => Err(WallError::DegenerateGeometry {
                node_count: nodes.len(),
            }),
        }
    }
}

/// A planar wall element. Quads are handled as two triangles `(0,1,2)` and
/// `(0,2,3)` sharing one weight vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Facet {
    Triangle([WallNode; 3]),
    Quad([WallNode; 4]),
}

impl Facet {
    /// Build a facet from 3 or 4 nodes.
    pub fn new(nodes: &[WallNode]) -> WallResult<Self> {
        match *nodes {
            [a, b, c] => Ok(Facet::Triangle([a, b, c])),
            [a, b, c, d] => Ok(Facet::Quad([a, b, c, d])),
            _ => Err(WallError::DegenerateGeometry {
                node_count: nodes.len(),
            }),
        }
    }

    /// Triangle with nodes at rest.
    pub fn triangle(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Facet::Triangle([WallNode::at(a), WallNode::at(b), WallNode::at(c)])
    }

    /// Quad with nodes at rest, in boundary order.
    pub fn quad(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> Self {
        Facet::Quad([
            WallNode::at(a),
            WallNode::at(b),
            WallNode::at(c),
            WallNode::at(d),
        ])
    }

    pub fn nodes_mut(&mut self) -> &mut [WallNode] {
        match self {
            Facet::Triangle(n) => n,
            Facet::Quad(n) => n,
        }
    }

    /// Node positions in facet order.
    pub fn positions(&self) -> Vec<DVec3> {
        self.nodes().iter().map(|n| n.position).collect()
    }

    /// Arithmetic mean of node velocities.
    pub fn mean_velocity(&self) -> DVec3 {
        let nodes = self.nodes();
        let sum: DVec3 = nodes.iter().map(|n| n.velocity).sum();
        sum / nodes.len() as f64
    }

    /// Weighted sums of node velocity and incremental displacement.
    pub fn interpolate(&self, weights: &[f64]) -> (DVec3, DVec3) {
        self.nodes()
            .iter()
            .zip(weights)
            .fold((DVec3::ZERO, DVec3::ZERO), |(v, d), (node, &w)| {
                (v + node.velocity * w, d + node.delta_displacement * w)
            })
    }
}

impl ContactSurface for Facet {
    fn nodes(&self) -> &[WallNode] {
        match self {
            Facet::Triangle(n) => n,
            Facet::Quad(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_from_node_count() {
        let n = WallNode::at(DVec3::ZERO);
        assert!(matches!(Facet::new(&[n, n, n]), Ok(Facet::Triangle(_))));
        assert!(matches!(Facet::new(&[n, n, n, n]), Ok(Facet::Quad(_))));
        assert_eq!(
            Facet::new(&[n, n]),
            Err(WallError::DegenerateGeometry { node_count: 2 })
        );
        assert_eq!(
            Facet::new(&[n; 5]),
            Err(WallError::DegenerateGeometry { node_count: 5 })
        );
    }

    #[test]
    fn test_unit_normal_quad_uses_first_triangle() {
        let quad = Facet::quad(
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::Y,
        );
        let n = quad.unit_normal().unwrap();
        assert!((n - DVec3::Z).length() < 1e-15);
    }

    #[test]
    fn test_zero_area_normal_fails() {
        let f = Facet::triangle(DVec3::ZERO, DVec3::X, DVec3::X * 3.0);
        assert!(matches!(
            f.unit_normal(),
            Err(WallError::DegenerateVector(_))
        ));
    }

    #[test]
    fn test_mean_velocity() {
        let f = Facet::Triangle([
            WallNode::at(DVec3::ZERO).with_velocity(DVec3::X),
            WallNode::at(DVec3::X).with_velocity(DVec3::Y),
            WallNode::at(DVec3::Y).with_velocity(DVec3::Z),
        ]);
        let v = f.mean_velocity();
        assert!((v - DVec3::splat(1.0 / 3.0)).length() < 1e-15);
    }

    #[test]
    fn test_interpolate_weighted_sum() {
        let f = Facet::Triangle([
            WallNode::at(DVec3::ZERO)
                .with_velocity(DVec3::X * 2.0)
                .with_delta_displacement(DVec3::Z),
            WallNode::at(DVec3::X).with_velocity(DVec3::Y * 4.0),
            WallNode::at(DVec3::Y),
        ]);
        let (v, d) = f.interpolate(&[0.5, 0.25, 0.25]);
        assert!((v - DVec3::new(1.0, 1.0, 0.0)).length() < 1e-15);
        assert!((d - DVec3::Z * 0.5).length() < 1e-15);
    }
}
