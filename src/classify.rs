//! Face, edge and vertex proximity tests between a sphere and a wall facet.
//!
//! Each test reports whether the particle touches the feature, the distance
//! from the particle centre to it, and a right-handed local frame whose normal
//! points from the wall towards the particle.

use glam::DVec3;

use crate::error::{WallError, WallResult};
use crate::facet::{ContactSurface, MAX_FACET_NODES};
use crate::geometry::{self, DEGENERATE_LENGTH};

/// Signed distances below this count as lying on the facet plane.
const ON_PLANE_TOLERANCE: f64 = 1e-12;

/// Whether a particle exactly one interaction radius away is in contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiusBoundary {
    /// Contact iff `distance <= radius`.
    #[default]
    Inclusive,
    /// Contact iff `distance < radius`.
    Exclusive,
}

impl RadiusBoundary {
    #[inline]
    pub fn admits(self, distance: f64, radius: f64) -> bool {
        match self {
            RadiusBoundary::Inclusive => distance <= radius,
            RadiusBoundary::Exclusive => distance < radius,
        }
    }
}

/// Orthonormal contact basis `{tangent1, tangent2, normal}` with `tangent1 x tangent2 = normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub tangent1: DVec3,
    pub tangent2: DVec3,
    pub normal: DVec3,
}

impl Default for LocalFrame {
    fn default() -> Self {
        Self {
            tangent1: DVec3::X,
            tangent2: DVec3::Y,
            normal: DVec3::Z,
        }
    }
}

impl LocalFrame {
    fn from_axes([tangent1, tangent2, normal]: [DVec3; 3]) -> Self {
        Self {
            tangent1,
            tangent2,
            normal,
        }
    }

    /// Frame with the given unit normal. The first tangent is `tangent`
    /// projected into the plane.
    pub fn from_normal(normal: DVec3, tangent: DVec3) -> WallResult<Self> {
        geometry::basis_from_normal(normal, tangent).map(Self::from_axes)
    }

    pub fn axes(&self) -> [DVec3; 3] {
        [self.tangent1, self.tangent2, self.normal]
    }
}

/// Outcome of one proximity test. `frame` is meaningful only when `contact` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub contact: bool,
    /// Distance from the particle centre to the tested feature.
    pub distance: f64,
    pub frame: LocalFrame,
}

/// Face test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetProximity {
    pub proximity: Proximity,
    /// Barycentric weights of the projected centre, one per facet node.
    pub weights: [f64; MAX_FACET_NODES],
    pub is_inside: bool,
}

/// Edge test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeProximity {
    pub proximity: Proximity,
    /// Unclamped line parameter of the foot point, `0` at the first node.
    pub eta: f64,
}

/// Which side of the facet plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Negative,
    OnPlane,
    Positive,
}

impl Side {
    pub fn sign(self) -> i32 {
        match self {
            Side::Negative => -1,
            Side::OnPlane => 0,
            Side::Positive => 1,
        }
    }
}

/// Barycentric coordinates `(alpha, beta, gamma)` of the projection of `p`
/// onto the plane of triangle `(a, b, c)`.
pub fn barycentric(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> WallResult<DVec3> {
    let side1 = b - a;
    let side2 = c - a;
    let w = p - a;
    let normal = side1.cross(side2);
    let normal2 = normal.length_squared();
    if normal2 < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        return Err(WallError::DegenerateVector("facet normal"));
    }
    let beta = w.cross(side2).dot(normal) / normal2;
    let gamma = side1.cross(w).dot(normal) / normal2;
    Ok(DVec3::new(1.0 - beta - gamma, beta, gamma))
}

#[inline]
fn is_inside(bary: DVec3) -> bool {
    bary.cmpge(DVec3::ZERO).all() && bary.cmple(DVec3::ONE).all()
}

/// Barycentric weights over the whole facet, trying `(0,1,2)` and for quads `(0,2,3)`.
fn facet_weights<S: ContactSurface + ?Sized>(
    surface: &S,
    p: DVec3,
) -> WallResult<([f64; MAX_FACET_NODES], bool)> {
    let nodes = surface.nodes();
    if nodes.len() < 3 {
        return Err(WallError::DegenerateGeometry {
            node_count: nodes.len(),
        });
    }
    let [n0, n1, n2] = [0usize, 1, 2].map(|i| nodes[i].position);
    let first = barycentric(p, n0, n1, n2)?;
    if is_inside(first) || nodes.len() < 4 {
        return Ok(([first.x, first.y, first.z, 0.0], is_inside(first)));
    }

    let second = barycentric(p, n0, n2, nodes[3].position)?;
    if is_inside(second) {
        return Ok(([second.x, 0.0, second.y, second.z], true));
    }
    Ok(([first.x, first.y, first.z, 0.0], false))
}

/// Whether the projection of `point` onto the facet plane falls inside the facet.
pub fn projection_falls_inside<S: ContactSurface + ?Sized>(
    surface: &S,
    point: DVec3,
) -> WallResult<bool> {
    facet_weights(surface, point).map(|(_, inside)| inside)
}

/// Side of the facet plane `point` occupies, from the sign of
/// `det(n1 - n0, n2 - n0, point - n0)`.
pub fn check_side<S: ContactSurface + ?Sized>(surface: &S, point: DVec3) -> WallResult<Side> {
    let nodes = surface.nodes();
    if nodes.len() < 3 {
        return Err(WallError::DegenerateGeometry {
            node_count: nodes.len(),
        });
    }
    let n0 = nodes[0].position;
    let a0 = nodes[1].position - n0;
    let a1 = nodes[2].position - n0;
    let det = geometry::determinant(a0, a1, point - n0);
    let scale = a0.cross(a1).length();
    if scale < DEGENERATE_LENGTH {
        return Err(WallError::DegenerateVector("facet normal"));
    }

    Ok(if det.abs() <= ON_PLANE_TOLERANCE * scale {
        Side::OnPlane
    } else if det > 0.0 {
        Side::Positive
    } else {
        Side::Negative
    })
}

/// Sphere against the facet interior.
pub fn facet_check<S: ContactSurface + ?Sized>(
    surface: &S,
    center: DVec3,
    radius: f64,
    boundary: RadiusBoundary,
) -> WallResult<FacetProximity> {
    let (weights, is_inside) = facet_weights(surface, center)?;

    let n0 = surface.node_position(0);
    let side1 = surface.node_position(1) - n0;
    let unit_normal = surface.unit_normal()?;
    let signed = (center - n0).dot(unit_normal);
    let normal = if signed < 0.0 { -unit_normal } else { unit_normal };
    let distance = signed.abs();

    let tangent1 = geometry::try_normalize(side1, "facet side")?;
    let frame = LocalFrame {
        tangent1,
        tangent2: normal.cross(tangent1),
        normal,
    };

    Ok(FacetProximity {
        proximity: Proximity {
            contact: is_inside && boundary.admits(distance, radius),
            distance,
            frame,
        },
        weights,
        is_inside,
    })
}

/// Normal for a particle centre lying on the contacted feature itself.
fn on_feature_normal(fallback: Option<DVec3>, what: &'static str) -> WallResult<DVec3> {
    match fallback {
        Some(normal) => geometry::try_normalize(normal, what),
        None => Err(WallError::DegenerateVector(what)),
    }
}

/// Sphere against the infinite line through `a` and `b`.
///
/// When the centre lies on the line the frame normal is `fallback_normal`,
/// usually the facet normal.
pub fn edge_check(
    a: DVec3,
    b: DVec3,
    center: DVec3,
    radius: f64,
    boundary: RadiusBoundary,
    fallback_normal: Option<DVec3>,
) -> WallResult<EdgeProximity> {
    let edge = b - a;
    let len2 = edge.length_squared();
    if len2 < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        return Err(WallError::DegenerateVector("edge direction"));
    }
    let eta = (center - a).dot(edge) / len2;
    let perpendicular = center - (a + edge * eta);
    let distance = perpendicular.length();
    let contact = boundary.admits(distance, radius);

    let frame = if !contact {
        LocalFrame::default()
    } else if distance < DEGENERATE_LENGTH {
        let normal = on_feature_normal(fallback_normal, "edge contact normal")?;
        LocalFrame::from_normal(normal, edge)?
    } else {
        let normal = perpendicular / distance;
        let tangent1 = edge / len2.sqrt();
        LocalFrame {
            tangent1,
            tangent2: normal.cross(tangent1),
            normal,
        }
    };

    Ok(EdgeProximity {
        proximity: Proximity {
            contact,
            distance,
            frame,
        },
        eta,
    })
}

/// Sphere against a single node. `fallback_normal` orients the frame when
/// the centre sits on the node.
pub fn vertex_check(
    vertex: DVec3,
    center: DVec3,
    radius: f64,
    boundary: RadiusBoundary,
    fallback_normal: Option<DVec3>,
) -> WallResult<Proximity> {
    let offset = center - vertex;
    let distance = offset.length();
    let contact = boundary.admits(distance, radius);

    let frame = if contact {
        let normal = if distance < DEGENERATE_LENGTH {
            on_feature_normal(fallback_normal, "vertex contact normal")?
        } else {
            offset / distance
        };
        let tangent1 = normal.any_orthonormal_vector();
        LocalFrame {
            tangent1,
            tangent2: normal.cross(tangent1),
            normal,
        }
    } else {
        LocalFrame::default()
    };

    Ok(Proximity {
        contact,
        distance,
        frame,
    })
}
