//! Vector primitives shared by the classifier, kinematics and distributor.
//!
//! Cross/dot products and norms come straight from [`glam::DVec3`]; this module
//! adds the fallible pieces (normalization, plane normals) and the rigid-motion
//! composition helpers.

use glam::{DMat3, DVec3};

use crate::error::{WallError, WallResult};

/// Vectors shorter than this cannot be normalized.
pub const DEGENERATE_LENGTH: f64 = 1e-14;

/// Normalize `v`, failing with [`WallError::DegenerateVector`] when it has (near) zero length.
///
/// `what` names the vector in the error message.
#[inline]
pub fn try_normalize(v: DVec3, what: &'static str) -> WallResult<DVec3> {
    let len = v.length();
    if len < DEGENERATE_LENGTH || !len.is_finite() {
        return Err(WallError::DegenerateVector(what));
    }
    Ok(v / len)
}

/// Unit normal of the plane through the first three points, `(p1 - p0) x (p2 - p0)`.
pub fn planar_normal(points: &[DVec3]) -> WallResult<DVec3> {
    if points.len() < 3 {
        return Err(WallError::DegenerateGeometry {
            node_count: points.len(),
        });
    }
    let n = (points[1] - points[0]).cross(points[2] - points[0]);
    try_normalize(n, "facet normal")
}

/// Determinant of the 3x3 matrix with rows `a`, `b`, `c`.
#[inline]
pub fn determinant(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    a.dot(b.cross(c))
}

/// Right-handed orthonormal basis `{t1, n x t1, n}` from a unit normal and a
/// (not necessarily unit) first tangent direction.
pub fn basis_from_normal(normal: DVec3, tangent: DVec3) -> WallResult<[DVec3; 3]> {
    let t1 = try_normalize(tangent - normal * tangent.dot(normal), "contact tangent")?;
    let t2 = normal.cross(t1);
    Ok([t1, t2, normal])
}

/// Map a vector expressed in the local basis `axes` back to global coordinates.
#[inline]
pub fn local_to_global(axes: &[DVec3; 3], local: DVec3) -> DVec3 {
    DMat3::from_cols(axes[0], axes[1], axes[2]) * local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_normalize_unit_length() {
        let v = try_normalize(DVec3::new(3.0, 4.0, 0.0), "v").unwrap();
        assert!((v.length() - 1.0).abs() < 1e-15);
        assert!((v - DVec3::new(0.6, 0.8, 0.0)).length() < 1e-15);
    }

    #[test]
    fn test_try_normalize_zero_fails() {
        let err = try_normalize(DVec3::ZERO, "axis").unwrap_err();
        assert_eq!(err, WallError::DegenerateVector("axis"));
    }

    #[test]
    fn test_planar_normal() {
        let pts = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let n = planar_normal(&pts).unwrap();
        assert!((n - DVec3::Z).length() < 1e-15);
    }

    #[test]
    fn test_planar_normal_needs_three_points() {
        let err = planar_normal(&[DVec3::ZERO, DVec3::X]).unwrap_err();
        assert_eq!(err, WallError::DegenerateGeometry { node_count: 2 });
    }

    #[test]
    fn test_planar_normal_collinear() {
        let pts = [DVec3::ZERO, DVec3::X, DVec3::X * 2.0];
        assert!(matches!(
            planar_normal(&pts),
            Err(WallError::DegenerateVector(_))
        ));
    }

    #[test]
    fn test_basis_is_right_handed() {
        let n = DVec3::new(1.0, 1.0, 1.0).normalize();
        let axes = basis_from_normal(n, DVec3::X).unwrap();
        assert!(axes[0].dot(n).abs() < 1e-14);
        assert!((axes[0].cross(axes[1]) - n).length() < 1e-14);
    }

    #[test]
    fn test_local_to_global() {
        let axes = basis_from_normal(DVec3::Z, DVec3::new(1.0, 1.0, 0.0)).unwrap();
        let g = local_to_global(&axes, DVec3::new(2.0, 0.0, 0.5));
        let expected = DVec3::new(2f64.sqrt(), 2f64.sqrt(), 0.5);
        assert!((g - expected).length() < 1e-13);
    }
}
