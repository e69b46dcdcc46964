//! Prescribed rigid-body motion of a wall.
//!
//! The wall spins about an axis at `rotation_rate` cycles per unit time while
//! the axis itself travels along its own direction at `axial_speed` and with
//! the superposed `global_velocity`.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::error::{WallError, WallResult};
use crate::facet::Facet;
use crate::geometry;

/// Points closer to the rotation axis than this have no tangential direction.
pub const ON_AXIS_TOLERANCE: f64 = 1e-6;

/// Configuration of a prescribed wall motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallMotionSpec {
    /// Rotation rate in cycles per unit time. Default: 0.
    pub rotation_rate: f64,
    /// Translation speed along the rotation axis. Default: 0.
    pub axial_speed: f64,
    /// Translation superposed on the whole wall. Default: zero.
    pub global_velocity: DVec3,
    /// Rotation axis direction, need not be normalized. Default: +Z.
    pub axis_direction: DVec3,
    /// A point on the rotation axis at the start time. Default: origin.
    pub axis_origin: DVec3,
    /// Simulation time at which the motion starts. Default: 0.
    pub begin_time: f64,
}

impl Default for WallMotionSpec {
    fn default() -> Self {
        Self {
            rotation_rate: 0.0,
            axial_speed: 0.0,
            global_velocity: DVec3::ZERO,
            axis_direction: DVec3::Z,
            axis_origin: DVec3::ZERO,
            begin_time: 0.0,
        }
    }
}

impl WallMotionSpec {
    /// Pure rotation about the axis through `axis_origin`.
    pub fn rotation(rotation_rate: f64, axis_direction: DVec3, axis_origin: DVec3) -> Self {
        Self {
            rotation_rate,
            axis_direction,
            axis_origin,
            ..Default::default()
        }
    }

    pub fn with_axial_speed(mut self, axial_speed: f64) -> Self {
        self.axial_speed = axial_speed;
        self
    }

    pub fn with_global_velocity(mut self, global_velocity: DVec3) -> Self {
        self.global_velocity = global_velocity;
        self
    }

    pub fn with_begin_time(mut self, begin_time: f64) -> Self {
        self.begin_time = begin_time;
        self
    }

    /// Reject non-finite parameters and a zero-length axis.
    pub fn validate(&self) -> WallResult<()> {
        let scalars = [self.rotation_rate, self.axial_speed, self.begin_time];
        let vectors = [self.global_velocity, self.axis_direction, self.axis_origin];
        if !scalars.iter().all(|s| s.is_finite()) || !vectors.iter().all(|v| v.is_finite()) {
            return Err(WallError::InvalidMotion("parameters must be finite".to_string()));
        }
        if self.axis_direction.length() < geometry::DEGENERATE_LENGTH {
            return Err(WallError::InvalidMotion("rotation axis has zero length".to_string()));
        }
        Ok(())
    }

    /// Time elapsed since the motion started; negative before `begin_time`.
    #[inline]
    pub fn elapsed_since_start(&self, time: f64) -> f64 {
        time - self.begin_time
    }

    /// Angular rate in radians per unit time.
    #[inline]
    pub fn angular_rate(&self) -> f64 {
        self.rotation_rate * TAU
    }

    /// Unit rotation axis.
    pub fn unit_axis(&self) -> WallResult<DVec3> {
        geometry::try_normalize(self.axis_direction, "rotation axis")
    }

    /// Position of the axis origin after `elapsed` time of axial and global translation.
    pub fn axis_origin_at(&self, elapsed: f64) -> WallResult<DVec3> {
        let n = self.unit_axis()?;
        Ok(self.axis_origin + (self.global_velocity + n * self.axial_speed) * elapsed)
    }

    /// Velocity field evaluated once per step.
    ///
    /// Before the start time the wall is at rest.
    pub fn field(&self, elapsed: f64) -> WallResult<VelocityField> {
        let axis = self.unit_axis()?;
        if elapsed < 0.0 {
            return Ok(VelocityField::at_rest(axis));
        }
        Ok(VelocityField {
            origin: self.axis_origin_at(elapsed)?,
            axis,
            omega: self.angular_rate(),
            axial_speed: self.axial_speed,
            global_velocity: self.global_velocity,
        })
    }

    /// Velocity of the wall material at `point`.
    pub fn velocity_at(&self, point: DVec3, elapsed: f64) -> WallResult<DVec3> {
        Ok(self.field(elapsed)?.velocity_at(point))
    }

    /// Fill `output` with one velocity per position, flattened as `[vx0, vy0, vz0, vx1, ...]`.
    ///
    /// `output` is resized to `3 * positions.len()`.
    pub fn compute_movement(
        &self,
        positions: &[DVec3],
        elapsed: f64,
        output: &mut Vec<f64>,
    ) -> WallResult<()> {
        let field = self.field(elapsed)?;
        output.clear();
        output.reserve(positions.len() * 3);
        for p in positions {
            output.extend_from_slice(&field.velocity_at(*p).to_array());
        }
        Ok(())
    }

    /// Write the prescribed velocity into every node and set its incremental
    /// displacement to `velocity * delta_time`.
    pub fn apply_to_facet(
        &self,
        facet: &mut Facet,
        elapsed: f64,
        delta_time: f64,
    ) -> WallResult<()> {
        let field = self.field(elapsed)?;
        for node in facet.nodes_mut() {
            node.velocity = field.velocity_at(node.position);
            node.delta_displacement = node.velocity * delta_time;
        }
        Ok(())
    }
}

/// Rigid velocity field frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityField {
    /// Current position of the axis origin.
    pub origin: DVec3,
    /// Unit axis direction.
    pub axis: DVec3,
    /// Angular rate in radians per unit time.
    pub omega: f64,
    pub axial_speed: f64,
    pub global_velocity: DVec3,
}

impl VelocityField {
    fn at_rest(axis: DVec3) -> Self {
        Self {
            origin: DVec3::ZERO,
            axis,
            omega: 0.0,
            axial_speed: 0.0,
            global_velocity: DVec3::ZERO,
        }
    }

    /// Perpendicular distance from `point` to the axis.
    pub fn radius_to_axis(&self, point: DVec3) -> f64 {
        let offset = point - self.origin;
        let along = offset.dot(self.axis).abs();
        (offset.length_squared() - along * along).max(0.0).sqrt()
    }

    pub fn velocity_at(&self, point: DVec3) -> DVec3 {
        let axial = self.axis * self.axial_speed;
        let radius = self.radius_to_axis(point);
        if radius < ON_AXIS_TOLERANCE {
            return axial + self.global_velocity;
        }

        // Local basis {radial, tangential, axis}.
        let offset = (point - self.origin).normalize();
        let tangential = self.axis.cross(offset).normalize();
        let radial = tangential.cross(self.axis).normalize();
        let local = DVec3::new(0.0, radius * self.omega, self.axial_speed);
        geometry::local_to_global(&[radial, tangential, self.axis], local) + self.global_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_default_is_at_rest() {
        let spec = WallMotionSpec::default();
        spec.validate().unwrap();
        let v = spec.velocity_at(DVec3::new(1.0, 2.0, 3.0), 5.0).unwrap();
        assert_eq!(v, DVec3::ZERO);
    }

    #[test]
    fn test_rotation_scenario() {
        let spec = WallMotionSpec::rotation(1.0, DVec3::Z, DVec3::ZERO);
        let v = spec.velocity_at(DVec3::X, 0.0).unwrap();
        assert!((v.length() - TAU).abs() < EPS);
        assert!((v.normalize() - DVec3::Y).length() < EPS);
    }

    #[test]
    fn test_tangential_speed_scales_with_radius() {
        let rate = 0.75;
        let spec = WallMotionSpec::rotation(rate, DVec3::new(0.0, 0.0, 2.0), DVec3::ZERO);
        for r in [0.5, 1.0, 3.0] {
            let p = DVec3::new(0.0, r, 4.0);
            let v = spec.velocity_at(p, 0.0).unwrap();
            assert!((v.length() - r * TAU * rate).abs() < 1e-10);
            assert!(v.dot(p - DVec3::Z * 4.0).abs() < 1e-10);
            assert!(v.z.abs() < EPS);
        }
    }

    #[test]
    fn test_on_axis_is_pure_translation() {
        let axis = DVec3::new(1.0, 1.0, 0.0);
        let spec = WallMotionSpec::rotation(3.0, axis, DVec3::ZERO)
            .with_axial_speed(2.0)
            .with_global_velocity(DVec3::new(0.0, 0.0, -1.0));
        let elapsed = 0.5;
        let origin = spec.axis_origin_at(elapsed).unwrap();
        let p = origin + axis.normalize() * 7.0;
        let v = spec.velocity_at(p, elapsed).unwrap();
        let expected = axis.normalize() * 2.0 + DVec3::new(0.0, 0.0, -1.0);
        assert!((v - expected).length() < EPS);
    }

    #[test]
    fn test_axis_translates_with_elapsed_time() {
        let spec = WallMotionSpec::rotation(1.0, DVec3::Z, DVec3::ZERO)
            .with_axial_speed(1.0)
            .with_global_velocity(DVec3::X);
        let origin = spec.axis_origin_at(2.0).unwrap();
        assert!((origin - DVec3::new(2.0, 0.0, 2.0)).length() < EPS);

        // The point (2, 0, 5) sits on the translated axis.
        let v = spec.velocity_at(DVec3::new(2.0, 0.0, 5.0), 2.0).unwrap();
        assert!((v - DVec3::new(1.0, 0.0, 1.0)).length() < EPS);
    }

    #[test]
    fn test_screw_motion_components() {
        let spec = WallMotionSpec::rotation(0.5, DVec3::Z, DVec3::ZERO).with_axial_speed(3.0);
        let v = spec.velocity_at(DVec3::new(0.0, 2.0, 0.0), 0.0).unwrap();
        // omega = pi, r = 2: tangential -2pi along X, axial 3 along Z.
        assert!((v - DVec3::new(-2.0 * std::f64::consts::PI, 0.0, 3.0)).length() < 1e-10);
    }

    #[test]
    fn test_before_begin_time_is_at_rest() {
        let spec = WallMotionSpec::rotation(1.0, DVec3::Z, DVec3::ZERO)
            .with_global_velocity(DVec3::X)
            .with_begin_time(10.0);
        assert!(spec.elapsed_since_start(4.0) < 0.0);
        let v = spec
            .velocity_at(DVec3::X, spec.elapsed_since_start(4.0))
            .unwrap();
        assert_eq!(v, DVec3::ZERO);
    }

    #[test]
    fn test_compute_movement_buffer() {
        let spec = WallMotionSpec::rotation(1.0, DVec3::Z, DVec3::ZERO);
        let positions = [DVec3::X, DVec3::Y, DVec3::ZERO];
        let mut out = vec![99.0; 2];
        spec.compute_movement(&positions, 0.0, &mut out).unwrap();
        assert_eq!(out.len(), 9);
        assert!((out[1] - TAU).abs() < EPS);
        assert!((out[3] + TAU).abs() < EPS);
        assert!(out[6..].iter().all(|v| v.abs() < EPS));
    }

    #[test]
    fn test_apply_to_facet() {
        let spec = WallMotionSpec::default().with_global_velocity(DVec3::new(0.0, 0.0, 2.0));
        let mut facet = Facet::triangle(DVec3::ZERO, DVec3::X, DVec3::Y);
        spec.apply_to_facet(&mut facet, 1.0, 0.01).unwrap();
        for node in facet.nodes_mut() {
            assert!((node.velocity - DVec3::new(0.0, 0.0, 2.0)).length() < EPS);
            assert!((node.delta_displacement - DVec3::new(0.0, 0.0, 0.02)).length() < EPS);
        }
    }

    #[test]
    fn test_validate_rejects_bad_axis() {
        let spec = WallMotionSpec {
            axis_direction: DVec3::ZERO,
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(WallError::InvalidMotion(_))));
        assert!(matches!(
            spec.velocity_at(DVec3::X, 0.0),
            Err(WallError::DegenerateVector(_))
        ));

        let spec = WallMotionSpec {
            rotation_rate: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(WallError::InvalidMotion(_))));
    }
}
