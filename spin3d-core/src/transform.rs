//! Model transforms: uniform scale, Euler rotation, and the
//! time-driven spin phase.

use nalgebra::{Matrix4, Vector3};

/// Smallest scale factor the pipeline accepts. Zero, negative, and
/// non-finite scales clamp here instead of collapsing the projection.
pub const MIN_SCALE: f32 = 1e-6;

/// Rotation state around three axes (in radians).
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians).
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for the render pipeline.
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state.
    ///
    /// Rotation composition order is fixed: X first, then Y, then Z
    /// (`Rz * Ry * Rx`). Rotation is non-commutative, so every caller
    /// goes through here rather than composing its own.
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rz * ry * rx
    }

    /// Create a uniform scale matrix. Zero and negative scales clamp
    /// to [`MIN_SCALE`]; a non-finite scale falls back to 1.
    pub fn scale_matrix(scale: f32) -> Matrix4<f32> {
        let scale = if scale.is_finite() {
            scale.max(MIN_SCALE)
        } else {
            1.0
        };
        Matrix4::new_scaling(scale)
    }

    /// Full model matrix: scale, then rotate.
    pub fn model_matrix(scale: f32, rotation: &RotationState) -> Matrix4<f32> {
        Self::rotation_matrix(rotation) * Self::scale_matrix(scale)
    }

    /// Spin phase angle for the turntable animation.
    ///
    /// `(time / period) * 2pi mod 2pi`, computed in f64 because hosts
    /// pass epoch timestamps whose magnitude would eat all of an f32's
    /// precision. Non-finite inputs and non-positive periods yield 0.
    pub fn spin_angle(time_seconds: f64, period_seconds: f64) -> f32 {
        if !time_seconds.is_finite() || !period_seconds.is_finite() || period_seconds <= 0.0 {
            return 0.0;
        }
        let phase = (time_seconds / period_seconds).rem_euclid(1.0);
        (phase * std::f64::consts::TAU) as f32
    }
}
