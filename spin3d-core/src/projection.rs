//! Orthographic projection onto the framebuffer.

use nalgebra::Point3;

/// Fixed orthographic camera.
///
/// The camera sits on the +Z axis looking at the origin. One model unit
/// maps to one pixel; the origin projects to the viewport center.
/// Screen y grows downward while model y grows upward, so y is flipped.
/// Depth is stored as `-z`: surfaces nearer the camera get smaller
/// depth values and win the depth test.
pub struct Camera {
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Project a transformed model-space point to screen space.
    ///
    /// Returns `(screen_x, screen_y, depth)`, or `None` for non-finite
    /// input. Off-viewport coordinates are returned as-is; clipping to
    /// the pixel rectangle is the rasterizer's job.
    pub fn project_to_screen(&self, point: &Point3<f32>) -> Option<(f32, f32, f32)> {
        if !point.x.is_finite() || !point.y.is_finite() || !point.z.is_finite() {
            return None;
        }

        let screen_x = self.width as f32 / 2.0 + point.x;
        let screen_y = self.height as f32 / 2.0 - point.y;
        let depth = -point.z;

        Some((screen_x, screen_y, depth))
    }
}
