//! Render orchestrator: ties mesh selection, transform, projection,
//! and rasterization into one frame.

use nalgebra::Matrix4;

use crate::background;
use crate::framebuffer::{Framebuffer, Rgba};
use crate::geometry::{self, Mesh};
use crate::meshes;
use crate::projection::Camera;
use crate::raster;
use crate::transform::{RotationState, Transform};

/// How meshes are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Filled faces, flat-lit and depth-tested.
    Shaded,
    /// Edge lines only.
    Wireframe,
}

/// Ambient floor for the flat headlight, so faces angled away from the
/// viewer stay legible instead of going fully black.
const AMBIENT: f32 = 0.2;

/// The renderer context: framebuffer, cached backdrop, built-in mesh
/// library, and the current selection.
///
/// This is the explicit-state counterpart to the exported zero-argument
/// call surface: frontends own one instance and thread it through every
/// call. A frame is a pure function of (selection, transform arguments)
/// onto the framebuffer. Single-threaded by contract; `&mut self` keeps
/// concurrent mutation unrepresentable.
pub struct Renderer {
    framebuffer: Framebuffer,
    background: Vec<u8>,
    library: Vec<Mesh>,
    custom: Option<Mesh>,
    selected: usize,
    camera: Camera,
    style: RenderStyle,
}

impl Renderer {
    /// Build a renderer with the built-in mesh library, mesh 0
    /// selected, and an opaque-black backdrop cache. The framebuffer
    /// and the library are allocated here, once.
    pub fn new(width: usize, height: usize) -> Self {
        let mut background = vec![0u8; width * height * 4];
        for pixel in background.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        Self {
            framebuffer: Framebuffer::new(width, height),
            background,
            library: meshes::library(),
            custom: None,
            selected: 0,
            camera: Camera::new(width as u32, height as u32),
            style: RenderStyle::Shaded,
        }
    }

    /// Regenerate the backdrop cache and copy it onto the framebuffer.
    ///
    /// Sequencing is the caller's responsibility: calling this after a
    /// render overwrites the mesh pixels until the next render
    /// re-composites.
    pub fn generate_background(&mut self) {
        self.background = background::generate(self.framebuffer.width(), self.framebuffer.height());
        self.framebuffer.overwrite_with(&self.background);
    }

    /// Select a built-in mesh by index.
    ///
    /// An out-of-range index is ignored and the previous selection
    /// kept. Selection alone renders nothing.
    pub fn set_mesh(&mut self, index: usize) {
        if index < self.library.len() {
            self.selected = index;
            self.custom = None;
        } else {
            log::warn!(
                "ignoring mesh selection {index}: only {} built-in meshes",
                self.library.len()
            );
        }
    }

    /// Replace the selection with a caller-supplied mesh (e.g. parsed
    /// from an STL file). `set_mesh` switches back to the built-ins.
    pub fn set_custom_mesh(&mut self, mesh: Mesh) {
        self.custom = Some(mesh);
    }

    /// Index of the currently selected built-in mesh.
    pub fn selected_mesh(&self) -> usize {
        self.selected
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    pub fn style(&self) -> RenderStyle {
        self.style
    }

    /// The framebuffer holding the rendered output.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Render one frame: composite the backdrop, then transform,
    /// project, and rasterize the selected mesh.
    ///
    /// Angles are radians, applied X then Y then Z. Non-finite angles
    /// are treated as zero; non-positive or non-finite scale clamps to
    /// a minimum positive epsilon (see `Transform::scale_matrix`).
    pub fn render(&mut self, scale: f32, angle_x: f32, angle_y: f32, angle_z: f32) {
        let rotation = RotationState::new(
            sanitize_angle(angle_x),
            sanitize_angle(angle_y),
            sanitize_angle(angle_z),
        );
        let model = Transform::model_matrix(scale, &rotation);

        self.framebuffer.overwrite_with(&self.background);
        self.framebuffer.clear_depth();

        let Some(mesh) = self.custom.as_ref().or_else(|| self.library.get(self.selected))
        else {
            return;
        };
        draw_mesh(&mut self.framebuffer, &self.camera, mesh, &model, self.style);
    }

    /// Turntable variant of [`render`](Self::render): one Y-axis
    /// rotation whose phase is `(time / period) * 2pi mod 2pi`, at
    /// scale 1. A frame at `t = period` equals the frame at `t = 0`.
    pub fn render_spin(&mut self, time_seconds: f64, period_seconds: f64) {
        let angle = Transform::spin_angle(time_seconds, period_seconds);
        self.render(1.0, 0.0, angle, 0.0);
    }
}

fn sanitize_angle(angle: f32) -> f32 {
    if angle.is_finite() {
        angle
    } else {
        0.0
    }
}

/// Transform, project, and rasterize one mesh into the framebuffer.
fn draw_mesh(
    fb: &mut Framebuffer,
    camera: &Camera,
    mesh: &Mesh,
    model: &Matrix4<f32>,
    style: RenderStyle,
) {
    let transformed: Vec<_> = mesh
        .vertices
        .iter()
        .map(|vertex| model.transform_point(vertex))
        .collect();
    let projected: Vec<_> = transformed
        .iter()
        .map(|point| camera.project_to_screen(point))
        .collect();

    match style {
        RenderStyle::Shaded => {
            for face in &mesh.faces {
                // A face that survived validation always resolves here;
                // the checked lookups keep a violated invariant from
                // becoming an out-of-bounds read.
                let (Some(&Some(s0)), Some(&Some(s1)), Some(&Some(s2))) = (
                    projected.get(face[0]),
                    projected.get(face[1]),
                    projected.get(face[2]),
                ) else {
                    continue;
                };
                let Some(normal) = geometry::face_normal(
                    &transformed[face[0]],
                    &transformed[face[1]],
                    &transformed[face[2]],
                ) else {
                    continue;
                };
                let brightness = normal.z.max(0.0);
                raster::fill_triangle(fb, s0, s1, s2, shade(mesh.color, brightness));
            }
        }
        RenderStyle::Wireframe => {
            for [a, b] in mesh.edges() {
                let (Some(&Some(p0)), Some(&Some(p1))) = (projected.get(a), projected.get(b))
                else {
                    continue;
                };
                raster::draw_line(fb, p0.0, p0.1, p1.0, p1.1, Rgba::WHITE);
            }
        }
    }
}

/// Flat headlight: modulate the mesh base color by face brightness,
/// with an ambient floor.
fn shade(color: Rgba, brightness: f32) -> Rgba {
    let lit = AMBIENT + (1.0 - AMBIENT) * brightness.clamp(0.0, 1.0);
    Rgba::new(
        (color.r as f32 * lit) as u8,
        (color.g as f32 * lit) as u8,
        (color.b as f32 * lit) as u8,
        color.a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::{HEIGHT, WIDTH};
    use crate::meshes::MESH_COUNT;

    fn snapshot(renderer: &Renderer) -> Vec<u8> {
        renderer.framebuffer().as_bytes().to_vec()
    }

    #[test]
    fn test_generate_background_is_idempotent_and_opaque() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        let first = snapshot(&renderer);
        renderer.generate_background();
        let second = snapshot(&renderer);
        assert_eq!(first, second);
        for pixel in second.chunks_exact(4) {
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_every_builtin_renders_in_both_styles() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        for index in 0..MESH_COUNT {
            renderer.set_mesh(index);
            renderer.set_style(RenderStyle::Shaded);
            renderer.render(1.0, 0.0, 0.0, 0.0);
            renderer.set_style(RenderStyle::Wireframe);
            renderer.render(1.0, 0.4, 0.8, 1.2);
            assert_eq!(renderer.framebuffer().len(), WIDTH * HEIGHT * 4);
        }
    }

    #[test]
    fn test_invalid_selection_is_ignored() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.set_mesh(1);
        renderer.set_mesh(99);
        assert_eq!(renderer.selected_mesh(), 1);
        renderer.render(1.0, 0.0, 0.0, 0.0);
    }

    #[test]
    fn test_render_spin_is_periodic() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        renderer.render_spin(0.0, 5.0);
        let at_zero = snapshot(&renderer);
        renderer.render_spin(5.0, 5.0);
        let at_period = snapshot(&renderer);
        assert_eq!(at_zero, at_period);
    }

    #[test]
    fn test_render_spin_moves_within_the_period() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        renderer.set_mesh(0);
        renderer.render_spin(0.0, 5.0);
        let at_zero = snapshot(&renderer);
        renderer.render_spin(1.0, 5.0);
        let later = snapshot(&renderer);
        assert_ne!(at_zero, later);
    }

    #[test]
    fn test_degenerate_inputs_do_not_crash() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        renderer.render(0.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY);
        renderer.render(-5.0, 0.0, 0.0, 0.0);
        renderer.render_spin(f64::NAN, 0.0);
        for pixel in renderer.framebuffer().as_bytes().chunks_exact(4) {
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_end_to_end_frame_differs_from_background() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        let background_only = snapshot(&renderer);

        renderer.set_mesh(0);
        renderer.render(1.0, 0.0, 0.0, 0.0);
        let frame = snapshot(&renderer);

        assert_ne!(frame, background_only);
        for pixel in frame.chunks_exact(4) {
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_background_persists_outside_the_mesh() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        let background_only = snapshot(&renderer);

        renderer.set_mesh(0);
        renderer.render(1.0, 0.0, 0.0, 0.0);
        let frame = snapshot(&renderer);

        // Corners are far from any built-in mesh at scale 1.
        assert_eq!(frame[0..4], background_only[0..4]);
        let last = frame.len() - 4;
        assert_eq!(frame[last..], background_only[last..]);
    }

    #[test]
    fn test_custom_mesh_replaces_selection_until_set_mesh() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        renderer.set_custom_mesh(crate::meshes::cube(40.0));
        renderer.render(1.0, 0.0, 0.0, 0.0);
        let custom_frame = snapshot(&renderer);

        renderer.set_mesh(0);
        renderer.render(1.0, 0.0, 0.0, 0.0);
        let builtin_frame = snapshot(&renderer);
        assert_ne!(custom_frame, builtin_frame);
    }
}
