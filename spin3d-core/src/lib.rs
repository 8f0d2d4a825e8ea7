//! Spin3D Core - software 3D rasterizer.
//!
//! A CPU-only rendering pipeline: built-in meshes (plus STL loading),
//! scale/rotation transforms, orthographic projection, and line or
//! filled-triangle rasterization into a fixed-size RGBA framebuffer
//! with a depth buffer. No GPU, no native graphics library; frontends
//! only read the pixel bytes.
//!
//! The [`renderer::Renderer`] context owns all mutable state. A
//! typical frame sequence, driven by a host once per animation frame:
//!
//! ```
//! use spin3d_core::{Renderer, HEIGHT, WIDTH};
//!
//! let mut renderer = Renderer::new(WIDTH, HEIGHT);
//! renderer.generate_background();
//! renderer.set_mesh(0);
//! renderer.render_spin(0.0, 5.0);
//! let frame = renderer.framebuffer().as_bytes();
//! assert_eq!(frame.len(), WIDTH * HEIGHT * 4);
//! ```

pub mod background;
pub mod framebuffer;
pub mod geometry;
pub mod meshes;
pub mod projection;
pub mod raster;
pub mod renderer;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use framebuffer::{Framebuffer, Rgba, HEIGHT, WIDTH};
pub use geometry::{Mesh, MeshError, Vertex};
pub use projection::Camera;
pub use renderer::{RenderStyle, Renderer};
pub use transform::{RotationState, Transform};
