//! Spin3D Web - browser export surface.
//!
//! Exposes the renderer to a host page as five zero-state entry points
//! over a single module-wide [`Renderer`] instance. The host reads the
//! frame by grabbing the pointer once via [`get_buffer`] and viewing
//! `WIDTH * HEIGHT * 4` bytes of linear memory at that address after
//! each render call; the pixel allocation never moves, so the pointer
//! stays valid for the module's lifetime.
//!
//! All entry points sanitize their inputs and return nothing; there is
//! no error channel across this boundary. The host must not call
//! concurrently - the browser event loop is single-threaded, and the
//! lock here only serializes, it does not make the contract reentrant.

use spin3d_core::{Renderer, HEIGHT, WIDTH};
use std::sync::{Mutex, OnceLock};
use wasm_bindgen::prelude::*;

/// Run `f` against the module-wide renderer, creating it on first use.
fn with_renderer<T>(f: impl FnOnce(&mut Renderer) -> T) -> T {
    static RENDERER: OnceLock<Mutex<Renderer>> = OnceLock::new();
    let cell = RENDERER.get_or_init(|| Mutex::new(Renderer::new(WIDTH, HEIGHT)));
    let mut guard = cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

/// Install the panic hook and console logger when the module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("spin3d renderer ready ({WIDTH}x{HEIGHT})");
}

/// Stable pointer to the `WIDTH * HEIGHT * 4`-byte RGBA framebuffer.
#[wasm_bindgen]
pub fn get_buffer() -> *const u8 {
    with_renderer(|renderer| renderer.framebuffer().as_ptr())
}

/// Fill the framebuffer (and the compositing cache) with the backdrop.
#[wasm_bindgen]
pub fn generate_background() {
    with_renderer(|renderer| renderer.generate_background());
}

/// Select a built-in mesh. Out-of-range indices are ignored.
#[wasm_bindgen]
pub fn set_mesh(index: u32) {
    with_renderer(|renderer| renderer.set_mesh(index as usize));
}

/// Render the selected mesh: uniform scale, then rotation about X, Y,
/// and Z (radians, in that order), orthographically projected.
#[wasm_bindgen]
pub fn render(scale: f64, angle_x: f64, angle_y: f64, angle_z: f64) {
    with_renderer(|renderer| {
        renderer.render(
            scale as f32,
            angle_x as f32,
            angle_y as f32,
            angle_z as f32,
        )
    });
}

/// Render one frame of the turntable animation: a Y-axis rotation with
/// phase `(time / period) * 2pi mod 2pi` at scale 1.
#[wasm_bindgen]
pub fn render_spin(time_seconds: f64, period_seconds: f64) {
    with_renderer(|renderer| renderer.render_spin(time_seconds, period_seconds));
}
