//! Spin3D Terminal Demo - spinning meshes in truecolor cells.
//!
//! Controls:
//!   - 1/2/3: Select mesh (cube, icosphere, torus)
//!   - Arrow Keys: Rotate (pauses the turntable)
//!   - E/R: Roll rotation
//!   - +/-: Scale
//!   - Space: Resume the turntable spin
//!   - W: Toggle wireframe
//!   - Q/ESC: Quit

use spin3d_terminal::TerminalApp;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut app = TerminalApp::new()?;
    app.run()
}
