//! Example: load an STL file and view it in the terminal.
//!
//! Usage: cargo run --example load_stl -- path/to/file.stl

use spin3d_core::stl;
use spin3d_terminal::TerminalApp;
use std::env;
use std::fs;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let Some(stl_path) = args.get(1) else {
        eprintln!("Usage: {} <stl-file>", args[0]);
        eprintln!("\nNo STL file provided, using the built-in library...");
        let mut app = TerminalApp::new()?;
        return app.run();
    };

    println!("Loading STL file: {stl_path}");

    let data = fs::read(stl_path)?;
    let mut mesh = stl::parse_stl(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    mesh.center_and_fit(160.0);

    println!("Loaded {} faces, {} vertices", mesh.faces.len(), mesh.vertices.len());

    let mut app = TerminalApp::with_mesh(mesh)?;
    app.run()
}
