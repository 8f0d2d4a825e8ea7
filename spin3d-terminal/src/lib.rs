//! Terminal frontend for the Spin3D software rasterizer.
//!
//! Drives the core renderer once per frame and presents the RGBA
//! framebuffer as truecolor terminal cells.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use spin3d_core::{Mesh, RenderStyle, Renderer, RotationState, HEIGHT, WIDTH};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod display;

pub use display::TerminalDisplay;

/// Seconds per full turntable revolution.
const SPIN_PERIOD: f64 = 5.0;

/// Interactive terminal viewer.
///
/// Starts on the turntable animation; any manual rotation pauses it.
/// Controls: 1/2/3 select mesh, arrows rotate X/Y, E/R roll Z,
/// +/- scale, Space resumes the spin, W toggles wireframe, Q/Esc quits.
pub struct TerminalApp {
    renderer: Renderer,
    display: TerminalDisplay,
    rotation: RotationState,
    scale: f32,
    spinning: bool,
    started: Instant,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Viewer over the built-in mesh library, mesh 0 selected.
    pub fn new() -> io::Result<Self> {
        Self::build(None)
    }

    /// Viewer over a caller-supplied mesh (e.g. loaded from STL).
    pub fn with_mesh(mesh: Mesh) -> io::Result<Self> {
        Self::build(Some(mesh))
    }

    fn build(custom: Option<Mesh>) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        log::debug!("terminal viewer: {cols}x{rows} cells");

        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.generate_background();
        renderer.set_mesh(0);
        if let Some(mesh) = custom {
            renderer.set_custom_mesh(mesh);
        }

        Ok(Self {
            renderer,
            display: TerminalDisplay::new(cols, rows),
            rotation: RotationState::new(0.3, 0.3, 0.0),
            scale: 1.0,
            spinning: true,
            started: Instant::now(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Render
            self.render_frame()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('1') => self.renderer.set_mesh(0),
                KeyCode::Char('2') => self.renderer.set_mesh(1),
                KeyCode::Char('3') => self.renderer.set_mesh(2),
                KeyCode::Up => self.nudge(0.1, 0.0, 0.0),
                KeyCode::Down => self.nudge(-0.1, 0.0, 0.0),
                KeyCode::Left => self.nudge(0.0, -0.1, 0.0),
                KeyCode::Right => self.nudge(0.0, 0.1, 0.0),
                KeyCode::Char('e') => self.nudge(0.0, 0.0, 0.1),
                KeyCode::Char('r') => self.nudge(0.0, 0.0, -0.1),
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.scale = (self.scale * 1.1).min(10.0);
                }
                KeyCode::Char('-') => {
                    self.scale = (self.scale / 1.1).max(0.05);
                }
                KeyCode::Char(' ') => {
                    self.spinning = !self.spinning;
                }
                KeyCode::Char('w') => {
                    let style = match self.renderer.style() {
                        RenderStyle::Shaded => RenderStyle::Wireframe,
                        RenderStyle::Wireframe => RenderStyle::Shaded,
                    };
                    self.renderer.set_style(style);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Manual rotation takes over from the turntable.
    fn nudge(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
        self.spinning = false;
    }

    fn render_frame(&mut self) -> io::Result<()> {
        if self.spinning {
            self.renderer
                .render_spin(self.started.elapsed().as_secs_f64(), SPIN_PERIOD);
        } else {
            self.renderer.render(
                self.scale,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            );
        }

        let mut stdout = stdout();
        self.display.draw(self.renderer.framebuffer(), &mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Spin3D | mesh {} | FPS: {:.1} | 1-3=Mesh Arrows/E/R=Rotate +/-=Scale Space=Spin W=Wireframe Q=Quit",
                self.renderer.selected_mesh() + 1,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
