//! nes-engine binary.
//!
//! Runs a cartridge headless for a fixed number of frames, or (feature `display`) in a
//! winit window presented through pixels.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use nes_engine::{Bus, Cartridge};

/// NES emulator runner
#[derive(Parser, Debug)]
#[command(name = "nes-engine")]
#[command(about = "Run an iNES cartridge headless or in a window", long_about = None)]
struct CliArgs {
    /// Path to the iNES ROM file
    rom_path: PathBuf,

    /// Run without a window (always on when built without `display`)
    #[arg(long)]
    headless: bool,

    /// Number of frames to run headless
    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Save the last headless frame as PNG (feature `screenshot`)
    #[arg(long, value_name = "FILE")]
    screenshot: Option<PathBuf>,
}

fn make_bus(cli: &CliArgs) -> Bus {
    let rom_path = &cli.rom_path;
    match Cartridge::from_file(rom_path) {
        Ok(cart) => {
            log::info!("loaded {}", rom_path.display());
            let mut bus = Bus::new();
            bus.insert_cartridge(cart);
            bus
        }
        Err(e) => {
            eprintln!("Failed to load {}: {e}", rom_path.display());
            process::exit(1);
        }
    }
}

fn run_headless(cli: &CliArgs) {
    let mut bus = make_bus(cli);
    for _ in 0..cli.frames {
        bus.step_frame();
    }

    let cpu = bus.cpu();
    println!(
        "frames: {}  A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} PC:{:04X} P:{:08b}",
        bus.ppu().frame_count(),
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.sp,
        cpu.pc,
        cpu.status.bits()
    );

    if let Some(path) = cli.screenshot.as_ref() {
        save_screenshot(&bus, path);
    }
}

#[cfg(feature = "screenshot")]
fn save_screenshot(bus: &Bus, path: &std::path::Path) {
    match nes_engine::screenshot::save_png(bus.ppu(), path) {
        Ok(()) => eprintln!("Screenshot saved to {}", path.display()),
        Err(e) => {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(not(feature = "screenshot"))]
fn save_screenshot(_bus: &Bus, _path: &std::path::Path) {
    eprintln!("Built without the `screenshot` feature; skipping PNG export");
}

fn main() {
    env_logger::init();
    let cli = CliArgs::parse();

    if cli.headless || !cfg!(feature = "display") {
        run_headless(&cli);
        return;
    }

    #[cfg(feature = "display")]
    window::run(make_bus(&cli));
}

// ---------------------------------------------------------------------------
// Windowed mode (winit + pixels)
// ---------------------------------------------------------------------------

#[cfg(feature = "display")]
mod window {
    use std::process;
    use std::time::{Duration, Instant};

    use nes_engine::config::{NES_HEIGHT, NES_WIDTH};
    use nes_engine::{Bus, Button};
    use pixels::{Pixels, SurfaceTexture};
    use winit::application::ApplicationHandler;
    use winit::event::{ElementState, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Window, WindowAttributes, WindowId};

    const SCALE: u32 = 3;

    /// ~60 Hz NTSC.
    const FRAME_DURATION: Duration = Duration::from_micros(16_639);

    fn map_key(keycode: KeyCode) -> Option<Button> {
        Some(match keycode {
            KeyCode::KeyX => Button::A,
            KeyCode::KeyZ => Button::B,
            KeyCode::ShiftRight | KeyCode::Backspace => Button::SELECT,
            KeyCode::Enter => Button::START,
            KeyCode::ArrowUp => Button::UP,
            KeyCode::ArrowDown => Button::DOWN,
            KeyCode::ArrowLeft => Button::LEFT,
            KeyCode::ArrowRight => Button::RIGHT,
            _ => return None,
        })
    }

    struct App {
        bus: Bus,
        pad: Button,
        window: Option<&'static Window>,
        pixels: Option<Pixels<'static>>,
        last_frame_time: Instant,
    }

    impl App {
        fn handle_key(&mut self, keycode: KeyCode, pressed: bool) {
            if let Some(button) = map_key(keycode) {
                self.pad.set(button, pressed);
                self.bus.set_controller(0, self.pad);
            }
        }

        fn update_pixels(&mut self) {
            if let Some(pixels) = self.pixels.as_mut() {
                pixels.frame_mut().copy_from_slice(self.bus.frame_buffer());
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let (width, height) = (NES_WIDTH as u32, NES_HEIGHT as u32);
            let attrs = WindowAttributes::default()
                .with_title("nes-engine")
                .with_inner_size(winit::dpi::LogicalSize::new(width * SCALE, height * SCALE))
                .with_resizable(false);

            match event_loop.create_window(attrs) {
                Ok(window) => {
                    let window: &'static Window = Box::leak(Box::new(window));
                    let inner = window.inner_size();
                    let surface = SurfaceTexture::new(inner.width, inner.height, window);
                    match Pixels::new(width, height, surface) {
                        Ok(pixels) => self.pixels = Some(pixels),
                        Err(e) => {
                            eprintln!("Failed to create pixels: {e}");
                            event_loop.exit();
                            return;
                        }
                    }
                    self.window = Some(window);
                }
                Err(e) => {
                    eprintln!("Failed to create window: {e}");
                    event_loop.exit();
                }
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            _window_id: WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(keycode) = event.physical_key {
                        let pressed = event.state == ElementState::Pressed;
                        if keycode == KeyCode::Escape && pressed {
                            event_loop.exit();
                            return;
                        }
                        if keycode == KeyCode::KeyR && pressed {
                            self.bus.reset();
                            return;
                        }
                        self.handle_key(keycode, pressed);
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    if now.duration_since(self.last_frame_time) >= FRAME_DURATION {
                        self.bus.step_frame();
                        self.update_pixels();
                        self.last_frame_time = now;
                    }

                    if let Some(pixels) = self.pixels.as_ref() {
                        if let Err(e) = pixels.render() {
                            eprintln!("Render error: {e}");
                            event_loop.exit();
                        }
                    }
                }
                _ => {}
            }
        }

        fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(window) = self.window {
                window.request_redraw();
            }
        }
    }

    pub fn run(bus: Bus) {
        let event_loop = match EventLoop::new() {
            Ok(el) => el,
            Err(e) => {
                eprintln!("Failed to create event loop: {e}");
                process::exit(1);
            }
        };

        let mut app = App {
            bus,
            pad: Button::empty(),
            window: None,
            pixels: None,
            last_frame_time: Instant::now(),
        };
        if let Err(e) = event_loop.run_app(&mut app) {
            eprintln!("Event loop error: {e}");
            process::exit(1);
        }
    }
}
