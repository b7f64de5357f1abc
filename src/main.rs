use clap::Parser;
use env_logger::Env;

use raydir::render::ChannelOrder;
use raydir::scheduler::{SchedulerConfig, SystemClock};
use raydir::window::{Window, WindowEvent};
use raydir::{Engine, RenderError};

const DEFAULT_TITLE: &str = "CPU ray tracer 00 - Color buffer, rays";

/// raydir - visualize per-pixel camera ray directions
#[derive(Parser, Debug)]
#[command(
    name = "raydir",
    version,
    about = "Progressively renders camera ray directions as colors",
    after_help = "CONTROLS:\n  \
                  W/S A/D R/F   pan forward/back, left/right, up/down\n  \
                  Ctrl / Shift  half / double pan step\n  \
                  Right drag    orbit around the reference point\n  \
                  Wheel         dolly in/out\n  \
                  Esc           quit"
)]
struct Cli {
    /// Window title prefix
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Initial client width in pixels
    #[arg(short = 'W', long, default_value_t = 800)]
    width: u32,

    /// Initial client height in pixels
    #[arg(short = 'H', long, default_value_t = 600)]
    height: u32,
}

fn main() -> Result<(), RenderError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut window = Window::new(&cli.title, cli.width, cli.height)?;
    let mut engine = Engine::new(SchedulerConfig::default(), ChannelOrder::Bgr);
    let clock = SystemClock::default();

    let (width, height) = window.size();
    engine.on_resize(width as i32, height as i32)?;
    log::info!("viewer started at {width}x{height}");

    'running: loop {
        let mut expose = false;

        for event in window.poll_events(engine.is_frame_complete()) {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => engine.on_resize(w, h)?,
                WindowEvent::Expose => expose = true,
                WindowEvent::Pan(direction, modifiers) => {
                    engine.on_pan(direction, modifiers);
                }
                WindowEvent::Orbit(dx, dy) => {
                    engine.on_orbit(dx, dy);
                }
                WindowEvent::Dolly(direction) => {
                    engine.on_dolly(direction);
                }
            }
        }

        if !engine.is_frame_complete() {
            engine.advance_frame(&clock);
            window.present(&engine.pixel_buffer())?;
            window.set_title(&engine.status_text(&cli.title))?;
        } else if expose {
            window.present(&engine.pixel_buffer())?;
        }
    }

    Ok(())
}
