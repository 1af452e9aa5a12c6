mod app;
mod assets;
mod config;
mod error;
mod gpu;
mod interaction;
mod layout;
mod render;
mod settings;
mod simulation;

use std::path::{Path, PathBuf};

use env_logger::Env;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::error::AppError;
use crate::settings::Settings;

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = match &config_path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Settings::load(path)
        }
        None => {
            log::info!("Using the built-in demo configuration");
            Settings::demo()
        }
    }
    .map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    log::info!(
        "Particles: {} (density {}), links {}",
        settings.particles.count,
        if settings.particles.density.enable { "on" } else { "off" },
        if settings.particles.links.enable { "on" } else { "off" }
    );

    let config_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings, config_dir);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
