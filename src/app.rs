use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::assets::AssetLoader;
use crate::config::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MAX_FRAME_DT};
use crate::error::{AppError, SurfaceUnavailableError};
use crate::gpu::{GpuContext, ParticlePipeline};
use crate::interaction::InputEvent;
use crate::layout::{container_rect, ContainerRect};
use crate::render::{FrameBatch, Renderer};
use crate::settings::{Settings, ShapeKind};
use crate::simulation::Engine;

const TITLE: &str = "Particle Field";

/// Application state
pub struct App {
    settings: Settings,
    /// Directory image sources are resolved against
    config_dir: Option<PathBuf>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    pipeline: Option<ParticlePipeline>,
    engine: Option<Engine>,
    renderer: Option<Renderer>,
    /// Instances for the frame being drawn, sized in device pixels
    batch: FrameBatch,
    assets: Option<AssetLoader>,
    /// Container in logical pixels
    container: ContainerRect,
    scale_factor: f64,
    /// Last pointer position relative to the container
    cursor: Option<Vec2>,
    last_frame: Option<Instant>,
    fps_counter: FpsCounter,
    error: Option<AppError>,
}

impl App {
    pub fn new(settings: Settings, config_dir: Option<PathBuf>) -> Self {
        Self {
            settings,
            config_dir,
            window: None,
            gpu: None,
            pipeline: None,
            engine: None,
            renderer: None,
            batch: FrameBatch::new(1, 1),
            assets: None,
            container: container_rect(DEFAULT_WINDOW_WIDTH as f32, DEFAULT_WINDOW_HEIGHT as f32),
            scale_factor: 1.0,
            cursor: None,
            last_frame: None,
            fps_counter: FpsCounter::new(),
            error: None,
        }
    }

    /// Fatal error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    fn pixel_ratio(&self) -> f32 {
        if self.settings.retina_detect {
            self.scale_factor as f32
        } else {
            1.0
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SurfaceUnavailableError> {
        log::info!("Initializing particle field...");

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                DEFAULT_WINDOW_WIDTH,
                DEFAULT_WINDOW_HEIGHT,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.scale_factor = window.scale_factor();

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let pipeline = ParticlePipeline::new(&gpu.device, &gpu.queue, gpu.format());

        self.container = self.layout_for(window.inner_size());
        log::info!(
            "Container: {:.0}x{:.0} at x={:.0} (scale factor {})",
            self.container.width,
            self.container.height,
            self.container.x,
            self.scale_factor
        );

        let engine = Engine::new(self.settings.clone(), self.container.width, self.container.height);
        let renderer = Renderer::new(&self.settings, self.pixel_ratio());

        let shape = &self.settings.particles.shape;
        if shape.kinds.contains(&ShapeKind::Image) {
            self.assets = Some(AssetLoader::spawn(&shape.image.src, self.config_dir.as_deref()));
        }

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.pipeline = Some(pipeline);
        self.engine = Some(engine);
        self.renderer = Some(renderer);
        self.resize_batch();

        log::info!("Initialization complete!");
        Ok(())
    }

    fn layout_for(&self, size: winit::dpi::PhysicalSize<u32>) -> ContainerRect {
        let logical = size.to_logical::<f32>(self.scale_factor);
        container_rect(logical.width, logical.height)
    }

    fn resize_batch(&mut self) {
        let ratio = self.pixel_ratio();
        let width = (self.container.width * ratio).round().max(1.0) as u32;
        let height = (self.container.height * ratio).round().max(1.0) as u32;
        self.batch.resize(width, height);
    }

    /// Recompute the container after a window size or scale change
    fn relayout(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.container = self.layout_for(size);
        let ratio = self.pixel_ratio();
        if let Some(renderer) = &mut self.renderer {
            renderer.set_pixel_ratio(ratio);
        }
        if let Some(engine) = &mut self.engine {
            engine.queue(InputEvent::Resized {
                width: self.container.width,
                height: self.container.height,
            });
        }
        self.resize_batch();
    }

    /// Cursor position relative to the container, in logical pixels
    fn to_surface(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f32>(self.scale_factor);
        Vec2::new(logical.x - self.container.x, logical.y - self.container.y)
    }

    fn poll_assets(&mut self) {
        let Some(loader) = &mut self.assets else {
            return;
        };
        let Some(result) = loader.poll() else {
            return;
        };
        match result {
            Ok(sprite) => {
                log::info!(
                    "Loaded image shape {} ({}x{})",
                    loader.src(),
                    sprite.width(),
                    sprite.height()
                );
                if let (Some(gpu), Some(pipeline)) = (&self.gpu, &mut self.pipeline) {
                    if pipeline.set_sprite(&gpu.device, &gpu.queue, &sprite) {
                        if let Some(renderer) = &mut self.renderer {
                            renderer.mark_sprite_loaded();
                        }
                    }
                }
            }
            Err(e) => {
                log::warn!("{}; image particles are drawn as circles", e);
            }
        }
        self.assets = None;
    }

    fn render(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0)
            .min(MAX_FRAME_DT);
        self.last_frame = Some(now);

        self.poll_assets();

        let (Some(gpu), Some(pipeline), Some(engine), Some(renderer)) = (
            self.gpu.as_ref(),
            self.pipeline.as_mut(),
            self.engine.as_mut(),
            self.renderer.as_ref(),
        ) else {
            return;
        };

        engine.step(dt);
        renderer.render(&mut self.batch, engine.particles(), engine.links());
        log::trace!(
            "Frame: {} particles, {} links",
            engine.particles().len(),
            engine.links().pairs.len()
        );

        pipeline.upload(&gpu.device, &gpu.queue, &self.batch);

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        let viewport = clamp_viewport(
            self.container.scaled(self.scale_factor as f32),
            gpu.config.width as f32,
            gpu.config.height as f32,
        );
        pipeline.draw(&mut encoder, &view, viewport, &self.batch);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "{} - {:.0} FPS - {} particles",
                    TITLE,
                    fps,
                    engine.particles().len()
                ));
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.assets = None;
        self.pipeline = None;
        self.gpu = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            log::error!("{}", e);
            self.error = Some(e.into());
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.shutdown(event_loop);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    log::info!("Escape pressed, exiting...");
                    self.shutdown(event_loop);
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
                self.relayout(new_size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed to {}", scale_factor);
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.relayout(size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = self.to_surface(position);
                self.cursor = Some(position);
                if let Some(engine) = &mut self.engine {
                    engine.queue(InputEvent::PointerMoved(position));
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                if let Some(engine) = &mut self.engine {
                    engine.queue(InputEvent::PointerLeft);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let (Some(position), Some(engine)) = (self.cursor, &mut self.engine) {
                    engine.queue(InputEvent::Click(position));
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame while the surface is alive
                if let (Some(window), Some(_)) = (&self.window, &self.gpu) {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Keep the viewport inside the render target
fn clamp_viewport(rect: ContainerRect, target_width: f32, target_height: f32) -> ContainerRect {
    let x = rect.x.clamp(0.0, target_width);
    let y = rect.y.clamp(0.0, target_height);
    ContainerRect {
        x,
        y,
        width: rect.width.min(target_width - x).max(0.0),
        height: rect.height.min(target_height - y).max(0.0),
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_clamped_to_target() {
        let rect = ContainerRect {
            x: 100.0,
            y: 0.0,
            width: 1000.0,
            height: 900.0,
        };
        let clamped = clamp_viewport(rect, 1000.0, 800.0);
        assert_eq!(clamped.width, 900.0);
        assert_eq!(clamped.height, 800.0);
    }

    #[test]
    fn test_fps_counter_waits_a_second() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.tick(), None);
    }

    #[test]
    fn test_pixel_ratio_follows_retina_flag() {
        let mut settings = Settings::demo().unwrap();
        settings.retina_detect = false;
        let mut app = App::new(settings, None);
        app.scale_factor = 2.0;
        assert_eq!(app.pixel_ratio(), 1.0);

        app.settings.retina_detect = true;
        assert_eq!(app.pixel_ratio(), 2.0);
        app.container = container_rect(1000.0, 500.0);
        app.resize_batch();
        assert_eq!((app.batch.width(), app.batch.height()), (1900, 1000));
    }

    #[test]
    fn test_cursor_maps_into_container() {
        let mut app = App::new(Settings::demo().unwrap(), None);
        app.scale_factor = 2.0;
        app.container = container_rect(1000.0, 500.0);
        let position = app.to_surface(PhysicalPosition::new(100.0, 40.0));
        assert!((position.x - 25.0).abs() < 1e-3);
        assert!((position.y - 20.0).abs() < 1e-3);
    }
}
