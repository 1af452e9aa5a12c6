//! Drawing of one frame: background, links, then particle shapes.

mod batch;
pub mod shapes;

use glam::Vec2;

use crate::config::CLEAR_COLOR;
use crate::settings::{LinkSettings, Rgb, Settings, Stroke};
use crate::simulation::{Links, Particle};

pub use batch::{FrameBatch, Layer, LineInstance, ShapeInstance};
pub use shapes::Shape;

/// 2D drawing surface. Coordinates are device pixels, `alpha` is in [0, 1].
pub trait Canvas {
    fn clear(&mut self, color: [u8; 4]);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgb, alpha: f32);

    /// Fill `shape` with circumradius `radius`, outlined when `stroke.width > 0`
    fn shape(&mut self, shape: Shape, center: Vec2, radius: f32, color: Rgb, stroke: Stroke, alpha: f32);

    /// Draw the loaded sprite scaled to `size`, centered on `center`
    fn image(&mut self, center: Vec2, size: Vec2, alpha: f32);
}

/// Draws particles and links with the styling from the settings
pub struct Renderer {
    pixel_ratio: f32,
    links: LinkSettings,
    stroke: Stroke,
    polygon_sides: u32,
    /// Width over height of image shapes
    image_aspect: f32,
    sprite_loaded: bool,
}

impl Renderer {
    pub fn new(settings: &Settings, pixel_ratio: f32) -> Self {
        let shape = &settings.particles.shape;
        let image_aspect = if shape.image.width > 0.0 && shape.image.height > 0.0 {
            shape.image.width / shape.image.height
        } else {
            1.0
        };
        let mut renderer = Self {
            pixel_ratio: 1.0,
            links: settings.particles.links,
            stroke: shape.stroke,
            polygon_sides: shape.polygon_sides,
            image_aspect,
            sprite_loaded: false,
        };
        renderer.set_pixel_ratio(pixel_ratio);
        renderer
    }

    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
    }

    /// Image particles are drawn as circles until the sprite is bound
    pub fn mark_sprite_loaded(&mut self) {
        self.sprite_loaded = true;
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, particles: &[Particle], links: &Links) {
        canvas.clear(CLEAR_COLOR);

        let ratio = self.pixel_ratio;
        let width = self.links.width * ratio;
        for link in &links.pairs {
            let (Some(a), Some(b)) = (particles.get(link.a), particles.get(link.b)) else {
                continue;
            };
            canvas.line(a.position * ratio, b.position * ratio, width, self.links.color, link.opacity);
        }
        for link in &links.cursor {
            let Some(p) = particles.get(link.particle) else {
                continue;
            };
            canvas.line(p.position * ratio, link.cursor * ratio, width, self.links.color, link.opacity);
        }

        for particle in particles {
            self.draw_particle(canvas, particle);
        }
    }

    fn draw_particle<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) {
        if !(particle.radius > 0.0) || !(particle.opacity > 0.0) || !particle.position.is_finite() {
            return;
        }
        let center = particle.position * self.pixel_ratio;
        let radius = particle.radius * self.pixel_ratio;
        let stroke = Stroke {
            width: self.stroke.width.max(0.0) * self.pixel_ratio,
            color: self.stroke.color,
        };

        match Shape::for_kind(particle.shape, self.polygon_sides) {
            Some(shape) => canvas.shape(shape, center, radius, particle.color, stroke, particle.opacity),
            None if self.sprite_loaded => {
                let size = Vec2::new(radius * 2.0, radius * 2.0 / self.image_aspect);
                canvas.image(center, size, particle.opacity);
            }
            None => canvas.shape(Shape::Circle, center, radius, particle.color, stroke, particle.opacity),
        }
    }
}
