//! Per-frame instance lists for the GPU pipelines.
//!
//! [`FrameBatch`] is the production [`Canvas`]: every draw call becomes one
//! instance (one quad on the GPU). Draw order is kept as a list of runs so
//! the pipelines can replay shapes and lines interleaved as recorded.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::render::shapes::{Shape, KIND_IMAGE, KIND_SQUARE};
use crate::render::Canvas;
use crate::settings::{Rgb, Stroke};

/// One shape quad. Colors are sRGB-encoded RGB with straight alpha.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub center: [f32; 2],
    /// Circumradius for outlines, half extents for rectangles and images
    pub half_size: [f32; 2],
    pub fill: [f32; 4],
    pub stroke: [f32; 4],
    pub stroke_width: f32,
    pub kind: u32,
    pub sides: u32,
    /// Notch radius over tip radius (polygons and stars)
    pub inner: f32,
}

/// One line quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Shapes,
    Lines,
}

/// Consecutive instances of one layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawRun {
    pub layer: Layer,
    pub instances: Range<u32>,
}

/// Instances recorded for one frame at a fixed pixel size
#[derive(Clone, Debug, Default)]
pub struct FrameBatch {
    width: u32,
    height: u32,
    shapes: Vec<ShapeInstance>,
    lines: Vec<LineInstance>,
    runs: Vec<DrawRun>,
}

impl FrameBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            ..Self::default()
        }
    }

    /// Change the target size; recorded instances are dropped
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.reset();
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn shapes(&self) -> &[ShapeInstance] {
        &self.shapes
    }

    pub fn lines(&self) -> &[LineInstance] {
        &self.lines
    }

    pub fn runs(&self) -> &[DrawRun] {
        &self.runs
    }

    fn reset(&mut self) {
        self.shapes.clear();
        self.lines.clear();
        self.runs.clear();
    }

    fn push_shape(&mut self, instance: ShapeInstance) {
        let index = self.shapes.len() as u32;
        self.shapes.push(instance);
        self.extend_run(Layer::Shapes, index);
    }

    fn extend_run(&mut self, layer: Layer, index: u32) {
        match self.runs.last_mut() {
            Some(run) if run.layer == layer && run.instances.end == index => run.instances.end += 1,
            _ => self.runs.push(DrawRun {
                layer,
                instances: index..index + 1,
            }),
        }
    }
}

fn rgba(color: Rgb, alpha: f32) -> [f32; 4] {
    [
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}

impl Canvas for FrameBatch {
    /// Start a new frame with an opaque backdrop covering the whole target
    fn clear(&mut self, color: [u8; 4]) {
        self.reset();
        let half = [self.width as f32 / 2.0, self.height as f32 / 2.0];
        let fill = [
            color[0] as f32 / 255.0,
            color[1] as f32 / 255.0,
            color[2] as f32 / 255.0,
            color[3] as f32 / 255.0,
        ];
        self.push_shape(ShapeInstance {
            center: half,
            half_size: half,
            fill,
            stroke: [0.0; 4],
            stroke_width: 0.0,
            kind: KIND_SQUARE,
            sides: 4,
            inner: 1.0,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgb, alpha: f32) {
        if !(width > 0.0) || !(alpha > 0.0) || !from.is_finite() || !to.is_finite() {
            return;
        }
        let index = self.lines.len() as u32;
        self.lines.push(LineInstance {
            from: from.to_array(),
            to: to.to_array(),
            color: rgba(color, alpha),
            width,
        });
        self.extend_run(Layer::Lines, index);
    }

    fn shape(&mut self, shape: Shape, center: Vec2, radius: f32, color: Rgb, stroke: Stroke, alpha: f32) {
        let (kind, sides, inner) = shape.encode();
        self.push_shape(ShapeInstance {
            center: center.to_array(),
            half_size: [radius, radius],
            fill: rgba(color, alpha),
            stroke: rgba(stroke.color, alpha),
            stroke_width: stroke.width.max(0.0),
            kind,
            sides,
            inner,
        });
    }

    fn image(&mut self, center: Vec2, size: Vec2, alpha: f32) {
        self.push_shape(ShapeInstance {
            center: center.to_array(),
            half_size: (size / 2.0).to_array(),
            fill: [1.0, 1.0, 1.0, alpha.clamp(0.0, 1.0)],
            stroke: [0.0; 4],
            stroke_width: 0.0,
            kind: KIND_IMAGE,
            sides: 4,
            inner: 1.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::{KIND_CIRCLE, KIND_POLYGON};

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn no_stroke() -> Stroke {
        Stroke {
            width: 0.0,
            color: Rgb::new(0, 0, 0),
        }
    }

    #[test]
    fn test_instance_layouts_match_vertex_strides() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 64);
        assert_eq!(std::mem::size_of::<LineInstance>(), 36);
    }

    #[test]
    fn test_clear_emits_full_size_backdrop() {
        let mut batch = FrameBatch::new(200, 100);
        batch.line(Vec2::ZERO, Vec2::ONE, 1.0, RED, 1.0);
        batch.clear([13, 13, 20, 255]);

        assert!(batch.lines().is_empty());
        assert_eq!(batch.shapes().len(), 1);
        let backdrop = batch.shapes()[0];
        assert_eq!(backdrop.center, [100.0, 50.0]);
        assert_eq!(backdrop.half_size, [100.0, 50.0]);
        assert_eq!(backdrop.kind, KIND_SQUARE);
        assert_eq!(backdrop.fill[3], 1.0);
    }

    #[test]
    fn test_runs_keep_draw_order() {
        let mut batch = FrameBatch::new(64, 64);
        batch.clear([0, 0, 0, 255]);
        batch.line(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, RED, 0.5);
        batch.line(Vec2::ZERO, Vec2::new(0.0, 10.0), 1.0, RED, 0.5);
        batch.shape(Shape::Circle, Vec2::splat(5.0), 2.0, RED, no_stroke(), 1.0);
        batch.shape(Shape::Star { points: 5 }, Vec2::splat(9.0), 3.0, RED, no_stroke(), 1.0);

        assert_eq!(
            batch.runs(),
            &[
                DrawRun {
                    layer: Layer::Shapes,
                    instances: 0..1,
                },
                DrawRun {
                    layer: Layer::Lines,
                    instances: 0..2,
                },
                DrawRun {
                    layer: Layer::Shapes,
                    instances: 1..3,
                },
            ]
        );
        assert_eq!(batch.shapes()[1].kind, KIND_CIRCLE);
        assert_eq!(batch.shapes()[2].kind, KIND_POLYGON);
        assert_eq!(batch.shapes()[2].sides, 5);
    }

    #[test]
    fn test_shape_carries_color_stroke_and_opacity() {
        let mut batch = FrameBatch::new(64, 64);
        let stroke = Stroke {
            width: 1.5,
            color: Rgb::new(0, 0, 255),
        };
        batch.shape(Shape::Square, Vec2::new(3.0, 4.0), 6.0, RED, stroke, 0.4);

        let instance = batch.shapes()[0];
        assert_eq!(instance.center, [3.0, 4.0]);
        assert_eq!(instance.half_size, [6.0, 6.0]);
        assert_eq!(instance.fill, [1.0, 0.0, 0.0, 0.4]);
        assert_eq!(instance.stroke, [0.0, 0.0, 1.0, 0.4]);
        assert_eq!(instance.stroke_width, 1.5);
    }

    #[test]
    fn test_invisible_or_broken_lines_are_dropped() {
        let mut batch = FrameBatch::new(64, 64);
        batch.line(Vec2::ZERO, Vec2::ONE, 0.0, RED, 1.0);
        batch.line(Vec2::ZERO, Vec2::ONE, 1.0, RED, 0.0);
        batch.line(Vec2::NAN, Vec2::ONE, 1.0, RED, 1.0);
        assert!(batch.lines().is_empty());
        assert!(batch.runs().is_empty());
    }

    #[test]
    fn test_image_uses_half_extents() {
        let mut batch = FrameBatch::new(64, 64);
        batch.image(Vec2::new(10.0, 10.0), Vec2::new(8.0, 4.0), 0.5);
        let instance = batch.shapes()[0];
        assert_eq!(instance.kind, KIND_IMAGE);
        assert_eq!(instance.half_size, [4.0, 2.0]);
        assert_eq!(instance.fill[3], 0.5);
    }

    #[test]
    fn test_resize_drops_recorded_frame() {
        let mut batch = FrameBatch::new(10, 10);
        batch.clear([0, 0, 0, 255]);
        batch.resize(0, 30);
        assert_eq!((batch.width(), batch.height()), (1, 30));
        assert!(batch.shapes().is_empty());
    }
}
