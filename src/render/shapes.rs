//! Outline descriptions for the particle shapes.
//!
//! Shapes are not tessellated; the shape pipeline evaluates coverage per
//! fragment from the kind, the side count and the inner radius ratio.

use std::f32::consts::PI;

use crate::settings::ShapeKind;

/// Inner radius divisor for star shapes
pub const STAR_INSET: f32 = 2.0;

// Kind ids understood by `shaders/particles.wgsl`
pub const KIND_CIRCLE: u32 = 0;
pub const KIND_SQUARE: u32 = 1;
pub const KIND_POLYGON: u32 = 2;
pub const KIND_IMAGE: u32 = 3;

/// Vector outline of a particle, sized by its circumradius
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle,
    /// Axis-aligned square with half-side equal to the radius
    Square,
    /// Regular polygon, first vertex at the top
    Polygon { sides: u32 },
    /// Star with tips on the radius and notches at `radius / STAR_INSET`
    Star { points: u32 },
}

impl Shape {
    /// Outline for a configured kind; `None` for images
    pub fn for_kind(kind: ShapeKind, polygon_sides: u32) -> Option<Self> {
        let shape = match kind {
            ShapeKind::Circle => Shape::Circle,
            ShapeKind::Edge => Shape::Square,
            ShapeKind::Triangle => Shape::Polygon { sides: 3 },
            ShapeKind::Polygon => Shape::Polygon {
                sides: polygon_sides.max(3),
            },
            ShapeKind::Star => Shape::Star {
                points: polygon_sides.max(3),
            },
            ShapeKind::Image => return None,
        };
        Some(shape)
    }

    /// `(kind id, vertex count, inner radius / outer radius)` for the shader.
    ///
    /// Polygons and stars share one evaluator: a polygon is a star whose
    /// notches sit on the edge midpoints, at the apothem.
    pub fn encode(self) -> (u32, u32, f32) {
        match self {
            Shape::Circle => (KIND_CIRCLE, 0, 1.0),
            Shape::Square => (KIND_SQUARE, 4, 1.0),
            Shape::Polygon { sides } => {
                let sides = sides.max(3);
                (KIND_POLYGON, sides, (PI / sides as f32).cos())
            }
            Shape::Star { points } => (KIND_POLYGON, points.max(3), 1.0 / STAR_INSET),
        }
    }
}
