use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::DIRECTION_JITTER;
use crate::settings::{AnimatedValue, MoveSettings, ParticleSettings, Rgb, ShapeKind};
use crate::simulation::animation::Oscillator;

/// A single simulated point.
///
/// `velocity` is a direction-scaled vector in configuration units; the engine
/// multiplies it by `move.speed` when integrating. `repulse` is an additional
/// velocity in px/s left behind by repulse interactions, decaying over time.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Creation sequence number, unique within a store
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub repulse: Vec2,

    /// Animated size before interaction overlays
    pub size: Oscillator,
    /// Animated opacity before interaction overlays
    pub alpha: Oscillator,
    pub base_radius: f32,
    pub base_opacity: f32,

    /// Mix [0, 1] toward the bubble size/opacity targets
    pub bubble: f32,

    /// Radius drawn this frame
    pub radius: f32,
    /// Opacity drawn this frame, within [0, 1]
    pub opacity: f32,

    pub color: Rgb,
    pub shape: ShapeKind,
}

impl Particle {
    /// Create a particle at `position` following the seeding rules in `settings`
    pub fn spawn<R: Rng + ?Sized>(
        settings: &ParticleSettings,
        id: u64,
        position: Vec2,
        rng: &mut R,
    ) -> Self {
        let base_radius = base_value(&settings.size, rng);
        let base_opacity = base_value(&settings.opacity, rng);
        let size = initial_oscillator(&settings.size, base_radius, rng);
        let alpha = initial_oscillator(&settings.opacity, base_opacity, rng);
        let shape = settings.shape.kinds[rng.gen_range(0..settings.shape.kinds.len())];

        Self {
            id,
            position,
            velocity: initial_velocity(&settings.movement, rng),
            repulse: Vec2::ZERO,
            radius: size.value,
            opacity: alpha.value.min(1.0),
            size,
            alpha,
            base_radius,
            base_opacity,
            bubble: 0.0,
            color: settings.color.pick(rng),
            shape,
        }
    }
}

/// Uniformly random point inside `[0, width] x [0, height]`
pub fn random_position<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Vec2 {
    Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height)
}

/// Direction vector for a new particle.
///
/// `none` picks a uniformly random angle. A fixed direction is used as-is
/// for straight movement and jittered per component otherwise. `random`
/// scales the magnitude by U[0, 1).
pub fn initial_velocity<R: Rng + ?Sized>(movement: &MoveSettings, rng: &mut R) -> Vec2 {
    let mut velocity = match movement.direction.unit_vector() {
        None => Vec2::from_angle(rng.gen_range(0.0..TAU)),
        Some(dir) if movement.straight => dir,
        Some(dir) => {
            dir + Vec2::new(
                rng.gen_range(-DIRECTION_JITTER..DIRECTION_JITTER),
                rng.gen_range(-DIRECTION_JITTER..DIRECTION_JITTER),
            )
        }
    };
    if movement.random {
        velocity *= rng.gen::<f32>();
    }
    velocity
}

fn base_value<R: Rng + ?Sized>(config: &AnimatedValue, rng: &mut R) -> f32 {
    if config.random {
        config.value * rng.gen::<f32>()
    } else {
        config.value
    }
}

fn initial_oscillator<R: Rng + ?Sized>(config: &AnimatedValue, base: f32, rng: &mut R) -> Oscillator {
    if config.anim.enable && !config.anim.sync {
        // Independent phase: random start within the bounds, random heading
        let (lo, hi) = Oscillator::bounds(config.anim.min, base);
        Oscillator {
            value: lo + (hi - lo) * rng.gen::<f32>(),
            rising: rng.gen(),
        }
    } else {
        Oscillator {
            value: base,
            rising: false,
        }
    }
}
