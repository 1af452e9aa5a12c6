//! Per-frame effects of the interaction modes on particle state.
//!
//! Grab only produces cursor links (see `simulation::links::cursor_links`).
//! Push and remove are store operations driven by the engine.

use glam::Vec2;

use crate::config::REPULSE_STRENGTH;
use crate::settings::{BubbleMode, RepulseMode};
use crate::simulation::Particle;

/// `1 - d / radius`, zero at and beyond the radius
pub fn linear_falloff(distance: f32, radius: f32) -> f32 {
    if !(radius > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

/// `1 - (d / radius)²`, zero at and beyond the radius
pub fn quadratic_falloff(distance: f32, radius: f32) -> f32 {
    if !(radius > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    let n = distance / radius;
    (1.0 - n * n).clamp(0.0, 1.0)
}

/// Ramp each particle's bubble mix toward its target over `duration` seconds.
///
/// With a cursor, the target is the linear falloff of the particle's distance;
/// particles out of range (or every particle without a cursor) relax to zero.
pub fn ramp_bubble(particles: &mut [Particle], cursor: Option<Vec2>, bubble: &BubbleMode, dt: f32) {
    let step = if bubble.duration > 0.0 {
        dt / bubble.duration
    } else {
        f32::INFINITY
    };

    for particle in particles.iter_mut() {
        let target = cursor
            .map(|c| linear_falloff(particle.position.distance(c), bubble.distance))
            .unwrap_or(0.0);
        particle.bubble = approach(particle.bubble, target, step);
    }
}

/// Instantly inflate particles around a click; they relax through [`ramp_bubble`]
pub fn burst_bubble(particles: &mut [Particle], at: Vec2, bubble: &BubbleMode) {
    for particle in particles.iter_mut() {
        let strength = linear_falloff(particle.position.distance(at), bubble.distance);
        particle.bubble = particle.bubble.max(strength);
    }
}

/// Give particles near `at` a velocity impulse pointing away from it.
///
/// The impulse replaces a weaker one already in flight; it decays in the
/// engine over the repulse duration.
pub fn repulse(particles: &mut [Particle], at: Vec2, mode: &RepulseMode) {
    for particle in particles.iter_mut() {
        let offset = particle.position - at;
        let strength = quadratic_falloff(offset.length(), mode.distance);
        if strength <= 0.0 {
            continue;
        }
        let impulse = offset.normalize_or_zero() * REPULSE_STRENGTH * strength;
        if impulse.length_squared() > particle.repulse.length_squared() {
            particle.repulse = impulse;
        }
    }
}

/// Fraction of a repulse impulse left after `dt` seconds of a `duration`-long decay
pub fn repulse_decay(dt: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        (1.0 - dt / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Drawn radius and opacity after the bubble overlay
pub fn bubble_overlay(particle: &Particle, bubble: &BubbleMode) -> (f32, f32) {
    let mix = particle.bubble.clamp(0.0, 1.0);
    let radius = particle.size.value + (bubble.size - particle.size.value) * mix;
    let opacity = particle.alpha.value + (bubble.opacity - particle.alpha.value) * mix;
    (radius.max(0.0), opacity.clamp(0.0, 1.0))
}

fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    if (target - current).abs() <= max_step {
        target
    } else if target > current {
        current + max_step
    } else {
        current - max_step
    }
}
