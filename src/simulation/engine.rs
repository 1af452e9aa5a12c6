use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ATTRACT_GAIN, ATTRACT_MIN_NORMALIZED_DISTANCE, SPEED_SCALE, WANDER_RATE};
use crate::interaction::{modes, FrameInput, InputEvent, InteractionLayer, InteractionState};
use crate::settings::{Attract, ClickMode, HoverMode, OutMode, Settings};
use crate::simulation::animation::Oscillator;
use crate::simulation::links::{compute_links, cursor_links, Links};
use crate::simulation::particle::Particle;
use crate::simulation::store::ParticleStore;

/// Owns all simulation state: settings, particles, pending input and the RNG
pub struct Engine {
    settings: Settings,
    store: ParticleStore,
    interaction: InteractionLayer,
    links: Links,
    /// Shared phases for `sync` animations, normalized to [0, 1]
    size_phase: Oscillator,
    opacity_phase: Oscillator,
    surface: Vec2,
    elapsed: f32,
    rng: StdRng,
}

impl Engine {
    pub fn new(settings: Settings, width: f32, height: f32) -> Self {
        Self::with_rng(settings, width, height, StdRng::from_entropy())
    }

    /// Deterministic engine for a fixed seed
    #[cfg(test)]
    pub fn with_seed(settings: Settings, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(settings, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, width: f32, height: f32, mut rng: StdRng) -> Self {
        let surface = Vec2::new(width.max(0.0), height.max(0.0));
        let store = ParticleStore::initialize(&settings.particles, surface.x, surface.y, &mut rng);
        log::info!(
            "Seeded {} particles for a {}x{} surface",
            store.len(),
            surface.x,
            surface.y
        );

        let mut engine = Self {
            settings,
            store,
            interaction: InteractionLayer::new(),
            links: Links::default(),
            size_phase: Oscillator::shared(),
            opacity_phase: Oscillator::shared(),
            surface,
            elapsed: 0.0,
            rng,
        };
        engine.refresh_drawn_values();
        engine.rebuild_links(None);
        engine
    }

    /// Queue input for the next tick
    pub fn queue(&mut self, event: InputEvent) {
        self.interaction.push(event);
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        let frame = self
            .interaction
            .drain(self.elapsed, &self.settings.interactivity, self.surface);
        self.apply_surface_changes(&frame);
        self.apply_clicks(&frame.state);

        let hover = frame.state.hover_position();
        self.apply_hover(hover, dt);

        if dt > 0.0 {
            self.attract(hover, dt);
            self.integrate(dt);
            self.handle_boundaries();
            self.bounce_particles();
        }

        self.animate(dt);
        self.refresh_drawn_values();
        self.rebuild_links(hover);
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    #[cfg(test)]
    pub fn surface_size(&self) -> Vec2 {
        self.surface
    }

    fn apply_surface_changes(&mut self, frame: &FrameInput) {
        if let Some(size) = frame.resized {
            self.surface = size;
        }
        if frame.reseed && self.settings.particles.density.enable {
            self.store
                .reseed(&self.settings.particles, self.surface.x, self.surface.y, &mut self.rng);
            log::info!(
                "Re-seeded {} particles for a {}x{} surface",
                self.store.len(),
                self.surface.x,
                self.surface.y
            );
        }
    }

    fn apply_clicks(&mut self, state: &InteractionState) {
        let binding = &self.settings.interactivity.on_click;
        if !binding.enable {
            return;
        }
        let mode_settings = self.settings.interactivity.modes;

        for &at in &state.clicks {
            for mode in &binding.modes {
                match mode {
                    ClickMode::Push => {
                        self.store.add_at(
                            mode_settings.push_count as usize,
                            at,
                            &self.settings.particles,
                            &mut self.rng,
                        );
                    }
                    ClickMode::Remove => {
                        self.store.remove(mode_settings.remove_count as usize);
                    }
                    ClickMode::Bubble => {
                        modes::burst_bubble(self.store.particles_mut(), at, &mode_settings.bubble);
                    }
                    ClickMode::Repulse => {
                        modes::repulse(self.store.particles_mut(), at, &mode_settings.repulse);
                    }
                }
            }
            log::debug!("Click at ({:.0}, {:.0}), {} particles", at.x, at.y, self.store.len());
        }
    }

    fn apply_hover(&mut self, hover: Option<Vec2>, dt: f32) {
        let binding = &self.settings.interactivity.on_hover;
        let mode_settings = self.settings.interactivity.modes;

        let bubble_cursor = hover.filter(|_| binding.is_active(HoverMode::Bubble));
        modes::ramp_bubble(self.store.particles_mut(), bubble_cursor, &mode_settings.bubble, dt);

        if let Some(cursor) = hover.filter(|_| binding.is_active(HoverMode::Repulse)) {
            modes::repulse(self.store.particles_mut(), cursor, &mode_settings.repulse);
        }
    }

    /// Bias velocities toward a grab/bubble cursor
    fn attract(&mut self, hover: Option<Vec2>, dt: f32) {
        let attract = self.settings.particles.movement.attract;
        if !attract.enable {
            return;
        }
        let Some(cursor) = hover else {
            return;
        };

        let binding = &self.settings.interactivity.on_hover;
        let mode_settings = &self.settings.interactivity.modes;
        let radius = if binding.is_active(HoverMode::Grab) {
            mode_settings.grab.distance
        } else if binding.is_active(HoverMode::Bubble) {
            mode_settings.bubble.distance
        } else {
            return;
        };

        for particle in self.store.particles_mut() {
            particle.velocity += attraction(particle.position, cursor, radius, &attract) * dt;
        }
    }

    fn integrate(&mut self, dt: f32) {
        let movement = self.settings.particles.movement;
        let decay = modes::repulse_decay(dt, self.settings.interactivity.modes.repulse.duration);

        for particle in self.store.particles_mut() {
            if movement.enable {
                if movement.random && !movement.straight {
                    let angle = self.rng.gen_range(-1.0f32..=1.0) * WANDER_RATE * dt;
                    particle.velocity = Vec2::from_angle(angle).rotate(particle.velocity);
                }

                let displacement = (particle.velocity * movement.speed * SPEED_SCALE + particle.repulse) * dt;
                if displacement.is_finite() {
                    particle.position += displacement;
                } else {
                    particle.velocity = Vec2::ZERO;
                }
            }
            particle.repulse *= decay;
        }
    }

    fn handle_boundaries(&mut self) {
        let Vec2 { x: width, y: height } = self.surface;

        match self.settings.particles.movement.out_mode {
            OutMode::Bounce => {
                for particle in self.store.particles_mut() {
                    let p = &mut particle.position;
                    if p.x < 0.0 {
                        p.x = 0.0;
                        particle.velocity.x = particle.velocity.x.abs();
                        particle.repulse.x = particle.repulse.x.abs();
                    } else if p.x > width {
                        p.x = width;
                        particle.velocity.x = -particle.velocity.x.abs();
                        particle.repulse.x = -particle.repulse.x.abs();
                    }
                    if p.y < 0.0 {
                        p.y = 0.0;
                        particle.velocity.y = particle.velocity.y.abs();
                        particle.repulse.y = particle.repulse.y.abs();
                    } else if p.y > height {
                        p.y = height;
                        particle.velocity.y = -particle.velocity.y.abs();
                        particle.repulse.y = -particle.repulse.y.abs();
                    }
                }
            }
            OutMode::Out => {
                for index in 0..self.store.len() {
                    let position = self.store.particles()[index].position;
                    let Some(entry) = reentry_point(position, self.surface, &mut self.rng) else {
                        continue;
                    };
                    self.store
                        .respawn(index, entry, &self.settings.particles, &mut self.rng);
                }
            }
        }
    }

    /// Reverse both velocities of overlapping pairs that are still closing in.
    /// Pairs already moving apart keep their velocities so they can separate.
    fn bounce_particles(&mut self) {
        if !self.settings.particles.movement.bounce {
            return;
        }
        let particles = self.store.particles_mut();
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                let offset = particles[j].position - particles[i].position;
                let closing = (particles[j].velocity - particles[i].velocity).dot(offset) < 0.0;
                if closing && offset.length() <= particles[i].radius + particles[j].radius {
                    particles[i].velocity = -particles[i].velocity;
                    particles[j].velocity = -particles[j].velocity;
                }
            }
        }
    }

    fn animate(&mut self, dt: f32) {
        let size = self.settings.particles.size;
        let opacity = self.settings.particles.opacity;

        if size.anim.enable && size.anim.sync {
            let span = (size.value - size.anim.min).abs();
            let rate = if span > 0.0 { size.anim.speed / span } else { 0.0 };
            self.size_phase.advance(0.0, 1.0, rate, dt);
        }
        if opacity.anim.enable && opacity.anim.sync {
            let span = (opacity.value - opacity.anim.min).abs();
            let rate = if span > 0.0 { opacity.anim.speed / span } else { 0.0 };
            self.opacity_phase.advance(0.0, 1.0, rate, dt);
        }

        let size_phase = self.size_phase.value;
        let opacity_phase = self.opacity_phase.value;

        for particle in self.store.particles_mut() {
            if size.anim.enable {
                let (lo, hi) = Oscillator::bounds(size.anim.min, particle.base_radius);
                if size.anim.sync {
                    particle.size.value = lo + (hi - lo) * size_phase;
                } else {
                    particle.size.advance(lo, hi, size.anim.speed, dt);
                }
            }
            if opacity.anim.enable {
                let (lo, hi) = Oscillator::bounds(opacity.anim.min, particle.base_opacity);
                if opacity.anim.sync {
                    particle.alpha.value = lo + (hi - lo) * opacity_phase;
                } else {
                    particle.alpha.advance(lo, hi, opacity.anim.speed, dt);
                }
            }
        }
    }

    fn refresh_drawn_values(&mut self) {
        let bubble = self.settings.interactivity.modes.bubble;
        for particle in self.store.particles_mut() {
            let (radius, opacity) = modes::bubble_overlay(particle, &bubble);
            particle.radius = radius;
            particle.opacity = opacity;
        }
    }

    fn rebuild_links(&mut self, hover: Option<Vec2>) {
        self.links.clear();
        let line = self.settings.particles.links;
        if !line.enable {
            return;
        }

        self.links.pairs = compute_links(self.store.particles(), line.distance, line.opacity);

        let binding = &self.settings.interactivity.on_hover;
        if let Some(cursor) = hover.filter(|_| binding.is_active(HoverMode::Grab)) {
            let grab = self.settings.interactivity.modes.grab;
            self.links.cursor = cursor_links(self.store.particles(), cursor, grab.distance, grab.line_opacity);
        }
    }
}

/// Acceleration pulling a particle toward the cursor.
///
/// Scales with `(1 - n) / n` for normalized distance `n`, so it grows near
/// the cursor and vanishes at the radius. Axis gains are `1 / rotateX` and
/// `1 / rotateY`.
pub fn attraction(position: Vec2, cursor: Vec2, radius: f32, attract: &Attract) -> Vec2 {
    let offset = cursor - position;
    let distance = offset.length();
    if !(radius > 0.0) || !distance.is_finite() || distance >= radius {
        return Vec2::ZERO;
    }
    let normalized = (distance / radius).max(ATTRACT_MIN_NORMALIZED_DISTANCE);
    let strength = (1.0 - distance / radius) / normalized;
    let gain = Vec2::new(
        1.0 / attract.rotate_x.max(1.0),
        1.0 / attract.rotate_y.max(1.0),
    );
    let accel = offset * gain * strength * ATTRACT_GAIN;
    if accel.is_finite() {
        accel
    } else {
        Vec2::ZERO
    }
}

/// Where a particle that left the surface comes back in, or `None` while still inside
fn reentry_point<R: Rng + ?Sized>(position: Vec2, surface: Vec2, rng: &mut R) -> Option<Vec2> {
    let Vec2 { x: width, y: height } = surface;
    let entry = if position.x > width {
        Vec2::new(0.0, rng.gen::<f32>() * height)
    } else if position.x < 0.0 {
        Vec2::new(width, rng.gen::<f32>() * height)
    } else if position.y > height {
        Vec2::new(rng.gen::<f32>() * width, 0.0)
    } else if position.y < 0.0 {
        Vec2::new(rng.gen::<f32>() * width, height)
    } else if !position.is_finite() {
        Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height)
    } else {
        return None;
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Direction, Settings};

    /// Demo settings with fixed count, no density, straight movement to the right
    fn settings() -> Settings {
        let mut settings = Settings::demo().unwrap();
        settings.particles.count = 20;
        settings.particles.density.enable = false;
        settings.particles.movement.direction = Direction::Right;
        settings.particles.movement.straight = true;
        settings.particles.movement.random = false;
        settings
    }

    #[test]
    fn test_initial_count_matches_settings() {
        let engine = Engine::with_seed(settings(), 800.0, 600.0, 1);
        assert_eq!(engine.particles().len(), 20);
    }

    #[test]
    fn test_seeded_engines_are_identical() {
        let mut a = Engine::with_seed(settings(), 800.0, 600.0, 11);
        let mut b = Engine::with_seed(settings(), 800.0, 600.0, 11);
        for _ in 0..10 {
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_zero_step_keeps_positions() {
        let mut s = settings();
        s.particles.movement.direction = Direction::None;
        s.particles.movement.straight = false;
        s.particles.movement.random = true;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 3);
        let before: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
        engine.step(0.0);
        engine.step(0.0);
        let after: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_zero_step_still_pushes() {
        let mut s = settings();
        s.interactivity.on_click.enable = true;
        s.interactivity.on_click.modes = vec![ClickMode::Push];
        s.interactivity.modes.push_count = 4;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 3);
        let before: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();

        engine.queue(InputEvent::Click(Vec2::new(100.0, 100.0)));
        engine.step(0.0);

        assert_eq!(engine.particles().len(), 24);
        let after: Vec<Vec2> = engine.particles()[..20].iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        for p in &engine.particles()[20..] {
            assert_eq!(p.position, Vec2::new(100.0, 100.0));
        }
    }

    #[test]
    fn test_one_click_pushes_exactly_four() {
        let mut s = Settings::demo().unwrap();
        s.interactivity.on_click.enable = true;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 5);
        let before = engine.particles().len();
        engine.queue(InputEvent::Click(Vec2::new(400.0, 300.0)));
        engine.step(1.0 / 60.0);
        assert_eq!(engine.particles().len(), before + 4);

        // The click state lasts one tick only
        engine.step(1.0 / 60.0);
        assert_eq!(engine.particles().len(), before + 4);
    }

    #[test]
    fn test_click_remove_takes_newest() {
        let mut s = settings();
        s.interactivity.on_click.enable = true;
        s.interactivity.on_click.modes = vec![ClickMode::Remove];
        s.interactivity.modes.remove_count = 2;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 5);
        engine.queue(InputEvent::Click(Vec2::new(10.0, 10.0)));
        engine.step(0.0);
        let ids: Vec<u64> = engine.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..18).collect::<Vec<u64>>());
    }

    #[test]
    fn test_click_ignored_when_disabled() {
        let mut s = settings();
        s.interactivity.on_click.enable = false;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 5);
        engine.queue(InputEvent::Click(Vec2::new(10.0, 10.0)));
        engine.step(0.0);
        assert_eq!(engine.particles().len(), 20);
    }

    #[test]
    fn test_bounce_at_edge_stays_in_bounds() {
        let mut s = settings();
        s.particles.count = 1;
        s.particles.movement.out_mode = OutMode::Bounce;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 7);
        {
            let p = &mut engine.store.particles_mut()[0];
            p.position = Vec2::new(800.0, 300.0);
            p.velocity = Vec2::new(1.0, 0.0);
        }
        engine.step(1.0 / 60.0);
        let p = &engine.particles()[0];
        assert!(p.position.x <= 800.0 && p.position.x >= 0.0);
        assert!(p.velocity.x < 0.0);

        engine.step(1.0 / 60.0);
        let p = &engine.particles()[0];
        assert!(p.position.x < 800.0);
    }

    #[test]
    fn test_out_mode_respawns_with_new_identity() {
        let mut s = settings();
        s.particles.count = 2;
        s.particles.movement.out_mode = OutMode::Out;
        s.particles.links.distance = 50.0;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 8);
        {
            let particles = engine.store.particles_mut();
            particles[0].position = Vec2::new(799.0, 300.0);
            particles[0].velocity = Vec2::new(1.0, 0.0);
            particles[1].position = Vec2::new(790.0, 300.0);
            particles[1].velocity = Vec2::ZERO;
        }
        engine.step(1.0 / 60.0);

        let respawned = &engine.particles()[0];
        assert_eq!(respawned.id, 2);
        assert_eq!(respawned.position.x, 0.0);
        assert!(respawned.position.y >= 0.0 && respawned.position.y <= 600.0);

        // The old position next to particle 1 no longer produces a link
        assert!(engine.links().pairs.is_empty());
    }

    #[test]
    fn test_no_links_when_disabled() {
        let mut s = settings();
        s.particles.links.enable = false;
        s.interactivity.on_hover.enable = true;
        s.interactivity.on_hover.modes = vec![HoverMode::Grab];
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 9);
        for p in engine.store.particles_mut() {
            p.position = Vec2::new(100.0, 100.0);
        }
        engine.queue(InputEvent::PointerMoved(Vec2::new(100.0, 100.0)));
        engine.step(0.0);
        assert!(engine.links().is_empty());
    }

    #[test]
    fn test_grab_creates_cursor_links() {
        let mut s = settings();
        s.interactivity.on_hover.enable = true;
        s.interactivity.on_hover.modes = vec![HoverMode::Grab];
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 9);
        engine.queue(InputEvent::PointerMoved(Vec2::new(400.0, 300.0)));
        engine.step(0.0);

        let grab = engine.settings.interactivity.modes.grab;
        let expected = engine
            .particles()
            .iter()
            .filter(|p| p.position.distance(Vec2::new(400.0, 300.0)) < grab.distance)
            .count();
        assert_eq!(engine.links().cursor.len(), expected);
    }

    #[test]
    fn test_density_resize_scales_count() {
        let mut s = Settings::demo().unwrap();
        s.particles.count = 50;
        s.particles.density.enable = true;
        s.particles.density.value_area = 800.0;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 4);
        let before = engine.particles().len();

        engine.queue(InputEvent::Resized {
            width: 1600.0,
            height: 1200.0,
        });
        engine.step(1.0 / 60.0);
        assert_eq!(engine.surface_size(), Vec2::new(1600.0, 1200.0));
        assert_eq!(engine.particles().len(), before);

        engine.step(crate::config::RESIZE_DEBOUNCE_SECS * 2.0);
        assert_eq!(engine.particles().len(), before * 4);
    }

    #[test]
    fn test_zero_count_has_no_particles_or_links() {
        let mut s = settings();
        s.particles.count = 0;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 1);
        engine.step(1.0 / 60.0);
        assert!(engine.particles().is_empty());
        assert!(engine.links().is_empty());
    }

    #[test]
    fn test_static_particles_still_animate() {
        let mut s = settings();
        s.particles.movement.enable = false;
        s.particles.size.random = false;
        s.particles.size.anim.enable = true;
        s.particles.size.anim.sync = true;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 2);
        let before: Vec<(Vec2, f32)> = engine.particles().iter().map(|p| (p.position, p.radius)).collect();
        engine.step(0.1);
        for (p, (position, radius)) in engine.particles().iter().zip(before) {
            assert_eq!(p.position, position);
            assert!(p.radius < radius);
        }
    }

    #[test]
    fn test_sync_animation_shares_phase() {
        let mut s = settings();
        s.particles.size.random = false;
        s.particles.size.anim.enable = true;
        s.particles.size.anim.sync = true;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 2);
        engine.step(0.3);
        let first = engine.particles()[0].radius;
        assert!(engine.particles().iter().all(|p| (p.radius - first).abs() < 1e-6));
    }

    #[test]
    fn test_independent_animation_stays_in_bounds() {
        let mut s = settings();
        s.particles.opacity.anim.enable = true;
        s.particles.opacity.anim.sync = false;
        s.particles.opacity.anim.min = 0.1;
        s.particles.opacity.anim.speed = 3.0;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 2);
        for _ in 0..30 {
            engine.step(0.05);
            for p in engine.particles() {
                assert!(p.opacity >= 0.1 - 1e-6 && p.opacity <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn test_hover_repulse_pushes_away() {
        let mut s = settings();
        s.particles.count = 1;
        s.particles.movement.enable = true;
        s.particles.movement.speed = 0.0;
        s.interactivity.on_hover.enable = true;
        s.interactivity.on_hover.modes = vec![HoverMode::Repulse];
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 2);
        engine.store.particles_mut()[0].position = Vec2::new(420.0, 300.0);

        engine.queue(InputEvent::PointerMoved(Vec2::new(400.0, 300.0)));
        engine.step(1.0 / 60.0);
        assert!(engine.particles()[0].position.x > 420.0);
    }

    /// One still particle 50px right of a cursor at (400, 300), attraction on
    fn attract_engine(hover: Option<HoverMode>) -> Engine {
        let mut s = settings();
        s.particles.count = 1;
        s.particles.movement.enable = true;
        s.particles.movement.speed = 1.0;
        s.particles.movement.attract.enable = true;
        s.interactivity.on_hover.enable = hover.is_some();
        s.interactivity.on_hover.modes = hover.into_iter().collect();
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 3);
        engine.store.particles_mut()[0].position = Vec2::new(450.0, 300.0);
        engine.store.particles_mut()[0].velocity = Vec2::ZERO;
        engine.queue(InputEvent::PointerMoved(Vec2::new(400.0, 300.0)));
        engine
    }

    #[test]
    fn test_attraction_needs_grab_or_bubble_hover() {
        for mode in [HoverMode::Grab, HoverMode::Bubble] {
            let mut engine = attract_engine(Some(mode));
            engine.step(1.0 / 60.0);
            let p = &engine.particles()[0];
            assert!(p.velocity.x < 0.0, "{:?}", mode);
            assert!(p.position.x < 450.0, "{:?}", mode);
        }

        for mode in [Some(HoverMode::Repulse), None] {
            let mut engine = attract_engine(mode);
            engine.step(1.0 / 60.0);
            assert_eq!(engine.particles()[0].velocity, Vec2::ZERO, "{:?}", mode);
        }
    }

    #[test]
    fn test_attraction_off_when_disabled_in_move() {
        let mut engine = attract_engine(Some(HoverMode::Grab));
        engine.settings.particles.movement.attract.enable = false;
        engine.step(1.0 / 60.0);
        assert_eq!(engine.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_hover_bubble_grows_then_relaxes() {
        let mut s = settings();
        s.particles.count = 1;
        s.particles.movement.enable = false;
        s.particles.size.random = false;
        s.particles.size.anim.enable = false;
        s.particles.opacity.random = false;
        s.particles.opacity.anim.enable = false;
        s.interactivity.on_hover.enable = true;
        s.interactivity.on_hover.modes = vec![HoverMode::Bubble];
        s.interactivity.modes.bubble.size = 40.0;
        s.interactivity.modes.bubble.opacity = 0.9;
        s.interactivity.modes.bubble.duration = 2.0;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 5);
        engine.store.particles_mut()[0].position = Vec2::new(400.0, 300.0);
        let (radius, opacity) = (engine.particles()[0].radius, engine.particles()[0].opacity);

        engine.queue(InputEvent::PointerMoved(Vec2::new(400.0, 300.0)));
        engine.step(1.0);
        let halfway = &engine.particles()[0];
        assert!((halfway.radius - (radius + 40.0) / 2.0).abs() < 1e-4);
        assert!((halfway.opacity - (opacity + 0.9) / 2.0).abs() < 1e-4);

        engine.step(1.0);
        assert!((engine.particles()[0].radius - 40.0).abs() < 1e-4);
        assert!((engine.particles()[0].opacity - 0.9).abs() < 1e-4);

        engine.queue(InputEvent::PointerLeft);
        engine.step(1.0);
        assert!(engine.particles()[0].radius < 40.0);
        engine.step(1.0);
        assert!((engine.particles()[0].radius - radius).abs() < 1e-4);
        assert!((engine.particles()[0].opacity - opacity).abs() < 1e-4);
    }

    /// Two overlapping particles of radius 2 on a horizontal line
    fn bounce_engine(v0: Vec2, v1: Vec2) -> Engine {
        let mut s = settings();
        s.particles.count = 2;
        s.particles.movement.bounce = true;
        s.particles.movement.speed = 1.0;
        s.particles.size.value = 2.0;
        s.particles.size.random = false;
        s.particles.size.anim.enable = false;
        let mut engine = Engine::with_seed(s, 800.0, 600.0, 6);
        let particles = engine.store.particles_mut();
        particles[0].position = Vec2::new(400.0, 300.0);
        particles[1].position = Vec2::new(403.0, 300.0);
        particles[0].velocity = v0;
        particles[1].velocity = v1;
        engine
    }

    #[test]
    fn test_pair_bounce_reverses_approaching_pair_once() {
        let mut engine = bounce_engine(Vec2::X, -Vec2::X);
        engine.step(1.0 / 60.0);
        assert_eq!(engine.particles()[0].velocity, -Vec2::X);
        assert_eq!(engine.particles()[1].velocity, Vec2::X);

        // Still overlapping, but separating: no second flip
        engine.step(1.0 / 60.0);
        assert_eq!(engine.particles()[0].velocity, -Vec2::X);
        assert_eq!(engine.particles()[1].velocity, Vec2::X);
    }

    #[test]
    fn test_pair_bounce_leaves_separating_pair_alone() {
        let mut engine = bounce_engine(-Vec2::X, Vec2::X);
        for _ in 0..3 {
            engine.step(1.0 / 60.0);
        }
        assert_eq!(engine.particles()[0].velocity, -Vec2::X);
        assert_eq!(engine.particles()[1].velocity, Vec2::X);
        assert!(engine.particles()[1].position.x - engine.particles()[0].position.x > 3.0);
    }

    #[test]
    fn test_attraction_vanishes_at_radius_and_is_monotonic() {
        let attract = Attract {
            enable: true,
            rotate_x: 600.0,
            rotate_y: 1200.0,
        };
        let cursor = Vec2::ZERO;
        assert_eq!(attraction(Vec2::new(100.0, 0.0), cursor, 100.0, &attract), Vec2::ZERO);
        assert_eq!(attraction(Vec2::new(150.0, 0.0), cursor, 100.0, &attract), Vec2::ZERO);

        let near = attraction(Vec2::new(20.0, 0.0), cursor, 100.0, &attract);
        let far = attraction(Vec2::new(80.0, 0.0), cursor, 100.0, &attract);
        assert!(near.x < 0.0 && far.x < 0.0);
        assert!(near.length() > far.length());

        let on_cursor = attraction(cursor, cursor, 100.0, &attract);
        assert!(on_cursor.is_finite());
    }

    #[test]
    fn test_nan_step_is_ignored() {
        let mut engine = Engine::with_seed(settings(), 800.0, 600.0, 1);
        let before: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
        engine.step(f32::NAN);
        let after: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
    }
}
