use glam::Vec2;
use rand::Rng;

use crate::config::{DENSITY_REFERENCE_AREA, MAX_PARTICLES};
use crate::settings::ParticleSettings;
use crate::simulation::particle::{random_position, Particle};

/// Ordered collection of live particles, oldest first
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleStore {
    /// Seed a store for a surface of the given logical size
    pub fn initialize<R: Rng + ?Sized>(
        settings: &ParticleSettings,
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> Self {
        let mut store = Self::default();
        store.add(Self::target_count(settings, width, height), settings, width, height, rng);
        store
    }

    /// Particle count for a surface: the configured value, or scaled by area in density mode.
    /// Never more than [`MAX_PARTICLES`].
    pub fn target_count(settings: &ParticleSettings, width: f32, height: f32) -> usize {
        let density = settings.density;
        if !density.enable || density.value_area <= 0.0 {
            return (settings.count as usize).min(MAX_PARTICLES);
        }

        let area = (width.max(0.0) * height.max(0.0)) / DENSITY_REFERENCE_AREA;
        let count = (area * settings.count as f32 / density.value_area).round();
        if count.is_finite() {
            count.min(MAX_PARTICLES as f32) as usize
        } else {
            0
        }
    }

    /// How many of `count` new particles fit under [`MAX_PARTICLES`]
    fn room_for(&self, count: usize) -> usize {
        count.min(MAX_PARTICLES.saturating_sub(self.particles.len()))
    }

    /// Discard every particle and seed again for a new surface size
    pub fn reseed<R: Rng + ?Sized>(
        &mut self,
        settings: &ParticleSettings,
        width: f32,
        height: f32,
        rng: &mut R,
    ) {
        self.particles.clear();
        self.add(Self::target_count(settings, width, height), settings, width, height, rng);
    }

    /// Append up to `count` particles at uniformly random positions
    pub fn add<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        settings: &ParticleSettings,
        width: f32,
        height: f32,
        rng: &mut R,
    ) {
        let count = self.room_for(count);
        self.particles.reserve(count);
        for _ in 0..count {
            let position = random_position(width, height, rng);
            let id = self.allocate_id();
            self.particles.push(Particle::spawn(settings, id, position, rng));
        }
    }

    /// Append up to `count` particles at `position`
    pub fn add_at<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        position: Vec2,
        settings: &ParticleSettings,
        rng: &mut R,
    ) {
        let count = self.room_for(count);
        self.particles.reserve(count);
        for _ in 0..count {
            let id = self.allocate_id();
            self.particles.push(Particle::spawn(settings, id, position, rng));
        }
    }

    /// Remove the `count` most recently created particles, returning how many were removed
    pub fn remove(&mut self, count: usize) -> usize {
        let removed = count.min(self.particles.len());
        self.particles.truncate(self.particles.len() - removed);
        removed
    }

    /// Replace the particle at `index` with a freshly seeded one at `position`
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        position: Vec2,
        settings: &ParticleSettings,
        rng: &mut R,
    ) {
        let id = self.allocate_id();
        if let Some(slot) = self.particles.get_mut(index) {
            *slot = Particle::spawn(settings, id, position, rng);
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(count: u32, density: bool) -> ParticleSettings {
        let mut settings = Settings::demo().unwrap().particles;
        settings.count = count;
        settings.density.enable = density;
        settings.density.value_area = 800.0;
        settings
    }

    #[test]
    fn test_fixed_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::initialize(&settings(37, false), 800.0, 600.0, &mut rng);
        assert_eq!(store.len(), 37);
    }

    #[test]
    fn test_density_count() {
        // 800 * 600 / 1000 * 50 / 800 = 30
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::initialize(&settings(50, true), 800.0, 600.0, &mut rng);
        assert_eq!(store.len(), 30);
    }

    #[test]
    fn test_density_scales_with_area() {
        let s = settings(50, true);
        let small = ParticleStore::target_count(&s, 800.0, 600.0);
        let large = ParticleStore::target_count(&s, 1600.0, 1200.0);
        assert_eq!(large, small * 4);
    }

    #[test]
    fn test_tiny_value_area_is_capped() {
        let mut s = settings(50, true);
        s.density.value_area = 1e-20;
        assert_eq!(ParticleStore::target_count(&s, 800.0, 600.0), MAX_PARTICLES);

        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::initialize(&s, 800.0, 600.0, &mut rng);
        assert_eq!(store.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_add_stops_at_particle_limit() {
        let s = settings(0, false);
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = ParticleStore::initialize(&s, 100.0, 100.0, &mut rng);
        store.add(MAX_PARTICLES - 2, &s, 100.0, 100.0, &mut rng);
        store.add_at(usize::MAX, Vec2::new(10.0, 10.0), &s, &mut rng);
        assert_eq!(store.len(), MAX_PARTICLES);
        store.add(5, &s, 100.0, 100.0, &mut rng);
        assert_eq!(store.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::initialize(&settings(0, false), 800.0, 600.0, &mut rng);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_deterministic_under_seed() {
        let s = settings(20, false);
        let a = ParticleStore::initialize(&s, 640.0, 480.0, &mut StdRng::seed_from_u64(9));
        let b = ParticleStore::initialize(&s, 640.0, 480.0, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_positions_within_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let store = ParticleStore::initialize(&settings(200, false), 300.0, 200.0, &mut rng);
        for p in store.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= 300.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 200.0);
        }
    }

    #[test]
    fn test_remove_takes_newest() {
        let s = settings(5, false);
        let mut rng = StdRng::seed_from_u64(2);
        let mut store = ParticleStore::initialize(&s, 100.0, 100.0, &mut rng);
        store.add_at(2, Vec2::new(50.0, 50.0), &s, &mut rng);

        assert_eq!(store.remove(2), 2);
        let ids: Vec<u64> = store.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_clamps_and_handles_empty() {
        let s = settings(3, false);
        let mut rng = StdRng::seed_from_u64(2);
        let mut store = ParticleStore::initialize(&s, 100.0, 100.0, &mut rng);
        assert_eq!(store.remove(10), 3);
        assert_eq!(store.remove(1), 0);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_respawn_assigns_new_id() {
        let s = settings(3, false);
        let mut rng = StdRng::seed_from_u64(2);
        let mut store = ParticleStore::initialize(&s, 100.0, 100.0, &mut rng);
        store.respawn(1, Vec2::new(0.0, 40.0), &s, &mut rng);
        assert_eq!(store.particles()[1].id, 3);
        assert_eq!(store.particles()[1].position, Vec2::new(0.0, 40.0));
        assert_eq!(store.len(), 3);
    }
}
