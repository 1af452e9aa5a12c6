pub mod animation;
pub mod engine;
pub mod links;
pub mod particle;
pub mod store;

pub use engine::Engine;
pub use links::Links;
pub use particle::Particle;
