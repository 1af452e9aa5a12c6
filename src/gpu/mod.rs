mod context;
mod particles;

pub use context::GpuContext;
pub use particles::ParticlePipeline;
