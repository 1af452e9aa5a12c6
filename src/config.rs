/// Built-in configuration document used when no path is given on the command line
pub const DEMO_CONFIG: &str = include_str!("../assets/particles.json");

// ============================================
// Particle Seeding
// ============================================

/// Reference area (logical px²) that `density.value_area` is expressed against
pub const DENSITY_REFERENCE_AREA: f32 = 1000.0;

/// Upper bound on live particles, whatever the count, density or clicks ask for
pub const MAX_PARTICLES: usize = 10_000;

/// Smallest `density.value_area` accepted while density scaling is enabled
pub const MIN_DENSITY_AREA: f32 = 1.0;

/// Per-component jitter added to a fixed direction when `move.straight` is off
pub const DIRECTION_JITTER: f32 = 0.5;

// ============================================
// Simulation
// ============================================

/// Pixels per second travelled by a unit-velocity particle at `move.speed = 1`
/// (half a pixel per frame at 60 frames per second)
pub const SPEED_SCALE: f32 = 30.0;

/// Maximum angular perturbation (radians per second) for `move.random`
pub const WANDER_RATE: f32 = 1.5;

/// Largest frame time fed to the engine; longer stalls are clamped
pub const MAX_FRAME_DT: f32 = 1.0 / 15.0;

/// Lower bound on normalized cursor distance in the attraction law
pub const ATTRACT_MIN_NORMALIZED_DISTANCE: f32 = 0.05;

/// Acceleration gain for cursor attraction (multiplied by 1/rotateX, 1/rotateY)
pub const ATTRACT_GAIN: f32 = 1.5;

/// Peak repulse velocity (px/s) applied to a particle sitting on the cursor
pub const REPULSE_STRENGTH: f32 = 600.0;

// ============================================
// Interaction
// ============================================

/// Quiet period after the last resize event before a density re-seed
pub const RESIZE_DEBOUNCE_SECS: f32 = 0.25;

// ============================================
// Assets
// ============================================

/// Attempts made to read an image-shape asset before giving up
pub const ASSET_LOAD_ATTEMPTS: u32 = 3;

/// Pause between asset load attempts
pub const ASSET_RETRY_DELAY_MS: u64 = 100;

// ============================================
// Rendering & Host Layout
// ============================================

/// Background the surface is cleared to each frame (RGBA8)
pub const CLEAR_COLOR: [u8; 4] = [13, 13, 20, 255];

/// Window color outside the particle container
pub const WINDOW_BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Below this window width (logical px) the container uses the narrow ratio
pub const LAYOUT_BREAKPOINT: f32 = 1080.0;

/// Container width ratio for narrow windows
pub const NARROW_CONTAINER_RATIO: f32 = 0.95;

/// Container width ratio for wide windows
pub const WIDE_CONTAINER_RATIO: f32 = 0.70;

/// Initial window size (logical px)
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
