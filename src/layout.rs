use crate::config::{LAYOUT_BREAKPOINT, NARROW_CONTAINER_RATIO, WIDE_CONTAINER_RATIO};

/// Area of the window holding the particle surface, in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    /// Same rect scaled to physical pixels
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Horizontally centered container: 95% of narrow windows, 70% of wide ones, full height
pub fn container_rect(window_width: f32, window_height: f32) -> ContainerRect {
    let window_width = window_width.max(0.0);
    let ratio = if window_width < LAYOUT_BREAKPOINT {
        NARROW_CONTAINER_RATIO
    } else {
        WIDE_CONTAINER_RATIO
    };
    let width = window_width * ratio;
    ContainerRect {
        x: (window_width - width) / 2.0,
        y: 0.0,
        width,
        height: window_height.max(0.0),
    }
}
