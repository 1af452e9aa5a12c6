//! Pointer and resize input.
//!
//! Window callbacks only enqueue [`InputEvent`]s. The engine drains the queue
//! once per tick through [`InteractionLayer::drain`], which coalesces the
//! events into a single [`FrameInput`] so every frame sees one consistent
//! pointer state and at most one surface recompute.

pub mod modes;
mod resize;

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::RESIZE_DEBOUNCE_SECS;
use crate::settings::{DetectOn, InteractivitySettings};

pub use resize::ResizeDebouncer;

/// Raw input, in surface coordinates (logical pixels)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMoved(Vec2),
    PointerLeft,
    Click(Vec2),
    Resized { width: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerPhase {
    #[default]
    Idle,
    Hovering,
    /// Lasts exactly one tick
    Clicking,
}

/// Pointer state for the current tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub phase: PointerPhase,
    /// Last pointer position inside the detection scope
    pub position: Option<Vec2>,
    /// Clicks accepted this tick, in arrival order
    pub clicks: Vec<Vec2>,
}

impl InteractionState {
    /// Pointer position when hover effects should run
    pub fn hover_position(&self) -> Option<Vec2> {
        match self.phase {
            PointerPhase::Idle => None,
            _ => self.position,
        }
    }
}

/// Everything the engine needs from one drain
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub state: InteractionState,
    /// New surface size, applied this tick
    pub resized: Option<Vec2>,
    /// The resize gesture has settled; re-seed for density mode
    pub reseed: bool,
}

pub struct InteractionLayer {
    queue: VecDeque<InputEvent>,
    state: InteractionState,
    debouncer: ResizeDebouncer,
}

impl Default for InteractionLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionLayer {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            state: InteractionState::default(),
            debouncer: ResizeDebouncer::new(RESIZE_DEBOUNCE_SECS),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Drain queued events at time `now` (seconds) for a surface of `surface` size
    pub fn drain(&mut self, now: f32, settings: &InteractivitySettings, surface: Vec2) -> FrameInput {
        let mut surface = surface;
        let mut resized = None;
        self.state.clicks.clear();

        while let Some(event) = self.queue.pop_front() {
            match event {
                InputEvent::PointerMoved(position) => {
                    self.state.position = in_scope(settings.detect_on, surface, position).then_some(position);
                }
                InputEvent::PointerLeft => {
                    self.state.position = None;
                }
                InputEvent::Click(position) => {
                    if in_scope(settings.detect_on, surface, position) {
                        self.state.position = Some(position);
                        if settings.on_click.enable {
                            self.state.clicks.push(position);
                        }
                    }
                }
                InputEvent::Resized { width, height } => {
                    if !settings.resize {
                        continue;
                    }
                    let size = Vec2::new(width.max(0.0), height.max(0.0));
                    if size != surface {
                        log::debug!("Surface resized to {}x{}", size.x, size.y);
                        surface = size;
                        resized = Some(size);
                        self.debouncer.note(now);
                    }
                }
            }
        }

        // A pointer left behind by a shrinking canvas is no longer inside it
        if let Some(position) = self.state.position {
            if !in_scope(settings.detect_on, surface, position) {
                self.state.position = None;
            }
        }

        self.state.phase = if !self.state.clicks.is_empty() {
            PointerPhase::Clicking
        } else if self.state.position.is_some() && settings.on_hover.enable {
            PointerPhase::Hovering
        } else {
            PointerPhase::Idle
        };

        FrameInput {
            state: self.state.clone(),
            resized,
            reseed: self.debouncer.poll(now),
        }
    }
}

fn in_scope(detect_on: DetectOn, surface: Vec2, position: Vec2) -> bool {
    if !position.is_finite() {
        return false;
    }
    match detect_on {
        DetectOn::Window => true,
        DetectOn::Canvas => {
            position.x >= 0.0 && position.y >= 0.0 && position.x <= surface.x && position.y <= surface.y
        }
    }
}
