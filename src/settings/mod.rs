//! Typed, validated configuration.
//!
//! The document is read into the serde mirror in [`raw`], then every
//! enumeration and numeric field is checked and converted into [`Settings`].
//! `Settings` is immutable once built and converts back into the same
//! document shape through [`Settings::to_json`].

mod color;
mod raw;

use std::path::Path;

use crate::config::{MAX_PARTICLES, MIN_DENSITY_AREA};
use crate::error::ConfigurationError;

pub use color::{ColorSpec, RawColor, Rgb};
pub use raw::{OneOrMany, RawConfig};

use raw::*;

/// Complete validated configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub particles: ParticleSettings,
    pub interactivity: InteractivitySettings,
    pub retina_detect: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSettings {
    pub count: u32,
    pub density: Density,
    pub color: ColorSpec,
    pub shape: ShapeSettings,
    pub opacity: AnimatedValue,
    pub size: AnimatedValue,
    pub links: LinkSettings,
    pub movement: MoveSettings,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    pub enable: bool,
    pub value_area: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    /// Square
    Edge,
    Triangle,
    /// Regular polygon with `polygon.nb_sides` sides
    Polygon,
    /// Star with `polygon.nb_sides` points
    Star,
    Image,
}

impl ShapeKind {
    const EXPECTED: &'static str = "one of circle, edge, triangle, polygon, star, image";

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(ShapeKind::Circle),
            "edge" => Some(ShapeKind::Edge),
            "triangle" => Some(ShapeKind::Triangle),
            "polygon" => Some(ShapeKind::Polygon),
            "star" => Some(ShapeKind::Star),
            "image" => Some(ShapeKind::Image),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Edge => "edge",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Star => "star",
            ShapeKind::Image => "image",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSettings {
    /// Candidate shapes; each particle picks one at creation
    pub kinds: Vec<ShapeKind>,
    pub stroke: Stroke,
    pub polygon_sides: u32,
    pub image: ImageSource,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageSource {
    pub src: String,
    pub width: f32,
    pub height: f32,
}

/// Size or opacity: a base value with optional per-particle randomization and animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedValue {
    pub value: f32,
    pub random: bool,
    pub anim: Animation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    pub enable: bool,
    /// Units per second
    pub speed: f32,
    pub min: f32,
    pub sync: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkSettings {
    pub enable: bool,
    pub distance: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Direction {
    const EXPECTED: &'static str =
        "one of none, top, top-right, right, bottom-right, bottom, bottom-left, left, top-left";

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Direction::None),
            "top" => Some(Direction::Top),
            "top-right" => Some(Direction::TopRight),
            "right" => Some(Direction::Right),
            "bottom-right" => Some(Direction::BottomRight),
            "bottom" => Some(Direction::Bottom),
            "bottom-left" => Some(Direction::BottomLeft),
            "left" => Some(Direction::Left),
            "top-left" => Some(Direction::TopLeft),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Top => "top",
            Direction::TopRight => "top-right",
            Direction::Right => "right",
            Direction::BottomRight => "bottom-right",
            Direction::Bottom => "bottom",
            Direction::BottomLeft => "bottom-left",
            Direction::Left => "left",
            Direction::TopLeft => "top-left",
        }
    }

    /// Unit vector in surface coordinates (y grows downward), `None` for no fixed direction
    pub fn unit_vector(self) -> Option<glam::Vec2> {
        use std::f32::consts::FRAC_1_SQRT_2 as D;
        let v = match self {
            Direction::None => return None,
            Direction::Top => glam::Vec2::new(0.0, -1.0),
            Direction::TopRight => glam::Vec2::new(D, -D),
            Direction::Right => glam::Vec2::new(1.0, 0.0),
            Direction::BottomRight => glam::Vec2::new(D, D),
            Direction::Bottom => glam::Vec2::new(0.0, 1.0),
            Direction::BottomLeft => glam::Vec2::new(-D, D),
            Direction::Left => glam::Vec2::new(-1.0, 0.0),
            Direction::TopLeft => glam::Vec2::new(-D, -D),
        };
        Some(v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutMode {
    /// Respawn on the opposite edge
    Out,
    /// Reflect off the edge
    Bounce,
}

impl OutMode {
    const EXPECTED: &'static str = "one of out, bounce";

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "out" => Some(OutMode::Out),
            "bounce" => Some(OutMode::Bounce),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutMode::Out => "out",
            OutMode::Bounce => "bounce",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveSettings {
    pub enable: bool,
    pub speed: f32,
    pub direction: Direction,
    pub random: bool,
    pub straight: bool,
    pub out_mode: OutMode,
    /// Particle-particle bounce
    pub bounce: bool,
    pub attract: Attract,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attract {
    pub enable: bool,
    pub rotate_x: f32,
    pub rotate_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectOn {
    Canvas,
    Window,
}

impl DetectOn {
    const EXPECTED: &'static str = "one of canvas, window";

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "canvas" => Some(DetectOn::Canvas),
            "window" => Some(DetectOn::Window),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetectOn::Canvas => "canvas",
            DetectOn::Window => "window",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoverMode {
    Grab,
    Bubble,
    Repulse,
}

impl HoverMode {
    const EXPECTED: &'static str = "one of grab, bubble, repulse";

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "grab" => Some(HoverMode::Grab),
            "bubble" => Some(HoverMode::Bubble),
            "repulse" => Some(HoverMode::Repulse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HoverMode::Grab => "grab",
            HoverMode::Bubble => "bubble",
            HoverMode::Repulse => "repulse",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickMode {
    Push,
    Remove,
    Bubble,
    Repulse,
}

impl ClickMode {
    const EXPECTED: &'static str = "one of push, remove, bubble, repulse";

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "push" => Some(ClickMode::Push),
            "remove" => Some(ClickMode::Remove),
            "bubble" => Some(ClickMode::Bubble),
            "repulse" => Some(ClickMode::Repulse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClickMode::Push => "push",
            ClickMode::Remove => "remove",
            ClickMode::Bubble => "bubble",
            ClickMode::Repulse => "repulse",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractivitySettings {
    pub detect_on: DetectOn,
    pub on_hover: EventBinding<HoverMode>,
    pub on_click: EventBinding<ClickMode>,
    pub resize: bool,
    pub modes: ModeSettings,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventBinding<M> {
    pub enable: bool,
    pub modes: Vec<M>,
}

impl<M: PartialEq> EventBinding<M> {
    /// True when the binding is enabled and lists `mode`
    pub fn is_active(&self, mode: M) -> bool {
        self.enable && self.modes.contains(&mode)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeSettings {
    pub grab: GrabMode,
    pub bubble: BubbleMode,
    pub repulse: RepulseMode,
    pub push_count: u32,
    pub remove_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabMode {
    pub distance: f32,
    pub line_opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleMode {
    pub distance: f32,
    pub size: f32,
    pub duration: f32,
    pub opacity: f32,
    /// Parsed for schema compatibility; the ramp is driven by `duration`
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepulseMode {
    pub distance: f32,
    pub duration: f32,
}

impl Settings {
    /// Parse and validate a configuration document
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        Self::from_raw(&raw)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The configuration shipped with the demo
    pub fn demo() -> Result<Self, ConfigurationError> {
        Self::from_json(crate::config::DEMO_CONFIG)
    }

    /// Serialize back to the document schema
    pub fn to_json(&self) -> String {
        // Plain structs of strings, numbers and bools always serialize
        serde_json::to_string_pretty(&self.to_raw()).unwrap_or_default()
    }

    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigurationError> {
        let particles = &raw.particles;
        let interactivity = &raw.interactivity;
        let modes = &interactivity.modes;

        let count = particles.number.value.ok_or(ConfigurationError::Missing {
            field: "particles.number.value",
        })?;
        let count = particle_count("particles.number.value", count)?;

        let color = particles
            .color
            .value
            .resolve()
            .ok_or_else(|| ConfigurationError::InvalidValue {
                field: "particles.color.value",
                value: particles.color.value.describe(),
                expected: "a hex color, \"random\", {r,g,b}, {h,s,l} or a list of hex colors",
            })?;

        let kinds = particles
            .shape
            .kind
            .as_slice()
            .iter()
            .map(|name| parse_enum("particles.shape.type", name, ShapeKind::parse, ShapeKind::EXPECTED))
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "particles.shape.type",
                value: "[]".to_string(),
                expected: "at least one shape",
            });
        }

        let sides = non_negative("particles.shape.polygon.nb_sides", particles.shape.polygon.nb_sides)?;
        if sides.round() < 3.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "particles.shape.polygon.nb_sides",
                value: sides.to_string(),
                expected: "at least 3 sides",
            });
        }

        let shape = ShapeSettings {
            kinds,
            stroke: Stroke {
                width: non_negative("particles.shape.stroke.width", particles.shape.stroke.width)?,
                color: hex("particles.shape.stroke.color", &particles.shape.stroke.color)?,
            },
            polygon_sides: sides.round() as u32,
            image: ImageSource {
                src: particles.shape.image.src.clone(),
                width: non_negative("particles.shape.image.width", particles.shape.image.width)?,
                height: non_negative("particles.shape.image.height", particles.shape.image.height)?,
            },
        };

        let opacity = AnimatedValue {
            value: non_negative("particles.opacity.value", particles.opacity.value)?,
            random: particles.opacity.random,
            anim: Animation {
                enable: particles.opacity.anim.enable,
                speed: non_negative("particles.opacity.anim.speed", particles.opacity.anim.speed)?,
                min: non_negative("particles.opacity.anim.opacity_min", particles.opacity.anim.opacity_min)?,
                sync: particles.opacity.anim.sync,
            },
        };

        let size = AnimatedValue {
            value: non_negative("particles.size.value", particles.size.value)?,
            random: particles.size.random,
            anim: Animation {
                enable: particles.size.anim.enable,
                speed: non_negative("particles.size.anim.speed", particles.size.anim.speed)?,
                min: non_negative("particles.size.anim.size_min", particles.size.anim.size_min)?,
                sync: particles.size.anim.sync,
            },
        };

        let line = &particles.line_linked;
        let links = LinkSettings {
            enable: line.enable,
            distance: non_negative("particles.line_linked.distance", line.distance)?,
            color: hex("particles.line_linked.color", &line.color)?,
            opacity: non_negative("particles.line_linked.opacity", line.opacity)?,
            width: non_negative("particles.line_linked.width", line.width)?,
        };

        let mv = &particles.movement;
        let movement = MoveSettings {
            enable: mv.enable,
            speed: non_negative("particles.move.speed", mv.speed)?,
            direction: parse_enum("particles.move.direction", &mv.direction, Direction::parse, Direction::EXPECTED)?,
            random: mv.random,
            straight: mv.straight,
            out_mode: parse_enum("particles.move.out_mode", &mv.out_mode, OutMode::parse, OutMode::EXPECTED)?,
            bounce: mv.bounce,
            attract: Attract {
                enable: mv.attract.enable,
                rotate_x: non_negative("particles.move.attract.rotateX", mv.attract.rotate_x)?,
                rotate_y: non_negative("particles.move.attract.rotateY", mv.attract.rotate_y)?,
            },
        };

        let events = &interactivity.events;
        let hover_modes = events
            .onhover
            .mode
            .as_slice()
            .iter()
            .map(|name| {
                parse_enum("interactivity.events.onhover.mode", name, HoverMode::parse, HoverMode::EXPECTED)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let click_modes = events
            .onclick
            .mode
            .as_slice()
            .iter()
            .map(|name| {
                parse_enum("interactivity.events.onclick.mode", name, ClickMode::parse, ClickMode::EXPECTED)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let interactivity = InteractivitySettings {
            detect_on: parse_enum(
                "interactivity.detect_on",
                &interactivity.detect_on,
                DetectOn::parse,
                DetectOn::EXPECTED,
            )?,
            on_hover: EventBinding {
                enable: events.onhover.enable,
                modes: hover_modes,
            },
            on_click: EventBinding {
                enable: events.onclick.enable,
                modes: click_modes,
            },
            resize: events.resize,
            modes: ModeSettings {
                grab: GrabMode {
                    distance: non_negative("interactivity.modes.grab.distance", modes.grab.distance)?,
                    line_opacity: non_negative(
                        "interactivity.modes.grab.line_linked.opacity",
                        modes.grab.line_linked.opacity,
                    )?,
                },
                bubble: BubbleMode {
                    distance: non_negative("interactivity.modes.bubble.distance", modes.bubble.distance)?,
                    size: non_negative("interactivity.modes.bubble.size", modes.bubble.size)?,
                    duration: non_negative("interactivity.modes.bubble.duration", modes.bubble.duration)?,
                    opacity: non_negative("interactivity.modes.bubble.opacity", modes.bubble.opacity)?,
                    speed: non_negative("interactivity.modes.bubble.speed", modes.bubble.speed)?,
                },
                repulse: RepulseMode {
                    distance: non_negative("interactivity.modes.repulse.distance", modes.repulse.distance)?,
                    duration: non_negative("interactivity.modes.repulse.duration", modes.repulse.duration)?,
                },
                push_count: particle_count("interactivity.modes.push.particles_nb", modes.push.particles_nb)?,
                remove_count: particle_count(
                    "interactivity.modes.remove.particles_nb",
                    modes.remove.particles_nb,
                )?,
            },
        };

        Ok(Self {
            particles: ParticleSettings {
                count,
                density: density(&particles.number.density)?,
                color,
                shape,
                opacity,
                size,
                links,
                movement,
            },
            interactivity,
            retina_detect: raw.retina_detect,
        })
    }

    pub fn to_raw(&self) -> RawConfig {
        let p = &self.particles;
        let i = &self.interactivity;

        RawConfig {
            particles: RawParticles {
                number: RawNumber {
                    value: Some(p.count as f32),
                    density: RawDensity {
                        enable: p.density.enable,
                        value_area: p.density.value_area,
                    },
                },
                color: RawColorField {
                    value: RawColor::from(&p.color),
                },
                shape: RawShape {
                    kind: OneOrMany::from_vec(p.shape.kinds.iter().map(|k| k.as_str().to_string()).collect()),
                    stroke: RawStroke {
                        width: p.shape.stroke.width,
                        color: p.shape.stroke.color.to_hex(),
                    },
                    polygon: RawPolygon {
                        nb_sides: p.shape.polygon_sides as f32,
                    },
                    image: RawImage {
                        src: p.shape.image.src.clone(),
                        width: p.shape.image.width,
                        height: p.shape.image.height,
                    },
                },
                opacity: RawOpacity {
                    value: p.opacity.value,
                    random: p.opacity.random,
                    anim: RawOpacityAnim {
                        enable: p.opacity.anim.enable,
                        speed: p.opacity.anim.speed,
                        opacity_min: p.opacity.anim.min,
                        sync: p.opacity.anim.sync,
                    },
                },
                size: RawSize {
                    value: p.size.value,
                    random: p.size.random,
                    anim: RawSizeAnim {
                        enable: p.size.anim.enable,
                        speed: p.size.anim.speed,
                        size_min: p.size.anim.min,
                        sync: p.size.anim.sync,
                    },
                },
                line_linked: RawLineLinked {
                    enable: p.links.enable,
                    distance: p.links.distance,
                    color: p.links.color.to_hex(),
                    opacity: p.links.opacity,
                    width: p.links.width,
                },
                movement: RawMove {
                    enable: p.movement.enable,
                    speed: p.movement.speed,
                    direction: p.movement.direction.as_str().to_string(),
                    random: p.movement.random,
                    straight: p.movement.straight,
                    out_mode: p.movement.out_mode.as_str().to_string(),
                    bounce: p.movement.bounce,
                    attract: RawAttract {
                        enable: p.movement.attract.enable,
                        rotate_x: p.movement.attract.rotate_x,
                        rotate_y: p.movement.attract.rotate_y,
                    },
                },
            },
            interactivity: RawInteractivity {
                detect_on: i.detect_on.as_str().to_string(),
                events: RawEvents {
                    onhover: RawEvent {
                        enable: i.on_hover.enable,
                        mode: OneOrMany::from_vec(i.on_hover.modes.iter().map(|m| m.as_str().to_string()).collect()),
                    },
                    onclick: RawEvent {
                        enable: i.on_click.enable,
                        mode: OneOrMany::from_vec(i.on_click.modes.iter().map(|m| m.as_str().to_string()).collect()),
                    },
                    resize: i.resize,
                },
                modes: RawModes {
                    grab: RawGrab {
                        distance: i.modes.grab.distance,
                        line_linked: RawGrabLine {
                            opacity: i.modes.grab.line_opacity,
                        },
                    },
                    bubble: RawBubble {
                        distance: i.modes.bubble.distance,
                        size: i.modes.bubble.size,
                        duration: i.modes.bubble.duration,
                        opacity: i.modes.bubble.opacity,
                        speed: i.modes.bubble.speed,
                    },
                    repulse: RawRepulse {
                        distance: i.modes.repulse.distance,
                        duration: i.modes.repulse.duration,
                    },
                    push: RawParticleCount {
                        particles_nb: i.modes.push_count as f32,
                    },
                    remove: RawParticleCount {
                        particles_nb: i.modes.remove_count as f32,
                    },
                },
            },
            retina_detect: self.retina_detect,
        }
    }
}

/// Rounded particle count, at most [`MAX_PARTICLES`]
fn particle_count(field: &'static str, value: f32) -> Result<u32, ConfigurationError> {
    let value = non_negative(field, value)?.round();
    if value > MAX_PARTICLES as f32 {
        return Err(ConfigurationError::InvalidValue {
            field,
            value: value.to_string(),
            expected: "a count no larger than the particle limit (10000)",
        });
    }
    Ok(value as u32)
}

fn density(raw: &RawDensity) -> Result<Density, ConfigurationError> {
    let field = "particles.number.density.value_area";
    let value_area = non_negative(field, raw.value_area)?;
    if raw.enable && value_area < MIN_DENSITY_AREA {
        return Err(ConfigurationError::InvalidValue {
            field,
            value: value_area.to_string(),
            expected: "an area of at least 1 while density is enabled",
        });
    }
    Ok(Density {
        enable: raw.enable,
        value_area,
    })
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigurationError> {
    if value < 0.0 || !value.is_finite() {
        Err(ConfigurationError::Negative { field, value })
    } else {
        Ok(value)
    }
}

fn hex(field: &'static str, text: &str) -> Result<Rgb, ConfigurationError> {
    Rgb::from_hex(text).ok_or_else(|| ConfigurationError::InvalidValue {
        field,
        value: text.to_string(),
        expected: "a hex color",
    })
}

fn parse_enum<T>(
    field: &'static str,
    name: &str,
    parse: fn(&str) -> Option<T>,
    expected: &'static str,
) -> Result<T, ConfigurationError> {
    parse(name).ok_or_else(|| ConfigurationError::InvalidValue {
        field,
        value: name.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(extra_particles: &str) -> String {
        format!(
            r#"{{ "particles": {{ "number": {{ "value": 10 }} {} }} }}"#,
            extra_particles
        )
    }

    #[test]
    fn test_demo_config_parses() {
        let settings = Settings::demo().unwrap();
        assert_eq!(settings.particles.count, 50);
        assert!(settings.particles.density.enable);
        assert_eq!(settings.particles.color, ColorSpec::Fixed(Rgb::new(0x1e, 0x90, 0xff)));
        assert_eq!(settings.particles.shape.kinds, vec![ShapeKind::Circle]);
        assert!(settings.particles.size.anim.sync);
        assert_eq!(settings.particles.movement.direction, Direction::None);
        assert_eq!(settings.particles.movement.out_mode, OutMode::Out);
        assert_eq!(settings.interactivity.on_hover.modes, vec![HoverMode::Repulse]);
        assert_eq!(settings.interactivity.on_click.modes, vec![ClickMode::Push]);
        assert_eq!(settings.interactivity.modes.push_count, 4);
        assert_eq!(settings.interactivity.modes.remove_count, 2);
        assert!(settings.retina_detect);
    }

    #[test]
    fn test_round_trip_is_identical() {
        let settings = Settings::demo().unwrap();
        let reparsed = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(settings, reparsed);
    }

    #[test]
    fn test_round_trip_with_lists_and_palette() {
        let text = r##"{
            "particles": {
                "number": { "value": 3 },
                "color": { "value": ["#ff0000", "#00ff00"] },
                "shape": { "type": ["star", "triangle"], "polygon": { "nb_sides": 6 } }
            },
            "interactivity": {
                "events": { "onhover": { "enable": true, "mode": ["grab", "bubble"] } }
            }
        }"##;
        let settings = Settings::from_json(text).unwrap();
        assert_eq!(settings.particles.shape.kinds, vec![ShapeKind::Star, ShapeKind::Triangle]);
        assert_eq!(
            settings.interactivity.on_hover.modes,
            vec![HoverMode::Grab, HoverMode::Bubble]
        );
        let reparsed = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(settings, reparsed);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let text = r#"{ "particles": { "number": { "value": 5, "sparkle": true } }, "theme": "dark" }"#;
        let settings = Settings::from_json(text).unwrap();
        assert_eq!(settings.particles.count, 5);
    }

    #[test]
    fn test_missing_count_names_field() {
        let err = Settings::from_json(r#"{ "particles": {} }"#).unwrap_err();
        assert_eq!(err.field(), Some("particles.number.value"));
    }

    #[test]
    fn test_invalid_direction_names_field() {
        let text = minimal(r#", "move": { "direction": "sideways" }"#);
        let err = Settings::from_json(&text).unwrap_err();
        assert_eq!(err.field(), Some("particles.move.direction"));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_invalid_out_mode_names_field() {
        let text = minimal(r#", "move": { "out_mode": "wrap" }"#);
        let err = Settings::from_json(&text).unwrap_err();
        assert_eq!(err.field(), Some("particles.move.out_mode"));
    }

    #[test]
    fn test_invalid_shape_names_field() {
        let text = minimal(r#", "shape": { "type": "hexagon" }"#);
        let err = Settings::from_json(&text).unwrap_err();
        assert_eq!(err.field(), Some("particles.shape.type"));
    }

    #[test]
    fn test_invalid_detect_on_names_field() {
        let text = r#"{ "particles": { "number": { "value": 1 } }, "interactivity": { "detect_on": "document" } }"#;
        let err = Settings::from_json(text).unwrap_err();
        assert_eq!(err.field(), Some("interactivity.detect_on"));
    }

    #[test]
    fn test_push_is_not_a_hover_mode() {
        let text = r#"{ "particles": { "number": { "value": 1 } },
            "interactivity": { "events": { "onhover": { "enable": true, "mode": "push" } } } }"#;
        let err = Settings::from_json(text).unwrap_err();
        assert_eq!(err.field(), Some("interactivity.events.onhover.mode"));
    }

    #[test]
    fn test_negative_values_rejected() {
        let text = minimal(r#", "line_linked": { "distance": -5 }"#);
        let err = Settings::from_json(&text).unwrap_err();
        assert_eq!(err.field(), Some("particles.line_linked.distance"));

        let text = r#"{ "particles": { "number": { "value": 1 } },
            "interactivity": { "modes": { "repulse": { "duration": -0.1 } } } }"#;
        let err = Settings::from_json(text).unwrap_err();
        assert_eq!(err.field(), Some("interactivity.modes.repulse.duration"));
    }

    #[test]
    fn test_tiny_value_area_rejected() {
        let text = r#"{ "particles": { "number": { "value": 50,
            "density": { "enable": true, "value_area": 1e-20 } } } }"#;
        let err = Settings::from_json(text).unwrap_err();
        assert_eq!(err.field(), Some("particles.number.density.value_area"));

        // Unused while density is off
        let text = r#"{ "particles": { "number": { "value": 50,
            "density": { "enable": false, "value_area": 1e-20 } } } }"#;
        assert!(Settings::from_json(text).is_ok());
    }

    #[test]
    fn test_count_above_particle_limit_rejected() {
        let err = Settings::from_json(r#"{ "particles": { "number": { "value": 1e12 } } }"#).unwrap_err();
        assert_eq!(err.field(), Some("particles.number.value"));

        let text = format!(r#"{{ "particles": {{ "number": {{ "value": {} }} }} }}"#, MAX_PARTICLES);
        assert_eq!(Settings::from_json(&text).unwrap().particles.count as usize, MAX_PARTICLES);

        let text = r#"{ "particles": { "number": { "value": 1 } },
            "interactivity": { "modes": { "push": { "particles_nb": 4e9 } } } }"#;
        let err = Settings::from_json(text).unwrap_err();
        assert_eq!(err.field(), Some("interactivity.modes.push.particles_nb"));
    }

    #[test]
    fn test_wrong_json_type_is_parse_error() {
        let err = Settings::from_json(r#"{ "particles": { "number": { "value": "many" } } }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse(_)));
    }

    #[test]
    fn test_bad_color_names_field() {
        let text = minimal(r#", "color": { "value": "teal-ish" }"#);
        let err = Settings::from_json(&text).unwrap_err();
        assert_eq!(err.field(), Some("particles.color.value"));
    }

    #[test]
    fn test_defaults_follow_schema() {
        let settings = Settings::from_json(&minimal("")).unwrap();
        assert_eq!(settings.particles.links.distance, 100.0);
        assert_eq!(settings.particles.movement.speed, 2.0);
        assert_eq!(settings.particles.shape.polygon_sides, 5);
        assert_eq!(settings.interactivity.on_hover.modes, vec![HoverMode::Grab]);
        assert!(settings.interactivity.resize);
        assert!(!settings.retina_detect);
    }
}
