//! Serde mirror of the configuration document.
//!
//! Every struct falls back to the particles.js defaults for missing fields and
//! ignores fields it does not know. Enumerations stay as strings here; they are
//! checked when the document is turned into typed settings.

use serde::{Deserialize, Serialize};

use super::color::RawColor;

/// A value that may be written either alone or as a list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn from_vec(mut values: Vec<T>) -> Self {
        if values.len() == 1 {
            OneOrMany::One(values.remove(0))
        } else {
            OneOrMany::Many(values)
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub particles: RawParticles,
    pub interactivity: RawInteractivity,
    pub retina_detect: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParticles {
    pub number: RawNumber,
    pub color: RawColorField,
    pub shape: RawShape,
    pub opacity: RawOpacity,
    pub size: RawSize,
    pub line_linked: RawLineLinked,
    #[serde(rename = "move")]
    pub movement: RawMove,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNumber {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    pub density: RawDensity,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDensity {
    pub enable: bool,
    pub value_area: f32,
}

impl Default for RawDensity {
    fn default() -> Self {
        Self {
            enable: true,
            value_area: 800.0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawColorField {
    pub value: RawColor,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawShape {
    #[serde(rename = "type")]
    pub kind: OneOrMany<String>,
    pub stroke: RawStroke,
    pub polygon: RawPolygon,
    pub image: RawImage,
}

impl Default for RawShape {
    fn default() -> Self {
        Self {
            kind: OneOrMany::One("circle".to_string()),
            stroke: RawStroke::default(),
            polygon: RawPolygon::default(),
            image: RawImage::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStroke {
    pub width: f32,
    pub color: String,
}

impl Default for RawStroke {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: "#ff0000".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPolygon {
    pub nb_sides: f32,
}

impl Default for RawPolygon {
    fn default() -> Self {
        Self { nb_sides: 5.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub src: String,
    pub width: f32,
    pub height: f32,
}

impl Default for RawImage {
    fn default() -> Self {
        Self {
            src: String::new(),
            width: 100.0,
            height: 100.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOpacity {
    pub value: f32,
    pub random: bool,
    pub anim: RawOpacityAnim,
}

impl Default for RawOpacity {
    fn default() -> Self {
        Self {
            value: 1.0,
            random: false,
            anim: RawOpacityAnim::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOpacityAnim {
    pub enable: bool,
    pub speed: f32,
    pub opacity_min: f32,
    pub sync: bool,
}

impl Default for RawOpacityAnim {
    fn default() -> Self {
        Self {
            enable: false,
            speed: 2.0,
            opacity_min: 0.0,
            sync: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSize {
    pub value: f32,
    pub random: bool,
    pub anim: RawSizeAnim,
}

impl Default for RawSize {
    fn default() -> Self {
        Self {
            value: 20.0,
            random: false,
            anim: RawSizeAnim::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSizeAnim {
    pub enable: bool,
    pub speed: f32,
    pub size_min: f32,
    pub sync: bool,
}

impl Default for RawSizeAnim {
    fn default() -> Self {
        Self {
            enable: false,
            speed: 20.0,
            size_min: 0.0,
            sync: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLineLinked {
    pub enable: bool,
    pub distance: f32,
    pub color: String,
    pub opacity: f32,
    pub width: f32,
}

impl Default for RawLineLinked {
    fn default() -> Self {
        Self {
            enable: true,
            distance: 100.0,
            color: "#fff".to_string(),
            opacity: 1.0,
            width: 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMove {
    pub enable: bool,
    pub speed: f32,
    pub direction: String,
    pub random: bool,
    pub straight: bool,
    pub out_mode: String,
    pub bounce: bool,
    pub attract: RawAttract,
}

impl Default for RawMove {
    fn default() -> Self {
        Self {
            enable: true,
            speed: 2.0,
            direction: "none".to_string(),
            random: false,
            straight: false,
            out_mode: "out".to_string(),
            bounce: false,
            attract: RawAttract::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAttract {
    pub enable: bool,
    #[serde(rename = "rotateX")]
    pub rotate_x: f32,
    #[serde(rename = "rotateY")]
    pub rotate_y: f32,
}

impl Default for RawAttract {
    fn default() -> Self {
        Self {
            enable: false,
            rotate_x: 3000.0,
            rotate_y: 3000.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInteractivity {
    pub detect_on: String,
    pub events: RawEvents,
    pub modes: RawModes,
}

impl Default for RawInteractivity {
    fn default() -> Self {
        Self {
            detect_on: "canvas".to_string(),
            events: RawEvents::default(),
            modes: RawModes::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvents {
    pub onhover: RawEvent,
    pub onclick: RawEvent,
    pub resize: bool,
}

impl Default for RawEvents {
    fn default() -> Self {
        Self {
            onhover: RawEvent {
                enable: true,
                mode: OneOrMany::One("grab".to_string()),
            },
            onclick: RawEvent {
                enable: true,
                mode: OneOrMany::One("push".to_string()),
            },
            resize: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub enable: bool,
    pub mode: OneOrMany<String>,
}

impl Default for RawEvent {
    fn default() -> Self {
        Self {
            enable: false,
            mode: OneOrMany::Many(Vec::new()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawModes {
    pub grab: RawGrab,
    pub bubble: RawBubble,
    pub repulse: RawRepulse,
    pub push: RawParticleCount,
    pub remove: RawParticleCount,
}

impl Default for RawModes {
    fn default() -> Self {
        Self {
            grab: RawGrab::default(),
            bubble: RawBubble::default(),
            repulse: RawRepulse::default(),
            push: RawParticleCount { particles_nb: 4.0 },
            remove: RawParticleCount { particles_nb: 2.0 },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGrab {
    pub distance: f32,
    pub line_linked: RawGrabLine,
}

impl Default for RawGrab {
    fn default() -> Self {
        Self {
            distance: 100.0,
            line_linked: RawGrabLine { opacity: 1.0 },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGrabLine {
    pub opacity: f32,
}

impl Default for RawGrabLine {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBubble {
    pub distance: f32,
    pub size: f32,
    pub duration: f32,
    pub opacity: f32,
    pub speed: f32,
}

impl Default for RawBubble {
    fn default() -> Self {
        Self {
            distance: 200.0,
            size: 80.0,
            duration: 0.4,
            opacity: 1.0,
            speed: 3.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRepulse {
    pub distance: f32,
    pub duration: f32,
}

impl Default for RawRepulse {
    fn default() -> Self {
        Self {
            distance: 200.0,
            duration: 0.4,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParticleCount {
    pub particles_nb: f32,
}

impl Default for RawParticleCount {
    fn default() -> Self {
        Self { particles_nb: 4.0 }
    }
}
