use rand::Rng;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (channel, c) in channels.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *channel = v * 16 + v;
                }
                Some(Self::new(channels[0], channels[1], channels[2]))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert hue (degrees), saturation and lightness (percent) to RGB
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hue = |mut t: f32| {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round() as u8
        };

        Self::new(hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
    }

    pub fn to_array(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// How each particle picks its color at creation
#[derive(Clone, Debug, PartialEq)]
pub enum ColorSpec {
    Fixed(Rgb),
    /// One entry chosen uniformly per particle
    Palette(Vec<Rgb>),
    /// Uniformly random RGB per particle
    Random,
}

impl ColorSpec {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        match self {
            ColorSpec::Fixed(color) => *color,
            ColorSpec::Palette(colors) => colors[rng.gen_range(0..colors.len())],
            ColorSpec::Random => Rgb::new(rng.gen(), rng.gen(), rng.gen()),
        }
    }
}

/// Color as written in the configuration document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawColor {
    Text(String),
    List(Vec<String>),
    Rgb { r: f32, g: f32, b: f32 },
    Hsl { h: f32, s: f32, l: f32 },
}

impl Default for RawColor {
    fn default() -> Self {
        RawColor::Text("#fff".to_string())
    }
}

impl RawColor {
    /// Resolve into a typed color spec; `None` names nothing, the caller attaches the field
    pub fn resolve(&self) -> Option<ColorSpec> {
        match self {
            RawColor::Text(text) if text.eq_ignore_ascii_case("random") => Some(ColorSpec::Random),
            RawColor::Text(text) => Rgb::from_hex(text).map(ColorSpec::Fixed),
            RawColor::List(entries) if entries.is_empty() => None,
            RawColor::List(entries) => entries
                .iter()
                .map(|e| Rgb::from_hex(e))
                .collect::<Option<Vec<_>>>()
                .map(ColorSpec::Palette),
            RawColor::Rgb { r, g, b } => {
                let channel = |v: f32| v.clamp(0.0, 255.0).round() as u8;
                Some(ColorSpec::Fixed(Rgb::new(channel(*r), channel(*g), channel(*b))))
            }
            RawColor::Hsl { h, s, l } => Some(ColorSpec::Fixed(Rgb::from_hsl(*h, *s, *l))),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RawColor::Text(text) => text.clone(),
            RawColor::List(entries) => format!("[{}]", entries.join(", ")),
            RawColor::Rgb { r, g, b } => format!("rgb({}, {}, {})", r, g, b),
            RawColor::Hsl { h, s, l } => format!("hsl({}, {}, {})", h, s, l),
        }
    }
}

impl From<&ColorSpec> for RawColor {
    fn from(spec: &ColorSpec) -> Self {
        match spec {
            ColorSpec::Fixed(color) => RawColor::Text(color.to_hex()),
            ColorSpec::Palette(colors) => {
                RawColor::List(colors.iter().map(|c| c.to_hex()).collect())
            }
            ColorSpec::Random => RawColor::Text("random".to_string()),
        }
    }
}
