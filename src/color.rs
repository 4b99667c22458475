//! Colour model: RGB, HSL and CIE L*a*b* conversions.
//!
//! HSL conversion goes through `palette`. The L*a*b* conversion is written
//! out by hand because catalog files store LAB triples computed with a fixed
//! set of constants (a rounded sRGB matrix and the 7.787 linear segment),
//! and picked colours must be compared against them on the same scale.

use std::fmt;
use std::str::FromStr;

use palette::{Hsl as PaletteHsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

// ============================================================================
// Constants
// ============================================================================

/// sRGB gamma threshold below which the linear segment applies.
const GAMMA_THRESHOLD: f64 = 0.04045;

/// Linear sRGB to XYZ.
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// D65 reference white.
const WHITE_POINT: [f64; 3] = [0.95047, 1.0, 1.08883];

/// CIE epsilon for the cube-root transform.
const LAB_EPSILON: f64 = 0.008856;

/// CIE slope of the linear floor.
const LAB_KAPPA: f64 = 7.787;

// ============================================================================
// Rgb
// ============================================================================

/// An 8-bit sRGB colour.
///
/// Serialized as a `[r, g, b]` array to match catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a 6-digit hex colour, with or without a leading `#`.
    ///
    /// Either letter case is accepted. Shorthand (`#F00`), alpha
    /// (`#FF000080`) and anything non-hex are rejected.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as `#RRGGBB` (uppercase, zero padded).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts to HSL. See [`rgb_to_hsl`].
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Converts to L*a*b*. See [`rgb_to_lab`].
    pub fn to_lab(self) -> Lab {
        rgb_to_lab(self)
    }

    /// Linear interpolation towards `other` by `t` (0.0-1.0).
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
        )
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        [rgb.r, rgb.g, rgb.b]
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Rgb {
    fn schema_name() -> String {
        "Rgb".to_owned()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <[u8; 3]>::json_schema(generator)
    }
}

impl FromStr for Rgb {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| GalleryError::InvalidHex(s.to_string()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Hsl
// ============================================================================

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    /// Creates an HSL colour from degrees and percentages.
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Converts to RGB. See [`hsl_to_rgb`].
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

/// Converts RGB to HSL. Greys (`max == min`) have `h = s = 0`.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let lightness = (rgb.r.max(rgb.g).max(rgb.b) as f32 + rgb.r.min(rgb.g).min(rgb.b) as f32)
        / (2.0 * 255.0);
    if rgb.r == rgb.g && rgb.g == rgb.b {
        return Hsl::new(0.0, 0.0, lightness * 100.0);
    }

    let srgb = Srgb::new(
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
    );
    let hsl: PaletteHsl = srgb.into_color();

    let mut hue = hsl.hue.into_positive_degrees();
    if hue >= 360.0 {
        hue -= 360.0;
    }
    Hsl::new(hue, hsl.saturation * 100.0, hsl.lightness * 100.0)
}

/// Converts HSL back to RGB, rounding each channel to the nearest byte.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let color = PaletteHsl::new(
        hsl.h.rem_euclid(360.0),
        (hsl.s / 100.0).clamp(0.0, 1.0),
        (hsl.l / 100.0).clamp(0.0, 1.0),
    );
    let srgb: Srgb = color.into_color();
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb::new(to_byte(srgb.red), to_byte(srgb.green), to_byte(srgb.blue))
}

// ============================================================================
// Lab
// ============================================================================

/// A CIE L*a*b* colour, serialized as an `[L, a, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// Creates a L*a*b* colour from its components.
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Lab) -> f64 {
        lab_distance(self, other)
    }
}

impl From<[f64; 3]> for Lab {
    fn from([l, a, b]: [f64; 3]) -> Self {
        Self::new(l, a, b)
    }
}

impl From<Lab> for [f64; 3] {
    fn from(lab: Lab) -> Self {
        [lab.l, lab.a, lab.b]
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Lab {
    fn schema_name() -> String {
        "Lab".to_owned()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <[f64; 3]>::json_schema(generator)
    }
}

/// Converts an sRGB colour to L*a*b* under D65.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let linear = [rgb.r, rgb.g, rgb.b].map(|c| decode_gamma(c as f64 / 255.0));

    let xyz: [f64; 3] = std::array::from_fn(|row| {
        let m = RGB_TO_XYZ[row];
        (m[0] * linear[0] + m[1] * linear[1] + m[2] * linear[2]) / WHITE_POINT[row]
    });
    let [x, y, z] = xyz.map(lab_transfer);

    Lab::new(116.0 * y - 16.0, 500.0 * (x - y), 200.0 * (y - z))
}

/// Euclidean distance in L*a*b* space.
pub fn lab_distance(a: &Lab, b: &Lab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

fn decode_gamma(c: f64) -> f64 {
    if c > GAMMA_THRESHOLD {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn lab_transfer(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA * t + 16.0 / 116.0
    }
}

// ============================================================================
// Tests
// ============================================================================
