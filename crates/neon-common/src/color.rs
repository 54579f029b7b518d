//! RGB colors and HSV conversion.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Linear RGB color, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgb {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Converts hue, saturation and value to RGB.
    ///
    /// `hue` is measured in sectors, `[0, 6)`, rather than degrees.
    #[must_use]
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        if hue == 0.0 && saturation == 0.0 {
            return Self::new(value, value, value);
        }

        let c = saturation * value;
        let x = c * (1.0 - (hue % 2.0 - 1.0).abs());
        let m = value - c;

        if hue < 1.0 {
            Self::new(c + m, x + m, m)
        } else if hue < 2.0 {
            Self::new(x + m, c + m, m)
        } else if hue < 3.0 {
            Self::new(m, c + m, x + m)
        } else if hue < 4.0 {
            Self::new(m, x + m, c + m)
        } else if hue < 5.0 {
            Self::new(x + m, m, c + m)
        } else {
            Self::new(c + m, m, x + m)
        }
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Returns RGBA channels with the given alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(value: [f32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}
