//! RGB color with hex and HSL helpers

use serde::{Deserialize, Serialize};

/// RGB color, channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Hue, saturation, lightness, each in [0, 1]
    pub fn to_hsl(&self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let lightness = (min + max) / 2.0;

        if (max - min).abs() < f32::EPSILON {
            return (0.0, 0.0, lightness);
        }

        let delta = max - min;
        let saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let hue = if max == self.r {
            (self.g - self.b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        (hue / 6.0, saturation, lightness)
    }

    /// Build from HSL. Hue wraps around, saturation and lightness clamp to [0, 1].
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l);
        }

        let p = if l <= 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let q = 2.0 * l - p;

        Self {
            r: hue_to_rgb(q, p, h + 1.0 / 3.0),
            g: hue_to_rgb(q, p, h),
            b: hue_to_rgb(q, p, h - 1.0 / 3.0),
        }
    }

    /// Shift hue, saturation, and lightness by the given offsets
    pub fn offset_hsl(&self, dh: f32, ds: f32, dl: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h + dh, s + ds, l + dl)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
        assert_eq!(c.to_hex(), 0xFF8844);
    }

    #[test]
    fn hsl_round_trip_preserves_palette_colors() {
        for hex in [0x228B22, 0xFF69B4, 0x4169E1, 0xFFD700, 0x808080] {
            let c = Color::from_hex(hex);
            let (h, s, l) = c.to_hsl();
            assert!(close(Color::from_hsl(h, s, l), c), "hex {hex:06x}");
        }
    }

    #[test]
    fn pure_red_hsl() {
        let (h, s, l) = Color::new(1.0, 0.0, 0.0).to_hsl();
        assert!(h.abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
        assert!((l - 0.5).abs() < 1e-6);
    }

    #[test]
    fn offset_wraps_hue_and_clamps_lightness() {
        let red = Color::new(1.0, 0.0, 0.0);
        // A full turn of hue lands back on red
        assert!(close(red.offset_hsl(1.0, 0.0, 0.0), red));
        // Lightness pushed past 1 saturates to white
        assert!(close(red.offset_hsl(0.0, 0.0, 2.0), Color::WHITE));
    }
}
