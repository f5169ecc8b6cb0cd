//! Small color helpers shared by the effects layer and the renderer.

/// An RGB triple in 0..=255 space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale all channels by `factor` (clamped to 0..=1).
    pub fn dim(self, factor: f64) -> Rgb {
        let f = factor.clamp(0.0, 1.0);
        Rgb(
            (self.0 as f64 * f) as u8,
            (self.1 as f64 * f) as u8,
            (self.2 as f64 * f) as u8,
        )
    }

    /// Linear blend toward `other` by `t` (0 = self, 1 = other).
    pub fn blend(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(lerp(self.0, other.0), lerp(self.1, other.1), lerp(self.2, other.2))
    }
}

/// Convert an HSL color to RGB. Hue in degrees (wraps), saturation and
/// lightness in 0..=1.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// The fixed rainbow palette assigned to a flock burst, in order.
pub const RAINBOW: [Rgb; 8] = [
    Rgb(0xFF, 0x00, 0x00), // red
    Rgb(0xFF, 0x7F, 0x00), // orange
    Rgb(0xFF, 0xFF, 0x00), // yellow
    Rgb(0x00, 0xFF, 0x00), // green
    Rgb(0x00, 0x00, 0xFF), // blue
    Rgb(0x4B, 0x00, 0x82), // indigo
    Rgb(0x94, 0x00, 0xD3), // violet
    Rgb(0xFF, 0x69, 0xB4), // hot pink
];

/// Firework burst colors, picked uniformly per firework.
pub const FIREWORK_COLORS: [Rgb; 8] = [
    Rgb(0xFF, 0x00, 0x00),
    Rgb(0x00, 0xFF, 0x00),
    Rgb(0x00, 0x00, 0xFF),
    Rgb(0xFF, 0xFF, 0x00),
    Rgb(0xFF, 0x00, 0xFF),
    Rgb(0x00, 0xFF, 0xFF),
    Rgb(0xFF, 0xA5, 0x00),
    Rgb(0xFF, 0x69, 0xB4),
];

/// Selectable goose body colors (name, rgb).
pub const GOOSE_COLORS: [(&str, Rgb); 4] = [
    ("Canada Brown", Rgb(0x69, 0x4D, 0x3C)),
    ("Snow White", Rgb(0xE8, 0xE8, 0xE8)),
    ("Golden", Rgb(0xD4, 0xA0, 0x17)),
    ("Slate Gray", Rgb(0x70, 0x80, 0x90)),
];

/// Base colors for the three parallax mountain layers, back to front.
pub const MOUNTAIN_BASE_COLORS: [Rgb; 3] = [
    Rgb(0x4B, 0x65, 0x84),
    Rgb(0x2C, 0x3A, 0x47),
    Rgb(0x1B, 0x26, 0x31),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb(0, 0, 255));
    }

    #[test]
    fn test_hsl_wraps_hue() {
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5));
        assert_eq!(hsl_to_rgb(-120.0, 1.0, 0.5), hsl_to_rgb(240.0, 1.0, 0.5));
    }

    #[test]
    fn test_hsl_grayscale_when_desaturated() {
        let c = hsl_to_rgb(200.0, 0.0, 0.5);
        assert_eq!(c.0, c.1);
        assert_eq!(c.1, c.2);
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Rgb(0, 0, 0);
        let b = Rgb(255, 255, 255);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
    }

    #[test]
    fn test_dim_clamps() {
        assert_eq!(Rgb(100, 100, 100).dim(2.0), Rgb(100, 100, 100));
        assert_eq!(Rgb(100, 100, 100).dim(0.0), Rgb(0, 0, 0));
    }
}
