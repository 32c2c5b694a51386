//! RGBA color values and the canonical palette distance metric

use rand::Rng;
use rand::rngs::StdRng;

/// An RGBA color with all channels in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
    /// Alpha channel (255 = opaque)
    pub alpha: u8,
}

impl Rgba {
    /// Opaque white, the default flattening background
    pub const WHITE: Self = Self::gray(255);

    /// Create a color from all four channels
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create a fully opaque color
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Create an opaque gray with all three color channels equal
    pub const fn gray(value: u8) -> Self {
        Self::opaque(value, value, value)
    }

    /// Read a color from a 4-byte RGBA chunk; missing bytes default to zero
    pub(crate) fn from_bytes(chunk: &[u8]) -> Self {
        Self::new(
            chunk.first().copied().unwrap_or(0),
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
            chunk.get(3).copied().unwrap_or(0),
        )
    }

    /// Draw an opaque random color from a seeded generator
    pub fn random(rng: &mut StdRng) -> Self {
        Self::opaque(rng.random(), rng.random(), rng.random())
    }

    /// Pack all four channels into a single integer, usable as a cache key
    pub const fn key(self) -> u32 {
        ((self.red as u32) << 24)
            | ((self.green as u32) << 16)
            | ((self.blue as u32) << 8)
            | self.alpha as u32
    }

    /// Composite a partially transparent color onto an opaque background
    ///
    /// Fully opaque colors are returned unchanged; anything else blends each
    /// channel by the alpha factor and becomes opaque.
    pub fn flatten_onto(self, background: Self) -> Self {
        if self.alpha == 255 {
            return self;
        }
        let factor = f64::from(self.alpha) / 255.0;
        let blend = |color: u8, back: u8| -> u8 {
            let value = f64::from(back).mul_add(1.0 - factor, f64::from(color) * factor);
            value.round().clamp(0.0, 255.0) as u8
        };
        Self::opaque(
            blend(self.red, background.red),
            blend(self.green, background.green),
            blend(self.blue, background.blue),
        )
    }

    /// Weighted squared channel distance to another color
    ///
    /// The single distance metric used everywhere in the crate: green
    /// differences weigh heaviest, then blue, then red. Callers flatten both
    /// colors onto the background before comparing; alpha itself is ignored.
    pub fn distance_squared(self, other: Self) -> f64 {
        let dr = f64::from(self.red) - f64::from(other.red);
        let dg = f64::from(self.green) - f64::from(other.green);
        let db = f64::from(self.blue) - f64::from(other.blue);
        3.0f64.mul_add(db * db, 2.0f64.mul_add(dr * dr, 4.0 * (dg * dg)))
    }

    /// Hex string for markup output, using the 3-digit short form when all
    /// three channel bytes have doubled nibbles
    pub fn to_hex(self) -> String {
        let channels = [self.red, self.green, self.blue];
        if channels.iter().all(|&c| c >> 4 == c & 0x0f) {
            format!("#{:x}{:x}{:x}", self.red >> 4, self.green >> 4, self.blue >> 4)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        }
    }

    /// Parse a `#rgb` or `#rrggbb` hex string
    ///
    /// Returns `None` for any other shape or for non-hex digits.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        match digits.len() {
            3 => {
                let mut nibbles = digits.chars().filter_map(|c| c.to_digit(16));
                let r = nibbles.next()? as u8;
                let g = nibbles.next()? as u8;
                let b = nibbles.next()? as u8;
                Some(Self::opaque(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let channel = |range: std::ops::Range<usize>| {
                    digits
                        .get(range)
                        .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                };
                Some(Self::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn test_flatten_blends_towards_background() {
        let translucent = Rgba::new(0, 0, 0, 127);
        let flattened = translucent.flatten_onto(Rgba::WHITE);
        assert_eq!(flattened.alpha, 255);
        assert!(flattened.red > 120 && flattened.red < 136);
    }

    #[test]
    fn test_hex_round_trip_and_short_form() {
        assert_eq!(Rgba::opaque(255, 0, 128).to_hex(), "#ff0080");
        assert_eq!(Rgba::opaque(255, 255, 255).to_hex(), "#fff");
        assert_eq!(Rgba::from_hex("#ff0080"), Some(Rgba::opaque(255, 0, 128)));
        assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::opaque(255, 255, 255)));
        assert_eq!(Rgba::from_hex("not a color"), None);
    }

    #[test]
    fn test_distance_weighs_green_heaviest() {
        let base = Rgba::gray(0);
        let red = Rgba::opaque(10, 0, 0);
        let green = Rgba::opaque(0, 10, 0);
        assert!(base.distance_squared(green) > base.distance_squared(red));
        assert!((base.distance_squared(base)).abs() < f64::EPSILON);
    }
}
