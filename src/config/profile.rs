//! Static look of an overlay effect: tint color and cinematic adjustments.

/// RGBA tint, each component in 0..1.
///
/// The layout is C-compatible so the profile can be handed to C hosts as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tint {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha, i.e. tint strength
    pub a: f32,
}

impl Tint {
    /// No tint.
    pub const NONE: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a tint from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from a 24-bit hex color (e.g., `0xFF5500`) with zero alpha.
    #[inline]
    pub fn from_rgb_u32(hex: u32) -> Self {
        Self::from_rgba_u32((hex << 8) & 0xFFFF_FF00)
    }

    /// Create from a 32-bit hex color with alpha in the low byte
    /// (e.g., `0xFF550080`).
    #[inline]
    pub fn from_rgba_u32(hex: u32) -> Self {
        let byte = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::new(byte(24), byte(16), byte(8), byte(0))
    }

    /// Parse a tint written as `#RRGGBB`, `#RRGGBBAA` or `r,g,b[,a]`.
    ///
    /// Spaces and parentheses are ignored, as are letters in the
    /// comma-separated form (`rgba(255, 0, 0, 0.5)` works). Missing or
    /// unreadable components are left at zero. Component values are
    /// returned as written; see [`Tint::scaled`].
    ///
    /// Returns `None` when the text cannot be read as a color at all.
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
            .collect();

        if let Some(hex) = cleaned.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16).ok()?;
            return match hex.len() {
                6 => Some(Self::from_rgb_u32(value)),
                8 => Some(Self::from_rgba_u32(value)),
                _ => None,
            };
        }

        let numeric: String = cleaned.chars().filter(|c| !c.is_alphabetic()).collect();
        if numeric.is_empty() {
            return None;
        }
        let mut components = [0.0_f32; 4];
        for (slot, part) in components.iter_mut().zip(numeric.split(',')) {
            if let Ok(value) = part.parse::<f32>() {
                *slot = value;
            }
        }
        let [r, g, b, a] = components;
        Some(Self::new(r, g, b, a))
    }

    /// Components above 1 are read as 0..255 and divided down.
    #[must_use]
    pub fn scaled(self) -> Self {
        let scale = |v: f32| if v > 1.0 { v / 255.0 } else { v };
        Self::new(scale(self.r), scale(self.g), scale(self.b), scale(self.a))
    }

    /// Whether every component lies in 0..=1.
    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

/// An additive/multiplicative pair applied to one image property.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cinematic {
    /// Added to the property.
    pub add: f32,
    /// Multiplies the property.
    pub mult: f32,
}

impl Default for Cinematic {
    fn default() -> Self {
        Self {
            add: 0.0,
            mult: 1.0,
        }
    }
}

/// Everything about an effect that does not change tick to tick.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectProfile {
    /// Color tint.
    pub tint: Tint,
    /// Contrast adjustment.
    pub contrast: Cinematic,
    /// Brightness adjustment.
    pub brightness: Cinematic,
    /// Saturation adjustment.
    pub saturation: Cinematic,
}
