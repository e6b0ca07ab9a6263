//! CSS hex color parsing.
//!
//! Shape styles store colors as the strings the inspector produced
//! (`#RGB`, `#RRGGBB`, `#RRGGBBAA`). The renderer resolves them to [`Rgba`]
//! here, falling back to a per-role default when a value does not parse.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// A straight-alpha color with 8-bit channels and a float alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Multiply the alpha channel by `alpha`, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { a: (self.a * alpha).clamp(0.0, 1.0), ..self }
    }

    /// Alpha as an 8-bit channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn alpha_u8(self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Format as a CSS `rgba()` string, for targets that take color strings.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn hex_byte(digits: &str) -> Option<u8> {
    match u8::from_str_radix(digits, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn hex_nibble(digit: &str) -> Option<u8> {
    hex_byte(&digit.repeat(2))
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` into a color.
#[must_use]
pub fn parse_hex(raw: &str) -> Option<Rgba> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some(Rgba::opaque(
            hex_nibble(&hex[0..1])?,
            hex_nibble(&hex[1..2])?,
            hex_nibble(&hex[2..3])?,
        )),
        6 => Some(Rgba::opaque(hex_byte(&hex[0..2])?, hex_byte(&hex[2..4])?, hex_byte(&hex[4..6])?)),
        8 => {
            let a = hex_byte(&hex[6..8])?;
            Some(Rgba {
                r: hex_byte(&hex[0..2])?,
                g: hex_byte(&hex[2..4])?,
                b: hex_byte(&hex[4..6])?,
                a: f64::from(a) / 255.0,
            })
        }
        _ => None,
    }
}

/// Parse `raw`, or `fallback` when `raw` is not a valid hex color.
#[must_use]
pub fn parse_or(raw: &str, fallback: Rgba) -> Rgba {
    parse_hex(raw).unwrap_or(fallback)
}
