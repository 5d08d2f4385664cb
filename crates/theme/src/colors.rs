/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BASE:   Self = Self { r: 0.937, g: 0.945, b: 0.961, a: 1.0 }; // #eff1f5
    pub const TEXT:   Self = Self { r: 0.298, g: 0.310, b: 0.412, a: 1.0 }; // #4c4f69
    pub const GREEN:  Self = Self { r: 0.251, g: 0.627, b: 0.169, a: 1.0 }; // #40a02b
    pub const RED:    Self = Self { r: 0.824, g: 0.059, b: 0.224, a: 1.0 }; // #d20f39
    pub const GRID:   Self = Self { r: 0.737, g: 0.753, b: 0.800, a: 1.0 }; // #bcc0cc
    pub const MAUVE:  Self = Self { r: 0.533, g: 0.224, b: 0.937, a: 1.0 }; // #8839ef

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |i: usize| -> Option<f32> {
            u8::from_str_radix(hex.get(i..i + 2)?, 16)
                .ok()
                .map(|b| b as f32 / 255.0)
        };

        match hex.len() {
            6 => Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 1.0 }),
            8 => Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }

    /// Convert to an [`iced::Color`] for use in Iced widgets.
    #[inline]
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        let c = Color::from_hex("#ff0000").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 1.0));

        let c = Color::from_hex("00ff0080").unwrap();
        assert_eq!(c.g, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("#gg0000").is_none());
        assert!(Color::from_hex("#ééé").is_none());
    }
}
