//! ARGB colors and the hex string encoding used as palette keys.

/// 8-bit ARGB color.
///
/// The hex form (`#RRGGBB`) is the canonical key for palette and material
/// deduplication; the alpha channel only feeds opacity derivation and is
/// never part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Black (0, 0, 0).
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White (255, 255, 255).
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Dark gray (169, 169, 169) -- the default specular color.
    pub const DARK_GRAY: Self = Self::rgb(169, 169, 169);

    /// Create a fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#RRGGBB` string. Alpha is intentionally excluded.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Whether the alpha channel carries any translucency.
    pub fn is_translucent(&self) -> bool {
        self.a < 255
    }

    /// Alpha as an opacity factor in [0, 1].
    pub fn alpha_opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}
