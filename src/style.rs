//! Colors and the dashboard's fixed palettes.
//!
//! Every chart draws on the same dark theme. Series colors are either fixed per
//! key (asset types, the macro chart's two lines) or assigned from the Tableau 10
//! palette by position (chains, protocols), so the same key keeps its color for
//! the lifetime of a chart.

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 {
            return None;
        }
        u32::from_str_radix(s, 16).ok().map(Self::hex)
    }

    /// `#rrggbb`, alpha ignored.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Combined alpha in `0.0..=1.0` after applying an element opacity.
    pub fn alpha_with(&self, opacity: f32) -> f32 {
        (self.a as f32 / 255.0) * opacity.clamp(0.0, 1.0)
    }
}

/// d3 `schemeTableau10`.
pub const TABLEAU10: [Rgba; 10] = [
    Rgba::hex(0x4e79a7), // blue
    Rgba::hex(0xf28e2c), // orange
    Rgba::hex(0xe15759), // red
    Rgba::hex(0x76b7b2), // teal
    Rgba::hex(0x59a14f), // green
    Rgba::hex(0xedc949), // yellow
    Rgba::hex(0xaf7aa1), // purple
    Rgba::hex(0xff9da7), // pink
    Rgba::hex(0x9c755f), // brown
    Rgba::hex(0xbab0ab), // gray
];

/// Get a color from the Tableau palette.
#[inline]
pub fn tableau_color(idx: usize) -> Rgba {
    TABLEAU10[idx % TABLEAU10.len()]
}

/// Fixed colors for the RWA asset types, in stack order.
pub fn asset_type_color(asset_type: &str) -> Rgba {
    match asset_type {
        "Diversified" => Rgba::hex(0x60a5fa),
        "Private Credit" => Rgba::hex(0xf59e0b),
        "Treasury" => Rgba::hex(0xef4444),
        _ => Rgba::hex(0x94a3b8),
    }
}

pub const RWA_TVL: Rgba = Rgba::hex(0x60a5fa);
pub const STABLECOINS: Rgba = Rgba::hex(0xfbbf24);
pub const YIELD_LINE: Rgba = Rgba::hex(0x16a34a);

// Theme
pub const BACKGROUND: Rgba = Rgba::hex(0x0b1020);
pub const PANEL: Rgba = Rgba::hex(0x020617);
pub const TEXT: Rgba = Rgba::hex(0xe5e7eb);
pub const MUTED_TEXT: Rgba = Rgba::hex(0xcbd5e1);
pub const AXIS: Rgba = Rgba::hex(0x9ca3af);
pub const CROSSHAIR: Rgba = Rgba::hex(0xe5e7eb);
pub const TOOLTIP_BG: Rgba = Rgba::new(17, 24, 39, 235);
pub const TOOLTIP_BORDER: Rgba = Rgba::hex(0x374151);
pub const NEEDLE: Rgba = Rgba::hex(0xffffff);
pub const GAUGE_HUB_RING: Rgba = Rgba::hex(0x1f2937);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let c = Rgba::parse_hex("#60a5fa").unwrap();
        assert_eq!(c, Rgba::rgb(0x60, 0xa5, 0xfa));
        assert_eq!(c.to_hex(), "#60a5fa");
        assert!(Rgba::parse_hex("#fff").is_none());
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(tableau_color(0), tableau_color(10));
        assert_ne!(tableau_color(0), tableau_color(1));
    }
}
