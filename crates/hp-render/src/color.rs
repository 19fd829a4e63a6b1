use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb` (leading `#` optional). Unparsable channels read as 0.
    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let channel = |range: std::ops::Range<usize>| {
            s.get(range).and_then(|h| u8::from_str_radix(h, 16).ok()).unwrap_or(0)
        };
        Self { r: channel(0..2), g: channel(2..4), b: channel(4..6), a: 1.0 }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Color::hex(&s))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

// --- Sequential colormaps ---

const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

const GREYS: &[&str] = &[
    "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525",
    "#000000",
];

const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4a89", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// Sequential colormap for density shading.
///
/// `Blues` and `Greys` run light → dark; `Viridis` runs dark → bright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Blues,
    Greys,
    Viridis,
}

impl Colormap {
    fn stops(self) -> &'static [&'static str] {
        match self {
            Self::Blues => BLUES,
            Self::Greys => GREYS,
            Self::Viridis => VIRIDIS,
        }
    }

    /// Color at `t ∈ [0, 1]`, piecewise linear between the stops.
    pub fn sample(self, t: f64) -> Color {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f64;
        let lo = (pos.floor() as usize).min(stops.len() - 2);
        Color::lerp(Color::hex(stops[lo]), Color::hex(stops[lo + 1]), pos - lo as f64)
    }
}

/// Linear normalisation of `value` into `[0, 1]` over `[min, max]`; 0 when the span is empty.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min { ((value - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luminance(c: Color) -> f64 {
        (0.299 * c.r as f64 + 0.587 * c.g as f64 + 0.114 * c.b as f64) / 255.0
    }

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#08306B");
        assert_eq!((c.r, c.g, c.b), (0x08, 0x30, 0x6b));
        assert_eq!(c.a, 1.0);
        assert_eq!(Color::hex("f7fbff"), Color::rgb(247, 251, 255));
    }

    #[test]
    fn short_hex_does_not_panic() {
        assert_eq!(Color::hex("#ab"), Color::rgb(0xab, 0, 0));
    }

    #[test]
    fn svg_fill_opaque_and_alpha() {
        let grid_line = Color::rgb(176, 176, 176);
        assert_eq!(grid_line.to_svg_fill(), "#b0b0b0");
        assert_eq!(grid_line.with_alpha(0.25).to_svg_fill(), "rgba(176,176,176,0.250)");
    }

    #[test]
    fn colormap_endpoints() {
        assert_eq!(Colormap::Blues.sample(0.0), Color::hex("#f7fbff"));
        assert_eq!(Colormap::Blues.sample(1.0), Color::hex("#08306b"));
        assert_eq!(Colormap::Viridis.sample(1.0), Color::hex("#fde725"));
        assert_eq!(Colormap::Greys.sample(2.0), Color::hex("#000000"));
        assert_eq!(Colormap::Greys.sample(f64::NAN), Color::hex("#ffffff"));
    }

    #[test]
    fn blues_darkens_monotonically() {
        let mut prev = f64::INFINITY;
        for i in 0..=20 {
            let l = luminance(Colormap::Blues.sample(i as f64 / 20.0));
            assert!(l <= prev + 1e-9, "luminance rose at step {i}");
            prev = l;
        }
    }

    #[test]
    fn normalize_spans() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
        assert_eq!(normalize(12.0, 0.0, 10.0), 1.0);
    }
}
