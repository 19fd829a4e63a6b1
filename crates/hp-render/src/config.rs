use serde::Deserialize;

use crate::color::{Color, Colormap};

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub labels: LabelsConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub hexbin: HexbinStyleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 460.8,  // 6.4" * 72
            height: 345.6, // 4.8" * 72
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "DejaVu Sans, Arial, Helvetica, sans-serif".into(),
            title_size: 12.0,
            label_size: 10.0,
            tick_size: 8.5,
        }
    }
}

/// Text burned into the figure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self { title: "Repulsive particles grid".into(), x_label: "X".into(), y_label: "Y".into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickDirection {
    In,
    #[default]
    Out,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: TickDirection,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    /// Approximate number of major ticks per axis.
    pub target_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: TickDirection::Out,
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 3.5,
            minor_tick_length: 2.0,
            target_ticks: 8,
        }
    }
}

/// Reference lines at major ticks, drawn over the hexagons.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::hex("#CBD5E1"), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HexbinStyleConfig {
    pub colormap: Colormap,
    /// Hexagon outline; `None` strokes each cell in its own fill color.
    pub edge_color: Option<Color>,
    pub edge_width: f64,
    pub show_colorbar: bool,
    pub colorbar_label: String,
}

impl Default for HexbinStyleConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::Blues,
            edge_color: None,
            edge_width: 0.25,
            show_colorbar: false,
            colorbar_label: "count".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Raster resolution; the figure is sized in points (1/72").
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 100 }
    }
}

impl VizConfig {
    /// Reject values that cannot produce an image.
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.figure.width > 0.0 && self.figure.height > 0.0) {
            return Err(crate::RenderError::Config(format!(
                "figure size must be positive, got {}x{}",
                self.figure.width, self.figure.height
            )));
        }
        if self.output.dpi == 0 {
            return Err(crate::RenderError::Config("output.dpi must be positive".into()));
        }
        if self.axes.target_ticks < 2 {
            return Err(crate::RenderError::Config("axes.target_ticks must be >= 2".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = VizConfig::default();
        assert_eq!(c.labels.title, "Repulsive particles grid");
        assert_eq!(c.labels.x_label, "X");
        assert_eq!(c.labels.y_label, "Y");
        assert_eq!(c.hexbin.colormap, Colormap::Blues);
        assert!(!c.hexbin.show_colorbar);
        assert_eq!(c.output.dpi, 100);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r##"
labels:
  title: "Density"
hexbin:
  colormap: viridis
  edge_color: "#000000"
axes:
  tick_direction: in
"##;
        let c: VizConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(c.labels.title, "Density");
        assert_eq!(c.labels.x_label, "X");
        assert_eq!(c.hexbin.colormap, Colormap::Viridis);
        assert_eq!(c.hexbin.edge_color, Some(Color::rgb(0, 0, 0)));
        assert!(!c.hexbin.show_colorbar);
        assert_eq!(c.axes.tick_direction, TickDirection::In);
        assert_eq!(c.axes.target_ticks, 8);
    }

    #[test]
    fn colorbar_enabled_from_yaml() {
        let c: VizConfig =
            serde_yaml_ng::from_str("hexbin:\n  show_colorbar: true\n").unwrap();
        assert!(c.hexbin.show_colorbar);
        assert_eq!(c.hexbin.colorbar_label, "count");
    }

    #[test]
    fn invalid_values_rejected() {
        let mut c = VizConfig::default();
        c.output.dpi = 0;
        assert!(c.validate().is_err());

        let mut c = VizConfig::default();
        c.figure.width = -1.0;
        assert!(c.validate().is_err());
    }
}
