use crate::canvas::Canvas;
use crate::config::{TickDirection, VizConfig};
use crate::layout::axes::Axis;
use crate::primitives::{FontWeight, TextStyle};

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Compute margins from axis labels, title and config.
    ///
    /// `right_reserve` is extra space kept free on the right (colorbar).
    pub fn auto(
        canvas: &Canvas,
        x_axis: &Axis,
        y_axis: &Axis,
        config: &VizConfig,
        right_reserve: f64,
    ) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
        let outward = match config.axes.tick_direction {
            TickDirection::Out => config.axes.tick_length,
            TickDirection::In => 0.0,
        };

        // Left margin: y-axis tick labels + axis label + padding
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style))
            .fold(0.0_f64, f64::max);
        let mut left = 12.0 + outward + max_tick_w + 6.0;
        if !y_axis.label.is_empty() {
            left += config.font.label_size + 8.0; // axis label (rotated)
        }

        // Bottom margin: x-axis tick labels + axis label + padding
        let mut bottom = 10.0 + outward + tick_style.size + 4.0;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size + 8.0;
        }

        let top = if config.labels.title.is_empty() {
            12.0
        } else {
            config.font.title_size * 1.3 + 14.0
        };

        let right = 15.0 + right_reserve;

        let width = canvas.width - left - right;
        let height = canvas.height - top - bottom;

        Self { left, top, width: width.max(50.0), height: height.max(50.0) }
    }
}

/// Style used for the figure title.
pub fn title_style(config: &VizConfig) -> TextStyle {
    TextStyle { size: config.font.title_size, weight: FontWeight::Bold, ..Default::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_fonts;

    #[test]
    fn auto_fits_inside_canvas() {
        let config = VizConfig::default();
        let canvas = Canvas::new(config.figure.width, config.figure.height, test_fonts());
        let x = Axis::fixed_linear(-1.0, 31.0, 8).with_label("X");
        let y = Axis::fixed_linear(-1.0, 31.0, 8).with_label("Y");
        let area = PlotArea::auto(&canvas, &x, &y, &config, 60.0);
        assert!(area.left > 0.0 && area.top > 0.0);
        assert!(area.right() + 60.0 <= canvas.width);
        assert!(area.bottom() < canvas.height);
    }

    #[test]
    fn empty_title_shrinks_top_margin() {
        let mut config = VizConfig::default();
        let canvas = Canvas::new(400.0, 300.0, test_fonts());
        let x = Axis::fixed_linear(0.0, 1.0, 5);
        let y = Axis::fixed_linear(0.0, 1.0, 5);
        let with_title = PlotArea::auto(&canvas, &x, &y, &config, 0.0);
        config.labels.title.clear();
        let without = PlotArea::auto(&canvas, &x, &y, &config, 0.0);
        assert!(without.top < with_title.top);
    }
}
