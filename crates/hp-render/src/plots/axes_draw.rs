use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::{TickDirection, VizConfig};
use crate::layout::axes::Axis;
use crate::layout::margins::{PlotArea, title_style};
use crate::primitives::*;

const INK: Color = Color::rgb(0, 0, 0);

type Segment = (f64, f64, f64, f64);

/// Which frame edge a set of ticks hangs off.
#[derive(Clone, Copy)]
enum Edge {
    Bottom,
    Top,
    Left,
    Right,
}

impl Edge {
    /// Tick segment at data position `pos`, `len` points long, positive `len`
    /// pointing away from the plot area.
    fn segment(self, area: &PlotArea, axis: &Axis, pos: f64, len: f64) -> Segment {
        let px = || axis.data_to_pixel(pos, area.left, area.right());
        let py = || axis.data_to_pixel(pos, area.bottom(), area.top);
        match self {
            Edge::Bottom => (px(), area.bottom(), px(), area.bottom() + len),
            Edge::Top => (px(), area.top, px(), area.top - len),
            Edge::Left => (area.left, py(), area.left - len, py()),
            Edge::Right => (area.right(), py(), area.right() + len, py()),
        }
    }
}

fn tick_marks(
    canvas: &mut Canvas,
    area: &PlotArea,
    axis: &Axis,
    edge: Edge,
    major: f64,
    minor: f64,
) {
    let major_pen = LineStyle::solid(INK, 0.6);
    let minor_pen = LineStyle::solid(INK, 0.4);
    for &pos in &axis.tick_positions {
        let (x1, y1, x2, y2) = edge.segment(area, axis, pos, major);
        canvas.line(x1, y1, x2, y2, &major_pen);
    }
    if minor != 0.0 {
        for &pos in &axis.minor_ticks {
            let (x1, y1, x2, y2) = edge.segment(area, axis, pos, minor);
            canvas.line(x1, y1, x2, y2, &minor_pen);
        }
    }
}

/// Frame, dashed grid, tick marks with labels and the two axis titles.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    let axes = &config.axes;
    let out = axes.tick_direction == TickDirection::Out;
    let sign = if out { 1.0 } else { -1.0 };
    let (major, minor) = (axes.tick_length * sign, axes.minor_tick_length * sign);
    let pad = if out { axes.tick_length + 2.0 } else { 3.0 };

    if config.grid.show {
        let pen = LineStyle::dashed(config.grid.color.with_alpha(config.grid.alpha), 0.5);
        for &v in &x_axis.tick_positions {
            let px = x_axis.data_to_pixel(v, area.left, area.right());
            canvas.line(px, area.top, px, area.bottom(), &pen);
        }
        for &v in &y_axis.tick_positions {
            let py = y_axis.data_to_pixel(v, area.bottom(), area.top);
            canvas.line(area.left, py, area.right(), py, &pen);
        }
    }

    draw_frame(canvas, area);

    tick_marks(canvas, area, x_axis, Edge::Bottom, major, minor);
    tick_marks(canvas, area, y_axis, Edge::Left, major, minor);
    if axes.show_top_ticks {
        tick_marks(canvas, area, x_axis, Edge::Top, major, 0.0);
    }
    if axes.show_right_ticks {
        tick_marks(canvas, area, y_axis, Edge::Right, major, 0.0);
    }

    let tick_text = TextStyle { size: config.font.tick_size, color: INK, ..Default::default() };
    let below = TextStyle {
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..tick_text.clone()
    };
    let beside =
        TextStyle { anchor: TextAnchor::End, baseline: TextBaseline::Central, ..tick_text };

    for (&v, label) in x_axis.tick_positions.iter().zip(&x_axis.tick_labels) {
        let px = x_axis.data_to_pixel(v, area.left, area.right());
        canvas.text(px, area.bottom() + pad, label, &below);
    }
    for (&v, label) in y_axis.tick_positions.iter().zip(&y_axis.tick_labels) {
        let py = y_axis.data_to_pixel(v, area.bottom(), area.top);
        canvas.text(area.left - pad - 1.0, py, label, &beside);
    }

    let title_text = TextStyle {
        size: config.font.label_size,
        color: INK,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    let mid_x = area.left + area.width / 2.0;
    let mid_y = area.top + area.height / 2.0;

    if !x_axis.label.is_empty() {
        let y = area.bottom() + pad + config.font.tick_size + config.font.label_size + 4.0;
        canvas.text(mid_x, y, &x_axis.label, &title_text);
    }
    if !y_axis.label.is_empty() {
        let widest = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &beside))
            .fold(0.0_f64, f64::max);
        let x = area.left - pad - widest - 8.0;
        canvas.text_rotated(x, mid_y, &y_axis.label, &title_text, -90.0);
    }
}

/// Centered title above the plot area.
pub fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, config: &VizConfig) {
    if title.is_empty() {
        return;
    }
    let style = TextStyle { anchor: TextAnchor::Middle, ..title_style(config) };
    canvas.text(area.left + area.width / 2.0, area.top - 8.0, title, &style);
}

/// Plain black box around the plot area.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let pen = LineStyle::solid(INK, 0.8);
    let (l, t, r, b) = (area.left, area.top, area.right(), area.bottom());
    for (x1, y1, x2, y2) in [(l, t, r, t), (l, b, r, b), (l, t, l, b), (r, t, r, b)] {
        canvas.line(x1, y1, x2, y2, &pen);
    }
}
