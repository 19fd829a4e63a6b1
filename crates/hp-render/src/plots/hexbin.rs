use hp_data::HexCounts;

use crate::canvas::Canvas;
use crate::color::{Color, normalize};
use crate::config::VizConfig;
use crate::font::FontHandle;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{draw_axes, draw_title};
use crate::primitives::*;

const COLORBAR_GAP: f64 = 12.0;
const COLORBAR_WIDTH: f64 = 12.0;
const COLORBAR_STEPS: usize = 64;

/// Axes pinned to the grid bounds, independent of where the points fell.
pub fn axes_for(counts: &HexCounts, config: &VizConfig) -> (Axis, Axis) {
    let grid = &counts.grid;
    let ticks = config.axes.target_ticks;
    let x = Axis::fixed_linear(grid.x_range[0], grid.x_range[1], ticks)
        .with_label(&config.labels.x_label);
    let y = Axis::fixed_linear(grid.y_range[0], grid.y_range[1], ticks)
        .with_label(&config.labels.y_label);
    (x, y)
}

/// Render a hexbin density plot to SVG string, laid out with `fonts`.
pub fn render(counts: &HexCounts, config: &VizConfig, fonts: &FontHandle) -> crate::Result<String> {
    config.validate()?;

    let mut canvas = Canvas::new(config.figure.width, config.figure.height, fonts);
    let (x_axis, y_axis) = axes_for(counts, config);

    let (min, max) = (counts.min_count(), counts.max_count());
    let style = &config.hexbin;
    let cb_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::Start,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let colorbar_reserve = if style.show_colorbar {
        let widest = [min.to_string(), max.to_string()]
            .iter()
            .map(|l| canvas.measure_text(l, &cb_label_style))
            .fold(0.0_f64, f64::max);
        let title_w =
            if style.colorbar_label.is_empty() { 0.0 } else { config.font.label_size + 6.0 };
        COLORBAR_GAP + COLORBAR_WIDTH + 4.0 + widest + title_w
    } else {
        0.0
    };

    let area = PlotArea::auto(&canvas, &x_axis, &y_axis, config, colorbar_reserve);

    // Cells, clipped to the axes box
    canvas.push_clip(area.left, area.top, area.width, area.height);
    for cell in counts.cells() {
        let fill = style.colormap.sample(normalize(cell.count as f64, min as f64, max as f64));
        let points: Vec<(f64, f64)> = counts
            .hexagon(cell.center)
            .iter()
            .map(|&(x, y)| {
                (
                    x_axis.data_to_pixel(x, area.left, area.right()),
                    y_axis.data_to_pixel(y, area.bottom(), area.top),
                )
            })
            .collect();
        let cell_style =
            Style::filled(fill).with_stroke(style.edge_color.unwrap_or(fill), style.edge_width);
        canvas.polygon(&points, &cell_style);
    }
    canvas.pop_clip();

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_title(&mut canvas, &area, &config.labels.title, config);

    if style.show_colorbar {
        draw_colorbar(&mut canvas, &area, min, max, config, &cb_label_style);
    }

    tracing::debug!(
        cells = counts.n_cells(),
        populated = counts.populated(),
        min_count = min,
        max_count = max,
        "hexbin rendered"
    );

    Ok(canvas.finish_svg())
}

fn draw_colorbar(
    canvas: &mut Canvas,
    area: &PlotArea,
    min: u64,
    max: u64,
    config: &VizConfig,
    label_style: &TextStyle,
) {
    let cmap = config.hexbin.colormap;
    let cb_x = area.right() + COLORBAR_GAP;
    let step_h = area.height / COLORBAR_STEPS as f64;
    for i in 0..COLORBAR_STEPS {
        // top of the bar is the maximum
        let t = 1.0 - i as f64 / (COLORBAR_STEPS - 1) as f64;
        let y = area.top + i as f64 * step_h;
        canvas.rect(cb_x, y, COLORBAR_WIDTH, step_h + 0.5, &Style::filled(cmap.sample(t)));
    }
    canvas.rect(
        cb_x,
        area.top,
        COLORBAR_WIDTH,
        area.height,
        &Style::stroked(Color::rgb(0, 0, 0), 0.6),
    );

    let text_x = cb_x + COLORBAR_WIDTH + 4.0;
    canvas.text(text_x, area.top, &max.to_string(), label_style);
    canvas.text(text_x, area.bottom(), &min.to_string(), label_style);

    if !config.hexbin.colorbar_label.is_empty() {
        let widest = canvas
            .measure_text(&max.to_string(), label_style)
            .max(canvas.measure_text(&min.to_string(), label_style));
        let style = TextStyle {
            size: config.font.label_size,
            anchor: TextAnchor::Middle,
            ..Default::default()
        };
        canvas.text_rotated(
            text_x + widest + config.font.label_size,
            area.top + area.height / 2.0,
            &config.hexbin.colorbar_label,
            &style,
            -90.0,
        );
    }
}
