/// Axis with fixed limits, tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Axis pinned to `[min, max]` with "nice number" ticks inside the limits.
    ///
    /// The limits are never widened to the next nice value.
    pub fn fixed_linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let mut axis = Self {
            min,
            max,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        };
        let range = max - min;
        if !(range.is_finite() && range > 0.0) {
            return axis;
        }

        let step = nice_step(range / (target_ticks.max(2) - 1) as f64);
        let eps = step * 1e-9;
        let first = (min / step - 1e-9).ceil();
        let mut k = 0.0;
        loop {
            let v = (first + k) * step;
            if v > max + eps {
                break;
            }
            axis.tick_positions.push(v);
            axis.tick_labels.push(format_tick(v, step));
            k += 1.0;
        }

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        let first_minor = (min / minor_step - 1e-9).ceil();
        let mut k = 0.0;
        loop {
            let mv = (first_minor + k) * minor_step;
            if mv > max + eps {
                break;
            }
            if !axis.tick_positions.iter().any(|t| (t - mv).abs() < minor_step * 0.01) {
                axis.minor_ticks.push(mv);
            }
            k += 1.0;
        }

        axis
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", v, prec = decimals)
    }
}
