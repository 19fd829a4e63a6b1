//! Column extraction into coordinate sequences.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// Paired coordinate sequences; `xs[i]` and `ys[i]` form one point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Points {
    /// Horizontal coordinates
    pub xs: Vec<f64>,
    /// Vertical coordinates
    pub ys: Vec<f64>,
}

impl Points {
    /// Pair two sequences, rejecting unequal lengths.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::ShapeMismatch { xs: xs.len(), ys: ys.len() });
        }
        Ok(Self { xs, ys })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Read one numeric column, preserving row order.
pub fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>> {
    match table.column(name) {
        None => Err(Error::ColumnExtraction {
            column: name.to_string(),
            reason: format!("no such column (available: {})", table.column_names().join(", ")),
        }),
        Some(Column::Numeric(values)) => Ok(values.clone()),
        Some(Column::Text(values)) => {
            // Typing already failed for this column, report the first culprit.
            let (row, bad) = values
                .iter()
                .enumerate()
                .find(|(_, s)| s.parse::<f64>().is_err())
                .map(|(i, s)| (i, s.as_str()))
                .unwrap_or((0, ""));
            Err(Error::ColumnExtraction {
                column: name.to_string(),
                reason: format!("non-numeric value '{bad}' in data row {}", row + 1),
            })
        }
    }
}

/// Extract the `x_col` / `y_col` pair from a table.
pub fn extract_points(table: &Table, x_col: &str, y_col: &str) -> Result<Points> {
    let xs = numeric_column(table, x_col)?;
    let ys = numeric_column(table, y_col)?;
    tracing::debug!(column = x_col, values = ?xs, "extracted x values");
    tracing::debug!(column = y_col, values = ?ys, "extracted y values");
    Points::new(xs, ys)
}
