//! In-memory tables loaded from delimited text.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{DataLoadError, Error, Result};

/// A single typed column.
///
/// Typing happens once at load time: a column whose every field parses as
/// `f64` is numeric, anything else stays text.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// All fields parsed as floats
    Numeric(Vec<f64>),
    /// At least one field is not a number
    Text(Vec<String>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let parsed: Option<Vec<f64>> = fields.iter().map(|s| s.parse::<f64>().ok()).collect();
        match parsed {
            Some(values) => Column::Numeric(values),
            None => Column::Text(fields),
        }
    }
}

/// Ordered collection of equally long named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from already typed columns.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(DataLoadError::Schema(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            ))
            .into());
        }
        check_unique(&names)?;
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some((name, col)) =
            names.iter().zip(&columns).find(|(_, c)| c.len() != n_rows)
        {
            return Err(DataLoadError::Schema(format!(
                "column '{name}' has {} rows, expected {n_rows}",
                col.len()
            ))
            .into());
        }
        Ok(Self { names, columns, n_rows })
    }

    /// Parse delimited text with a header row.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> =
            rdr.headers().map_err(map_csv_error)?.iter().map(|h| h.to_string()).collect();

        if headers.is_empty() {
            return Err(DataLoadError::Schema("missing header row".into()).into());
        }
        check_unique(&headers)?;

        let n_cols = headers.len();
        let mut fields: Vec<Vec<String>> = vec![Vec::new(); n_cols];
        for result in rdr.records() {
            let record = result.map_err(map_csv_error)?;
            for (j, field) in record.iter().enumerate() {
                fields[j].push(field.to_string());
            }
        }

        let columns = fields.into_iter().map(Column::from_fields).collect();
        Self::new(headers, columns)
    }

    /// Number of data rows (header excluded).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names.iter().position(|n| n == name).map(|i| &self.columns[i])
    }
}

/// Default delimiter for a path: tab for `.tsv`, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Load a delimited file with a header row into a [`Table`].
pub fn load_csv(path: &Path, delimiter: u8) -> Result<Table> {
    tracing::debug!(path = %path.display(), delimiter = %(delimiter as char), "loading table");

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::NotFound(path.to_path_buf()),
        _ => DataLoadError::Io { path: path.to_path_buf(), source: e },
    })?;
    let table = Table::from_reader(file, delimiter)?;

    tracing::info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.n_cols(),
        "table loaded"
    );
    Ok(table)
}

fn check_unique(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(DataLoadError::Schema(format!("duplicate column '{name}'")).into());
        }
    }
    Ok(())
}

fn map_csv_error(err: csv::Error) -> Error {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let load_err = match err.into_kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => DataLoadError::Schema(format!(
            "record on line {line} has {len} fields, header has {expected_len}"
        )),
        csv::ErrorKind::Io(source) => DataLoadError::Parse { line, message: source.to_string() },
        csv::ErrorKind::Utf8 { err, .. } => DataLoadError::Parse { line, message: err.to_string() },
        other => DataLoadError::Parse { line, message: format!("{other:?}") },
    };
    load_err.into()
}
