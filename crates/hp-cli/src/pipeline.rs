//! Load → extract → bin → render, driven by one explicit config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hp_data::HexGrid;
use hp_render::config::VizConfig;
use serde::Deserialize;

/// Everything a run needs. Defaults reproduce the classic
/// `data.csv` → `Grid.png` conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Delimited input file with a header row
    pub input: PathBuf,
    /// Output image; extension picks the format
    pub output: PathBuf,
    pub x_column: String,
    pub y_column: String,
    /// Field separator; inferred from the input extension when unset
    pub delimiter: Option<char>,
    pub grid: HexGrid,
    pub viz: VizConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            output: PathBuf::from("Grid.png"),
            x_column: "x".into(),
            y_column: "y".into(),
            delimiter: None,
            grid: HexGrid::default(),
            viz: VizConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML config; absent keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).context("invalid pipeline config")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }

    fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter {
            None => Ok(hp_data::table::delimiter_for(&self.input)),
            Some(c) if c.is_ascii() => Ok(c as u8),
            Some(c) => anyhow::bail!("delimiter must be a single ASCII character, got {c:?}"),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub binned: u64,
    pub dropped: u64,
    pub max_count: u64,
    pub output: PathBuf,
}

/// Run the full pipeline. Nothing is written unless every stage succeeds.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let delimiter = config.delimiter_byte()?;

    tracing::info!(path = %config.input.display(), "loading table");
    let table = hp_data::load_csv(&config.input, delimiter)
        .with_context(|| format!("failed to load {}", config.input.display()))?;

    let points = hp_data::extract_points(&table, &config.x_column, &config.y_column)
        .context("failed to extract coordinates")?;
    tracing::info!(
        points = points.len(),
        x = %config.x_column,
        y = %config.y_column,
        "points extracted"
    );

    let counts = config.grid.bin_points(&points).context("failed to bin points")?;
    tracing::info!(
        binned = counts.binned,
        dropped = counts.dropped,
        populated = counts.populated(),
        "points binned"
    );

    hp_render::render_to_file(&counts, &config.output, &config.viz)
        .with_context(|| format!("failed to render {}", config.output.display()))?;
    tracing::info!(path = %config.output.display(), "plot written");

    Ok(RunSummary {
        rows: table.n_rows(),
        binned: counts.binned,
        dropped: counts.dropped,
        max_count: counts.max_count(),
        output: config.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_path(filename: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!(
            "hexplot_pipeline_{}_{}_{}",
            std::process::id(),
            nanos,
            filename
        ))
    }

    fn config_for(csv: &str, output: &str) -> PipelineConfig {
        let input = tmp_path("input.csv");
        std::fs::write(&input, csv).unwrap();
        PipelineConfig { input, output: tmp_path(output), ..PipelineConfig::default() }
    }

    #[test]
    fn defaults() {
        let c = PipelineConfig::default();
        assert_eq!(c.input, PathBuf::from("data.csv"));
        assert_eq!(c.output, PathBuf::from("Grid.png"));
        assert_eq!(c.grid.grid_size, (30, 15));
        assert_eq!(c.grid.x_range, [-1.0, 31.0]);
        assert_eq!(c.viz.labels.title, "Repulsive particles grid");
    }

    #[test]
    fn yaml_overrides_nested_keys() {
        let c = PipelineConfig::from_yaml(
            r#"
input: points.tsv
grid:
  grid_size: [10, 5]
viz:
  labels:
    title: Particles
"#,
        )
        .unwrap();
        assert_eq!(c.input, PathBuf::from("points.tsv"));
        assert_eq!(c.grid.grid_size, (10, 5));
        assert_eq!(c.grid.y_range, [-1.0, 31.0]);
        assert_eq!(c.viz.labels.title, "Particles");
        assert_eq!(c.viz.labels.x_label, "X");
        assert_eq!(c.delimiter_byte().unwrap(), b'\t');
    }

    #[test]
    fn unknown_yaml_type_is_error() {
        assert!(PipelineConfig::from_yaml("grid: oops").is_err());
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        let c = PipelineConfig { delimiter: Some('§'), ..PipelineConfig::default() };
        assert!(c.delimiter_byte().is_err());
    }

    #[test]
    fn scenario_run_writes_svg() {
        let config = config_for("x,y\n0,0\n15,7\n30,15\n", "grid.svg");
        let summary = run(&config).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.binned, 3);
        assert_eq!(summary.max_count, 1);
        let svg = std::fs::read_to_string(&config.output).unwrap();
        assert!(svg.contains(">Repulsive particles grid</text>"));
        std::fs::remove_file(&config.input).ok();
        std::fs::remove_file(&config.output).ok();
    }

    #[test]
    fn missing_column_writes_nothing() {
        let config = config_for("x,z\n1,2\n", "never.svg");
        let err = run(&config).unwrap_err();
        let root = err.downcast_ref::<hp_data::Error>().unwrap();
        assert!(matches!(root, hp_data::Error::ColumnExtraction { .. }));
        assert!(!config.output.exists());
        std::fs::remove_file(&config.input).ok();
    }

    #[test]
    fn missing_input_is_data_load_error() {
        let config = PipelineConfig {
            input: tmp_path("absent.csv"),
            output: tmp_path("never.png"),
            ..PipelineConfig::default()
        };
        let err = run(&config).unwrap_err();
        let root = err.downcast_ref::<hp_data::Error>().unwrap();
        assert!(matches!(root, hp_data::Error::DataLoad(hp_data::DataLoadError::NotFound(_))));
        assert!(!config.output.exists());
    }
}
