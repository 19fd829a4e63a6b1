pub mod canvas;
pub mod color;
pub mod config;
pub mod font;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;

use std::path::{Path, PathBuf};

use config::VizConfig;
use font::FontHandle;
use hp_data::HexCounts;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("font error: {0}")]
    Font(String),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render hexbin counts to SVG string, using the configured system font.
pub fn render_svg(counts: &HexCounts, config: &VizConfig) -> Result<String> {
    let fonts = FontHandle::system(&config.font.family)?;
    plots::hexbin::render(counts, config, &fonts)
}

/// Render hexbin counts to bytes in the specified format (`svg` or `png`).
pub fn render_to_bytes(counts: &HexCounts, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    let format = format.to_ascii_lowercase();
    if !matches!(format.as_str(), "svg" | "png") {
        return Err(RenderError::UnknownFormat(format));
    }
    let fonts = FontHandle::system(&config.font.family)?;
    let svg = plots::hexbin::render(counts, config, &fonts)?;
    match format.as_str() {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi, &fonts),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render hexbin counts to a file (format inferred from extension, PNG when absent).
///
/// The image is fully produced before the file is touched, so a failed
/// render never leaves a partial file behind.
pub fn render_to_file(counts: &HexCounts, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");
    let bytes = render_to_bytes(counts, ext, config)?;
    output::svg::write_bytes(&bytes, path)
}
