use crate::RenderError;
use crate::font::FontHandle;

/// Convert SVG string to PNG bytes at the given DPI.
///
/// Only the faces in `fonts` are visible to the rasteriser, the same ones the
/// layout was measured with.
pub fn svg_to_png(svg: &str, dpi: u32, fonts: &FontHandle) -> crate::Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    fonts.load_into(opt.fontdb_mut());

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Png(e.to_string()))?;

    let scale = dpi as f32 / 72.0;
    let size = tree.size();
    let w = (size.width() * scale).round() as u32;
    let h = (size.height() * scale).round() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| RenderError::Png(format!("failed to create {w}x{h} pixmap")))?;

    // Fill white background
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| RenderError::Png(e.to_string()))
}
