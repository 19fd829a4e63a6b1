use std::fmt::Write as FmtWrite;

use crate::font::FontHandle;
use crate::primitives::*;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
///
/// Every drawing call serialises its element straight away; clip regions
/// regroup the already-written fragments when they are closed.
pub struct Canvas<'f> {
    pub width: f64,
    pub height: f64,
    fonts: &'f FontHandle,
    font_family: String,
    body: Vec<String>,
    clip_defs: Vec<String>,
    open_clips: Vec<(String, usize)>,
}

impl<'f> Canvas<'f> {
    pub fn new(width: f64, height: f64, fonts: &'f FontHandle) -> Self {
        Self {
            width,
            height,
            fonts,
            font_family: format!("'{}'", escape_xml(fonts.family())),
            body: Vec::new(),
            clip_defs: Vec::new(),
            open_clips: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        let mut el = format!(r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#);
        paint(&mut el, style);
        self.emit(el);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, pen: &LineStyle) {
        let mut el = format!(r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#);
        let stroke = pen.color.to_svg_fill();
        let _ = write!(el, r#" stroke="{stroke}" stroke-width="{:.2}""#, pen.width);
        if let Some(dash) = &pen.dash {
            let _ = write!(el, r#" stroke-dasharray="{dash}""#);
        }
        self.emit(el);
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], style: &Style) {
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
        let mut el = format!(r#"<polygon points="{}""#, coords.join(" "));
        paint(&mut el, style);
        self.emit(el);
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push_text(x, y, content, style, None);
    }

    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push_text(x, y, content, style, Some(angle));
    }

    fn push_text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: Option<f64>) {
        let mut el = format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{:.1}" fill="{}""#,
            self.font_family,
            style.size,
            style.color.to_svg_fill(),
        );
        let _ = write!(
            el,
            r#" text-anchor="{}" dominant-baseline="{}""#,
            style.anchor, style.baseline
        );
        if style.weight == FontWeight::Bold {
            el.push_str(r#" font-weight="bold""#);
        }
        if let Some(a) = angle {
            let _ = write!(el, r#" transform="rotate({a:.1},{x:.2},{y:.2})""#);
        }
        let _ = write!(el, ">{}</text>", escape_xml(content));
        self.body.push(el);
    }

    /// Start clipping subsequent elements to a rectangle until [`Canvas::pop_clip`].
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.clip_defs.len());
        let rect = format!(r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" />"#);
        self.clip_defs.push(format!(r#"<clipPath id="{id}">{rect}</clipPath>"#));
        self.open_clips.push((id.clone(), self.body.len()));
        id
    }

    pub fn pop_clip(&mut self) {
        let Some((id, start)) = self.open_clips.pop() else {
            return;
        };
        let mut group = format!("<g clip-path=\"url(#{id})\">\n");
        for el in self.body.drain(start..) {
            group.push_str(&el);
            group.push('\n');
        }
        group.push_str("</g>");
        self.body.push(group);
    }

    /// Rendered width of `content` in the canvas font.
    pub fn measure_text(&self, content: &str, style: &TextStyle) -> f64 {
        self.fonts.measure(content, style.size, style.weight)
    }

    fn emit(&mut self, mut el: String) {
        el.push_str(" />");
        self.body.push(el);
    }

    pub fn finish_svg(mut self) -> String {
        while !self.open_clips.is_empty() {
            self.pop_clip();
        }

        let (w, h) = (self.width, self.height);
        let mut out = String::with_capacity(32 * 1024);
        let _ = writeln!(
            out,
            r#"<svg xmlns="{SVG_NS}" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        if !self.clip_defs.is_empty() {
            let _ = writeln!(out, "<defs>\n{}\n</defs>", self.clip_defs.join("\n"));
        }
        let _ = writeln!(out, r#"<rect width="{w}" height="{h}" fill="white" />"#);
        for el in &self.body {
            out.push_str(el);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Fill, stroke and opacity attributes of a closed shape.
fn paint(el: &mut String, style: &Style) {
    match &style.fill {
        Some(c) => {
            let _ = write!(el, r#" fill="{}""#, c.to_svg_fill());
        }
        None => el.push_str(r#" fill="none""#),
    }
    if let Some(c) = &style.stroke {
        let width = style.stroke_width;
        let _ = write!(el, r#" stroke="{}" stroke-width="{width:.2}""#, c.to_svg_fill());
    }
    if (style.opacity - 1.0).abs() > 1e-4 {
        let _ = write!(el, r#" opacity="{:.3}""#, style.opacity);
    }
}

fn escape_xml(s: &str) -> String {
    s.chars().fold(String::with_capacity(s.len()), |mut out, ch| {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
        out
    })
}
