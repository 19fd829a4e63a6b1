use ab_glyph::{Font, FontVec};
use usvg::fontdb::{self, Database, Family, Query, Weight};

use crate::RenderError;
use crate::primitives::FontWeight;

/// One loaded face: parsed metrics plus the raw bytes handed to the rasteriser.
struct Face {
    metrics: FontVec,
    data: Vec<u8>,
}

impl Face {
    fn load(db: &Database, id: fontdb::ID) -> crate::Result<Self> {
        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| RenderError::Font(format!("font face {id:?} has no data")))?;
        let metrics = FontVec::try_from_vec_and_index(data.clone(), index)
            .map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self { metrics, data })
    }

    fn advance(&self, text: &str, size: f64) -> f64 {
        let Some(units_per_em) = self.metrics.units_per_em() else {
            return 0.0;
        };
        let mut total = 0.0_f32;
        let mut prev = None;
        for ch in text.chars() {
            let glyph = self.metrics.glyph_id(ch);
            if let Some(p) = prev {
                total += self.metrics.kern_unscaled(p, glyph);
            }
            total += self.metrics.h_advance_unscaled(glyph);
            prev = Some(glyph);
        }
        f64::from(total) / f64::from(units_per_em) * size
    }
}

/// The single font family used for both text measurement and rasterisation.
///
/// Resolved once per render from a CSS-style family list; the SVG names the
/// resolved family and the PNG rasteriser is given exactly these faces, so
/// laid-out widths and drawn glyphs agree.
pub struct FontHandle {
    family: String,
    regular: Face,
    bold: Face,
}

impl FontHandle {
    /// Resolve `families` against the fonts installed on this host.
    pub fn system(families: &str) -> crate::Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::from_database(&db, families)
    }

    /// Resolve `families` (comma separated, generic names allowed) in `db`.
    ///
    /// Falls back to the alphabetically first upright face when nothing in
    /// the list matches; fails only when `db` has no usable face at all.
    pub fn from_database(db: &Database, families: &str) -> crate::Result<Self> {
        let requested = parse_families(families);
        let regular_id = db
            .query(&Query { families: &requested, ..upright(Weight::NORMAL) })
            .or_else(|| fallback_face(db))
            .ok_or_else(|| {
                RenderError::Font(format!("no installed font matches '{families}'"))
            })?;
        let family = db
            .face(regular_id)
            .and_then(|f| f.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| RenderError::Font(format!("font face {regular_id:?} has no family")))?;

        let bold_id = db
            .query(&Query { families: &[Family::Name(&family)], ..upright(Weight::BOLD) })
            .unwrap_or(regular_id);

        tracing::debug!(family = %family, bold = bold_id != regular_id, "font resolved");
        Ok(Self {
            regular: Face::load(db, regular_id)?,
            bold: Face::load(db, bold_id)?,
            family,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Advance width of `text` at `size` points, kerning included.
    pub fn measure(&self, text: &str, size: f64, weight: FontWeight) -> f64 {
        match weight {
            FontWeight::Regular => self.regular.advance(text, size),
            FontWeight::Bold => self.bold.advance(text, size),
        }
    }

    /// Register the resolved faces with a rasteriser font database.
    pub fn load_into(&self, db: &mut Database) {
        db.load_font_data(self.regular.data.clone());
        if self.bold.data != self.regular.data {
            db.load_font_data(self.bold.data.clone());
        }
    }
}

fn parse_families(list: &str) -> Vec<Family<'_>> {
    list.split(',')
        .map(|name| name.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|name| !name.is_empty())
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            _ => Family::Name(name),
        })
        .collect()
}

fn upright(weight: Weight) -> Query<'static> {
    Query { families: &[], weight, stretch: fontdb::Stretch::Normal, style: fontdb::Style::Normal }
}

fn fallback_face(db: &Database) -> Option<fontdb::ID> {
    db.faces()
        .filter(|f| f.style == fontdb::Style::Normal && !f.families.is_empty())
        .min_by(|a, b| {
            (&a.families[0].0, a.weight.0.abs_diff(Weight::NORMAL.0))
                .cmp(&(&b.families[0].0, b.weight.0.abs_diff(Weight::NORMAL.0)))
        })
        .map(|f| f.id)
}

/// Fonts resolved once for the whole test binary.
#[cfg(test)]
pub(crate) fn test_fonts() -> &'static FontHandle {
    static FONTS: std::sync::OnceLock<FontHandle> = std::sync::OnceLock::new();
    FONTS.get_or_init(|| {
        let family = crate::config::FontConfig::default().family;
        FontHandle::system(&family).expect("a system font")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_is_font_error() {
        let err = FontHandle::from_database(&Database::new(), "DejaVu Sans, sans-serif")
            .err()
            .expect("no faces to resolve");
        assert!(matches!(err, RenderError::Font(_)), "{err}");
    }

    #[test]
    fn family_list_parsing() {
        let fams = parse_families("'DejaVu Sans', Arial ,sans-serif,");
        assert_eq!(fams.len(), 3);
        assert_eq!(fams[0], Family::Name("DejaVu Sans"));
        assert_eq!(fams[1], Family::Name("Arial"));
        assert_eq!(fams[2], Family::SansSerif);
    }

    #[test]
    fn unknown_family_falls_back_to_an_installed_face() {
        let fonts = FontHandle::system("No Such Family 1234").unwrap();
        assert!(!fonts.family().is_empty());
    }

    #[test]
    fn widths_come_from_glyph_metrics() {
        let fonts = test_fonts();
        let wide = fonts.measure("WWWW", 10.0, FontWeight::Regular);
        let narrow = fonts.measure("iiii", 10.0, FontWeight::Regular);
        assert!(wide > narrow, "W {wide} vs i {narrow}");
        assert_eq!(fonts.measure("", 10.0, FontWeight::Regular), 0.0);
        let double = fonts.measure("30", 20.0, FontWeight::Regular);
        approx::assert_relative_eq!(double, 2.0 * fonts.measure("30", 10.0, FontWeight::Regular));
    }

    #[test]
    fn resolved_faces_register_with_rasteriser() {
        let mut db = Database::new();
        test_fonts().load_into(&mut db);
        assert!(!db.is_empty());
        let family = test_fonts().family();
        assert!(db.faces().any(|f| f.families.iter().any(|(n, _)| n == family)));
    }
}
