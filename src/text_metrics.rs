//! Font-backed width estimation.
//!
//! Resolves a CSS-style font stack against the system font database and
//! reads horizontal advances from the face. Characters the face has no glyph
//! for, or stacks that resolve to no face at all, fall back to the heuristic
//! buckets so results stay deterministic for a given machine.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ttf_parser::{Face, GlyphId};

use crate::layout::text::{HeuristicEstimator, WidthEstimator};

static FACE_CACHE: Lazy<Mutex<FaceCache>> = Lazy::new(|| Mutex::new(FaceCache::new()));

struct FaceCache {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<Arc<FontFace>>>,
}

impl FaceCache {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn face(&mut self, font_family: &str) -> Option<Arc<FontFace>> {
        let key = normalize_family_key(font_family);
        if let Some(face) = self.faces.get(&key) {
            return face.clone();
        }
        let face = self.load_face(&key).map(Arc::new);
        if face.is_none() {
            tracing::debug!(family = %key, "no font face found, using heuristic widths");
        }
        self.faces.insert(key, face.clone());
        face
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        #[derive(Clone, Copy)]
        enum FamilyToken {
            Generic(Family<'static>),
            Name(usize),
        }

        let mut names: Vec<String> = Vec::new();
        let mut order: Vec<FamilyToken> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => order.push(FamilyToken::Generic(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    order.push(FamilyToken::Generic(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                _ => {
                    order.push(FamilyToken::Name(names.len()));
                    names.push(raw.to_string());
                }
            }
        }
        if order.is_empty() {
            order.push(FamilyToken::Generic(Family::SansSerif));
        }

        let families: Vec<Family<'_>> = order
            .iter()
            .map(|token| match *token {
                FamilyToken::Generic(family) => family,
                FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
            })
            .collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
            .flatten()
    }
}

/// Advance widths of one face, in font units.
struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [Option<u16>; 128],
    glyph_advances: Mutex<HashMap<char, Option<u16>>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [None; 128];
        for byte in 0u8..=127 {
            ascii_advances[byte as usize] = glyph_advance(&face, byte as char);
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            glyph_advances: Mutex::new(HashMap::new()),
        })
    }

    fn advance(&self, ch: char) -> Option<u16> {
        if ch.is_ascii() {
            return self.ascii_advances[ch as usize];
        }
        let mut cache = self.glyph_advances.lock().ok()?;
        if let Some(advance) = cache.get(&ch) {
            return *advance;
        }
        let advance = Face::parse(&self.data, self.index)
            .ok()
            .and_then(|face| glyph_advance(&face, ch));
        cache.insert(ch, advance);
        advance
    }
}

fn glyph_advance(face: &Face<'_>, ch: char) -> Option<u16> {
    let glyph: GlyphId = face.glyph_index(ch)?;
    face.glyph_hor_advance(glyph).filter(|advance| *advance > 0)
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Width estimator backed by real glyph advances of the first matching face
/// in a font stack.
#[derive(Clone)]
pub struct FontMetricsEstimator {
    face: Option<Arc<FontFace>>,
}

impl FontMetricsEstimator {
    pub fn new(font_family: &str) -> Self {
        let face = FACE_CACHE
            .lock()
            .ok()
            .and_then(|mut cache| cache.face(font_family));
        Self { face }
    }

    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }
}

impl std::fmt::Debug for FontMetricsEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetricsEstimator")
            .field("has_face", &self.has_face())
            .finish()
    }
}

impl WidthEstimator for FontMetricsEstimator {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        if ch == '\n' {
            return 0.0;
        }
        let Some(face) = &self.face else {
            return HeuristicEstimator.char_width(ch, font_size);
        };
        match face.advance(ch) {
            Some(advance) => advance as f32 * font_size / face.units_per_em as f32,
            None => HeuristicEstimator.char_width(ch, font_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text::estimate_width;

    #[test]
    fn unknown_family_falls_back_to_heuristic() {
        let estimator = FontMetricsEstimator::new("\"No Such Family 7f3a\"");
        if estimator.has_face() {
            return;
        }
        let text = "React 前端";
        assert!((estimator.text_width(text, 12.0) - estimate_width(text, 12.0)).abs() < 1e-4);
    }

    #[test]
    fn empty_family_normalizes_to_sans_serif() {
        assert_eq!(normalize_family_key("  "), "sans-serif");
        assert_eq!(normalize_family_key(" Inter "), "Inter");
    }

    #[test]
    fn widths_are_non_negative_and_monotonic() {
        let estimator = FontMetricsEstimator::new("sans-serif");
        let mut prev = 0.0;
        let mut prefix = String::new();
        for ch in "Layout 布局 ✓".chars() {
            prefix.push(ch);
            let width = estimator.text_width(&prefix, 14.0);
            assert!(width >= prev);
            prev = width;
        }
    }
}
