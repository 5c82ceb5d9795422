pub const ELLIPSIS: char = '…';

/// Width reserved for a trailing ellipsis, in multiples of the font size.
const ELLIPSIS_WIDTH_FACTOR: f32 = 0.95;
/// Below this budget (times font size) nothing is drawn at all.
const MIN_FIT_FACTOR: f32 = 0.7;
/// Flat per-character estimate used for outward category labels.
const CATEGORY_CHAR_FACTOR: f32 = 0.6;

/// Text width estimation. The layout engine only talks to this trait, so a
/// font-backed implementation can replace the heuristic buckets.
///
/// Implementations must be deterministic and return non-negative widths so
/// that appending characters never shrinks the total.
pub trait WidthEstimator {
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Space,
    Standard,
    Wide,
    Symbol,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        let cp = ch as u32;
        if ch.is_whitespace() {
            CharClass::Space
        } else if (0x3400..=0x9FFF).contains(&cp)
            || (0xF900..=0xFAFF).contains(&cp)
            || (0x3040..=0x30FF).contains(&cp)
            || (0xAC00..=0xD7A3).contains(&cp)
            || (0xFF00..=0xFFEF).contains(&cp)
        {
            CharClass::Wide
        } else if (0x1F300..=0x1FAFF).contains(&cp) || (0x2600..=0x27BF).contains(&cp) {
            CharClass::Symbol
        } else {
            CharClass::Standard
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            CharClass::Space => 0.35,
            CharClass::Standard => 0.56,
            CharClass::Wide => 0.95,
            CharClass::Symbol => 1.2,
        }
    }
}

/// Four-bucket character-class estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl WidthEstimator for HeuristicEstimator {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        CharClass::of(ch).factor() * font_size
    }
}

pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    HeuristicEstimator.text_width(text, font_size)
}

/// Longest prefix of `text` that fits `max_width`, ellipsis-suffixed when
/// cut. Returns an empty string when the budget is too small to be worth
/// drawing; callers then skip the label entirely.
pub fn fit_to_width(
    estimator: &dyn WidthEstimator,
    text: &str,
    font_size: f32,
    max_width: f32,
) -> String {
    if text.is_empty() || max_width <= font_size * MIN_FIT_FACTOR {
        return String::new();
    }
    if estimator.text_width(text, font_size) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = estimator
        .char_width(ELLIPSIS, font_size)
        .max(font_size * ELLIPSIS_WIDTH_FACTOR);
    let mut acc = 0.0;
    let mut end = 0;
    for (idx, ch) in text.char_indices() {
        let width = estimator.char_width(ch, font_size);
        if max_width - acc < width + ellipsis_width {
            break;
        }
        acc += width;
        end = idx + ch.len_utf8();
    }
    if end == 0 {
        return String::new();
    }
    let mut fitted = text[..end].to_string();
    fitted.push(ELLIPSIS);
    fitted
}

/// Character-count truncation for category labels, which have a whole
/// canvas side to grow into and use a flat per-character estimate.
pub fn truncate_chars(text: &str, font_size: f32, available: f32) -> String {
    let char_width = (font_size * CATEGORY_CHAR_FACTOR).max(1.0);
    let max_chars = (((available - 2.0) / char_width).floor().max(1.0)) as usize;
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1).max(1);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push(ELLIPSIS);
    truncated
}
