//! Maps quote length to font size, wrap width and line budget.
//!
//! The bracket table is a hand-tuned readability/density tradeoff for the
//! fixed 1920x1080 canvas; the boundaries are contract points, not tunables.

use crate::error::{CitgenError, CitgenResult};

/// Quotes of this many characters or more cannot be laid out.
pub const MAX_QUOTE_CHARS: usize = 1866;

/// Extra vertical pixels between wrapped quote lines.
pub const LINE_SPACING: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayoutParams {
    pub font_size: u32,
    pub wrap_width: usize,
    pub max_lines: usize,
}

const fn params(font_size: u32, wrap_width: usize, max_lines: usize) -> LayoutParams {
    LayoutParams {
        font_size,
        wrap_width,
        max_lines,
    }
}

/// Ascending, non-overlapping brackets: the first entry whose limit exceeds
/// the quote length wins.
const BRACKETS: &[(usize, LayoutParams)] = &[
    (25, params(200, 13, 2)),
    (30, params(180, 15, 2)),
    (55, params(150, 18, 3)),
    (70, params(120, 23, 3)),
    (110, params(100, 28, 4)),
    (180, params(80, 35, 5)),
    (190, params(70, 38, 5)),
    (268, params(65, 44, 6)),
    (369, params(55, 52, 7)),
    (463, params(50, 57, 8)),
    (582, params(45, 64, 9)),
    (727, params(40, 72, 10)),
    (1000, params(35, 82, 12)),
    (1360, params(30, 96, 14)),
    (MAX_QUOTE_CHARS, params(25, 116, 16)),
];

/// Picks layout parameters for a quote, or `None` when the quote is too long
/// to render at all. Length is counted in characters, not bytes.
pub fn select_layout(text: &str) -> Option<LayoutParams> {
    let len = text.chars().count();
    BRACKETS
        .iter()
        .find(|(limit, _)| len < *limit)
        .map(|(_, p)| *p)
}

/// Like [`select_layout`] but surfaces the rejection as a typed error.
pub fn require_layout(text: &str) -> CitgenResult<LayoutParams> {
    select_layout(text).ok_or_else(|| {
        CitgenError::layout(format!(
            "quote of {} chars exceeds the {} char maximum",
            text.chars().count(),
            MAX_QUOTE_CHARS
        ))
    })
}

/// Word-wraps the quote to `wrap_width` columns and keeps at most
/// `max_lines` lines. Dropping the excess is the truncation policy, not an
/// error.
pub fn wrap_quote(text: &str, layout: &LayoutParams) -> Vec<String> {
    textwrap::wrap(text, layout.wrap_width)
        .into_iter()
        .take(layout.max_lines)
        .map(|line| line.into_owned())
        .collect()
}
