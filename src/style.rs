//! Styling knobs for a composed card: headline text and the three fonts.

use std::path::{Path, PathBuf};

pub const DEFAULT_HEADLINE: &str = "Цитаты мудрых людей";
pub const DEFAULT_HEADLINE_FONT: &str = "Formular-Italic.ttf";
pub const DEFAULT_QUOTE_FONT: &str = "Formular-BlackItalic.ttf";
pub const DEFAULT_AUTHOR_FONT: &str = "PeridotDemoPE-WideExtraBoldItalic.otf";
pub const DEFAULT_HEADLINE_SIZE: f32 = 100.0;
pub const DEFAULT_AUTHOR_SIZE: f32 = 80.0;

/// Everything about a card that is not the quote itself. Relative font paths
/// resolve against `fonts_dir`; the quote body size comes from the layout
/// bracket, not from here.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct QuoteStyle {
    #[serde(default = "default_headline")]
    pub headline_text: String,
    #[serde(default = "default_headline_font")]
    pub headline_font: PathBuf,
    #[serde(default = "default_headline_size")]
    pub headline_size: f32,
    #[serde(default = "default_quote_font")]
    pub quote_font: PathBuf,
    #[serde(default = "default_author_font")]
    pub author_font: PathBuf,
    #[serde(default = "default_author_size")]
    pub author_size: f32,
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
}

impl Default for QuoteStyle {
    fn default() -> Self {
        Self {
            headline_text: default_headline(),
            headline_font: default_headline_font(),
            headline_size: DEFAULT_HEADLINE_SIZE,
            quote_font: default_quote_font(),
            author_font: default_author_font(),
            author_size: DEFAULT_AUTHOR_SIZE,
            fonts_dir: default_fonts_dir(),
        }
    }
}

impl QuoteStyle {
    /// Resolves a font path against the configured fonts directory.
    /// Absolute paths pass through untouched.
    pub fn font_path(&self, font: &Path) -> PathBuf {
        if font.is_absolute() {
            font.to_path_buf()
        } else {
            self.fonts_dir.join(font)
        }
    }
}

fn default_headline() -> String {
    DEFAULT_HEADLINE.to_string()
}

fn default_headline_font() -> PathBuf {
    PathBuf::from(DEFAULT_HEADLINE_FONT)
}

fn default_headline_size() -> f32 {
    DEFAULT_HEADLINE_SIZE
}

fn default_quote_font() -> PathBuf {
    PathBuf::from(DEFAULT_QUOTE_FONT)
}

fn default_author_font() -> PathBuf {
    PathBuf::from(DEFAULT_AUTHOR_FONT)
}

fn default_author_size() -> f32 {
    DEFAULT_AUTHOR_SIZE
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_with_missing_fields_uses_defaults() {
        let style: QuoteStyle = serde_json::from_str("{}").unwrap();
        assert_eq!(style.headline_text, DEFAULT_HEADLINE);
        assert_eq!(style.headline_size, DEFAULT_HEADLINE_SIZE);
        assert_eq!(style.fonts_dir, PathBuf::from("fonts"));
    }

    #[test]
    fn font_path_resolution() {
        let style = QuoteStyle {
            fonts_dir: PathBuf::from("/srv/fonts"),
            ..QuoteStyle::default()
        };
        assert_eq!(
            style.font_path(Path::new("a.ttf")),
            PathBuf::from("/srv/fonts/a.ttf")
        );
        assert_eq!(
            style.font_path(Path::new("/abs/b.otf")),
            PathBuf::from("/abs/b.otf")
        );
    }
}
