//! Card composition: canvas, headline, wrapped quote, masked avatar and
//! attribution, saved as a single PNG.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{
    avatar::{self, AVATAR_SIZE, AvatarSource},
    error::{CitgenError, CitgenResult},
    layout::{self, LINE_SPACING},
    style::QuoteStyle,
};

pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 1080;

const HEADLINE_TOP: i32 = 50;
const QUOTE_ANCHOR: (i32, i32) = (100, 189);
const AVATAR_POS: (i64, i64) = (50, 730);
const AUTHOR_GAP: i64 = 50;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A quote to be rendered. Its character count alone drives every layout
/// decision.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

struct Fonts {
    headline: FontVec,
    quote: FontVec,
    author: FontVec,
}

impl Fonts {
    fn load(style: &QuoteStyle) -> CitgenResult<Self> {
        Ok(Self {
            headline: load_font(&style.font_path(&style.headline_font))?,
            quote: load_font(&style.font_path(&style.quote_font))?,
            author: load_font(&style.font_path(&style.author_font))?,
        })
    }
}

fn load_font(path: &Path) -> CitgenResult<FontVec> {
    let bytes = std::fs::read(path)
        .map_err(|e| CitgenError::render(format!("read font '{}': {e}", path.display())))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| CitgenError::render(format!("parse font '{}': {e}", path.display())))
}

/// Composes quote cards with one fixed [`QuoteStyle`].
pub struct Composer {
    style: QuoteStyle,
}

impl Composer {
    pub fn new(style: QuoteStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &QuoteStyle {
        &self.style
    }

    /// Renders `quote` over `source` and writes
    /// `<out_base>_quote.png` into `work_dir` (which must already exist).
    ///
    /// Over-long quotes are rejected before any file or network I/O happens.
    /// Any avatar temp file is deleted before this returns, whether the
    /// composition succeeded or not.
    #[tracing::instrument(skip(self, quote, source, work_dir))]
    pub fn compose(
        &self,
        quote: &Quote,
        source: &AvatarSource,
        work_dir: &Path,
        out_base: &str,
    ) -> CitgenResult<PathBuf> {
        let params = layout::require_layout(&quote.text)?;
        let lines = layout::wrap_quote(&quote.text, &params);
        tracing::debug!(
            chars = quote.text.chars().count(),
            font_size = params.font_size,
            lines = lines.len(),
            "layout selected"
        );

        let fonts = Fonts::load(&self.style)?;
        let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BLACK);

        self.draw_headline(&mut canvas, &fonts)?;
        draw_quote_block(&mut canvas, &lines, params.font_size, &fonts.quote);

        // The avatar value owns any downloaded temp file; keeping it alive
        // to the end of this scope guarantees cleanup after the paste and
        // after the save attempt, on the failure paths too.
        let avatar = avatar::acquire(source, work_dir)?;
        image::imageops::overlay(&mut canvas, avatar.image(), AVATAR_POS.0, AVATAR_POS.1);

        self.draw_attribution(&mut canvas, &quote.author, &fonts);

        let out_path = work_dir.join(format!("{out_base}_quote.png"));
        canvas
            .save(&out_path)
            .map_err(|e| CitgenError::render(format!("save '{}': {e}", out_path.display())))?;

        tracing::info!(path = %out_path.display(), "quote card written");
        Ok(out_path)
    }

    fn draw_headline(&self, canvas: &mut RgbaImage, fonts: &Fonts) -> CitgenResult<()> {
        let scale = PxScale::from(self.style.headline_size);
        let (width, _) = text_size(scale, &fonts.headline, &self.style.headline_text);
        if width > CANVAS_WIDTH {
            return Err(CitgenError::render("headline wider than the canvas"));
        }
        let x = (CANVAS_WIDTH as i32 - width as i32) / 2;
        draw_text_mut(
            canvas,
            WHITE,
            x,
            HEADLINE_TOP,
            scale,
            &fonts.headline,
            &self.style.headline_text,
        );
        Ok(())
    }

    fn draw_attribution(&self, canvas: &mut RgbaImage, author: &str, fonts: &Fonts) {
        let attribution = format!("© {author}");
        let scale = PxScale::from(self.style.author_size);
        let (_, height) = text_size(scale, &fonts.author, &attribution);

        let x = AVATAR_POS.0 + i64::from(AVATAR_SIZE) + AUTHOR_GAP;
        let y = AVATAR_POS.1 + i64::from(AVATAR_SIZE / 2) - i64::from(height / 2);
        draw_text_mut(
            canvas,
            WHITE,
            x as i32,
            y as i32,
            scale,
            &fonts.author,
            &attribution,
        );
    }
}

fn draw_quote_block(canvas: &mut RgbaImage, lines: &[String], font_size: u32, font: &FontVec) {
    let lines = decorate_with_guillemets(lines);
    let scale = PxScale::from(font_size as f32);
    let advance = (font_size + LINE_SPACING) as i32;
    for (i, line) in lines.iter().enumerate() {
        draw_text_mut(
            canvas,
            WHITE,
            QUOTE_ANCHOR.0,
            QUOTE_ANCHOR.1 + advance * i as i32,
            scale,
            font,
            line,
        );
    }
}

/// Wraps the whole block in «...»: opening mark on the first line, closing
/// mark on the last.
fn decorate_with_guillemets(lines: &[String]) -> Vec<String> {
    let mut decorated = lines.to_vec();
    if let Some(first) = decorated.first_mut() {
        first.insert(0, '«');
    }
    if let Some(last) = decorated.last_mut() {
        last.push('»');
    }
    decorated
}
