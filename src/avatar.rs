//! Avatar acquisition: resolve a local path or remote URL into a 300x300
//! circularly masked RGBA image ready for pasting.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use image::{GrayImage, Luma, RgbaImage, imageops::FilterType};
use tempfile::NamedTempFile;

use crate::error::{CitgenError, CitgenResult};

/// Side length of the pasted avatar, in pixels.
pub const AVATAR_SIZE: u32 = 300;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the avatar pixels come from. The caller decides; acquisition never
/// sniffs strings to guess.
#[derive(Clone, Debug)]
pub enum AvatarSource {
    /// A file, resolved relative to the working folder.
    Local(PathBuf),
    /// An absolute HTTP/HTTPS URL fetched once per composition.
    Remote(String),
}

/// A decoded, resized, circularly masked avatar. For remote sources this
/// also owns the downloaded temp file; dropping the value deletes it, so the
/// caller just keeps the avatar alive until the pixels have been pasted.
#[derive(Debug)]
pub struct AcquiredAvatar {
    image: RgbaImage,
    temp: Option<NamedTempFile>,
}

impl AcquiredAvatar {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Path of the downloaded artifact, if this avatar came from a URL.
    pub fn temp_path(&self) -> Option<&Path> {
        self.temp.as_ref().map(NamedTempFile::path)
    }
}

/// Resolves `source` into mask-ready pixels. Remote bodies are persisted to
/// a uniquely named temp file inside `work_dir` before decoding, so
/// concurrent compositions sharing a folder cannot collide.
pub fn acquire(source: &AvatarSource, work_dir: &Path) -> CitgenResult<AcquiredAvatar> {
    let (path, temp) = match source {
        AvatarSource::Local(name) => (work_dir.join(name), None),
        AvatarSource::Remote(url) => {
            let temp = download(url, work_dir)?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };

    // Sniff the format from the file content: downloaded temp files carry a
    // generic suffix, and URL sources give no usable extension anyway.
    let decoded = image::ImageReader::open(&path)
        .and_then(image::ImageReader::with_guessed_format)
        .map_err(|e| CitgenError::acquire(format!("open avatar '{}': {e}", path.display())))?
        .decode()
        .map_err(|e| CitgenError::acquire(format!("decode avatar '{}': {e}", path.display())))?;

    let mut avatar = image::imageops::resize(
        &decoded.to_rgba8(),
        AVATAR_SIZE,
        AVATAR_SIZE,
        FilterType::Lanczos3,
    );
    apply_alpha(&mut avatar, &circular_mask(AVATAR_SIZE));

    Ok(AcquiredAvatar {
        image: avatar,
        temp,
    })
}

fn download(url: &str, work_dir: &Path) -> CitgenResult<NamedTempFile> {
    tracing::debug!(url, "fetching remote avatar");

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("build http client")?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| CitgenError::acquire(format!("fetch avatar '{url}': {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CitgenError::acquire(format!(
            "avatar fetch '{url}' returned {status}"
        )));
    }

    // Read the whole body before touching disk: a failed or truncated
    // transfer must never leave a decodable-looking file behind.
    let body = response
        .bytes()
        .map_err(|e| CitgenError::acquire(format!("read avatar body '{url}': {e}")))?;

    let mut temp = tempfile::Builder::new()
        .prefix("avatar_")
        .suffix(".img")
        .tempfile_in(work_dir)
        .with_context(|| format!("create avatar temp file in '{}'", work_dir.display()))?;
    temp.write_all(&body).context("write avatar temp file")?;
    temp.flush().context("flush avatar temp file")?;

    tracing::debug!(bytes = body.len(), path = %temp.path().display(), "avatar downloaded");
    Ok(temp)
}

/// Single-channel mask: opaque inside the inscribed circle, transparent
/// outside. A pixel is inside iff its distance from the center is at most
/// the radius, inclusive at the exact boundary.
pub fn circular_mask(size: u32) -> GrayImage {
    let radius = i64::from(size / 2);
    GrayImage::from_fn(size, size, |x, y| {
        let dx = i64::from(x) - radius;
        let dy = i64::from(y) - radius;
        if dx * dx + dy * dy <= radius * radius {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Installs `mask` as the alpha channel, replacing whatever transparency the
/// source image carried.
fn apply_alpha(image: &mut RgbaImage, mask: &GrayImage) {
    for (pixel, mask_pixel) in image.pixels_mut().zip(mask.pixels()) {
        pixel.0[3] = mask_pixel.0[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_matches_inclusive_distance_predicate() {
        let mask = circular_mask(AVATAR_SIZE);
        for y in 0..AVATAR_SIZE {
            for x in 0..AVATAR_SIZE {
                let dx = i64::from(x) - 150;
                let dy = i64::from(y) - 150;
                let inside = dx * dx + dy * dy <= 150 * 150;
                let expected = if inside { 255 } else { 0 };
                assert_eq!(mask.get_pixel(x, y).0[0], expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn mask_boundary_is_inclusive_at_exact_radius() {
        let mask = circular_mask(AVATAR_SIZE);
        // Exactly 150 away from the center on each axis.
        assert_eq!(mask.get_pixel(0, 150).0[0], 255);
        assert_eq!(mask.get_pixel(150, 0).0[0], 255);
        // One pixel off the cardinal boundary falls outside.
        assert_eq!(mask.get_pixel(0, 149).0[0], 0);
        assert_eq!(mask.get_pixel(149, 0).0[0], 0);
        // Corners are transparent, center is opaque.
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(299, 299).0[0], 0);
        assert_eq!(mask.get_pixel(150, 150).0[0], 255);
    }

    #[test]
    fn alpha_replaces_source_transparency() {
        let mut image = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 7]));
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, Luma([255]));
        apply_alpha(&mut image, &mask);
        assert_eq!(image.get_pixel(1, 1).0, [10, 20, 30, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 0]);
    }

    #[test]
    fn local_acquire_masks_and_resizes() {
        let dir = tempfile::tempdir().unwrap();
        let src = RgbaImage::from_pixel(64, 48, image::Rgba([200, 10, 10, 255]));
        src.save(dir.path().join("face.png")).unwrap();

        let avatar = acquire(
            &AvatarSource::Local(PathBuf::from("face.png")),
            dir.path(),
        )
        .unwrap();

        assert_eq!(avatar.image().dimensions(), (AVATAR_SIZE, AVATAR_SIZE));
        assert!(avatar.temp_path().is_none());
        assert_eq!(avatar.image().get_pixel(150, 150).0[3], 255);
        assert_eq!(avatar.image().get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn acquire_decodes_by_content_not_extension() {
        // Downloaded avatars land in temp files with a generic suffix, so
        // decoding must sniff the content instead of trusting the name.
        let dir = tempfile::tempdir().unwrap();
        let src = RgbaImage::from_pixel(16, 16, image::Rgba([10, 200, 10, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(src)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        std::fs::write(dir.path().join("face.img"), &bytes).unwrap();

        let avatar = acquire(
            &AvatarSource::Local(PathBuf::from("face.img")),
            dir.path(),
        )
        .unwrap();
        assert_eq!(avatar.image().dimensions(), (AVATAR_SIZE, AVATAR_SIZE));
        assert_eq!(avatar.image().get_pixel(150, 150).0, [10, 200, 10, 255]);
    }

    #[test]
    fn local_acquire_missing_file_is_acquire_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = acquire(
            &AvatarSource::Local(PathBuf::from("nope.png")),
            dir.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("avatar acquisition failed:"));
    }
}
