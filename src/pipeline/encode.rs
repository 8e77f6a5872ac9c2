//! JPEG encoding and output.
//!
//! The page is encoded into memory first and only then written next to the
//! target and renamed over it, so an encoding failure never clobbers a
//! thumbnail left by an earlier run.

use crate::error::FileError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode `image` as a baseline JPEG at `quality` (1–100).
///
/// JPEG has no alpha channel and no 16-bit samples, so anything other
/// than 8-bit gray or RGB is converted to 8-bit RGB first.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, FileError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);

    let written = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => image.write_with_encoder(encoder),
        other => DynamicImage::ImageRgb8(other.to_rgb8()).write_with_encoder(encoder),
    };
    written.map_err(FileError::EncodeFailed)?;

    debug!("Encoded {}x{} page → {} bytes JPEG", image.width(), image.height(), buf.len());
    Ok(buf)
}

/// Encode `image` and write it to `path`, replacing any existing file.
pub fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), FileError> {
    let bytes = encode_jpeg(image, quality)?;

    let tmp_path = path.with_extension("jpg.tmp");
    fs::write(&tmp_path, &bytes).map_err(|e| {
        // A short write may have left a partial temp file behind.
        let _ = fs::remove_file(&tmp_path);
        FileError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        FileError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn rgba(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 200, 30, 128])))
    }

    #[test]
    fn encodes_alpha_image_as_jpeg() {
        let bytes = encode_jpeg(&rgba(16, 9), 95).expect("encode should succeed");
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (16, 9));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let noisy = DynamicImage::ImageRgb8(image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) * 5 % 256) as u8])
        }));
        let hi = encode_jpeg(&noisy, 95).unwrap();
        let lo = encode_jpeg(&noisy, 10).unwrap();
        assert!(lo.len() < hi.len(), "q10={} q95={}", lo.len(), hi.len());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pagina_01.jpg");
        fs::write(&path, b"stale").unwrap();

        write_jpeg(&rgba(20, 30), &path, 95).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (20, 30));
        assert!(!dir.path().join("pagina_01.jpg.tmp").exists());
    }

    #[test]
    fn failed_temp_write_leaves_previous_thumbnail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pagina_01.jpg");
        fs::write(&path, b"stale").unwrap();
        // A directory squatting on the temp name makes the write fail.
        fs::create_dir(dir.path().join("pagina_01.jpg.tmp")).unwrap();

        let err = write_jpeg(&rgba(4, 4), &path, 95).unwrap_err();

        assert!(matches!(err, FileError::WriteFailed { .. }), "got: {err}");
        assert_eq!(fs::read(&path).unwrap(), b"stale");
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pagina_01.jpg");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"").unwrap();

        let err = write_jpeg(&rgba(4, 4), &path, 95).unwrap_err();

        assert!(matches!(err, FileError::WriteFailed { .. }), "got: {err}");
        assert!(!dir.path().join("pagina_01.jpg.tmp").exists());
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("pagina_01.jpg");
        let err = write_jpeg(&rgba(4, 4), &path, 95).unwrap_err();
        assert!(matches!(err, FileError::WriteFailed { .. }));
    }
}
