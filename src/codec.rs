//! Boundary between encoded image files and [`PixelBuffer`]s.
//!
//! Decoding accepts anything the `image` crate can sniff from magic bytes;
//! encoding is always lossless RGB without an alpha channel.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};
use crate::pixel::PixelBuffer;

/// Lossless output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless WebP (VP8L).
    #[default]
    WebP,
    /// PNG.
    Png,
}

impl OutputFormat {
    /// Pick the encoding from an output path's extension.
    ///
    /// `.webp` or no extension selects WebP, `.png` selects PNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let Some(ext) = path.extension() else {
            return Ok(Self::WebP);
        };
        match ext.to_string_lossy().to_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            "png" => Ok(Self::Png),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decode encoded image bytes into an RGB buffer, dropping any alpha channel.
///
/// # Errors
///
/// Returns [`Error::Decode`] on malformed, truncated, or unrecognized input.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    decode_named(bytes, "image data")
}

fn decode_named(bytes: &[u8], origin: &str) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|source| Error::Decode {
            origin: origin.to_string(),
            source,
        })?
        .to_rgb8();
    Ok(PixelBuffer::from(&img))
}

/// Encode a buffer losslessly.
///
/// # Errors
///
/// Returns [`Error::Encode`] for a zero-sized buffer and [`Error::EncodeImage`]
/// if the encoder itself fails.
pub fn encode(buf: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    if buf.is_empty() {
        let (w, h) = buf.dimensions();
        return Err(Error::Encode(format!("buffer is {w}x{h}")));
    }

    let rgb = buf.to_rgb_bytes();
    let mut out = Vec::new();
    match format {
        OutputFormat::WebP => WebPEncoder::new_lossless(&mut out).write_image(
            &rgb,
            buf.width(),
            buf.height(),
            ExtendedColorType::Rgb8,
        ),
        OutputFormat::Png => PngEncoder::new(&mut out).write_image(
            &rgb,
            buf.width(),
            buf.height(),
            ExtendedColorType::Rgb8,
        ),
    }
    .map_err(Error::EncodeImage)?;

    log::debug!("encoded {format:?}: {} bytes", out.len());
    Ok(out)
}

/// Read a whole file into memory.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the file cannot be opened or read.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| Error::file_access(path, e))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| Error::file_access(path, e))?;
    log::debug!("{}: read {} bytes", path.display(), data.len());
    Ok(data)
}

/// Size and dimensions of an image file as it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Encoded length in bytes.
    pub bytes: usize,
    /// Decoded width in pixels.
    pub width: u32,
    /// Decoded height in pixels.
    pub height: u32,
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] or [`Error::Decode`].
pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    read_image_with_info(path).map(|(buf, _)| buf)
}

/// Read and decode an image file, also returning what was read.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] or [`Error::Decode`].
pub fn read_image_with_info(path: &Path) -> Result<(PixelBuffer, SourceInfo)> {
    let data = read_file(path)?;
    let buf = decode_named(&data, &path.display().to_string())?;
    let info = SourceInfo {
        bytes: data.len(),
        width: buf.width(),
        height: buf.height(),
    };
    log::debug!(
        "{}: width={}, height={}",
        path.display(),
        info.width,
        info.height
    );
    Ok((buf, info))
}

/// Write encoded bytes to `path`, creating parent directories as needed.
///
/// A partially written file is removed before the error is returned.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the directory, file, or write fails.
pub fn write_encoded(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| Error::file_access(parent, e))?;
        }
    }

    let written = File::create(path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.flush()
    });
    if let Err(e) = written {
        let _ = std::fs::remove_file(path);
        return Err(Error::file_access(path, e));
    }
    log::debug!("{}: wrote {} bytes", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;

    fn sample() -> PixelBuffer {
        PixelBuffer::new(
            3,
            2,
            vec![
                Pixel::new(255, 0, 0),
                Pixel::new(0, 255, 0),
                Pixel::new(0, 0, 255),
                Pixel::new(1, 2, 3),
                Pixel::new(250, 251, 252),
                Pixel::BLACK,
            ],
        )
        .unwrap()
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.webp")).unwrap(),
            OutputFormat::WebP
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out.PNG")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out")).unwrap(),
            OutputFormat::WebP
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("out.jpg")),
            Err(Error::UnsupportedFormat(ext)) if ext == "jpg"
        ));
    }

    #[test]
    fn lossless_webp_preserves_pixels() {
        let buf = sample();
        let bytes = encode(&buf, OutputFormat::WebP).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(decode(&bytes).unwrap(), buf);
    }

    #[test]
    fn png_preserves_pixels() {
        let buf = sample();
        let bytes = encode(&buf, OutputFormat::Png).unwrap();
        assert_eq!(decode(&bytes).unwrap(), buf);
    }

    #[test]
    fn empty_buffer_is_not_encodable() {
        let empty = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        assert!(matches!(encode(&empty, OutputFormat::WebP), Err(Error::Encode(_))));
    }

    #[test]
    fn read_image_reports_size_and_dimensions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.webp");
        let bytes = encode(&sample(), OutputFormat::WebP).unwrap();
        write_encoded(&path, &bytes).unwrap();

        let (buf, info) = read_image_with_info(&path).unwrap();
        assert_eq!(buf, sample());
        assert_eq!(
            info,
            SourceInfo {
                bytes: bytes.len(),
                width: 3,
                height: 2,
            }
        );
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(Error::Decode { .. })
        ));
        let bytes = encode(&sample(), OutputFormat::WebP).unwrap();
        assert!(decode(&bytes[..bytes.len() / 2]).is_err());
    }
}
