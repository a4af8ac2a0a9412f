//! Error types for the overlay-recovery crate.

use std::path::PathBuf;

use crate::pixel::Channel;

/// Errors that can occur while loading, recovering, or saving an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file could not be opened, read, or written.
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Encoded image data was malformed or truncated.
    #[error("failed to decode {origin}: {source}")]
    Decode {
        /// Where the bytes came from (a path, or a short description).
        origin: String,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// The mask does not have the same dimensions as the image.
    #[error("mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    DimensionMismatch {
        /// Image width in pixels.
        image_width: u32,
        /// Image height in pixels.
        image_height: u32,
        /// Mask width in pixels.
        mask_width: u32,
        /// Mask height in pixels.
        mask_height: u32,
    },

    /// Alpha is zero, negative, not finite, or above 1 without opting in.
    #[error("invalid alpha {0}: expected a value in (0, 1]")]
    InvalidAlpha(f32),

    /// An overlay channel value lies outside `[0, 255]`.
    #[error("invalid {channel} channel value {value}: expected 0-255")]
    InvalidChannelValue {
        /// Channel the value was given for.
        channel: Channel,
        /// Offending value.
        value: i32,
    },

    /// The buffer cannot be encoded (for example, it has no pixels).
    #[error("cannot encode image: {0}")]
    Encode(String),

    /// The underlying encoder failed.
    #[error("encoder error: {0}")]
    EncodeImage(image::ImageError),

    /// The output path names a format with no lossless RGB encoding.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// A pixel coordinate lies outside the buffer.
    #[error("pixel ({x}, {y}) is outside {width}x{height} buffer")]
    OutOfRange {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },

    /// A pixel sequence does not hold exactly `width * height` pixels.
    #[error("expected {expected} pixels, got {actual}")]
    BufferLength {
        /// `width * height`.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}

impl Error {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::file_access(
            "/tmp/missing.webp",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = io_err.to_string();
        assert!(msg.contains("/tmp/missing.webp"));
        assert!(msg.contains("gone"));

        let mismatch = Error::DimensionMismatch {
            image_width: 10,
            image_height: 20,
            mask_width: 11,
            mask_height: 20,
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("11x20"));
        assert!(msg.contains("10x20"));

        let channel = Error::InvalidChannelValue {
            channel: Channel::Green,
            value: 300,
        };
        let msg = channel.to_string();
        assert!(msg.contains("green"));
        assert!(msg.contains("300"));

        assert!(Error::InvalidAlpha(0.0).to_string().contains("(0, 1]"));
    }
}
