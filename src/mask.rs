//! Mask classification: which image pixels were covered by the overlay.
//!
//! A mask pixel exactly equal to [`Pixel::BLACK`] marks an untouched pixel.
//! Every other value, however dark, marks a pixel to recover.

use crate::error::{Error, Result};
use crate::pixel::{Pixel, PixelBuffer};

/// What to do with one image pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The overlay was composited here; invert it.
    Recover,
    /// Untouched; copy the pixel as-is.
    PassThrough,
}

impl Decision {
    /// Classify a single mask pixel.
    #[must_use]
    pub fn of(mask_px: Pixel) -> Self {
        if mask_px == Pixel::BLACK {
            Self::PassThrough
        } else {
            Self::Recover
        }
    }
}

/// A mask checked against the dimensions of the image it describes.
#[derive(Debug, Clone, Copy)]
pub struct MaskClassifier<'a> {
    mask: &'a PixelBuffer,
}

impl<'a> MaskClassifier<'a> {
    /// Pair `mask` with an image of `width x height`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the mask has other dimensions.
    pub fn new(mask: &'a PixelBuffer, width: u32, height: u32) -> Result<Self> {
        if mask.dimensions() != (width, height) {
            return Err(Error::DimensionMismatch {
                image_width: width,
                image_height: height,
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }
        Ok(Self { mask })
    }

    /// Decision for the image pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for coordinates outside the mask.
    pub fn classify(self, x: u32, y: u32) -> Result<Decision> {
        self.mask.get(x, y).map(Decision::of)
    }

    /// Mask pixels in row-major order, one per image pixel.
    pub(crate) fn pixels(self) -> &'a [Pixel] {
        self.mask.pixels()
    }
}
