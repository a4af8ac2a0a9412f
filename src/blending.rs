//! Alpha blending math for overlay recovery.
//!
//! The overlay was applied with forward alpha blending:
//! `final = original * alpha + overlay * (1 - alpha)`
//!
//! This module provides the reverse operation to recover original pixels.

use std::fmt;

use crate::error::{Error, Result};
use crate::pixel::Pixel;

/// Blend weight of the original image in the forward compositing equation.
///
/// Always finite and strictly positive. Values above 1 only come from
/// [`Alpha::amplifying`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Alpha(f32);

impl Alpha {
    /// Accept an alpha in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`] for zero, negative, non-finite, or > 1 values.
    pub fn new(value: f32) -> Result<Self> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidAlpha(value))
        }
    }

    /// Accept any finite positive alpha, including values above 1.
    ///
    /// An alpha above 1 amplifies the difference from the overlay color
    /// instead of modelling a physical blend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`] for zero, negative, or non-finite values.
    pub fn amplifying(value: f32) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidAlpha(value))
        }
    }

    /// The raw weight.
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Invert the blend for one channel without clamping.
///
/// `original = (final - overlay * (1 - alpha)) / alpha`
#[must_use]
pub fn invert_channel(final_value: u8, alpha: Alpha, overlay_value: u8) -> f32 {
    let a = alpha.get();
    (f32::from(final_value) - f32::from(overlay_value) * (1.0 - a)) / a
}

/// Narrow an inverted channel to 8 bits: saturate at `[0, 255]`, then round to nearest.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn saturate(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// Recover one channel: [`invert_channel`] followed by [`saturate`].
#[must_use]
pub fn recover_channel(final_value: u8, alpha: Alpha, overlay_value: u8) -> u8 {
    saturate(invert_channel(final_value, alpha, overlay_value))
}

/// Recover a whole pixel, returning it with the number of channels that saturated.
#[must_use]
pub fn recover_pixel(final_px: Pixel, alpha: Alpha, overlay: Pixel) -> (Pixel, u32) {
    let mut saturated = 0;
    let mut out = [0u8; 3];
    for ((slot, f), o) in out
        .iter_mut()
        .zip(final_px.channels())
        .zip(overlay.channels())
    {
        let raw = invert_channel(f, alpha, o);
        if !(0.0..=255.0).contains(&raw) {
            saturated += 1;
        }
        *slot = saturate(raw);
    }
    (Pixel::from(out), saturated)
}
