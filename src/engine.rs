//! Core overlay recovery engine.

use std::ops::AddAssign;

use crate::blending::{self, Alpha};
use crate::codec::{self, SourceInfo};
use crate::config::RecoveryConfig;
use crate::error::Result;
use crate::mask::{Decision, MaskClassifier};
use crate::pixel::{Pixel, PixelBuffer};

/// Counts gathered while recovering a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Pixels the mask marked for recovery.
    pub recovered: u64,
    /// Pixels copied unchanged.
    pub passed_through: u64,
    /// Channels whose inverted value fell outside `[0, 255]` and saturated.
    pub saturated_channels: u64,
}

impl AddAssign for RecoveryReport {
    fn add_assign(&mut self, rhs: Self) {
        self.recovered += rhs.recovered;
        self.passed_through += rhs.passed_through;
        self.saturated_channels += rhs.saturated_channels;
    }
}

/// Output of [`RecoveryEngine::recover`].
#[derive(Debug, Clone)]
pub struct Recovery {
    /// The recovered image.
    pub buffer: PixelBuffer,
    /// What happened along the way.
    pub report: RecoveryReport,
}

/// Inverts a constant-color overlay blended at a known alpha.
///
/// Holds only the overlay parameters; create once and reuse for any number
/// of image/mask pairs.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryEngine {
    overlay: Pixel,
    alpha: Alpha,
}

impl RecoveryEngine {
    /// Engine for `overlay` blended at `alpha`.
    #[must_use]
    pub fn new(overlay: Pixel, alpha: Alpha) -> Self {
        Self { overlay, alpha }
    }

    /// Overlay color.
    #[must_use]
    pub fn overlay(self) -> Pixel {
        self.overlay
    }

    /// Blend weight.
    #[must_use]
    pub fn alpha(self) -> Alpha {
        self.alpha
    }

    /// Recover every masked pixel of `image`.
    ///
    /// The output starts as a copy of `image`; pixels whose mask value is not
    /// exactly black are replaced by the inverted blend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
    /// `mask` and `image` differ in size. Nothing is computed in that case.
    pub fn recover(self, image: &PixelBuffer, mask: &PixelBuffer) -> Result<Recovery> {
        let (width, height) = image.dimensions();
        let classifier = MaskClassifier::new(mask, width, height)?;

        let mut buffer = image.clone();
        if buffer.is_empty() {
            return Ok(Recovery {
                buffer,
                report: RecoveryReport::default(),
            });
        }

        // Same dimensions, so row chunks of image and mask line up one to one.
        let row_len = width as usize;
        let mask_pixels = classifier.pixels();
        let recover_row = |(out_row, mask_row): (&mut [Pixel], &[Pixel])| {
            self.recover_row(out_row, mask_row)
        };

        #[cfg(feature = "parallel")]
        let report = {
            use rayon::prelude::*;
            buffer
                .pixels_mut()
                .par_chunks_mut(row_len)
                .zip(mask_pixels.par_chunks(row_len))
                .map(recover_row)
                .reduce(RecoveryReport::default, |mut acc, r| {
                    acc += r;
                    acc
                })
        };

        #[cfg(not(feature = "parallel"))]
        let report = buffer
            .pixels_mut()
            .chunks_mut(row_len)
            .zip(mask_pixels.chunks(row_len))
            .map(recover_row)
            .fold(RecoveryReport::default(), |mut acc, r| {
                acc += r;
                acc
            });

        log::debug!(
            "recovered {} pixels, passed through {}, saturated {} channels",
            report.recovered,
            report.passed_through,
            report.saturated_channels
        );
        Ok(Recovery { buffer, report })
    }

    /// Recover one row in place. `row` still holds the composited pixels.
    fn recover_row(self, row: &mut [Pixel], mask_row: &[Pixel]) -> RecoveryReport {
        let mut report = RecoveryReport::default();
        for (px, &m) in row.iter_mut().zip(mask_row) {
            match Decision::of(m) {
                Decision::PassThrough => report.passed_through += 1,
                Decision::Recover => {
                    let (original, saturated) =
                        blending::recover_pixel(*px, self.alpha, self.overlay);
                    *px = original;
                    report.recovered += 1;
                    report.saturated_channels += u64::from(saturated);
                }
            }
        }
        report
    }
}

/// What [`process_file`] read, computed, and wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    /// The composited input image.
    pub image: SourceInfo,
    /// The mask.
    pub mask: SourceInfo,
    /// Encoded length of the written output.
    pub output_bytes: usize,
    /// Per-pixel counts from the recovery.
    pub report: RecoveryReport,
}

/// Run one recovery from files: load, recover, encode, save.
///
/// The output file is written only after every earlier step has succeeded.
///
/// # Errors
///
/// Propagates the first failure from reading, decoding, dimension checking,
/// encoding, or writing.
pub fn process_file(config: &RecoveryConfig) -> Result<ProcessSummary> {
    let (image, image_info) = codec::read_image_with_info(&config.image)?;
    let (mask, mask_info) = codec::read_image_with_info(&config.mask)?;

    log::debug!(
        "alpha={} overlay_color={}; original = (final - overlay * (1 - alpha)) / alpha",
        config.alpha,
        config.overlay
    );

    let engine = RecoveryEngine::new(config.overlay, config.alpha);
    let Recovery { buffer, report } = engine.recover(&image, &mask)?;

    let bytes = codec::encode(&buffer, config.format)?;
    codec::write_encoded(&config.output, &bytes)?;
    Ok(ProcessSummary {
        image: image_info,
        mask: mask_info,
        output_bytes: bytes.len(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn gray(v: u8) -> Pixel {
        Pixel::new(v, v, v)
    }

    fn engine(overlay: Pixel, alpha: f32) -> RecoveryEngine {
        RecoveryEngine::new(overlay, Alpha::new(alpha).unwrap())
    }

    #[test]
    fn two_by_two_scenario() {
        let image = PixelBuffer::new(2, 2, vec![gray(200), gray(50), gray(10), gray(0)]).unwrap();
        let mask = PixelBuffer::new(
            2,
            2,
            vec![Pixel::WHITE, Pixel::BLACK, Pixel::WHITE, Pixel::BLACK],
        )
        .unwrap();

        let out = engine(gray(100), 0.5).recover(&image, &mask).unwrap();

        assert_eq!(
            out.buffer.pixels(),
            &[gray(255), gray(50), gray(0), gray(0)]
        );
        assert_eq!(
            out.report,
            RecoveryReport {
                recovered: 2,
                passed_through: 2,
                saturated_channels: 6,
            }
        );
    }

    #[test]
    fn black_mask_passes_everything_through() {
        let image = PixelBuffer::new(3, 1, vec![gray(1), gray(128), gray(254)]).unwrap();
        let mask = PixelBuffer::filled(3, 1, Pixel::BLACK);
        let out = engine(Pixel::new(255, 0, 17), 0.1)
            .recover(&image, &mask)
            .unwrap();
        assert_eq!(out.buffer, image);
        assert_eq!(out.report.recovered, 0);
        assert_eq!(out.report.passed_through, 3);
    }

    #[test]
    fn dimension_mismatch_produces_no_output() {
        let image = PixelBuffer::filled(4, 4, gray(9));
        let mask = PixelBuffer::filled(4, 3, Pixel::WHITE);
        let err = engine(gray(0), 0.5).recover(&image, &mask).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn empty_image_recovers_to_empty() {
        let empty = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        let out = engine(gray(0), 0.5).recover(&empty, &empty).unwrap();
        assert!(out.buffer.is_empty());
        assert_eq!(out.report, RecoveryReport::default());
    }

    #[test]
    fn dark_but_not_black_mask_still_recovers() {
        let image = PixelBuffer::filled(1, 1, gray(90));
        let mask = PixelBuffer::filled(1, 1, Pixel::new(0, 0, 1));
        let out = engine(gray(100), 0.5).recover(&image, &mask).unwrap();
        assert_eq!(out.buffer.get(0, 0).unwrap(), gray(80));
    }

    #[test]
    fn recover_matches_per_coordinate_classification() {
        let (w, h) = (7u32, 5u32);
        #[allow(clippy::cast_possible_truncation)]
        let image = PixelBuffer::new(
            w,
            h,
            (0..w * h)
                .map(|i| Pixel::new((i * 7) as u8, (i * 13) as u8, (i * 29) as u8))
                .collect(),
        )
        .unwrap();
        let mask = PixelBuffer::new(
            w,
            h,
            (0..w * h)
                .map(|i| {
                    if i % 3 == 0 {
                        Pixel::BLACK
                    } else {
                        Pixel::WHITE
                    }
                })
                .collect(),
        )
        .unwrap();
        let eng = engine(Pixel::new(30, 60, 90), 0.7);
        let out = eng.recover(&image, &mask).unwrap();
        let classifier = MaskClassifier::new(&mask, w, h).unwrap();

        for y in 0..h {
            for x in 0..w {
                let got = out.buffer.get(x, y).unwrap();
                let input = image.get(x, y).unwrap();
                let expected = match classifier.classify(x, y).unwrap() {
                    Decision::PassThrough => input,
                    Decision::Recover => {
                        blending::recover_pixel(input, eng.alpha(), eng.overlay()).0
                    }
                };
                assert_eq!(got, expected, "pixel ({x},{y})");
            }
        }
    }
}
