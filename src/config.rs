//! Validated run configuration.

use std::path::{Path, PathBuf};

use crate::blending::Alpha;
use crate::codec::OutputFormat;
use crate::error::Result;
use crate::pixel::Pixel;

/// Everything one recovery run needs, checked once at the boundary.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Composited input image.
    pub image: PathBuf,
    /// Mask marking the composited pixels.
    pub mask: PathBuf,
    /// Destination for the recovered image.
    pub output: PathBuf,
    /// Lossless encoding for `output`.
    pub format: OutputFormat,
    /// Overlay color that was blended over the image.
    pub overlay: Pixel,
    /// Weight of the original image in the blend.
    pub alpha: Alpha,
}

impl RecoveryConfig {
    /// Build a configuration from unchecked values.
    ///
    /// `rgb` holds the overlay channels in red, green, blue order. With
    /// `allow_amplify`, alphas above 1 are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`](crate::Error::InvalidAlpha),
    /// [`Error::InvalidChannelValue`](crate::Error::InvalidChannelValue), or
    /// [`Error::UnsupportedFormat`](crate::Error::UnsupportedFormat).
    pub fn new(
        image: impl Into<PathBuf>,
        mask: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        alpha: f32,
        rgb: [i32; 3],
        allow_amplify: bool,
    ) -> Result<Self> {
        let alpha = if allow_amplify {
            Alpha::amplifying(alpha)?
        } else {
            Alpha::new(alpha)?
        };
        let [r, g, b] = rgb;
        let overlay = Pixel::try_from_channels(r, g, b)?;
        let output = output.into();
        let format = OutputFormat::from_path(&output)?;
        Ok(Self {
            image: image.into(),
            mask: mask.into(),
            output,
            format,
            overlay,
            alpha,
        })
    }

    /// Output path.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }
}

/// Options controlling progress reporting.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pixel::Channel;

    #[test]
    fn valid_values_build_config() {
        let cfg = RecoveryConfig::new("a.webp", "m.webp", "o.png", 0.5, [1, 2, 3], false).unwrap();
        assert_eq!(cfg.overlay, Pixel::new(1, 2, 3));
        assert_eq!(cfg.format, OutputFormat::Png);
        assert!((cfg.alpha.get() - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.output_path(), Path::new("o.png"));
    }

    #[test]
    fn rejects_zero_alpha() {
        let err = RecoveryConfig::new("a", "m", "o", 0.0, [0, 0, 0], false).unwrap_err();
        assert!(matches!(err, Error::InvalidAlpha(_)));
    }

    #[test]
    fn amplification_requires_opt_in() {
        assert!(RecoveryConfig::new("a", "m", "o", 1.5, [0, 0, 0], false).is_err());
        assert!(RecoveryConfig::new("a", "m", "o", 1.5, [0, 0, 0], true).is_ok());
        assert!(RecoveryConfig::new("a", "m", "o", 0.0, [0, 0, 0], true).is_err());
    }

    #[test]
    fn rejects_out_of_range_channel() {
        let err = RecoveryConfig::new("a", "m", "o", 0.5, [0, 0, 999], false).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidChannelValue {
                channel: Channel::Blue,
                value: 999
            }
        ));
    }

    #[test]
    fn rejects_lossy_output_extension() {
        let err = RecoveryConfig::new("a", "m", "o.jpeg", 0.5, [0, 0, 0], false).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
