//! Recover pixels hidden under a constant-color overlay via reverse alpha blending.
//!
//! An image region was obscured by compositing a single overlay color over it:
//! `final = original * alpha + overlay * (1 - alpha)`. Given the overlay color,
//! the alpha, and a mask marking the covered pixels (any non-black mask pixel),
//! this crate inverts the blend per channel and saturates the result to
//! `[0, 255]`.
//!
//! # Quick Start
//!
//! ```no_run
//! use overlay_recovery::{codec, Alpha, OutputFormat, Pixel, RecoveryEngine};
//!
//! # fn main() -> overlay_recovery::Result<()> {
//! let image = codec::read_image("blurred.webp".as_ref())?;
//! let mask = codec::read_image("mask.webp".as_ref())?;
//!
//! let engine = RecoveryEngine::new(Pixel::new(100, 100, 100), Alpha::new(0.5)?);
//! let recovery = engine.recover(&image, &mask)?;
//!
//! let bytes = codec::encode(&recovery.buffer, OutputFormat::WebP)?;
//! codec::write_encoded("recovered.webp".as_ref(), &bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Files
//!
//! [`process_file`] runs the whole pipeline from a validated [`RecoveryConfig`]
//! and writes the output only if every step succeeded.

#![deny(missing_docs)]

pub mod blending;
pub mod codec;
mod config;
mod engine;
pub mod error;
pub mod mask;
mod pixel;

pub use blending::Alpha;
pub use codec::{OutputFormat, SourceInfo};
pub use config::{ProcessOptions, RecoveryConfig};
pub use engine::{process_file, ProcessSummary, Recovery, RecoveryEngine, RecoveryReport};
pub use error::{Error, Result};
pub use mask::{Decision, MaskClassifier};
pub use pixel::{Channel, Pixel, PixelBuffer};
