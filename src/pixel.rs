//! RGB pixels and the row-major buffer that holds them.

use std::fmt;

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};

/// One color channel of an RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        })
    }
}

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Pixel {
    /// The `(0, 0, 0)` sentinel that marks untouched mask pixels.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a pixel from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a pixel from wide integer channels, checking each lies in `[0, 255]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannelValue`] naming the first channel out of range.
    pub fn try_from_channels(r: i32, g: i32, b: i32) -> Result<Self> {
        let narrow = |channel, value: i32| {
            u8::try_from(value).map_err(|_| Error::InvalidChannelValue { channel, value })
        };
        Ok(Self::new(
            narrow(Channel::Red, r)?,
            narrow(Channel::Green, g)?,
            narrow(Channel::Blue, b)?,
        ))
    }

    /// Channel values in `[r, g, b]` order.
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb<u8>> for Pixel {
    fn from(px: Rgb<u8>) -> Self {
        Self::from(px.0)
    }
}

impl From<Pixel> for Rgb<u8> {
    fn from(px: Pixel) -> Self {
        Rgb(px.channels())
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.r, self.g, self.b)
    }
}

/// A `width x height` grid of pixels stored in row-major order.
///
/// The pixel sequence always holds exactly `width * height` entries; no
/// operation resizes a buffer after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Wrap a row-major pixel sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferLength`] if `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        let expected = pixel_count(width, height);
        if pixels.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer with every pixel set to `fill`.
    #[must_use]
    pub fn filled(width: u32, height: u32, fill: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; pixel_count(width, height)],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the buffer holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `x < width` and `y < height`.
    pub fn get(&self, x: u32, y: u32) -> Result<Pixel> {
        let idx = self.index(x, y)?;
        Ok(self.pixels[idx])
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `x < width` and `y < height`.
    pub fn set(&mut self, x: u32, y: u32, px: Pixel) -> Result<()> {
        let idx = self.index(x, y)?;
        self.pixels[idx] = px;
        Ok(())
    }

    /// Pixels of row `y`, or `None` past the last row.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Interleaved `r, g, b` bytes in row-major order.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.channels()).collect()
    }
}

impl From<&RgbImage> for PixelBuffer {
    fn from(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.pixels().map(|px| Pixel::from(*px)).collect(),
        }
    }
}

impl From<&PixelBuffer> for RgbImage {
    fn from(buf: &PixelBuffer) -> Self {
        RgbImage::from_fn(buf.width, buf.height, |x, y| {
            buf.pixels[y as usize * buf.width as usize + x as usize].into()
        })
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
