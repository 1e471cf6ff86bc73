//! Monochrome bitmap model and its persisted JSON form.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while building, reading or persisting a [`Bitmap`].
#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    #[error("Pixel ({x}, {y}) is outside a {width}x{height} bitmap")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("Character {found:?} at position {index} of 'bits' is not a valid 0 or 1")]
    InvalidBit { index: usize, found: char },
    #[error("Bitmap declares {width}x{height} but carries {actual} pixels")]
    LengthMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// On-disk representation of a bitmap.
///
/// `bits` holds one `'0'`/`'1'` character per pixel in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapForm {
    pub bits: String,
    pub width: usize,
    pub height: usize,
}

/// Fixed-size 1-bit-per-pixel canvas, stored row-major (`y * width + x`).
///
/// A bitmap is never mutated through the public API once built, other than by
/// [`Bitmap::init_blank`], so it can be shared freely by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BitmapForm", into = "BitmapForm")]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Create an all-off bitmap.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Build a bitmap from row-major pixels, checking the length.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: Vec<bool>,
    ) -> Result<Self, BitmapError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(BitmapError::LengthMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Reset to a blank `width` x `height` canvas.
    pub fn init_blank(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, false);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixel values.
    #[inline]
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Number of pixels that are on.
    pub fn count_set(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Check whether `(x, y)` lies inside the canvas.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Value of the pixel at `(x, y)`.
    pub fn pixel_at(&self, x: usize, y: usize) -> Result<bool, BitmapError> {
        if !self.contains(x, y) {
            return Err(BitmapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixel(x, y))
    }

    /// Unchecked read for callers that already iterate within bounds.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub(crate) fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        let index = y * self.width + x;
        self.pixels[index] = value;
    }

    /// Row-major `'0'`/`'1'` string of the pixels.
    pub fn to_bit_string(&self) -> String {
        self.pixels
            .iter()
            .map(|&p| if p { '1' } else { '0' })
            .collect()
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, BitmapError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted JSON form, validating bits and dimensions.
    ///
    /// Malformed JSON is [`BitmapError::Json`]; a bad bit character or a
    /// length that disagrees with the dimensions keeps its own variant.
    pub fn from_json(json: &str) -> Result<Self, BitmapError> {
        let form: BitmapForm = serde_json::from_str(json)?;
        Self::try_from(form)
    }

    /// Load a bitmap from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BitmapError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the bitmap to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BitmapError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl TryFrom<BitmapForm> for Bitmap {
    type Error = BitmapError;

    fn try_from(form: BitmapForm) -> Result<Self, Self::Error> {
        let mut pixels = Vec::with_capacity(form.bits.len());
        for (index, c) in form.bits.chars().enumerate() {
            match c {
                '0' => pixels.push(false),
                '1' => pixels.push(true),
                found => return Err(BitmapError::InvalidBit { index, found }),
            }
        }
        Self::from_pixels(form.width, form.height, pixels)
    }
}

impl From<Bitmap> for BitmapForm {
    fn from(bitmap: Bitmap) -> Self {
        Self {
            bits: bitmap.to_bit_string(),
            width: bitmap.width,
            height: bitmap.height,
        }
    }
}

/// Renders rows of `#` (on) and `.` (off), one line per row.
impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.pixel(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
