//! Binary format of a single pixel-change record.
//!
//! Each record is one big-endian `u16`, most significant bit first:
//!
//! ```text
//! [placeholder:1][new_frame:1][x:7][y:6][value:1]
//! ```

use std::fmt;
use std::io::{self, Read, Write};

use super::AnimationError;

/// Encoded size of one record in bytes.
pub const RECORD_SIZE: usize = 2;

/// Width of the display the coordinate fields are sized for.
pub const DISPLAY_WIDTH: usize = 128;

/// Height of the display the coordinate fields are sized for.
pub const DISPLAY_HEIGHT: usize = 64;

/// Largest x coordinate a record can carry (7 bits).
pub const MAX_X: usize = DISPLAY_WIDTH - 1;

/// Largest y coordinate a record can carry (6 bits).
pub const MAX_Y: usize = DISPLAY_HEIGHT - 1;

const PLACEHOLDER_BIT: u16 = 1 << 15;
const NEW_FRAME_BIT: u16 = 1 << 14;
const X_SHIFT: u32 = 7;
const X_MASK: u16 = 0x7F;
const Y_SHIFT: u32 = 1;
const Y_MASK: u16 = 0x3F;
const VALUE_BIT: u16 = 1;

/// One changed pixel, plus the flags used to mark frame boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelChange {
    /// Marks an empty frame; `x`, `y` and `value` carry no meaning.
    pub placeholder: bool,
    /// Set on the first record of each frame in an encoded stream.
    pub new_frame: bool,
    pub x: usize,
    pub y: usize,
    /// New value of the pixel.
    pub value: bool,
}

impl PixelChange {
    /// A regular pixel change with both flags cleared.
    pub fn new(x: usize, y: usize, value: bool) -> Self {
        Self {
            x,
            y,
            value,
            ..Default::default()
        }
    }

    /// The record written in place of a frame with no changes.
    pub fn placeholder() -> Self {
        Self {
            placeholder: true,
            new_frame: true,
            ..Default::default()
        }
    }

    /// Pack into the 16-bit wire layout.
    pub fn to_u16(self) -> Result<u16, AnimationError> {
        if self.x > MAX_X {
            return Err(AnimationError::CoordinateOutOfRange {
                axis: 'x',
                value: self.x,
                max: MAX_X,
            });
        }
        if self.y > MAX_Y {
            return Err(AnimationError::CoordinateOutOfRange {
                axis: 'y',
                value: self.y,
                max: MAX_Y,
            });
        }

        let mut bits = (self.x as u16) << X_SHIFT | (self.y as u16) << Y_SHIFT;
        if self.placeholder {
            bits |= PLACEHOLDER_BIT;
        }
        if self.new_frame {
            bits |= NEW_FRAME_BIT;
        }
        if self.value {
            bits |= VALUE_BIT;
        }
        Ok(bits)
    }

    /// Unpack from the 16-bit wire layout. Every bit pattern is valid.
    pub fn from_u16(bits: u16) -> Self {
        Self {
            placeholder: bits & PLACEHOLDER_BIT != 0,
            new_frame: bits & NEW_FRAME_BIT != 0,
            x: ((bits >> X_SHIFT) & X_MASK) as usize,
            y: ((bits >> Y_SHIFT) & Y_MASK) as usize,
            value: bits & VALUE_BIT != 0,
        }
    }

    /// Encode as two bytes, most significant byte first.
    pub fn encode(&self) -> Result<[u8; RECORD_SIZE], AnimationError> {
        Ok(self.to_u16()?.to_be_bytes())
    }

    pub fn decode(bytes: [u8; RECORD_SIZE]) -> Self {
        Self::from_u16(u16::from_be_bytes(bytes))
    }

    /// Write the encoded record to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), AnimationError> {
        w.write_all(&self.encode()?)?;
        Ok(())
    }

    /// Read the next record from input.
    ///
    /// Returns `Ok(None)` when the input is exhausted on a record boundary and
    /// [`AnimationError::DanglingByte`] when it ends halfway through one.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Option<Self>, AnimationError> {
        let mut buf = [0u8; RECORD_SIZE];
        let mut filled = 0;

        while filled < RECORD_SIZE {
            match r.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            RECORD_SIZE => Ok(Some(Self::decode(buf))),
            _ => Err(AnimationError::DanglingByte),
        }
    }
}

impl fmt::Display for PixelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.placeholder {
            return write!(f, "placeholder (new_frame={})", self.new_frame);
        }
        write!(
            f,
            "({}, {}) -> {} (new_frame={})",
            self.x,
            self.y,
            u8::from(self.value),
            self.new_frame
        )
    }
}
