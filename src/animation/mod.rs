//! Frame-diff animations for small monochrome displays.
//!
//! An animation is stored as the pixel changes between consecutive frames
//! rather than as full frames.
//!
//! # Wire Format
//!
//! A stream is a flat run of 2-byte records with no header, footer or frame
//! count. A zero-length stream is a valid animation with no frames.
//!
//! ```text
//! Record (u16, big-endian, MSB first):
//!   placeholder: 1 bit   frame has no changes, ignore x/y/value
//!   new_frame:   1 bit   first record of a frame
//!   x:           7 bits  0..=127
//!   y:           6 bits  0..=63
//!   value:       1 bit   new pixel value
//! ```
//!
//! Frame boundaries are implied by `new_frame` on the leading record of each
//! frame. A frame with no changes is written as one placeholder record so the
//! boundary survives.

mod delta;
mod format;
mod player;
mod recorder;
mod stream;

use std::io;

use crate::graphics::BitmapError;

pub use delta::FrameDiff;
pub use format::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_X, MAX_Y, PixelChange, RECORD_SIZE};
pub use player::{AnimationPlayer, FrameIterator};
pub use recorder::{AnimationRecorder, AnimationStats, RecorderConfig};
pub use stream::{AnimationFile, AnimationReader, AnimationWriter, OpenMode};

/// Error type for encoding, decoding and streaming animations.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("Cannot encode {axis} = {value}: field holds 0..={max}")]
    CoordinateOutOfRange { axis: char, value: usize, max: usize },

    #[error(
        "Bitmaps must have the same dimensions: {}x{} vs {}x{}",
        .source_size.0, .source_size.1, .target_size.0, .target_size.1
    )]
    DimensionMismatch {
        source_size: (usize, usize),
        target_size: (usize, usize),
    },

    #[error("Record data is {len} bytes, not a multiple of 2")]
    TruncatedRecord { len: usize },

    #[error("Stream ends in the middle of a record")]
    DanglingByte,

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Cannot {operation} an animation opened in {mode} mode")]
    WrongMode {
        operation: &'static str,
        mode: OpenMode,
    },

    #[error("Mode {0:?} not recognized, expected \"r\" or \"w\"")]
    UnknownMode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),
}
