//! bitgraphics - Monochrome bitmaps and frame-diff animations for small
//! pixel displays.
//!
//! This crate models 1-bit-per-pixel graphics and compresses animations by
//! storing only the pixels that change from one frame to the next, in a
//! compact 2-byte-per-change format sized for a 128x64 display.
//!
//! # Architecture
//!
//! - `graphics`: Bitmaps, their JSON form, and composition of several bitmaps
//! - `animation`: Pixel-change records, frame diffs, stream writer/reader,
//!   recorder and player
//! - `schema`: Configuration for animation encoding jobs
//! - `convert`: Image thresholding (requires the `image` feature)
//!
//! # Example
//!
//! ```rust
//! use bitgraphics::{
//!     animation::{AnimationReader, AnimationWriter, FrameDiff},
//!     graphics::Bitmap,
//! };
//!
//! let blank = Bitmap::blank(2, 2);
//! let dot = Bitmap::from_fn(2, 2, |x, y| (x, y) == (1, 0));
//!
//! // Only the changed pixel is stored.
//! let diff = FrameDiff::compare(&blank, &dot).unwrap();
//! assert_eq!(diff.len(), 1);
//!
//! let mut writer = AnimationWriter::new(Vec::new());
//! writer.write(&diff).unwrap();
//! let bytes = writer.finish().unwrap();
//! assert_eq!(bytes.len(), 2);
//!
//! let mut reader = AnimationReader::new(bytes.as_slice());
//! let frame = reader.read().unwrap().unwrap();
//! assert_eq!(frame.apply(&blank).unwrap(), dot);
//! ```

pub mod animation;
pub mod graphics;
pub mod schema;

#[cfg(feature = "image")]
pub mod convert;

// Re-export commonly used types
pub use animation::{
    AnimationError, AnimationPlayer, AnimationReader, AnimationRecorder, AnimationWriter,
    FrameDiff, PixelChange,
};
pub use graphics::{Bitmap, BitmapComposer, BitmapError};
pub use schema::AnimationConfig;
