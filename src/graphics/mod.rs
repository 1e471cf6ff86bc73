//! Graphics module - Monochrome bitmaps and their composition.

mod bitmap;
mod composer;

pub use bitmap::{Bitmap, BitmapError, BitmapForm};
pub use composer::{BitmapComposer, Placement};
