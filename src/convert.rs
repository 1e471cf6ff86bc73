//! Conversion of ordinary images into monochrome bitmaps by thresholding.

use std::fs;
use std::io;
use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use log::info;

use crate::graphics::{Bitmap, BitmapError};

/// Error type for image conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Threshold {0} must be within 0.0..=1.0")]
    InvalidThreshold(f32),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Threshold an RGBA image into a bitmap.
///
/// A pixel is on when it is not fully transparent and the mean of its RGB
/// channels is at or below `255 - round(threshold * 255)`. Higher thresholds
/// therefore need darker pixels to turn on.
pub fn threshold_rgba(image: &RgbaImage, threshold: f32) -> Result<Bitmap, ConvertError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConvertError::InvalidThreshold(threshold));
    }
    let cutoff = 255 - (threshold * 255.0).round() as u32;

    let bitmap = Bitmap::from_fn(image.width() as usize, image.height() as usize, |x, y| {
        let [r, g, b, a] = image.get_pixel(x as u32, y as u32).0;
        let mean = (r as u32 + g as u32 + b as u32 + 1) / 3;
        a > 0 && mean <= cutoff
    });
    Ok(bitmap)
}

/// Load an image file, optionally resize it, and threshold it.
pub fn image_to_bitmap<P: AsRef<Path>>(
    path: P,
    threshold: f32,
    resize: Option<(u32, u32)>,
) -> Result<Bitmap, ConvertError> {
    let mut image = image::open(path)?;
    if let Some((width, height)) = resize {
        image = image.resize_exact(width, height, FilterType::Triangle);
    }
    threshold_rgba(&image.to_rgba8(), threshold)
}

/// Convert every image in `input_dir` into `<stem>.json` in `output_dir`.
///
/// Returns the number of files converted.
pub fn images_to_bitmaps<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    threshold: f32,
    resize: Option<(u32, u32)>,
) -> Result<usize, ConvertError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut converted = 0;
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = path.file_stem() else {
            continue;
        };

        let bitmap = image_to_bitmap(&path, threshold, resize)?;
        let target = output_dir.join(format!("{}.json", stem.to_string_lossy()));
        bitmap.save(&target)?;
        info!("converted {} -> {}", path.display(), target.display());
        converted += 1;
    }
    Ok(converted)
}
