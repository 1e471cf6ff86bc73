//! Animation player for replaying recorded streams onto a canvas.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::AnimationError;
use super::delta::FrameDiff;
use super::stream::AnimationReader;
use crate::graphics::Bitmap;

/// Replays an animation stream frame by frame.
///
/// The player keeps a canvas that starts blank (or from a given bitmap) and
/// applies each diff to it in turn, which is what a display does with its
/// frame buffer.
///
/// Usage:
/// ```ignore
/// let mut player = AnimationPlayer::open("intro.bga", 128, 64)?;
/// for frame in player.frames() {
///     let bitmap = frame?;
///     // Draw bitmap...
/// }
/// ```
pub struct AnimationPlayer<R: Read> {
    reader: AnimationReader<R>,
    canvas: Bitmap,
}

impl<R: Read> AnimationPlayer<R> {
    /// Create a player over `reader` with a blank `width` x `height` canvas.
    pub fn new(reader: R, width: usize, height: usize) -> Self {
        Self::with_canvas(reader, Bitmap::blank(width, height))
    }

    /// Create a player whose canvas starts as `canvas`.
    pub fn with_canvas(reader: R, canvas: Bitmap) -> Self {
        Self {
            reader: AnimationReader::new(reader),
            canvas,
        }
    }

    /// Current contents of the canvas.
    pub fn canvas(&self) -> &Bitmap {
        &self.canvas
    }

    /// Number of frames played so far.
    pub fn frames_played(&self) -> u64 {
        self.reader.frames_read()
    }

    /// Read the next diff and apply it to the canvas.
    ///
    /// Returns the diff so incremental renderers can repaint only the pixels
    /// it touches.
    pub fn step(&mut self) -> Result<Option<FrameDiff>, AnimationError> {
        let Some(diff) = self.reader.read()? else {
            return Ok(None);
        };
        self.canvas = diff.apply(&self.canvas)?;
        Ok(Some(diff))
    }

    /// Advance one frame and return the full canvas.
    pub fn next_frame(&mut self) -> Result<Option<Bitmap>, AnimationError> {
        Ok(self.step()?.map(|_| self.canvas.clone()))
    }

    /// Create an iterator over all remaining frames.
    pub fn frames(&mut self) -> FrameIterator<'_, R> {
        FrameIterator { player: self }
    }
}

impl AnimationPlayer<BufReader<File>> {
    /// Open an animation file for playback on a blank canvas.
    pub fn open<P: AsRef<Path>>(
        path: P,
        width: usize,
        height: usize,
    ) -> Result<Self, AnimationError> {
        Ok(Self {
            reader: AnimationReader::open(path)?,
            canvas: Bitmap::blank(width, height),
        })
    }
}

/// Iterator over reconstructed animation frames.
pub struct FrameIterator<'a, R: Read> {
    player: &'a mut AnimationPlayer<R>,
}

impl<R: Read> Iterator for FrameIterator<'_, R> {
    type Item = Result<Bitmap, AnimationError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.player.next_frame().transpose()
    }
}
