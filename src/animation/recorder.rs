//! Animation recorder for turning a sequence of bitmaps into a stream.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::AnimationError;
use super::delta::FrameDiff;
use super::stream::AnimationWriter;
use crate::graphics::Bitmap;

fn default_frame_skip() -> u32 {
    1
}

/// Configuration for animation recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Record every Nth frame (1 = every frame).
    #[serde(default = "default_frame_skip")]
    pub frame_skip: u32,
    /// Maximum frames to record (0 = unlimited).
    #[serde(default)]
    pub max_frames: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            max_frames: 0,
        }
    }
}

/// Records bitmaps as a stream of frame diffs.
///
/// Each recorded bitmap is diffed against the previously recorded one; the
/// first is diffed against a blank canvas of the recorder's size.
///
/// Usage:
/// ```ignore
/// let mut recorder = AnimationRecorder::create("intro.bga", 128, 64, Default::default())?;
/// for frame in &frames {
///     recorder.record_frame(frame)?;
/// }
/// let stats = recorder.finalize()?;
/// ```
pub struct AnimationRecorder<W: Write> {
    writer: AnimationWriter<W>,
    previous: Bitmap,
    config: RecorderConfig,
    step_counter: u32,
    frames_dropped: u64,
}

impl<W: Write> AnimationRecorder<W> {
    /// Create a recorder writing to `writer` for a `width` x `height` canvas.
    pub fn new(writer: W, width: usize, height: usize, config: RecorderConfig) -> Self {
        Self::from_writer(AnimationWriter::new(writer), width, height, config)
    }

    fn from_writer(
        writer: AnimationWriter<W>,
        width: usize,
        height: usize,
        config: RecorderConfig,
    ) -> Self {
        Self {
            writer,
            previous: Bitmap::blank(width, height),
            config,
            step_counter: 0,
            frames_dropped: 0,
        }
    }

    /// Record a frame.
    ///
    /// Returns true if the frame was actually written (frames may be skipped
    /// based on config). Bitmaps must match the recorder's canvas size.
    pub fn record_frame(&mut self, frame: &Bitmap) -> Result<bool, AnimationError> {
        self.step_counter += 1;

        // Check frame skip
        if self.step_counter < self.config.frame_skip {
            return Ok(false);
        }
        self.step_counter = 0;

        // Check max frames
        if self.config.max_frames > 0 && self.writer.frames_written() >= self.config.max_frames {
            if self.frames_dropped == 0 {
                warn!(
                    "frame limit of {} reached, dropping further frames",
                    self.config.max_frames
                );
            }
            self.frames_dropped += 1;
            return Ok(false);
        }

        let diff = FrameDiff::compare(&self.previous, frame)?;
        self.writer.write(&diff)?;
        self.previous.clone_from(frame);

        Ok(true)
    }

    /// Get number of frames recorded so far.
    pub fn frames_written(&self) -> u64 {
        self.writer.frames_written()
    }

    /// The last recorded frame (blank before the first one).
    pub fn last_frame(&self) -> &Bitmap {
        &self.previous
    }

    /// Flush the stream and report what was written.
    pub fn finalize(self) -> Result<AnimationStats, AnimationError> {
        let stats = AnimationStats {
            frame_count: self.writer.frames_written(),
            record_count: self.writer.records_written(),
            total_bytes: self.writer.bytes_written(),
            placeholder_frames: self.writer.placeholder_frames(),
            frames_dropped: self.frames_dropped,
        };
        self.writer.finish()?;
        debug!("recording finalized: {}", stats);
        Ok(stats)
    }
}

impl AnimationRecorder<BufWriter<File>> {
    /// Create a recorder writing to a new file at `path`.
    pub fn create<P: AsRef<Path>>(
        path: P,
        width: usize,
        height: usize,
        config: RecorderConfig,
    ) -> Result<Self, AnimationError> {
        let writer = AnimationWriter::create(path)?;
        Ok(Self::from_writer(writer, width, height, config))
    }
}

/// Statistics from a recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationStats {
    /// Total frames recorded.
    pub frame_count: u64,
    /// Records written, placeholders included.
    pub record_count: u64,
    /// Total stream size in bytes.
    pub total_bytes: u64,
    /// Frames identical to their predecessor.
    pub placeholder_frames: u64,
    /// Frames discarded after hitting `max_frames`.
    pub frames_dropped: u64,
}

impl std::fmt::Display for AnimationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} records, {} bytes total ({} unchanged, {} dropped)",
            self.frame_count,
            self.record_count,
            self.total_bytes,
            self.placeholder_frames,
            self.frames_dropped
        )
    }
}
