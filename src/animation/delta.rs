//! Frame diffs: the pixel changes that turn one bitmap into the next.

use super::AnimationError;
use super::format::{PixelChange, RECORD_SIZE};
use crate::graphics::Bitmap;

/// Ordered pixel changes transforming a source bitmap into a target of the
/// same size.
///
/// Records are kept in row-major scan order (y outer, x inner). Consumers
/// replay them in sequence, so the order is never rearranged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameDiff {
    changes: Vec<PixelChange>,
}

impl FrameDiff {
    /// Wrap an existing sequence of records.
    pub fn from_changes(changes: Vec<PixelChange>) -> Self {
        Self { changes }
    }

    /// Collect every pixel where `target` differs from `source`.
    ///
    /// Returned records have both flags cleared; an identical pair yields an
    /// empty diff.
    pub fn compare(source: &Bitmap, target: &Bitmap) -> Result<Self, AnimationError> {
        if source.width() != target.width() || source.height() != target.height() {
            return Err(AnimationError::DimensionMismatch {
                source_size: (source.width(), source.height()),
                target_size: (target.width(), target.height()),
            });
        }

        let mut changes = Vec::new();
        for y in 0..source.height() {
            for x in 0..source.width() {
                let value = target.pixel(x, y);
                if source.pixel(x, y) != value {
                    changes.push(PixelChange::new(x, y, value));
                }
            }
        }

        Ok(Self { changes })
    }

    pub fn changes(&self) -> &[PixelChange] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<PixelChange> {
        self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Records that describe an actual pixel write (placeholders skipped).
    pub fn pixel_changes(&self) -> impl Iterator<Item = &PixelChange> {
        self.changes.iter().filter(|c| !c.placeholder)
    }

    /// The record sequence as it goes on the wire.
    ///
    /// An empty diff becomes a single placeholder. The first record always
    /// carries `new_frame`; the others keep whatever flag they hold.
    pub fn framed(&self) -> Vec<PixelChange> {
        let mut framed = if self.changes.is_empty() {
            vec![PixelChange::placeholder()]
        } else {
            self.changes.clone()
        };
        framed[0].new_frame = true;
        framed
    }

    /// Encode the framed records. The output is never empty and is always a
    /// multiple of [`RECORD_SIZE`] bytes.
    ///
    /// Every record is validated before the buffer is returned, so a
    /// coordinate out of range yields an error and no partial bytes.
    pub fn encode(&self) -> Result<Vec<u8>, AnimationError> {
        let framed = self.framed();
        let mut bytes = Vec::with_capacity(framed.len() * RECORD_SIZE);
        for change in &framed {
            bytes.extend_from_slice(&change.encode()?);
        }
        Ok(bytes)
    }

    /// Decode a buffer of back-to-back records.
    pub fn decode(bytes: &[u8]) -> Result<Self, AnimationError> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(AnimationError::TruncatedRecord { len: bytes.len() });
        }

        let changes = bytes
            .chunks_exact(RECORD_SIZE)
            .map(|chunk| PixelChange::decode([chunk[0], chunk[1]]))
            .collect();
        Ok(Self { changes })
    }

    /// Replay the diff onto a copy of `base`, skipping placeholders.
    pub fn apply(&self, base: &Bitmap) -> Result<Bitmap, AnimationError> {
        let mut canvas = base.clone();
        for change in self.pixel_changes() {
            if !canvas.contains(change.x, change.y) {
                return Err(AnimationError::OutOfBounds {
                    x: change.x,
                    y: change.y,
                    width: canvas.width(),
                    height: canvas.height(),
                });
            }
            canvas.set_pixel(change.x, change.y, change.value);
        }
        Ok(canvas)
    }
}

impl From<Vec<PixelChange>> for FrameDiff {
    fn from(changes: Vec<PixelChange>) -> Self {
        Self::from_changes(changes)
    }
}
