//! Composition of several bitmaps into one shared coordinate space.

use super::Bitmap;

/// A bitmap placed at an offset inside a [`BitmapComposer`].
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub bitmap: &'a Bitmap,
    pub x: i64,
    pub y: i64,
}

impl Placement<'_> {
    #[inline]
    fn right(&self) -> i64 {
        self.x + self.bitmap.width() as i64
    }

    #[inline]
    fn bottom(&self) -> i64 {
        self.y + self.bitmap.height() as i64
    }
}

/// Positions borrowed bitmaps relative to each other and merges them.
///
/// Overlapping placements are combined with logical OR, so the flattened
/// result does not depend on the order bitmaps were added in.
///
/// ```
/// use bitgraphics::graphics::{Bitmap, BitmapComposer};
///
/// let glyph = Bitmap::from_fn(2, 2, |x, y| x == y);
/// let mut line = BitmapComposer::new();
/// line.add(&glyph, 0, 0);
/// line.add(&glyph, line.width() as i64, 0);
///
/// let flat = line.flatten();
/// assert_eq!((flat.width(), flat.height()), (4, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BitmapComposer<'a> {
    placements: Vec<Placement<'a>>,
}

impl<'a> BitmapComposer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `bitmap` with its top-left corner at `(x, y)`.
    pub fn add(&mut self, bitmap: &'a Bitmap, x: i64, y: i64) {
        self.placements.push(Placement { bitmap, x, y });
    }

    pub fn placements(&self) -> &[Placement<'a>] {
        &self.placements
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Left-most x of any placement.
    pub fn left(&self) -> i64 {
        self.placements.iter().map(|p| p.x).min().unwrap_or(0)
    }

    /// Right edge (exclusive) of the right-most placement.
    pub fn right(&self) -> i64 {
        self.placements.iter().map(Placement::right).max().unwrap_or(0)
    }

    /// Top-most y of any placement.
    pub fn top(&self) -> i64 {
        self.placements.iter().map(|p| p.y).min().unwrap_or(0)
    }

    /// Bottom edge (exclusive) of the lowest placement.
    pub fn bottom(&self) -> i64 {
        self.placements.iter().map(Placement::bottom).max().unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        (self.right() - self.left()).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.bottom() - self.top()).max(0) as usize
    }

    /// Merge all placements into a single bitmap spanning their bounding box.
    ///
    /// Walks each placement's own pixels once and ORs them into the output,
    /// so cost is proportional to the total number of input pixels.
    pub fn flatten(&self) -> Bitmap {
        let (left, top) = (self.left(), self.top());
        let mut out = Bitmap::blank(self.width(), self.height());

        for placement in &self.placements {
            let bitmap = placement.bitmap;
            let ox = (placement.x - left) as usize;
            let oy = (placement.y - top) as usize;

            for y in 0..bitmap.height() {
                for x in 0..bitmap.width() {
                    if bitmap.pixel(x, y) {
                        out.set_pixel(ox + x, oy + y, true);
                    }
                }
            }
        }

        out
    }
}
