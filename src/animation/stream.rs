//! Sequential writer and reader for animation streams.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use log::{debug, trace};

use super::AnimationError;
use super::delta::FrameDiff;
use super::format::{PixelChange, RECORD_SIZE};

/// Appends encoded frame diffs to a byte sink.
///
/// Each call to [`write`](Self::write) is self-contained; frames land in the
/// sink in the order they are written.
pub struct AnimationWriter<W: Write> {
    writer: W,
    frames_written: u64,
    records_written: u64,
    placeholder_frames: u64,
}

impl<W: Write> AnimationWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_written: 0,
            records_written: 0,
            placeholder_frames: 0,
        }
    }

    /// Encode `diff` and append it to the sink.
    ///
    /// The whole frame is encoded before anything is written, so an invalid
    /// record leaves the sink untouched.
    pub fn write(&mut self, diff: &FrameDiff) -> Result<(), AnimationError> {
        let bytes = diff.encode()?;
        self.writer.write_all(&bytes)?;

        self.frames_written += 1;
        self.records_written += (bytes.len() / RECORD_SIZE) as u64;
        if diff.is_empty() {
            self.placeholder_frames += 1;
        }
        trace!(
            "wrote frame {} ({} records)",
            self.frames_written,
            bytes.len() / RECORD_SIZE
        );
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Records written so far, placeholders included.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Frames that were written as a lone placeholder.
    pub fn placeholder_frames(&self) -> u64 {
        self.placeholder_frames
    }

    pub fn bytes_written(&self) -> u64 {
        self.records_written * RECORD_SIZE as u64
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> Result<W, AnimationError> {
        self.writer.flush()?;
        debug!(
            "animation closed after {} frames ({} bytes)",
            self.frames_written,
            self.bytes_written()
        );
        Ok(self.writer)
    }
}

impl AnimationWriter<BufWriter<File>> {
    /// Create (or truncate) an animation file for writing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, AnimationError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!("writing animation to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

/// Reads frame diffs back out of a byte source.
///
/// Frames are not delimited on the wire; a frame ends where the next record
/// with `new_frame` set begins. That record is already consumed by the time
/// the boundary is seen, so it is held in `pending` until the next call.
///
/// ```
/// use bitgraphics::animation::{AnimationReader, AnimationWriter, FrameDiff, PixelChange};
///
/// let mut writer = AnimationWriter::new(Vec::new());
/// writer.write(&FrameDiff::from_changes(vec![PixelChange::new(1, 0, true)])).unwrap();
/// writer.write(&FrameDiff::default()).unwrap();
/// let bytes = writer.finish().unwrap();
///
/// let mut reader = AnimationReader::new(bytes.as_slice());
/// assert_eq!(reader.read().unwrap().unwrap().len(), 1);
/// assert!(reader.read().unwrap().unwrap().changes()[0].placeholder);
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct AnimationReader<R: Read> {
    reader: R,
    pending: Option<PixelChange>,
    frames_read: u64,
}

impl<R: Read> AnimationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            frames_read: 0,
        }
    }

    /// Read the next frame, or `None` once the source is exhausted.
    pub fn read(&mut self) -> Result<Option<FrameDiff>, AnimationError> {
        let mut frame: Vec<PixelChange> = self.pending.take().into_iter().collect();

        loop {
            let Some(change) = PixelChange::read_from(&mut self.reader)? else {
                if frame.is_empty() {
                    return Ok(None);
                }
                break;
            };

            if change.new_frame && !frame.is_empty() {
                self.pending = Some(change);
                break;
            }
            frame.push(change);
        }

        self.frames_read += 1;
        trace!("read frame {} ({} records)", self.frames_read, frame.len());
        Ok(Some(FrameDiff::from_changes(frame)))
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl AnimationReader<BufReader<File>> {
    /// Open an animation file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AnimationError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("reading animation from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> Iterator for AnimationReader<R> {
    type Item = Result<FrameDiff, AnimationError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

/// Direction an [`AnimationFile`] is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

impl FromStr for OpenMode {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            _ => Err(AnimationError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpenMode::Read => "read",
            OpenMode::Write => "write",
        })
    }
}

/// A file-backed animation opened in exactly one mode.
///
/// The file handle is released when this value is dropped, on every path.
/// [`close`](Self::close) additionally flushes pending writes and reports any
/// error doing so.
pub enum AnimationFile {
    Reader(AnimationReader<BufReader<File>>),
    Writer(AnimationWriter<BufWriter<File>>),
}

impl AnimationFile {
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self, AnimationError> {
        Ok(match mode {
            OpenMode::Read => AnimationFile::Reader(AnimationReader::open(path)?),
            OpenMode::Write => AnimationFile::Writer(AnimationWriter::create(path)?),
        })
    }

    pub fn mode(&self) -> OpenMode {
        match self {
            AnimationFile::Reader(_) => OpenMode::Read,
            AnimationFile::Writer(_) => OpenMode::Write,
        }
    }

    /// Append a frame. Fails on a file opened for reading.
    pub fn write(&mut self, diff: &FrameDiff) -> Result<(), AnimationError> {
        match self {
            AnimationFile::Writer(writer) => writer.write(diff),
            AnimationFile::Reader(_) => Err(AnimationError::WrongMode {
                operation: "write",
                mode: OpenMode::Read,
            }),
        }
    }

    /// Read the next frame. Fails on a file opened for writing.
    pub fn read(&mut self) -> Result<Option<FrameDiff>, AnimationError> {
        match self {
            AnimationFile::Reader(reader) => reader.read(),
            AnimationFile::Writer(_) => Err(AnimationError::WrongMode {
                operation: "read",
                mode: OpenMode::Write,
            }),
        }
    }

    pub fn close(self) -> Result<(), AnimationError> {
        match self {
            AnimationFile::Reader(_) => Ok(()),
            AnimationFile::Writer(writer) => writer.finish().map(drop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Bitmap;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn diff(coords: &[(usize, usize)]) -> FrameDiff {
        FrameDiff::from_changes(
            coords
                .iter()
                .map(|&(x, y)| PixelChange::new(x, y, true))
                .collect(),
        )
    }

    fn pixels(frame: &FrameDiff) -> Vec<(usize, usize)> {
        frame.pixel_changes().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_empty_stream_has_no_frames() {
        let mut reader = AnimationReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read().unwrap().is_none());
        assert!(reader.read().unwrap().is_none());
        assert_eq!(reader.frames_read(), 0);
    }

    #[test]
    fn test_single_frame_roundtrip() {
        let a = Bitmap::blank(2, 2);
        let b = Bitmap::from_fn(2, 2, |x, y| (x, y) == (1, 0));

        let mut writer = AnimationWriter::new(Vec::new());
        writer.write(&FrameDiff::compare(&a, &b).unwrap()).unwrap();
        assert_eq!(writer.bytes_written(), 2);
        let bytes = writer.finish().unwrap();

        let mut reader = AnimationReader::new(bytes.as_slice());
        let frame = reader.read().unwrap().unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!((frame.changes()[0].x, frame.changes()[0].y), (1, 0));
        assert!(frame.changes()[0].value);
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_frame_boundaries_survive() {
        let frames = vec![
            diff(&[(0, 0), (3, 1)]),
            FrameDiff::default(),
            diff(&[(5, 5)]),
            FrameDiff::default(),
            FrameDiff::default(),
            diff(&[(1, 2), (2, 2), (3, 2)]),
        ];

        let mut writer = AnimationWriter::new(Vec::new());
        for frame in &frames {
            writer.write(frame).unwrap();
        }
        assert_eq!(writer.frames_written(), 6);
        assert_eq!(writer.placeholder_frames(), 3);
        assert_eq!(writer.records_written(), 9);
        let bytes = writer.finish().unwrap();

        let read: Vec<FrameDiff> = AnimationReader::new(bytes.as_slice())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(read.len(), frames.len());
        for (written, read) in frames.iter().zip(&read) {
            assert_eq!(pixels(written), pixels(read));
            assert!(read.changes()[0].new_frame);
        }
        assert!(read[1].changes()[0].placeholder);
    }

    #[test]
    fn test_reader_holds_leading_record() {
        let mut writer = AnimationWriter::new(Vec::new());
        writer.write(&diff(&[(1, 1)])).unwrap();
        writer.write(&diff(&[(2, 2)])).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = AnimationReader::new(bytes.as_slice());
        assert_eq!(pixels(&reader.read().unwrap().unwrap()), vec![(1, 1)]);
        assert_eq!(reader.pending.map(|c| (c.x, c.y)), Some((2, 2)));
        assert_eq!(pixels(&reader.read().unwrap().unwrap()), vec![(2, 2)]);
        assert!(reader.pending.is_none());
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_dangling_byte_is_an_error() {
        let mut bytes = diff(&[(1, 1)]).encode().unwrap();
        bytes.push(0x40);

        let mut reader = AnimationReader::new(bytes.as_slice());
        assert!(matches!(reader.read(), Err(AnimationError::DanglingByte)));
    }

    #[test]
    fn test_failed_write_leaves_sink_untouched() {
        let mut writer = AnimationWriter::new(Vec::new());
        writer.write(&diff(&[(1, 1)])).unwrap();
        assert!(writer.write(&diff(&[(2, 2), (200, 0)])).is_err());
        assert_eq!(writer.get_ref().len(), 2);
        assert_eq!(writer.frames_written(), 1);
    }

    #[test]
    fn test_open_mode_parsing() {
        assert_eq!("r".parse::<OpenMode>().unwrap(), OpenMode::Read);
        assert_eq!("W".parse::<OpenMode>().unwrap(), OpenMode::Write);
        assert!(matches!(
            "rw".parse::<OpenMode>(),
            Err(AnimationError::UnknownMode(m)) if m == "rw"
        ));
    }

    #[test]
    fn test_file_roundtrip_and_wrong_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("anim.bga");

        let mut file = AnimationFile::open(&path, OpenMode::Write).unwrap();
        assert_eq!(file.mode(), OpenMode::Write);
        assert!(matches!(
            file.read(),
            Err(AnimationError::WrongMode { operation: "read", mode: OpenMode::Write })
        ));
        file.write(&diff(&[(4, 4)])).unwrap();
        file.write(&FrameDiff::default()).unwrap();
        file.close().unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4);

        let mut file = AnimationFile::open(&path, OpenMode::Read).unwrap();
        assert!(matches!(
            file.write(&FrameDiff::default()),
            Err(AnimationError::WrongMode { operation: "write", mode: OpenMode::Read })
        ));
        assert_eq!(pixels(&file.read().unwrap().unwrap()), vec![(4, 4)]);
        assert!(file.read().unwrap().unwrap().changes()[0].placeholder);
        assert!(file.read().unwrap().is_none());
        file.close().unwrap();
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            AnimationFile::open(dir.path().join("missing.bga"), OpenMode::Read),
            Err(AnimationError::Io(_))
        ));
    }
}
