//! End-to-end checks through the public API.

use bitgraphics::animation::{
    AnimationFile, AnimationPlayer, AnimationReader, AnimationRecorder, AnimationWriter, FrameDiff,
    OpenMode, PixelChange, RecorderConfig,
};
use bitgraphics::graphics::{Bitmap, BitmapComposer};
use proptest::prelude::*;
use tempfile::tempdir;

#[test]
fn two_by_two_example() {
    let a = Bitmap::blank(2, 2);
    let b = Bitmap::from_fn(2, 2, |x, y| (x, y) == (1, 0));

    let diff = FrameDiff::compare(&a, &b).unwrap();
    assert_eq!(diff.changes(), &[PixelChange::new(1, 0, true)]);

    let bytes = diff.encode().unwrap();
    assert_eq!(bytes.len(), 2);
    let decoded = FrameDiff::decode(&bytes).unwrap();
    assert!(decoded.changes()[0].new_frame);
    assert_eq!((decoded.changes()[0].x, decoded.changes()[0].y), (1, 0));

    let dir = tempdir().unwrap();
    let path = dir.path().join("example.bga");

    let mut file = AnimationFile::open(&path, OpenMode::Write).unwrap();
    file.write(&diff).unwrap();
    file.close().unwrap();

    let mut file = AnimationFile::open(&path, "R".parse().unwrap()).unwrap();
    let frame = file.read().unwrap().unwrap();
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.apply(&a).unwrap(), b);
    assert!(file.read().unwrap().is_none());
}

#[test]
fn composed_text_animation_plays_back() {
    let bar = Bitmap::from_fn(2, 4, |x, _| x == 0);
    let dash = Bitmap::from_fn(3, 1, |_, _| true);

    let background = Bitmap::blank(16, 6);

    // One frame per step, typing one more glyph onto the line each time.
    let mut frames = Vec::new();
    let mut line = BitmapComposer::new();
    for glyph in [&bar, &dash, &bar, &dash] {
        line.add(glyph, line.width() as i64, 0);
        let text = line.flatten();

        let mut canvas = BitmapComposer::new();
        canvas.add(&background, 0, 0);
        canvas.add(&text, 1, 1);
        let frame = canvas.flatten();
        assert_eq!((frame.width(), frame.height()), (16, 6));
        frames.push(frame);
    }
    assert_eq!(frames[3].count_set(), 14);

    let mut bytes = Vec::<u8>::new();
    let mut recorder = AnimationRecorder::new(&mut bytes, 16, 6, RecorderConfig::default());
    for frame in &frames {
        recorder.record_frame(frame).unwrap();
    }
    recorder.finalize().unwrap();

    let mut player = AnimationPlayer::new(bytes.as_slice(), 16, 6);
    let played: Vec<Bitmap> = player.frames().collect::<Result<_, _>>().unwrap();
    assert_eq!(played, frames);
}

fn arb_frames() -> impl Strategy<Value = Vec<Vec<(usize, usize, bool)>>> {
    let change = (0usize..=127, 0usize..=63, any::<bool>());
    proptest::collection::vec(proptest::collection::vec(change, 0..6), 0..12)
}

proptest! {
    #[test]
    fn stream_preserves_frame_count_and_order(frames in arb_frames()) {
        let diffs: Vec<FrameDiff> = frames
            .iter()
            .map(|changes| {
                FrameDiff::from_changes(
                    changes.iter().map(|&(x, y, v)| PixelChange::new(x, y, v)).collect(),
                )
            })
            .collect();

        let mut writer = AnimationWriter::new(Vec::new());
        for diff in &diffs {
            writer.write(diff).unwrap();
        }
        let bytes = writer.finish().unwrap();

        let read: Vec<FrameDiff> = AnimationReader::new(bytes.as_slice())
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(read.len(), diffs.len());
        for (written, read) in diffs.iter().zip(&read) {
            let written: Vec<_> = written.pixel_changes().map(|c| (c.x, c.y, c.value)).collect();
            let read: Vec<_> = read.pixel_changes().map(|c| (c.x, c.y, c.value)).collect();
            prop_assert_eq!(written, read);
        }
    }

    #[test]
    fn record_roundtrip(
        x in 0usize..=127,
        y in 0usize..=63,
        value in any::<bool>(),
        placeholder in any::<bool>(),
        new_frame in any::<bool>(),
    ) {
        let change = PixelChange { placeholder, new_frame, x, y, value };
        prop_assert_eq!(PixelChange::decode(change.encode().unwrap()), change);
    }
}
