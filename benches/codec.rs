//! Benchmarks for frame diffing and stream decoding.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use bitgraphics::{
    animation::{AnimationReader, AnimationWriter, DISPLAY_HEIGHT, DISPLAY_WIDTH, FrameDiff},
    graphics::Bitmap,
};

/// A bar sweeping across the display, `density` pixels wide.
fn sweep(step: usize, density: usize) -> Bitmap {
    Bitmap::from_fn(DISPLAY_WIDTH, DISPLAY_HEIGHT, |x, _| {
        (x + DISPLAY_WIDTH - step % DISPLAY_WIDTH) % DISPLAY_WIDTH < density
    })
}

fn bench_compare_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_encode");

    for density in [1, 8, 64] {
        let a = sweep(0, density);
        let b = sweep(1, density);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}px", density)),
            &density,
            |bench, _| {
                bench.iter(|| {
                    let diff = FrameDiff::compare(black_box(&a), black_box(&b)).unwrap();
                    black_box(diff.encode().unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_stream_read(c: &mut Criterion) {
    let mut writer = AnimationWriter::new(Vec::new());
    let mut previous = Bitmap::blank(DISPLAY_WIDTH, DISPLAY_HEIGHT);
    for step in 0..120 {
        let frame = sweep(step, 8);
        writer
            .write(&FrameDiff::compare(&previous, &frame).unwrap())
            .unwrap();
        previous = frame;
    }
    let bytes = writer.finish().unwrap();

    c.bench_function("stream_read_120_frames", |b| {
        b.iter(|| {
            let reader = AnimationReader::new(black_box(bytes.as_slice()));
            reader.map(|f| f.unwrap().len()).sum::<usize>()
        });
    });
}

criterion_group!(benches, bench_compare_encode, bench_stream_read);
criterion_main!(benches);
