//! bitgraphics CLI - Encode, inspect and preview frame-diff animations.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use log::info;

use bitgraphics::{
    animation::{AnimationPlayer, AnimationReader, AnimationRecorder},
    graphics::Bitmap,
    schema::AnimationConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("bitgraphics");

    match args.get(1).map(String::as_str) {
        Some("--example") => print_example_config(),
        Some("encode") if args.len() >= 3 => encode(Path::new(&args[2])),
        Some("info") if args.len() >= 3 => print_info(Path::new(&args[2])),
        Some("play") if args.len() >= 5 => {
            let width = parse_dimension("width", &args[3]);
            let height = parse_dimension("height", &args[4]);
            play(Path::new(&args[2]), width, height);
        }
        #[cfg(feature = "image")]
        Some("convert") if args.len() >= 4 => {
            let threshold: f32 = args
                .get(4)
                .map(|s| s.parse::<f32>().unwrap_or_else(|e| exit_with("parsing threshold", e)))
                .unwrap_or(0.5);
            convert(Path::new(&args[2]), Path::new(&args[3]), threshold);
        }
        _ => {
            print_usage(program);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [arguments]", program);
    eprintln!();
    eprintln!("Encode and inspect frame-diff animations for monochrome displays.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  encode <job.json>                 Record the frames listed in a job file");
    eprintln!("  info <animation>                  Print per-frame change counts");
    eprintln!("  play <animation> <width> <height> Print every frame as ASCII art");
    #[cfg(feature = "image")]
    eprintln!("  convert <image> <out.json> [thr]  Threshold an image into a bitmap");
    eprintln!("  --example                         Print an example job file");
}

fn exit_with(context: &str, err: impl Display) -> ! {
    eprintln!("Error {}: {}", context, err);
    process::exit(1);
}

fn parse_dimension(name: &str, value: &str) -> usize {
    value
        .parse()
        .unwrap_or_else(|e| exit_with(&format!("parsing {}", name), e))
}

fn encode(config_path: &Path) {
    // Load configuration
    let config_str = fs::read_to_string(config_path)
        .unwrap_or_else(|e| exit_with("reading job file", e));

    let mut config: AnimationConfig =
        serde_json::from_str(&config_str).unwrap_or_else(|e| exit_with("parsing job file", e));
    if let Some(base) = config_path.parent() {
        config.resolve_paths(base);
    }
    config
        .validate()
        .unwrap_or_else(|e| exit_with("validating job file", e));

    println!("Encoding {} frames", config.frames.len());
    println!("Canvas: {}x{}", config.width, config.height);
    println!("Output: {}", config.output.display());
    println!();

    let start = Instant::now();
    let mut recorder = AnimationRecorder::create(
        &config.output,
        config.width,
        config.height,
        config.recorder.clone(),
    )
    .unwrap_or_else(|e| exit_with("creating output", e));

    let total = config.frames.len();
    for (i, path) in config.frames.iter().enumerate() {
        let frame = Bitmap::load(path)
            .unwrap_or_else(|e| exit_with(&format!("loading {}", path.display()), e));
        let recorded = recorder
            .record_frame(&frame)
            .unwrap_or_else(|e| exit_with(&format!("recording {}", path.display()), e));
        if !recorded {
            info!("skipped {}", path.display());
        }

        // Print progress every 10%
        if (i + 1) % (total / 10).max(1) == 0 {
            println!("  Frame {}/{}", i + 1, total);
        }
    }

    let stats = recorder
        .finalize()
        .unwrap_or_else(|e| exit_with("finishing output", e));
    let raw_bytes = stats.frame_count as usize * config.width * config.height / 8;

    println!();
    println!("Wrote {}", stats);
    if raw_bytes > 0 {
        println!(
            "Size vs. packed full frames: {:.1}%",
            stats.total_bytes as f64 / raw_bytes as f64 * 100.0
        );
    }
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());
}

fn print_info(path: &Path) {
    let reader = AnimationReader::open(path).unwrap_or_else(|e| exit_with("opening animation", e));

    let mut frames = 0u64;
    let mut changes = 0usize;
    let mut unchanged = 0u64;
    for (i, frame) in reader.enumerate() {
        let frame = frame.unwrap_or_else(|e| exit_with(&format!("reading frame {}", i), e));
        let count = frame.pixel_changes().count();
        if count == 0 {
            unchanged += 1;
            println!("Frame {:>5}: unchanged", i);
        } else {
            println!("Frame {:>5}: {} pixel changes", i, count);
        }
        frames += 1;
        changes += count;
    }

    println!();
    println!("Frames: {}", frames);
    println!("Pixel changes: {}", changes);
    println!("Unchanged frames: {}", unchanged);
}

fn play(path: &Path, width: usize, height: usize) {
    let mut player = AnimationPlayer::open(path, width, height)
        .unwrap_or_else(|e| exit_with("opening animation", e));

    for (i, frame) in player.frames().enumerate() {
        let frame = frame.unwrap_or_else(|e| exit_with(&format!("playing frame {}", i), e));
        println!("Frame {}:", i);
        println!("{}", frame);
    }
}

#[cfg(feature = "image")]
fn convert(image_path: &Path, output: &Path, threshold: f32) {
    let bitmap = bitgraphics::convert::image_to_bitmap(image_path, threshold, None)
        .unwrap_or_else(|e| exit_with("converting image", e));
    bitmap
        .save(output)
        .unwrap_or_else(|e| exit_with("writing bitmap", e));

    println!(
        "Converted {} -> {} ({}x{}, {} pixels on)",
        image_path.display(),
        output.display(),
        bitmap.width(),
        bitmap.height(),
        bitmap.count_set()
    );
}

fn print_example_config() {
    let config = AnimationConfig::default();
    let frame = Bitmap::from_fn(4, 2, |x, y| (x + y) % 2 == 0);

    println!("Example job (job.json):");
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|e| exit_with("printing example", e))
    );
    println!();
    println!("Example frame (frames/0001.json):");
    println!(
        "{}",
        frame.to_json().unwrap_or_else(|e| exit_with("printing example", e))
    );
}
