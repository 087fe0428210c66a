//! Match two images and write an annotated visualization.
//!
//! ```bash
//! cargo run --example pair_demo -- left.png right.png matched.png
//! ```

use std::env;
use std::time::Instant;

use featmatch_cli::{compare, render_matches, Pipeline};
use featmatch_core::CoreConfig;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} <left> <right> <output>", args[0]);
        std::process::exit(1);
    }

    let left = image::open(&args[1]).expect("Failed to load left image").to_rgb8();
    let right = image::open(&args[2]).expect("Failed to load right image").to_rgb8();

    let cfg = CoreConfig::default();
    featmatch_core::init_thread_pool(cfg.n_threads).expect("Failed to build thread pool");
    let pipeline = Pipeline::new(cfg);

    let t0 = Instant::now();
    let left_gray = image::DynamicImage::ImageRgb8(left.clone()).to_luma8();
    let right_gray = image::DynamicImage::ImageRgb8(right.clone()).to_luma8();

    let left_features = pipeline
        .extract(
            left_gray.as_raw(),
            left_gray.width() as usize,
            left_gray.height() as usize,
        )
        .expect("Feature extraction failed");
    let right_features = pipeline
        .extract(
            right_gray.as_raw(),
            right_gray.width() as usize,
            right_gray.height() as usize,
        )
        .expect("Feature extraction failed");

    let report = compare(&left_features, &right_features);
    println!("Time taken: {:.2?}", t0.elapsed());
    println!(
        "Keypoints: {} / {}",
        left_features.keypoints.len(),
        right_features.keypoints.len()
    );
    println!(
        "Matches: {} total, {} good (min {:.4}, max {:.4})",
        report.matches.len(),
        report.good.len(),
        report.stats.min,
        report.stats.max
    );

    let canvas = render_matches(
        &left,
        &right,
        &left_features.keypoints,
        &right_features.keypoints,
        &report.good,
    );
    canvas.save(&args[3]).expect("Failed to save output image");
    println!("Saved result image as {}", args[3]);
}
