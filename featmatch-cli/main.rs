use std::env;
use std::process;

use featmatch_cli::{compare, render_matches, Pipeline};
use featmatch_core::CoreConfig;
use image::RgbImage;

const OUTPUT_BASE: &str = "output/output";

fn usage() {
    println!(" Usage: ./featmatch <img1> <img2> <img3> <img4>");
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        usage();
        process::exit(-1);
    }

    // Load all four images up front; any decode failure is fatal
    let mut images: Vec<RgbImage> = Vec::with_capacity(4);
    for path in &args[1..5] {
        match image::open(path) {
            Ok(img) => images.push(img.to_rgb8()),
            Err(_) => {
                println!(" --(!) Error reading images ");
                process::exit(-1);
            }
        }
    }

    let cfg = CoreConfig::default();
    featmatch_core::init_thread_pool(cfg.n_threads).expect("Failed to build thread pool");
    let pipeline = Pipeline::new(cfg);

    // Detect and describe each image
    let features: Vec<_> = images
        .iter()
        .map(|img| {
            let gray = image::DynamicImage::ImageRgb8(img.clone()).to_luma8();
            let (w, h) = gray.dimensions();
            pipeline
                .extract(gray.as_raw(), w as usize, h as usize)
                .expect("Feature extraction failed")
        })
        .collect();

    // Match image 1 against images 2, 3 and 4
    let reports: Vec<_> = (1..4).map(|i| compare(&features[0], &features[i])).collect();

    for (i, report) in reports.iter().enumerate() {
        println!("-- Max dist for 1&{}: {:.6} ", i + 2, report.stats.max);
        println!("-- Min dist for 1&{}: {:.6} ", i + 2, report.stats.min);
    }

    std::fs::create_dir_all("output").expect("Failed to create output directory");

    for (i, report) in reports.iter().enumerate() {
        let canvas = render_matches(
            &images[0],
            &images[i + 1],
            &features[0].keypoints,
            &features[i + 1].keypoints,
            &report.good,
        );
        let path = format!("{}{}.jpg", OUTPUT_BASE, i + 2);
        canvas.save(&path).expect("Failed to save output image");
    }
}
