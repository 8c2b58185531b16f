//! Detect green targets in one frame and print the re-centering pan/tilt.
//!
//! Usage: `detect_frame <image_path> [pan tilt zoom]`

use ptz_recenter::blobs::{BlobDetectorParams, ColorClassifier};
use ptz_recenter::core::CameraPose;
use ptz_recenter::{detect, io};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: detect_frame <image_path> [pan tilt zoom]");
        return Ok(());
    };
    let rest: Vec<f64> = args.map(|a| a.parse()).collect::<Result<_, _>>()?;
    let pose = match rest.as_slice() {
        [pan, tilt, zoom] => CameraPose::new(*pan, *tilt, *zoom),
        _ => CameraPose::new(0.0, 0.0, 1.0),
    };

    let img = detect::load_rgb(&path)?;
    let params = BlobDetectorParams::new(
        ColorClassifier::GreenDominance { threshold: 35 },
        io::default_calibration(),
    );
    let result = detect::detect_blobs(&img, params, &pose)?;

    println!("{} region(s)", result.regions.len());
    if let Some(best) = result.largest() {
        println!(
            "largest: label {} ({} px) at ({}, {}) -> pan {:.3} tilt {:.3}",
            best.label,
            best.pixel_count,
            best.centroid.x,
            best.centroid.y,
            best.correction.pan_deg,
            best.correction.tilt_deg
        );
    }
    Ok(())
}
