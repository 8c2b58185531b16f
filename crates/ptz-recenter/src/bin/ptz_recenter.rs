//! ptz-recenter CLI: detect coloured targets in a frame and print the
//! pan/tilt that re-centers the camera on each of them.

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use nalgebra::Point2;
use ptz_recenter::blobs::{
    draw_bounding_box, render_labels, render_mask, BlobDetector, ColorClassifier, Connectivity,
    LabelPalette,
};
use ptz_recenter::core::{parse_level_filter, CameraPose, PanTiltSolver, Rgb, ZoomCalibration};
use ptz_recenter::detect;
use ptz_recenter::io::{default_calibration, RecenterConfig, RecenterReport};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ptz-recenter")]
#[command(about = "Find coloured targets in a PTZ frame and solve the pan/tilt that centers them")]
#[command(version)]
struct Cli {
    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run detection on the image named in a JSON config.
    Detect(DetectArgs),

    /// Solve the pan/tilt that brings pixel (u, v) onto the center (u0, v0).
    Solve(SolveArgs),

    /// Write a starter JSON config.
    InitConfig {
        /// Where to write the config.
        path: PathBuf,

        /// Image path to put in the config.
        #[arg(long, default_value = "frame.png")]
        image: String,
    },
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the JSON config.
    #[arg(long)]
    config: PathBuf,

    /// Override the capture pan angle (degrees).
    #[arg(long, allow_negative_numbers = true)]
    pan: Option<f64>,

    /// Override the capture tilt angle (degrees).
    #[arg(long, allow_negative_numbers = true)]
    tilt: Option<f64>,

    /// Override the capture zoom setting.
    #[arg(long)]
    zoom: Option<f64>,

    /// Use green dominance classification with this threshold.
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<i32>,

    /// Pixel adjacency: four/axes/4 or eight/surround/8.
    #[arg(long)]
    connectivity: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct SolveArgs {
    /// Image center x (pixels).
    #[arg(allow_negative_numbers = true)]
    u0: f64,
    /// Image center y (pixels).
    #[arg(allow_negative_numbers = true)]
    v0: f64,
    /// Current pan (degrees).
    #[arg(allow_negative_numbers = true)]
    pan: f64,
    /// Current tilt (degrees).
    #[arg(allow_negative_numbers = true)]
    tilt: f64,
    /// Target x (pixels).
    #[arg(allow_negative_numbers = true)]
    u: f64,
    /// Target y (pixels).
    #[arg(allow_negative_numbers = true)]
    v: f64,
    /// Current zoom setting.
    zoom: f64,

    /// Zoom calibration constant term (degrees).
    #[arg(long)]
    fov_a: Option<f64>,
    /// Zoom calibration linear term.
    #[arg(long)]
    fov_b: Option<f64>,
    /// Zoom calibration quadratic term.
    #[arg(long)]
    fov_c: Option<f64>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Solve(args) => run_solve(&args),
        Commands::InitConfig { path, image } => run_init_config(&path, image),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: &str) -> CliResult<()> {
    let filter = parse_level_filter(level)?;
    ptz_recenter::core::init_with_level(filter)?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: &str) -> CliResult<()> {
    let filter = parse_level_filter(level)?;
    let _ = tracing_log::LogTracer::init();
    ptz_recenter::core::init_tracing(false, filter);
    Ok(())
}

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let mut cfg = RecenterConfig::load_json(&args.config)?;
    apply_overrides(&mut cfg, args)?;

    let mut report = RecenterReport::new(&cfg, &args.config);
    let output_path = cfg.output_path();

    let outcome = detect_and_render(&cfg);
    match outcome {
        Ok(result) => {
            for region in &result.regions {
                println!(
                    "label {} bbox=({},{})-({},{}) pixels={} centroid=({},{}) pan={:.4} tilt={:.4}",
                    region.label,
                    region.bounding_box.min.x,
                    region.bounding_box.min.y,
                    region.bounding_box.max.x,
                    region.bounding_box.max.y,
                    region.pixel_count,
                    region.centroid.x,
                    region.centroid.y,
                    region.correction.pan_deg,
                    region.correction.tilt_deg
                );
            }
            info!(
                "{} region(s) in {}x{} frame",
                result.regions.len(),
                result.frame_width,
                result.frame_height
            );
            report.set_detection(result);
            report.write_json(&output_path)?;
            info!("wrote report JSON to {}", output_path.display());
            Ok(())
        }
        Err(err) => {
            warn!("detection failed: {err}");
            report.set_error(&err);
            report.write_json(&output_path)?;
            Err(err)
        }
    }
}

fn apply_overrides(cfg: &mut RecenterConfig, args: &DetectArgs) -> CliResult<()> {
    if let Some(pan) = args.pan {
        cfg.pose.pan_deg = pan;
    }
    if let Some(tilt) = args.tilt {
        cfg.pose.tilt_deg = tilt;
    }
    if let Some(zoom) = args.zoom {
        cfg.pose.zoom = zoom;
    }
    if let Some(threshold) = args.threshold {
        cfg.classifier = ColorClassifier::GreenDominance { threshold };
    }
    if let Some(name) = args.connectivity.as_deref() {
        cfg.connectivity = name.parse::<Connectivity>()?;
    }
    Ok(())
}

fn detect_and_render(cfg: &RecenterConfig) -> CliResult<ptz_recenter::blobs::BlobDetectionResult> {
    info!("loading image: {}", cfg.image_path);
    let img = detect::load_rgb(&cfg.image_path)?;
    let view = detect::rgb_view(&img).with_layout(cfg.pixel_layout);

    let detector = BlobDetector::new(cfg.build_params())?;
    let (result, labeling) = detector.detect_with_labeling(&view, &cfg.pose)?;

    if let Some(path) = cfg.mask_path.as_deref() {
        let mask = render_mask(&view, &cfg.classifier)?;
        detect::to_image(&mask)?.save(path)?;
        info!("wrote mask to {path}");
    }

    if let Some(path) = cfg.labels_path.as_deref() {
        let mut labels = render_labels(&labeling, &LabelPalette::default());
        for region in &result.regions {
            draw_bounding_box(&mut labels, &region.bounding_box, Rgb::new(255, 255, 255));
        }
        detect::to_image(&labels)?.save(path)?;
        info!("wrote label image to {path}");
    }

    Ok(result)
}

fn run_solve(args: &SolveArgs) -> CliResult<()> {
    let reference = default_calibration();
    let calibration = ZoomCalibration::new(
        args.fov_a.unwrap_or(reference.a_deg),
        args.fov_b.unwrap_or(reference.b),
        args.fov_c.unwrap_or(reference.c),
    );
    let solver = PanTiltSolver::new(calibration)?;
    let pose = CameraPose::new(args.pan, args.tilt, args.zoom);
    let correction = solver
        .solve(
            Point2::new(args.u, args.v),
            Point2::new(args.u0, args.v0),
            &pose,
        )?;

    println!(
        "pan={:.6} tilt={:.6}",
        correction.pan_deg, correction.tilt_deg
    );
    Ok(())
}

fn run_init_config(path: &Path, image: String) -> CliResult<()> {
    let cfg = RecenterConfig::starter(image);
    cfg.write_json(path)?;
    info!("wrote starter config to {}", path.display());
    Ok(())
}
