//! High-level facade crate for the `ptz-recenter-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core geometry crate and the blob detector crate
//! - (feature-gated) helpers that run the detector on `image::RgbImage`
//!   frames or raw RGB buffers
//! - JSON config/report helpers used by the `ptz-recenter` CLI
//!
//! ## Quickstart
//!
//! ```no_run
//! use ptz_recenter::blobs::{BlobDetectorParams, ColorClassifier};
//! use ptz_recenter::core::CameraPose;
//! use ptz_recenter::{detect, io};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = detect::load_rgb("frame.png")?;
//! let params = BlobDetectorParams::new(
//!     ColorClassifier::GreenDominance { threshold: 35 },
//!     io::default_calibration(),
//! );
//! let pose = CameraPose::new(10.0, -4.0, 2500.0);
//!
//! let result = detect::detect_blobs(&img, params, &pose)?;
//! for region in &result.regions {
//!     println!(
//!         "label {} -> pan {:.3} tilt {:.3}",
//!         region.label, region.correction.pan_deg, region.correction.tilt_deg
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ptz_recenter::core`: frame views, pixel geometry, camera pose, zoom
//!   calibration and the pan/tilt solver.
//! - `ptz_recenter::blobs`: pixel classifiers, connected-component labeling,
//!   centroids, the end-to-end `BlobDetector` and debug rendering.
//! - `ptz_recenter::detect` (feature `image`): helpers from `image::RgbImage`.
//! - `ptz_recenter::io`: JSON config and report types.

pub use ptz_recenter_blobs as blobs;
pub use ptz_recenter_core as core;

#[cfg(feature = "image")]
pub mod detect;

pub mod io;
