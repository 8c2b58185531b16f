//! Colour-blob detector for PTZ re-centering, built on `ptz-recenter-core`.
//!
//! ## Quickstart
//!
//! ```
//! use ptz_recenter_blobs::{BlobDetector, BlobDetectorParams, ColorClassifier};
//! use ptz_recenter_core::{CameraPose, Rgb, RgbImage, ZoomCalibration};
//!
//! let calibration = ZoomCalibration::new(41.89301, -6.436043e-3, 2.404497e-7);
//! let params = BlobDetectorParams::new(ColorClassifier::GreenDominance { threshold: 35 }, calibration);
//! let detector = BlobDetector::new(params).expect("valid params");
//!
//! let mut frame = RgbImage::filled(64, 48, Rgb::BLACK);
//! frame.put(40, 24, Rgb::new(10, 220, 10));
//! let result = detector
//!     .detect(&frame.view(), &CameraPose::new(0.0, 0.0, 1000.0))
//!     .expect("detect");
//! assert_eq!(result.regions.len(), 1);
//! assert!(result.regions[0].correction.pan_deg < 0.0);
//! ```
//!
//! Pipeline:
//! 1. Classify every pixel with a [`ColorClassifier`].
//! 2. Group target pixels into 4- or 8-connected regions (raster scan plus
//!    union-find, see [`ComponentLabeler`]).
//! 3. Take each region's bounding-box center as its centroid.
//! 4. Solve the absolute pan/tilt that puts the centroid on the image
//!    center, given the pose the frame was captured at.

mod centroid;
mod classifier;
mod detector;
mod labeler;
mod render;
mod union_find;

pub use centroid::{bbox_centroid, centroid_of, extract_centroids};
pub use classifier::{green_dominance, ColorClassifier};
pub use detector::{BlobDetectionResult, BlobDetector, BlobDetectorParams, DetectedRegion};
pub use labeler::{ComponentLabeler, Connectivity, Labeling, Region};
pub use render::{draw_bounding_box, render_labels, render_mask, LabelPalette};
