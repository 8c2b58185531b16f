//! Colour-blob detection pipeline.
//!
//! This module wires together pixel classification, connected-component
//! labeling, bounding-box centroids and the pan/tilt solver.

mod params;
mod pipeline;
mod result;

pub use params::BlobDetectorParams;
pub use pipeline::BlobDetector;
pub use result::{BlobDetectionResult, DetectedRegion};
