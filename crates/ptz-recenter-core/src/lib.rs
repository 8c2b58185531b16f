//! Core types and geometry for PTZ object re-centering.
//!
//! This crate is intentionally small. It holds the read-only frame view,
//! pixel-space primitives, the shared error taxonomy and the pan/tilt
//! solver that inverts the camera projection. It does *not* depend on any
//! image codec or camera transport.

mod error;
mod frame;
mod geometry;
mod logger;
mod pose;
mod solver;

pub use error::{RecenterError, Stage};
pub use frame::{PixelLayout, Rgb, RgbImage, RgbImageView};
pub use geometry::{BoundingBox, PixelCoord};
pub use pose::{CameraPose, Correction, ZoomCalibration};
pub use solver::{image_center, PanTiltSolver};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level_filter};
