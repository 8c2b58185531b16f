//! JSON configuration and report helpers for blob re-centering.

use crate::blobs::{
    BlobDetectionResult, BlobDetectorParams, ColorClassifier, Connectivity, DetectedRegion,
};
use crate::core::{CameraPose, PixelCoord, PixelLayout, ZoomCalibration};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum RecenterIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Zoom/FOV quadratic measured on the reference Axis PTZ camera.
pub fn default_calibration() -> ZoomCalibration {
    ZoomCalibration::new(41.89301, -6.436043e-3, 2.404497e-7)
}

fn default_classifier() -> ColorClassifier {
    ColorClassifier::GreenDominance { threshold: 35 }
}

fn default_min_region_pixels() -> usize {
    1
}

fn default_pose() -> CameraPose {
    CameraPose::new(0.0, 0.0, 1.0)
}

/// Configuration for one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecenterConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Classification mask image (target green, rest black).
    #[serde(default)]
    pub mask_path: Option<String>,
    /// Palette-coloured label image with region outlines.
    #[serde(default)]
    pub labels_path: Option<String>,
    #[serde(default = "default_classifier")]
    pub classifier: ColorClassifier,
    #[serde(default)]
    pub connectivity: Connectivity,
    #[serde(default)]
    pub collect_pixel_sets: bool,
    #[serde(default = "default_min_region_pixels")]
    pub min_region_pixels: usize,
    #[serde(default = "default_calibration")]
    pub calibration: ZoomCalibration,
    /// Pose the frame was captured at.
    #[serde(default = "default_pose")]
    pub pose: CameraPose,
    #[serde(default)]
    pub pixel_layout: PixelLayout,
}

impl RecenterConfig {
    /// Starter config pointing at `image_path`, all other fields at defaults.
    pub fn starter(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            output_path: None,
            mask_path: None,
            labels_path: None,
            classifier: default_classifier(),
            connectivity: Connectivity::default(),
            collect_pixel_sets: false,
            min_region_pixels: default_min_region_pixels(),
            calibration: default_calibration(),
            pose: default_pose(),
            pixel_layout: PixelLayout::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecenterIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecenterIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("recenter_report.json"))
    }

    /// Build detector parameters from the config.
    pub fn build_params(&self) -> BlobDetectorParams {
        BlobDetectorParams {
            classifier: self.classifier,
            connectivity: self.connectivity,
            collect_pixel_sets: self.collect_pixel_sets,
            min_region_pixels: self.min_region_pixels,
            calibration: self.calibration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecenterReport {
    pub image_path: String,
    pub config_path: String,
    pub pose: CameraPose,
    #[serde(default)]
    pub frame_width: Option<usize>,
    #[serde(default)]
    pub frame_height: Option<usize>,
    #[serde(default)]
    pub image_center: Option<PixelCoord>,
    #[serde(default)]
    pub regions: Vec<DetectedRegion>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RecenterReport {
    /// Build an empty report for the given config.
    pub fn new(cfg: &RecenterConfig, config_path: &Path) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            pose: cfg.pose,
            frame_width: None,
            frame_height: None,
            image_center: None,
            regions: Vec::new(),
            error: None,
        }
    }

    /// Populate report fields from a successful detection.
    pub fn set_detection(&mut self, res: BlobDetectionResult) {
        self.frame_width = Some(res.frame_width);
        self.frame_height = Some(res.frame_height);
        self.image_center = Some(res.image_center);
        self.pose = res.pose;
        self.regions = res.regions;
        self.error = None;
    }

    /// Record a detection error.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecenterIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecenterIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
