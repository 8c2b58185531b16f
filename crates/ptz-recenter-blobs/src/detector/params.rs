use ptz_recenter_core::{RecenterError, ZoomCalibration};
use serde::{Deserialize, Serialize};

use crate::classifier::ColorClassifier;
use crate::labeler::Connectivity;

fn default_min_region_pixels() -> usize {
    1
}

/// Configuration for the blob detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobDetectorParams {
    /// Target colour predicate.
    pub classifier: ColorClassifier,
    /// Pixel adjacency used to group target pixels.
    #[serde(default)]
    pub connectivity: Connectivity,
    /// Keep each region's pixel coordinates in the result.
    #[serde(default)]
    pub collect_pixel_sets: bool,
    /// Regions with fewer pixels are dropped before solving.
    ///
    /// The default of 1 keeps every region.
    #[serde(default = "default_min_region_pixels")]
    pub min_region_pixels: usize,
    /// Zoom -> field-of-view curve of the camera that took the frames.
    pub calibration: ZoomCalibration,
}

impl BlobDetectorParams {
    /// 8-connected detection without pixel sets or size filtering.
    pub fn new(classifier: ColorClassifier, calibration: ZoomCalibration) -> Self {
        Self {
            classifier,
            connectivity: Connectivity::Eight,
            collect_pixel_sets: false,
            min_region_pixels: default_min_region_pixels(),
            calibration,
        }
    }

    pub fn validate(&self) -> Result<(), RecenterError> {
        self.classifier.validate()?;
        self.calibration.validate()
    }
}
