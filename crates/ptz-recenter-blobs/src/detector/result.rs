use ptz_recenter_core::{BoundingBox, CameraPose, Correction, PixelCoord};
use serde::{Deserialize, Serialize};

/// One detected region with its re-centering target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    pub label: u32,
    pub bounding_box: BoundingBox,
    pub pixel_count: usize,
    /// Bounding-box center, truncated to a pixel address.
    pub centroid: PixelCoord,
    /// Absolute pan/tilt that puts `centroid` on the image center.
    pub correction: Correction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels: Option<Vec<PixelCoord>>,
}

/// Output of a detection run on one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobDetectionResult {
    pub frame_width: usize,
    pub frame_height: usize,
    pub image_center: PixelCoord,
    /// Pose the frame was captured at.
    pub pose: CameraPose,
    /// Regions in ascending label order.
    pub regions: Vec<DetectedRegion>,
}

impl BlobDetectionResult {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region with the most pixels; ties go to the lower label.
    pub fn largest(&self) -> Option<&DetectedRegion> {
        self.regions
            .iter()
            .rev()
            .max_by_key(|r| r.pixel_count)
    }

    pub fn corrections(&self) -> Vec<(u32, Correction)> {
        self.regions.iter().map(|r| (r.label, r.correction)).collect()
    }
}
