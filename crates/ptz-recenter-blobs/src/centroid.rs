//! Region centroids from bounding boxes.
//!
//! The centroid is the bounding-box center truncated to a pixel address,
//! not the pixel-mass centroid: O(1) per region once boxes are known.

use ptz_recenter_core::{BoundingBox, PixelCoord, RecenterError, Stage};

use crate::labeler::Labeling;

/// Center of a bounding box, `((min.x + max.x) / 2, (min.y + max.y) / 2)`.
#[inline]
pub fn bbox_centroid(bbox: &BoundingBox) -> PixelCoord {
    bbox.center()
}

/// Centroid of one label; fails for label 0 and unknown labels.
pub fn centroid_of(labeling: &Labeling, label: u32) -> Result<PixelCoord, RecenterError> {
    labeling
        .bounding_box(label)
        .map(|b| bbox_centroid(&b))
        .map_err(|err| err.in_stage(Stage::Centroid))
}

/// `(label, centroid)` for every region, ascending by label.
pub fn extract_centroids(labeling: &Labeling) -> Vec<(u32, PixelCoord)> {
    labeling
        .regions()
        .iter()
        .map(|r| (r.label, bbox_centroid(&r.bounding_box)))
        .collect()
}
