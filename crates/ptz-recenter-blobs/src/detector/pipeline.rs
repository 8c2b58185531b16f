use log::{debug, warn};
use ptz_recenter_core::{
    image_center, CameraPose, PanTiltSolver, PixelCoord, RecenterError, RgbImageView,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{BlobDetectionResult, BlobDetectorParams, DetectedRegion};
use crate::centroid::bbox_centroid;
use crate::classifier::{green_dominance, ColorClassifier};
use crate::labeler::{ComponentLabeler, Labeling};

/// One-shot colour-blob detector.
///
/// Holds configuration only. Each call allocates its own label map, so a
/// detector can serve concurrent calls on different frames.
#[derive(Clone, Debug)]
pub struct BlobDetector {
    params: BlobDetectorParams,
    labeler: ComponentLabeler,
    solver: PanTiltSolver,
}

impl BlobDetector {
    /// Validate `params` and build a detector.
    pub fn new(params: BlobDetectorParams) -> Result<Self, RecenterError> {
        params.validate()?;
        let solver = PanTiltSolver::new(params.calibration)?;
        let labeler = ComponentLabeler::new(params.connectivity)
            .with_pixel_sets(params.collect_pixel_sets);
        Ok(Self {
            params,
            labeler,
            solver,
        })
    }

    #[inline]
    pub fn params(&self) -> &BlobDetectorParams {
        &self.params
    }

    #[inline]
    pub fn solver(&self) -> &PanTiltSolver {
        &self.solver
    }

    /// Classify and label `frame` without solving any geometry.
    pub fn label(&self, frame: &RgbImageView<'_>) -> Result<Labeling, RecenterError> {
        match self.params.classifier {
            ColorClassifier::GreenDominance { threshold } => self
                .labeler
                .label(frame, |px| green_dominance(px, threshold)),
            ColorClassifier::GreenLevel { min_green } => {
                self.labeler.label(frame, |px| px.g > min_green)
            }
        }
    }

    /// Detect target regions in `frame` and solve a pan/tilt target for each.
    pub fn detect(
        &self,
        frame: &RgbImageView<'_>,
        pose: &CameraPose,
    ) -> Result<BlobDetectionResult, RecenterError> {
        self.detect_with_labeling(frame, pose)
            .map(|(result, _)| result)
    }

    /// Same as [`BlobDetector::detect`], also returning the label map.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, frame, pose),
            fields(width = frame.width, height = frame.height, zoom = pose.zoom)
        )
    )]
    pub fn detect_with_labeling(
        &self,
        frame: &RgbImageView<'_>,
        pose: &CameraPose,
    ) -> Result<(BlobDetectionResult, Labeling), RecenterError> {
        let labeling = self.label(frame)?;
        let center = image_center(frame.width, frame.height);
        let min_pixels = self.params.min_region_pixels.max(1);

        debug!(
            "frame {}x{}: {} regions, pose pan={} tilt={} zoom={}",
            frame.width,
            frame.height,
            labeling.nb_labels(),
            pose.pan_deg,
            pose.tilt_deg,
            pose.zoom
        );

        let mut regions = Vec::with_capacity(labeling.regions().len());
        for region in labeling.regions() {
            if region.pixel_count < min_pixels {
                debug!(
                    "label {}: {} px below minimum {min_pixels}, skipped",
                    region.label, region.pixel_count
                );
                continue;
            }

            let centroid = bbox_centroid(&region.bounding_box);
            let correction = self
                .solver
                .solve(centroid.to_point(), center, pose)
                .map_err(|err| {
                    warn!("label {}: {err}", region.label);
                    err.with_label(region.label)
                })?;

            debug!(
                "label {}: centroid=({}, {}) -> pan={:.4} tilt={:.4}",
                region.label, centroid.x, centroid.y, correction.pan_deg, correction.tilt_deg
            );

            regions.push(DetectedRegion {
                label: region.label,
                bounding_box: region.bounding_box,
                pixel_count: region.pixel_count,
                centroid,
                correction,
                pixels: region.pixels.clone(),
            });
        }

        let result = BlobDetectionResult {
            frame_width: frame.width,
            frame_height: frame.height,
            image_center: PixelCoord::new(center.x as u32, center.y as u32),
            pose: *pose,
            regions,
        };
        Ok((result, labeling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeler::Connectivity;
    use approx::assert_abs_diff_eq;
    use ptz_recenter_core::{Rgb, RgbImage, ZoomCalibration};

    const TARGET: Rgb = Rgb::new(20, 200, 30);
    const GREY: Rgb = Rgb::new(90, 90, 90);

    fn calibration() -> ZoomCalibration {
        ZoomCalibration::new(41.89301, -6.436043e-3, 2.404497e-7)
    }

    fn params(connectivity: Connectivity) -> BlobDetectorParams {
        BlobDetectorParams {
            connectivity,
            ..BlobDetectorParams::new(
                ColorClassifier::GreenDominance { threshold: 35 },
                calibration(),
            )
        }
    }

    fn frame_with(width: usize, height: usize, targets: &[(usize, usize)]) -> RgbImage {
        let mut img = RgbImage::filled(width, height, GREY);
        for &(x, y) in targets {
            img.put(x, y, TARGET);
        }
        img
    }

    fn fill_rect(img: &mut RgbImage, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put(x, y, TARGET);
            }
        }
    }

    #[test]
    fn frame_without_targets_yields_no_regions() {
        let det = BlobDetector::new(params(Connectivity::Eight)).expect("detector");
        let img = frame_with(64, 48, &[]);
        let res = det
            .detect(&img.view(), &CameraPose::new(0.0, 0.0, 1000.0))
            .expect("detect");
        assert!(res.is_empty());
        assert_eq!(res.image_center, PixelCoord::new(32, 24));
    }

    #[test]
    fn single_pixel_region_has_pixel_centroid() {
        let det = BlobDetector::new(params(Connectivity::Four)).expect("detector");
        let img = frame_with(40, 30, &[(7, 11)]);
        let res = det
            .detect(&img.view(), &CameraPose::new(0.0, 0.0, 1000.0))
            .expect("detect");
        assert_eq!(res.regions.len(), 1);
        let r = &res.regions[0];
        assert_eq!(r.bounding_box.min, PixelCoord::new(7, 11));
        assert_eq!(r.bounding_box.max, PixelCoord::new(7, 11));
        assert_eq!(r.centroid, PixelCoord::new(7, 11));
    }

    #[test]
    fn diagonal_pair_depends_on_connectivity() {
        let img = frame_with(10, 10, &[(4, 4), (5, 5)]);
        let pose = CameraPose::new(0.0, 0.0, 1000.0);
        let eight = BlobDetector::new(params(Connectivity::Eight))
            .expect("eight")
            .detect(&img.view(), &pose)
            .expect("detect");
        let four = BlobDetector::new(params(Connectivity::Four))
            .expect("four")
            .detect(&img.view(), &pose)
            .expect("detect");
        assert_eq!(eight.regions.len(), 1);
        assert_eq!(four.regions.len(), 2);
    }

    #[test]
    fn blob_right_of_center_pans_negative() {
        let det = BlobDetector::new(params(Connectivity::Eight)).expect("detector");
        let mut img = frame_with(640, 480, &[]);
        fill_rect(&mut img, 415, 235, 425, 245);
        let pose = CameraPose::new(0.0, 0.0, 1000.0);
        let res = det.detect(&img.view(), &pose).expect("detect");

        assert_eq!(res.regions.len(), 1);
        let r = &res.regions[0];
        assert_eq!(r.centroid, PixelCoord::new(420, 240));
        assert_eq!(r.pixel_count, 121);
        assert!(r.correction.pan_deg < 0.0);
        assert_abs_diff_eq!(r.correction.tilt_deg, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn repeated_detection_is_identical() {
        let det = BlobDetector::new(params(Connectivity::Eight)).expect("detector");
        let mut img = frame_with(120, 90, &[(3, 80)]);
        fill_rect(&mut img, 10, 10, 20, 14);
        fill_rect(&mut img, 60, 40, 64, 70);
        let pose = CameraPose::new(12.5, -8.0, 3000.0);
        let a = det.detect(&img.view(), &pose).expect("first");
        let b = det.detect(&img.view(), &pose).expect("second");
        assert_eq!(a, b);
        assert_eq!(a.regions.len(), 3);
    }

    #[test]
    fn small_regions_are_filtered() {
        let mut p = params(Connectivity::Eight);
        p.min_region_pixels = 4;
        let det = BlobDetector::new(p).expect("detector");
        let mut img = frame_with(30, 30, &[(1, 1)]);
        fill_rect(&mut img, 10, 10, 12, 12);
        let res = det
            .detect(&img.view(), &CameraPose::new(0.0, 0.0, 1000.0))
            .expect("detect");
        assert_eq!(res.regions.len(), 1);
        assert_eq!(res.regions[0].label, 2);
    }

    #[test]
    fn green_level_classifier_is_supported() {
        let mut p = params(Connectivity::Eight);
        p.classifier = ColorClassifier::GreenLevel { min_green: 127 };
        let det = BlobDetector::new(p).expect("detector");
        let mut img = frame_with(8, 8, &[]);
        img.put(2, 2, Rgb::new(255, 130, 255));
        let lab = det.label(&img.view()).expect("label");
        assert_eq!(lab.nb_labels(), 1);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut p = params(Connectivity::Eight);
        p.classifier = ColorClassifier::GreenDominance { threshold: -3 };
        assert!(matches!(
            BlobDetector::new(p),
            Err(RecenterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn degenerate_calibration_reports_label() {
        let mut p = params(Connectivity::Eight);
        p.calibration = ZoomCalibration::new(0.0, 0.0, 0.0);
        let det = BlobDetector::new(p).expect("detector");
        let img = frame_with(20, 20, &[(3, 3), (15, 15)]);
        let err = det
            .detect(&img.view(), &CameraPose::new(0.0, 0.0, 1000.0))
            .expect_err("degenerate");
        assert_eq!(
            err,
            RecenterError::DegenerateGeometry {
                label: Some(1),
                detail: "field of view 0.0000 deg at zoom 1000 is outside (0, 180)".into(),
            }
        );
    }

    #[test]
    fn detector_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BlobDetector>();
    }
}
