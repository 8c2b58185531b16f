//! Inverse pinhole projection: image point -> absolute pan/tilt target.
//!
//! Conventions:
//! - camera frame: `x` to the image right, `y` down the image, `z` along the
//!   optical axis;
//! - positive pan turns the optical axis toward image-left content, positive
//!   tilt toward image-top content;
//! - angles cross the API in degrees, all trigonometry runs in radians.

use nalgebra::{Point2, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{CameraPose, Correction, RecenterError, ZoomCalibration};

const MIN_RAY_NORM: f64 = 1e-12;

/// Principal point of a `width x height` frame (integer halves).
pub fn image_center(width: usize, height: usize) -> Point2<f64> {
    Point2::new((width / 2) as f64, (height / 2) as f64)
}

/// Stateless pan/tilt solver for one camera model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanTiltSolver {
    calibration: ZoomCalibration,
}

impl PanTiltSolver {
    pub fn new(calibration: ZoomCalibration) -> Result<Self, RecenterError> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    #[inline]
    pub fn calibration(&self) -> ZoomCalibration {
        self.calibration
    }

    /// Focal length in pixels for `zoom`, given the horizontal principal
    /// point `u0` (half the frame width).
    pub fn focal_length_px(&self, zoom: f64, u0: f64) -> Result<f64, RecenterError> {
        let fov_deg = self.calibration.fov_deg(zoom);
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(RecenterError::degenerate(format!(
                "field of view {fov_deg:.4} deg at zoom {zoom} is outside (0, 180)"
            )));
        }
        let focal = u0 / (fov_deg.to_radians() / 2.0).tan();
        if !focal.is_finite() || focal <= 0.0 {
            return Err(RecenterError::degenerate(format!(
                "non-positive focal length {focal} (u0={u0}, zoom={zoom})"
            )));
        }
        Ok(focal)
    }

    /// Absolute pan/tilt that brings `target` onto `center`, for a frame
    /// captured at `pose`.
    pub fn solve(
        &self,
        target: Point2<f64>,
        center: Point2<f64>,
        pose: &CameraPose,
    ) -> Result<Correction, RecenterError> {
        if !pose.is_finite() {
            return Err(RecenterError::degenerate(format!(
                "pose is not finite (pan={}, tilt={}, zoom={})",
                pose.pan_deg, pose.tilt_deg, pose.zoom
            )));
        }
        if !(target.x.is_finite() && target.y.is_finite()) {
            return Err(RecenterError::degenerate("target point is not finite"));
        }
        let focal = self.focal_length_px(pose.zoom, center.x)?;

        if target == center {
            return Ok(Correction {
                pan_deg: pose.pan_deg,
                tilt_deg: pose.tilt_deg,
            });
        }

        let ray = Vector3::new(target.x - center.x, target.y - center.y, focal)
            .try_normalize(MIN_RAY_NORM)
            .ok_or_else(|| RecenterError::degenerate("zero-length projection ray"))?;

        // Tilt first, then pan.
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), pose.tilt_deg.to_radians());
        let pan = Rotation3::from_axis_angle(&Vector3::y_axis(), -pose.pan_deg.to_radians());
        let world = pan * tilt * ray;

        Ok(Correction {
            pan_deg: -world.x.atan2(world.z).to_degrees(),
            tilt_deg: -world.y.atan2(world.x.hypot(world.z)).to_degrees(),
        })
    }
}
