use serde::{Deserialize, Serialize};

use crate::RecenterError;

/// Camera orientation and zoom at the moment a frame was captured.
///
/// Pan and tilt are in degrees; zoom is in device units (1..10000 on the
/// reference camera). The pose is a read-only snapshot, never mutated here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub pan_deg: f64,
    pub tilt_deg: f64,
    pub zoom: f64,
}

impl CameraPose {
    pub fn new(pan_deg: f64, tilt_deg: f64, zoom: f64) -> Self {
        Self {
            pan_deg,
            tilt_deg,
            zoom,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pan_deg.is_finite() && self.tilt_deg.is_finite() && self.zoom.is_finite()
    }
}

/// Absolute pan/tilt target, in degrees, that re-centers a point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub pan_deg: f64,
    pub tilt_deg: f64,
}

/// Empirical zoom -> horizontal field of view curve.
///
/// `fov_deg(zoom) = a_deg + b * zoom + c * zoom^2`. The constants belong
/// to a physical camera model and are supplied by the host; there is no
/// `Default`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomCalibration {
    pub a_deg: f64,
    pub b: f64,
    pub c: f64,
}

impl ZoomCalibration {
    pub fn new(a_deg: f64, b: f64, c: f64) -> Self {
        Self { a_deg, b, c }
    }

    pub fn validate(&self) -> Result<(), RecenterError> {
        if !(self.a_deg.is_finite() && self.b.is_finite() && self.c.is_finite()) {
            return Err(RecenterError::config(format!(
                "zoom calibration constants must be finite (a={}, b={}, c={})",
                self.a_deg, self.b, self.c
            )));
        }
        Ok(())
    }

    /// Horizontal field of view, in degrees, at the given zoom.
    #[inline]
    pub fn fov_deg(&self, zoom: f64) -> f64 {
        self.a_deg + self.b * zoom + self.c * zoom * zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn fov_follows_quadratic() {
        let cal = ZoomCalibration::new(40.0, -0.01, 1e-6);
        assert_abs_diff_eq!(cal.fov_deg(0.0), 40.0);
        assert_abs_diff_eq!(cal.fov_deg(1000.0), 40.0 - 10.0 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_calibration_is_rejected() {
        let cal = ZoomCalibration::new(f64::NAN, 0.0, 0.0);
        assert!(matches!(
            cal.validate(),
            Err(RecenterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn pose_round_trips_through_json() {
        let pose = CameraPose::new(10.0132, -40.3937, 1998.0);
        let json = serde_json::to_string(&pose).expect("serialize");
        let back: CameraPose = serde_json::from_str(&json).expect("deserialize");
        assert_relative_eq!(back.pan_deg, pose.pan_deg, max_relative = 1e-12);
        assert_relative_eq!(back.tilt_deg, pose.tilt_deg, max_relative = 1e-12);
        assert_relative_eq!(back.zoom, pose.zoom);
    }
}
