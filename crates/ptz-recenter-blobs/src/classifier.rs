//! Per-pixel target classification.

use ptz_recenter_core::{RecenterError, Rgb};
use serde::{Deserialize, Serialize};

/// Colour predicate deciding whether a pixel belongs to the target.
///
/// The detector matches on the variant once per frame and hands the
/// labeler a plain closure, so the per-pixel test is statically dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorClassifier {
    /// Green strictly dominant and `green - min(red, blue) > threshold`.
    GreenDominance { threshold: i32 },
    /// `green > min_green`, regardless of the other channels.
    GreenLevel { min_green: u8 },
}

impl ColorClassifier {
    pub fn validate(&self) -> Result<(), RecenterError> {
        match *self {
            ColorClassifier::GreenDominance { threshold } if threshold < 0 => Err(
                RecenterError::config(format!("threshold must be >= 0, got {threshold}")),
            ),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn classify(&self, px: Rgb) -> bool {
        match *self {
            ColorClassifier::GreenDominance { threshold } => green_dominance(px, threshold),
            ColorClassifier::GreenLevel { min_green } => px.g > min_green,
        }
    }
}

#[inline]
pub fn green_dominance(px: Rgb, threshold: i32) -> bool {
    if px.g <= px.r || px.g <= px.b {
        return false;
    }
    let floor = px.r.min(px.b);
    i32::from(px.g) - i32::from(floor) > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_accepts_any_dominant_green() {
        let c = ColorClassifier::GreenDominance { threshold: 0 };
        assert!(c.classify(Rgb::new(100, 101, 100)));
        assert!(c.classify(Rgb::new(0, 1, 0)));
        assert!(!c.classify(Rgb::new(101, 101, 0)));
        assert!(!c.classify(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn threshold_is_relative_to_weaker_channel() {
        let c = ColorClassifier::GreenDominance { threshold: 50 };
        // min(r, b) = 10 -> margin 60
        assert!(c.classify(Rgb::new(10, 70, 65)));
        // margin exactly 50 is not enough
        assert!(!c.classify(Rgb::new(10, 60, 20)));
        // blue dominant
        assert!(!c.classify(Rgb::new(0, 200, 220)));
    }

    #[test]
    fn green_level_ignores_other_channels() {
        let c = ColorClassifier::GreenLevel { min_green: 127 };
        assert!(c.classify(Rgb::new(255, 128, 255)));
        assert!(!c.classify(Rgb::new(0, 127, 0)));
    }

    #[test]
    fn negative_threshold_is_invalid() {
        let c = ColorClassifier::GreenDominance { threshold: -1 };
        assert!(matches!(
            c.validate(),
            Err(RecenterError::InvalidConfiguration(_))
        ));
        assert!(ColorClassifier::GreenLevel { min_green: 0 }.validate().is_ok());
    }

    #[test]
    fn deserializes_tagged_variants() {
        let c: ColorClassifier =
            serde_json::from_str(r#"{"kind":"green_dominance","threshold":35}"#).expect("json");
        assert_eq!(c, ColorClassifier::GreenDominance { threshold: 35 });
    }
}
