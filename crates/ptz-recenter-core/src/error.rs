use std::fmt;

use serde::{Deserialize, Serialize};

/// Detection stage an error originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Frame,
    Label,
    Centroid,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Frame => "frame",
            Stage::Label => "label",
            Stage::Centroid => "centroid",
        };
        f.write_str(name)
    }
}

/// Errors produced by the detection and geometry pipeline.
///
/// Every variant is local to one call: no state survives a failed call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecenterError {
    #[error("dimension mismatch in {stage} stage: {detail}")]
    DimensionMismatch { stage: Stage, detail: String },

    #[error("degenerate geometry{}: {detail}", label_suffix(.label))]
    DegenerateGeometry { label: Option<u32>, detail: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

fn label_suffix(label: &Option<u32>) -> String {
    match label {
        Some(l) => format!(" for label {l}"),
        None => String::new(),
    }
}

impl RecenterError {
    pub fn dimension(stage: Stage, detail: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            stage,
            detail: detail.into(),
        }
    }

    pub fn degenerate(detail: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            label: None,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::InvalidConfiguration(detail.into())
    }

    /// Attach the region label to a geometry error. Other variants pass through.
    pub fn with_label(self, label: u32) -> Self {
        match self {
            Self::DegenerateGeometry { detail, .. } => Self::DegenerateGeometry {
                label: Some(label),
                detail,
            },
            other => other,
        }
    }

    /// Re-attribute a dimension error to `stage`. Other variants pass through.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Self::DimensionMismatch { detail, .. } => Self::DimensionMismatch { stage, detail },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_stage_and_label() {
        let err = RecenterError::dimension(Stage::Frame, "width is zero");
        assert_eq!(
            err.to_string(),
            "dimension mismatch in frame stage: width is zero"
        );

        let err = RecenterError::degenerate("zero-length ray").with_label(3);
        assert_eq!(
            err.to_string(),
            "degenerate geometry for label 3: zero-length ray"
        );
    }

    #[test]
    fn in_stage_retags_dimension_errors_only() {
        let err = RecenterError::dimension(Stage::Label, "label 0").in_stage(Stage::Centroid);
        assert_eq!(
            err.to_string(),
            "dimension mismatch in centroid stage: label 0"
        );
        let err = RecenterError::degenerate("ray").in_stage(Stage::Centroid);
        assert_eq!(err, RecenterError::degenerate("ray"));
    }

    #[test]
    fn with_label_leaves_other_variants_alone() {
        let err = RecenterError::config("negative threshold").with_label(7);
        assert_eq!(
            err,
            RecenterError::InvalidConfiguration("negative threshold".into())
        );
    }
}
