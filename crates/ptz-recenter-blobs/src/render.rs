//! Debug rendering of classification masks and label maps.
//!
//! Colours come from an explicit [`LabelPalette`] passed by the caller;
//! nothing here keeps global state.

use ptz_recenter_core::{BoundingBox, RecenterError, Rgb, RgbImage, RgbImageView};
use serde::{Deserialize, Serialize};

use crate::classifier::ColorClassifier;
use crate::labeler::Labeling;

/// Label -> colour mapping for rendered label images.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelPalette {
    pub background: Rgb,
    /// Cycled through for labels `1, 2, ...`.
    pub colors: Vec<Rgb>,
}

impl Default for LabelPalette {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            colors: vec![
                Rgb::new(230, 25, 75),
                Rgb::new(60, 180, 75),
                Rgb::new(255, 225, 25),
                Rgb::new(0, 130, 200),
                Rgb::new(245, 130, 48),
                Rgb::new(145, 30, 180),
                Rgb::new(70, 240, 240),
                Rgb::new(240, 50, 230),
            ],
        }
    }
}

impl LabelPalette {
    pub fn color_for(&self, label: u32) -> Rgb {
        if label == 0 || self.colors.is_empty() {
            return self.background;
        }
        self.colors[(label as usize - 1) % self.colors.len()]
    }
}

/// Green where `classifier` accepts the pixel, black elsewhere.
pub fn render_mask(
    frame: &RgbImageView<'_>,
    classifier: &ColorClassifier,
) -> Result<RgbImage, RecenterError> {
    frame.validate()?;
    let mut out = RgbImage::filled(frame.width, frame.height, Rgb::BLACK);
    for y in 0..frame.height {
        for x in 0..frame.width {
            if classifier.classify(frame.pixel(x, y)) {
                out.put(x, y, Rgb::GREEN);
            }
        }
    }
    Ok(out)
}

/// Paint every pixel with its label's palette colour.
pub fn render_labels(labeling: &Labeling, palette: &LabelPalette) -> RgbImage {
    let mut out = RgbImage::filled(labeling.width(), labeling.height(), palette.background);
    let width = labeling.width();
    for (i, &label) in labeling.labels().iter().enumerate() {
        if label != 0 {
            out.put(i % width, i / width, palette.color_for(label));
        }
    }
    out
}

/// One-pixel outline of `bbox`.
pub fn draw_bounding_box(img: &mut RgbImage, bbox: &BoundingBox, color: Rgb) {
    let (x0, y0) = (bbox.min.x as usize, bbox.min.y as usize);
    let (x1, y1) = (bbox.max.x as usize, bbox.max.y as usize);
    for x in x0..=x1 {
        img.put(x, y0, color);
        img.put(x, y1, color);
    }
    for y in y0..=y1 {
        img.put(x0, y, color);
        img.put(x1, y, color);
    }
}
