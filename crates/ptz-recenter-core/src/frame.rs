use serde::{Deserialize, Serialize};

use crate::{RecenterError, Stage};

/// One 8-bit colour sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Channel order of an interleaved 3-byte pixel buffer.
///
/// Network camera snapshots often arrive as BGR; the view reads them in
/// place instead of swapping bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    #[default]
    Rgb,
    Bgr,
}

/// Borrowed, read-only colour frame.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, interleaved, len = w*h*3
    pub layout: PixelLayout,
}

impl<'a> RgbImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
            layout: PixelLayout::Rgb,
        }
    }

    pub fn with_layout(mut self, layout: PixelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Check that the view describes a non-empty frame backed by enough bytes.
    pub fn validate(&self) -> Result<(), RecenterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RecenterError::dimension(
                Stage::Frame,
                format!(
                    "frame has empty extent (width={}, height={})",
                    self.width, self.height
                ),
            ));
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| {
                RecenterError::dimension(
                    Stage::Frame,
                    format!(
                        "frame extent overflows (width={}, height={})",
                        self.width, self.height
                    ),
                )
            })?;
        if self.data.len() != expected {
            return Err(RecenterError::dimension(
                Stage::Frame,
                format!(
                    "pixel buffer holds {} bytes, expected {expected}",
                    self.data.len()
                ),
            ));
        }
        Ok(())
    }

    /// Colour at `(x, y)`. Caller guarantees the coordinate is in bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let i = 3 * (y * self.width + x);
        let (c0, g, c2) = (self.data[i], self.data[i + 1], self.data[i + 2]);
        match self.layout {
            PixelLayout::Rgb => Rgb::new(c0, g, c2),
            PixelLayout::Bgr => Rgb::new(c2, g, c0),
        }
    }
}

/// Owned RGB frame, used for rendered masks and label images.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&[color.r, color.g, color.b]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView::new(self.width, self.height, &self.data)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.view().pixel(x, y)
    }

    /// Write one pixel; out-of-bounds coordinates are ignored.
    #[inline]
    pub fn put(&mut self, x: usize, y: usize, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = 3 * (y * self.width + x);
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
    }
}
