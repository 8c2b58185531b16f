use crate::{blobs, core};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid RGB image buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidRgbDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Recenter(#[from] core::RecenterError),
}

/// Convert an `image::RgbImage` into the lightweight `ptz-recenter-core` view type.
pub fn rgb_view(img: &::image::RgbImage) -> core::RgbImageView<'_> {
    core::RgbImageView::new(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Non-zero extent whose `width * height * 3` fits `usize` and equals `data.len()`.
fn check_rgb_buffer(width: u32, height: u32, data: &[u8]) -> Result<(), DetectError> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(DetectError::InvalidRgbDimensions { width, height })?;
    if data.len() != expected {
        return Err(DetectError::InvalidRgbBuffer {
            expected,
            got: data.len(),
        });
    }
    Ok(())
}

/// Wrap a packed 8-bit RGB buffer into an `image::RgbImage`.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<::image::RgbImage, DetectError> {
    check_rgb_buffer(width, height, data)?;
    ::image::RgbImage::from_raw(width, height, data.to_vec())
        .ok_or(DetectError::InvalidRgbDimensions { width, height })
}

/// Decode any image format supported by `image` into 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<::image::RgbImage, DetectError> {
    Ok(::image::ImageReader::open(path)
        .map_err(::image::ImageError::IoError)?
        .decode()?
        .to_rgb8())
}

/// Convert a rendered core image back into an `image::RgbImage` for saving.
pub fn to_image(img: &core::RgbImage) -> Result<::image::RgbImage, DetectError> {
    rgb_image_from_slice(img.width as u32, img.height as u32, &img.data)
}

/// Run the blob detector end-to-end on an `image::RgbImage`.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params, pose),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_blobs(
    img: &::image::RgbImage,
    params: blobs::BlobDetectorParams,
    pose: &core::CameraPose,
) -> Result<blobs::BlobDetectionResult, DetectError> {
    let detector = blobs::BlobDetector::new(params)?;
    Ok(detector.detect(&rgb_view(img), pose)?)
}

/// Run the blob detector on a packed buffer in the given channel order.
pub fn detect_blobs_from_rgb_u8(
    width: u32,
    height: u32,
    data: &[u8],
    layout: core::PixelLayout,
    params: blobs::BlobDetectorParams,
    pose: &core::CameraPose,
) -> Result<blobs::BlobDetectionResult, DetectError> {
    check_rgb_buffer(width, height, data)?;
    let view = core::RgbImageView::new(width as usize, height as usize, data).with_layout(layout);
    let detector = blobs::BlobDetector::new(params)?;
    Ok(detector.detect(&view, pose)?)
}
