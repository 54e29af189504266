//! Adapters between `image` buffers and `ndarray` views.

use auto_thresh_core::ThresholdError;
use image::GrayImage;
use ndarray::{ArrayD, ArrayView2};

/// Borrow a grayscale image buffer as a `(rows, cols)` view.
pub fn gray_view(img: &GrayImage) -> Result<ArrayView2<'_, u8>, ThresholdError> {
    let (width, height) = img.dimensions();
    ArrayView2::from_shape((height as usize, width as usize), img.as_raw()).map_err(|_| {
        ThresholdError::InvalidGrayBuffer {
            expected: (width * height) as usize,
            got: img.as_raw().len(),
        }
    })
}

/// Render a 2-D boolean mask as an 8-bit image (255 foreground, 0
/// background).
pub fn mask_to_gray(mask: &ArrayD<bool>) -> Result<GrayImage, ThresholdError> {
    if mask.ndim() != 2 {
        return Err(ThresholdError::UnsupportedDimensionality { ndim: mask.ndim() });
    }
    let (rows, cols) = (mask.shape()[0], mask.shape()[1]);
    Ok(GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        image::Luma([if mask[[y as usize, x as usize]] { 255 } else { 0 }])
    }))
}
