//! Turn thresholds into boolean masks.
//!
//! The convention everywhere in this workspace is `pixel > threshold`:
//! pixels exactly at the threshold belong to the background.

use auto_thresh_core::{DynImage, ThresholdError};
use ndarray::{ArrayD, ArrayViewD, Zip};

/// Mask of pixels strictly above a global threshold.
pub fn apply_threshold(image: &DynImage<'_>, threshold: f64) -> ArrayD<bool> {
    image.to_f64().mapv(|v| v > threshold)
}

/// Mask of pixels strictly above a per-pixel threshold surface, as
/// produced by the `auto-thresh-local` crate.
pub fn apply_surface(
    image: &DynImage<'_>,
    surface: ArrayViewD<'_, f64>,
) -> Result<ArrayD<bool>, ThresholdError> {
    if image.shape() != surface.shape() {
        return Err(ThresholdError::ShapeMismatch {
            expected: image.shape().to_vec(),
            got: surface.shape().to_vec(),
        });
    }
    let data = image.to_f64();
    Ok(Zip::from(&data)
        .and(&surface)
        .map_collect(|&v, &t| v > t))
}

/// Mask of pixels inside the band `(low, high]`, for picking one class
/// out of a multi-level thresholding.
pub fn apply_band(image: &DynImage<'_>, low: f64, high: f64) -> ArrayD<bool> {
    image.to_f64().mapv(|v| v > low && v <= high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn threshold_pixels_are_background() {
        let img = array![[1u8, 2], [3, 4]];
        let mask = apply_threshold(&DynImage::from(img.view()), 2.0);
        assert_eq!(
            mask.into_raw_vec_and_offset().0,
            vec![false, false, true, true]
        );
    }

    #[test]
    fn surface_shape_mismatch_is_an_error() {
        let img = array![[1u8, 2], [3, 4]];
        let surface = ArrayD::zeros(ndarray::IxDyn(&[3, 2]));
        assert!(matches!(
            apply_surface(&DynImage::from(img.view()), surface.view()),
            Err(ThresholdError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn surface_mask_compares_per_pixel() {
        let img = array![[1.0f64, 5.0], [3.0, 0.0]];
        let surface = array![[2.0f64, 2.0], [2.0, 2.0]].into_dyn();
        let mask = apply_surface(&DynImage::from(img.view()), surface.view()).unwrap();
        assert_eq!(
            mask.into_raw_vec_and_offset().0,
            vec![false, true, true, false]
        );
    }

    #[test]
    fn band_selects_one_class() {
        let img = array![0u8, 50, 100, 150, 200];
        let mask = apply_band(&DynImage::from(img.view()), 50.0, 150.0);
        assert_eq!(
            mask.into_raw_vec_and_offset().0,
            vec![false, false, true, true, false]
        );
    }
}
