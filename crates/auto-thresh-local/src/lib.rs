//! Adaptive thresholding: a per-pixel threshold surface from windowed
//! statistics.
//!
//! Each function returns an array the same shape as the input; binarize
//! with `pixel > surface[pixel]`. Windows are odd-sized and may differ
//! per axis, so stacks of independent 2-D slices threshold correctly
//! with a length-1 window on the stacking axis.

use auto_thresh_core::filters::{gaussian_filter, mean_std, median_filter, uniform_filter};
use auto_thresh_core::{BorderMode, DynImage, ThresholdError, WindowShape};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Windowed statistic used by [`local_image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalMethod {
    Mean,
    Gaussian,
    Median,
}

/// Per-pixel threshold surface from a windowed mean, Gaussian-weighted
/// mean, or median, minus `offset`.
///
/// `param` overrides the Gaussian sigma; by default the sigma is
/// `(extent - 1) / 6` per axis, placing the window edge three sigmas out.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(image)))]
pub fn local_image(
    image: &DynImage<'_>,
    block_size: &WindowShape,
    method: LocalMethod,
    offset: f64,
    mode: BorderMode,
    param: Option<f64>,
) -> Result<ArrayD<f64>, ThresholdError> {
    let extents = block_size.resolve(image.ndim())?;
    log::debug!("local {method:?} surface, window {extents:?}");
    let data = image.to_f64();

    let mut surface = match method {
        LocalMethod::Mean => uniform_filter(data.view(), &extents, mode),
        LocalMethod::Gaussian => {
            let sigmas: Vec<f64> = match param {
                Some(sigma) => vec![sigma; extents.len()],
                None => extents.iter().map(|&b| (b - 1) as f64 / 6.0).collect(),
            };
            gaussian_filter(data.view(), &sigmas, mode)
        }
        LocalMethod::Median => median_filter(data.view(), &extents, mode),
    };
    if offset != 0.0 {
        surface.mapv_inplace(|v| v - offset);
    }
    Ok(surface)
}

/// Niblack threshold surface: `mean + k * std` per window.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(image)))]
pub fn niblack_image(
    image: &DynImage<'_>,
    window_size: &WindowShape,
    k: f64,
) -> Result<ArrayD<f64>, ThresholdError> {
    let extents = window_size.resolve(image.ndim())?;
    let data = image.to_f64();
    let (mean, std) = mean_std(data.view(), &extents);
    Ok(mean + std * k)
}

/// Sauvola threshold surface: `mean * (1 + k * (std / r - 1))` per
/// window.
///
/// `r` normalizes the standard deviation by the dynamic range; when
/// omitted it defaults to half the storage type's range (127.5 for 8-bit
/// data, 1.0 for unit-interval floats).
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(image)))]
pub fn sauvola_image(
    image: &DynImage<'_>,
    window_size: &WindowShape,
    k: f64,
    r: Option<f64>,
) -> Result<ArrayD<f64>, ThresholdError> {
    let extents = window_size.resolve(image.ndim())?;
    let r = r.unwrap_or_else(|| {
        let (lo, hi) = image.dtype_range();
        0.5 * (hi - lo)
    });
    let data = image.to_f64();
    let (mean, std) = mean_std(data.view(), &extents);
    let gain = (std / r - 1.0) * k + 1.0;
    Ok(mean * gain)
}
