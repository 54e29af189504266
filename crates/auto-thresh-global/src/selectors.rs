//! Single-threshold selectors over an intensity histogram.
//!
//! Every selector takes a [`Source`] (raw pixels or a precomputed
//! histogram) so that callers binarizing many frames with a shared
//! histogram never pay for rebinning.

use auto_thresh_core::{DynImage, HistogramOptions, Source, ThresholdError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// First index of the maximum value. Ties keep the earliest bin, which
/// pins thresholds to the darker side of a flat criterion plateau.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

/// Otsu's threshold: the bin split maximizing between-class variance.
///
/// Pixels at the returned value belong to the lower class, so binarize
/// with `pixel > threshold`.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(source)))]
pub fn otsu(source: &Source<'_>, opts: &HistogramOptions) -> Result<f64, ThresholdError> {
    if let Some(value) = source.constant_value() {
        return Ok(value);
    }
    let hist = source.resolve(opts)?.trimmed();
    if hist.len() == 1 {
        return Ok(hist.bin_centers[0]);
    }

    let n = hist.len();
    let counts = &hist.counts;
    let centers = &hist.bin_centers;

    // cumulative class weight and mean from both ends
    let mut weight_lo = vec![0.0; n];
    let mut mean_lo = vec![0.0; n];
    let mut acc_w = 0.0;
    let mut acc_m = 0.0;
    for i in 0..n {
        acc_w += counts[i];
        acc_m += counts[i] * centers[i];
        weight_lo[i] = acc_w;
        mean_lo[i] = acc_m / acc_w;
    }
    let mut weight_hi = vec![0.0; n];
    let mut mean_hi = vec![0.0; n];
    acc_w = 0.0;
    acc_m = 0.0;
    for i in (0..n).rev() {
        acc_w += counts[i];
        acc_m += counts[i] * centers[i];
        weight_hi[i] = acc_w;
        mean_hi[i] = acc_m / acc_w;
    }

    let variance: Vec<f64> = (0..n - 1)
        .map(|i| {
            let d = mean_lo[i] - mean_hi[i + 1];
            weight_lo[i] * weight_hi[i + 1] * d * d
        })
        .collect();
    Ok(centers[argmax(&variance)])
}

/// Yen's threshold, maximizing the entropic correlation criterion.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(source)))]
pub fn yen(source: &Source<'_>, opts: &HistogramOptions) -> Result<f64, ThresholdError> {
    let hist = source.resolve(opts)?.trimmed();
    if hist.len() == 1 {
        return Ok(hist.bin_centers[0]);
    }

    let n = hist.len();
    let total: f64 = hist.counts.iter().sum();
    let pmf: Vec<f64> = hist.counts.iter().map(|&c| c / total).collect();

    let mut p1 = vec![0.0; n];
    let mut p1_sq = vec![0.0; n];
    let mut acc = 0.0;
    let mut acc_sq = 0.0;
    for i in 0..n {
        acc += pmf[i];
        acc_sq += pmf[i] * pmf[i];
        p1[i] = acc;
        p1_sq[i] = acc_sq;
    }
    let mut p2_sq = vec![0.0; n];
    acc_sq = 0.0;
    for i in (0..n).rev() {
        acc_sq += pmf[i] * pmf[i];
        p2_sq[i] = acc_sq;
    }

    // trimming guarantees p1_sq[i] > 0 and p2_sq[i + 1] covers the last bin
    let criterion: Vec<f64> = (0..n - 1)
        .map(|i| {
            let balance = p1[i] * (1.0 - p1[i]);
            ((balance * balance) / (p1_sq[i] * p2_sq[i + 1])).ln()
        })
        .collect();
    Ok(hist.bin_centers[argmax(&criterion)])
}

/// All isodata fixed points: bins where the midpoint of the two class
/// means rounds down onto the bin itself.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(source)))]
pub fn isodata_all(
    source: &Source<'_>,
    opts: &HistogramOptions,
) -> Result<Vec<f64>, ThresholdError> {
    let hist = source.resolve(opts)?;
    if hist.len() == 1 {
        return Ok(vec![hist.bin_centers[0]]);
    }

    let n = hist.len();
    let counts = &hist.counts;
    let centers = &hist.bin_centers;
    let bin_width = hist.bin_width();

    let mut csum_w = vec![0.0; n];
    let mut csum_m = vec![0.0; n];
    let mut acc_w = 0.0;
    let mut acc_m = 0.0;
    for i in 0..n {
        acc_w += counts[i];
        acc_m += counts[i] * centers[i];
        csum_w[i] = acc_w;
        csum_m[i] = acc_m;
    }
    let total_w = csum_w[n - 1];
    let total_m = csum_m[n - 1];

    let mut thresholds = Vec::new();
    for i in 0..n - 1 {
        let w_lo = csum_w[i];
        let w_hi = total_w - w_lo;
        if w_lo <= 0.0 || w_hi <= 0.0 {
            continue;
        }
        let mean_lo = csum_m[i] / w_lo;
        let mean_hi = (total_m - csum_m[i]) / w_hi;
        let distance = (mean_lo + mean_hi) / 2.0 - centers[i];
        if (0.0..bin_width).contains(&distance) {
            thresholds.push(centers[i]);
        }
    }
    if thresholds.is_empty() {
        return Err(ThresholdError::NoFixedPoint);
    }
    Ok(thresholds)
}

/// First isodata fixed point (Ridler-Calvard).
pub fn isodata(source: &Source<'_>, opts: &HistogramOptions) -> Result<f64, ThresholdError> {
    Ok(isodata_all(source, opts)?[0])
}

/// Triangle threshold: the bin furthest from the chord between the
/// histogram peak and the far tail, flipping skewed histograms first.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(source)))]
pub fn triangle(source: &Source<'_>, opts: &HistogramOptions) -> Result<f64, ThresholdError> {
    let hist = source.resolve(opts)?;
    let n = hist.len();
    let mut counts = hist.counts.clone();

    let arg_peak = argmax(&counts);
    let peak_height = counts[arg_peak];
    let (arg_low, arg_high) = hist
        .nonzero_span()
        .ok_or(ThresholdError::EmptyImage)?;
    if arg_low == arg_high {
        return Ok(hist.bin_centers[arg_low]);
    }

    // put the long tail on the right
    let flip = arg_peak - arg_low < arg_high - arg_peak;
    let (arg_low, arg_peak) = if flip {
        counts.reverse();
        (n - arg_high - 1, n - arg_peak - 1)
    } else {
        (arg_low, arg_peak)
    };

    let width = arg_peak - arg_low;
    if width == 0 {
        let arg_level = if flip { n - arg_low - 1 } else { arg_low };
        return Ok(hist.bin_centers[arg_level]);
    }

    let norm = (peak_height * peak_height + (width * width) as f64).sqrt();
    let peak_height = peak_height / norm;
    let inv_width = width as f64 / norm;
    let distances: Vec<f64> = (0..width)
        .map(|x| peak_height * x as f64 - inv_width * counts[arg_low + x])
        .collect();
    let mut arg_level = argmax(&distances) + arg_low;
    if flip {
        arg_level = n - arg_level - 1;
    }
    Ok(hist.bin_centers[arg_level])
}

/// Smoothing passes allowed while isolating two histogram maxima.
const SMOOTH_BUDGET: usize = 10_000;

/// Minimum-method threshold: smooth the histogram with a size-3 box
/// until exactly two local maxima remain, then take the valley between
/// them.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(source)))]
pub fn minimum(source: &Source<'_>, opts: &HistogramOptions) -> Result<f64, ThresholdError> {
    let hist = source.resolve(opts)?;
    let mut smooth = hist.counts.clone();
    let mut maxima = Vec::new();
    let mut passes = 0;
    for pass in 1..=SMOOTH_BUDGET {
        smooth = smooth3(&smooth);
        maxima = local_maxima(&smooth);
        passes = pass;
        if maxima.len() < 3 {
            break;
        }
    }
    if maxima.len() != 2 {
        return Err(ThresholdError::NotBimodal { passes });
    }
    if passes == SMOOTH_BUDGET {
        return Err(ThresholdError::NotConverged { iterations: passes });
    }
    log::debug!("two histogram maxima isolated after {passes} smoothing passes");

    let valley = argmin(&smooth[maxima[0]..=maxima[1]]);
    Ok(hist.bin_centers[maxima[0] + valley])
}

/// One size-3 box smoothing pass with edge samples repeated.
fn smooth3(counts: &[f64]) -> Vec<f64> {
    let n = counts.len();
    (0..n)
        .map(|i| {
            let lo = counts[i.saturating_sub(1)];
            let hi = counts[(i + 1).min(n - 1)];
            (lo + counts[i] + hi) / 3.0
        })
        .collect()
}

/// Indices of local maxima, sweeping left to right and recording each
/// downward turn.
fn local_maxima(counts: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    let mut rising = true;
    for i in 0..counts.len().saturating_sub(1) {
        if rising {
            if counts[i + 1] < counts[i] {
                rising = false;
                maxima.push(i);
            }
        } else if counts[i + 1] > counts[i] {
            rising = true;
        }
    }
    maxima
}

/// The mean of all samples, the simplest possible threshold.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(image), fields(samples = image.len()))
)]
pub fn mean(image: &DynImage<'_>) -> Result<f64, ThresholdError> {
    if image.is_empty() {
        return Err(ThresholdError::EmptyImage);
    }
    let samples = image.samples();
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}
