//! Separable windowed statistics over N-dimensional arrays.
//!
//! Everything here operates on `f64` data; callers promote once via
//! [`DynImage::to_f64`](crate::DynImage::to_f64) and stay in `f64` through
//! the whole local pipeline.

use ndarray::{ArrayD, ArrayViewD, Axis, Dimension, IxDyn, Slice, Zip};
use serde::{Deserialize, Serialize};

/// How out-of-bounds indices are resolved at array borders.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "cval", rename_all = "lowercase")]
pub enum BorderMode {
    /// Reflect about the edge, repeating the edge sample:
    /// `(d c b a | a b c d | d c b a)`.
    Reflect,
    /// Fill with a fixed value outside the array.
    Constant(f64),
    /// Repeat the nearest edge sample.
    Nearest,
    /// Reflect about the centre of the edge sample, not repeating it:
    /// `(d c b | a b c d | c b a)`.
    Mirror,
    /// Wrap around to the opposite edge.
    Wrap,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Reflect
    }
}

impl BorderMode {
    /// Map `idx` into `0..n`, or `None` when the sample is the constant
    /// fill value. Folding is periodic, so any offset resolves.
    pub fn resolve(&self, idx: isize, n: usize) -> Option<usize> {
        debug_assert!(n > 0);
        if (0..n as isize).contains(&idx) {
            return Some(idx as usize);
        }
        if n == 1 {
            return match self {
                BorderMode::Constant(_) => None,
                _ => Some(0),
            };
        }
        let n = n as isize;
        match self {
            BorderMode::Reflect => {
                let r = idx.rem_euclid(2 * n);
                Some(if r < n { r } else { 2 * n - 1 - r } as usize)
            }
            BorderMode::Constant(_) => None,
            BorderMode::Nearest => Some(idx.clamp(0, n - 1) as usize),
            BorderMode::Mirror => {
                let r = idx.rem_euclid(2 * n - 2);
                Some(if r < n { r } else { 2 * n - 2 - r } as usize)
            }
            BorderMode::Wrap => Some(idx.rem_euclid(n) as usize),
        }
    }

    /// The value used where `resolve` returns `None`.
    pub fn fill(&self) -> f64 {
        match self {
            BorderMode::Constant(cval) => *cval,
            _ => 0.0,
        }
    }
}

/// Correlate a 1-D kernel along one axis, centred on each sample.
pub fn correlate1d(
    input: ArrayViewD<'_, f64>,
    weights: &[f64],
    axis: usize,
    mode: BorderMode,
) -> ArrayD<f64> {
    let n = input.shape()[axis];
    let origin = weights.len() / 2;
    let mut out = ArrayD::zeros(input.raw_dim());
    Zip::from(out.lanes_mut(Axis(axis)))
        .and(input.lanes(Axis(axis)))
        .for_each(|mut dst, src| {
            for i in 0..n {
                let mut acc = 0.0;
                for (k, &w) in weights.iter().enumerate() {
                    let idx = i as isize + k as isize - origin as isize;
                    acc += w * match mode.resolve(idx, n) {
                        Some(j) => src[j],
                        None => mode.fill(),
                    };
                }
                dst[i] = acc;
            }
        });
    out
}

/// Windowed mean via a separable box filter, one odd extent per axis.
pub fn uniform_filter(input: ArrayViewD<'_, f64>, sizes: &[usize], mode: BorderMode) -> ArrayD<f64> {
    debug_assert_eq!(sizes.len(), input.ndim());
    let mut out: Option<ArrayD<f64>> = None;
    for (axis, &size) in sizes.iter().enumerate() {
        if size > 1 {
            let weights = vec![1.0 / size as f64; size];
            out = Some(match &out {
                Some(prev) => correlate1d(prev.view(), &weights, axis, mode),
                None => correlate1d(input.view(), &weights, axis, mode),
            });
        }
    }
    out.unwrap_or_else(|| input.to_owned())
}

/// Normalized Gaussian taps truncated at `4 * sigma`. A non-positive sigma
/// yields the identity kernel.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (4.0 * sigma + 0.5) as isize;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Separable Gaussian smoothing, one sigma per axis.
pub fn gaussian_filter(input: ArrayViewD<'_, f64>, sigmas: &[f64], mode: BorderMode) -> ArrayD<f64> {
    debug_assert_eq!(sigmas.len(), input.ndim());
    let mut out: Option<ArrayD<f64>> = None;
    for (axis, &sigma) in sigmas.iter().enumerate() {
        let weights = gaussian_kernel(sigma);
        if weights.len() > 1 {
            out = Some(match &out {
                Some(prev) => correlate1d(prev.view(), &weights, axis, mode),
                None => correlate1d(input.view(), &weights, axis, mode),
            });
        }
    }
    out.unwrap_or_else(|| input.to_owned())
}

/// Copy of `input` grown by `radii[ax]` samples on both ends of each axis,
/// with border samples resolved through `mode`.
pub fn pad(input: ArrayViewD<'_, f64>, radii: &[usize], mode: BorderMode) -> ArrayD<f64> {
    debug_assert_eq!(radii.len(), input.ndim());
    let shape: Vec<usize> = input
        .shape()
        .iter()
        .zip(radii)
        .map(|(&n, &r)| n + 2 * r)
        .collect();
    let mut out = ArrayD::from_elem(IxDyn(&shape), mode.fill());
    let mut src = vec![0usize; input.ndim()];
    for (idx, dst) in out.indexed_iter_mut() {
        let mut in_bounds = true;
        for (ax, &i) in idx.slice().iter().enumerate() {
            match mode.resolve(i as isize - radii[ax] as isize, input.shape()[ax]) {
                Some(j) => src[ax] = j,
                None => {
                    in_bounds = false;
                    break;
                }
            }
        }
        if in_bounds {
            *dst = input[IxDyn(&src)];
        }
    }
    out
}

/// Exact windowed median (rank filter), one odd extent per axis.
pub fn median_filter(input: ArrayViewD<'_, f64>, sizes: &[usize], mode: BorderMode) -> ArrayD<f64> {
    debug_assert_eq!(sizes.len(), input.ndim());
    let radii: Vec<usize> = sizes.iter().map(|&s| s / 2).collect();
    let padded = pad(input.view(), &radii, mode);
    let mut out = ArrayD::zeros(input.raw_dim());
    let mut buf: Vec<f64> = Vec::with_capacity(sizes.iter().product());
    for (idx, dst) in out.indexed_iter_mut() {
        let origin = idx.slice();
        let window = padded.slice_each_axis(|ax| {
            let i = origin[ax.axis.index()];
            Slice::from(i..i + sizes[ax.axis.index()])
        });
        buf.clear();
        buf.extend(window.iter().copied());
        let mid = buf.len() / 2;
        let (_, median, _) = buf.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        *dst = *median;
    }
    out
}

/// Windowed mean and standard deviation with mirrored borders.
///
/// The variance is clamped at zero before the square root: the separable
/// moments can come out a hair negative on numerically flat windows, and a
/// NaN here would poison every downstream mask sample.
pub fn mean_std(input: ArrayViewD<'_, f64>, sizes: &[usize]) -> (ArrayD<f64>, ArrayD<f64>) {
    let mode = BorderMode::Mirror;
    let mean = uniform_filter(input.view(), sizes, mode);
    let squared = input.mapv(|v| v * v);
    let mean_sq = uniform_filter(squared.view(), sizes, mode);
    let std = Zip::from(&mean_sq)
        .and(&mean)
        .map_collect(|&m2, &m| (m2 - m * m).max(0.0).sqrt());
    (mean, std)
}
