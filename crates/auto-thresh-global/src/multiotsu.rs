//! Multi-level Otsu thresholding.
//!
//! Generalizes Otsu's criterion to `classes` intensity classes: find the
//! `classes - 1` bin indices maximizing the summed between-class variance
//! `sum(first_moment^2 / zeroth_moment)` over the resulting segments.
//! Two search variants share the exact same cumulative-moment arithmetic,
//! so they return bit-identical indices: one recomputes segment scores on
//! demand, the other precomputes the full pairwise score table and trades
//! `O(bins^2)` memory for cheaper inner loops on small histograms.

use auto_thresh_core::{HistogramOptions, Source, ThresholdError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Thresholds separating `classes` intensity classes, in increasing
/// order, as bin-center values.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(source)))]
pub fn multiotsu(
    source: &Source<'_>,
    classes: usize,
    opts: &HistogramOptions,
) -> Result<Vec<f64>, ThresholdError> {
    if classes < 2 {
        return Err(ThresholdError::InvalidClassCount { classes });
    }
    let hist = source.resolve(opts)?.normalized();
    let prob = &hist.counts;

    let nonzero: Vec<usize> = prob
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p > 0.0)
        .map(|(i, _)| i)
        .collect();
    if nonzero.len() < classes {
        return Err(ThresholdError::NotEnoughValues {
            distinct: nonzero.len(),
            classes,
        });
    }

    let indices = if nonzero.len() == classes {
        // each populated bin is its own class; thresholds sit on all but
        // the last one
        nonzero[..classes - 1].to_vec()
    } else if prob.len() <= 256 {
        multiotsu_indices_lut(prob, classes - 1)
    } else {
        multiotsu_indices(prob, classes - 1)
    };
    log::debug!(
        "multiotsu: {} thresholds over {} bins",
        indices.len(),
        prob.len()
    );
    Ok(indices.into_iter().map(|i| hist.bin_centers[i]).collect())
}

/// Cumulative zeroth and first moments of a probability histogram, with
/// bin indices standing in for intensities.
fn cumulative_moments(prob: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = prob.len();
    let mut zeroth = vec![0.0; n];
    let mut first = vec![0.0; n];
    zeroth[0] = prob[0];
    for i in 1..n {
        zeroth[i] = zeroth[i - 1] + prob[i];
        first[i] = first[i - 1] + i as f64 * prob[i];
    }
    (zeroth, first)
}

/// Between-class variance contribution of bins `lo..=hi`.
fn segment_score(zeroth: &[f64], first: &[f64], lo: usize, hi: usize) -> f64 {
    let (w, m) = if lo == 0 {
        (zeroth[hi], first[hi])
    } else {
        (zeroth[hi] - zeroth[lo - 1], first[hi] - first[lo - 1])
    };
    if w > 0.0 {
        m * m / w
    } else {
        0.0
    }
}

/// Exhaustive threshold search, scoring segments on demand. Callers
/// guarantee `1 <= thresh_count < prob.len()`.
pub(crate) fn multiotsu_indices(prob: &[f64], thresh_count: usize) -> Vec<usize> {
    let (zeroth, first) = cumulative_moments(prob);
    search(
        prob.len(),
        thresh_count,
        &|lo, hi| segment_score(&zeroth, &first, lo, hi),
    )
}

/// Exhaustive threshold search over a precomputed pairwise score table.
/// Callers guarantee `1 <= thresh_count < prob.len()`.
pub(crate) fn multiotsu_indices_lut(prob: &[f64], thresh_count: usize) -> Vec<usize> {
    let n = prob.len();
    let (zeroth, first) = cumulative_moments(prob);
    let mut table = vec![0.0; n * n];
    for lo in 0..n {
        for hi in lo..n {
            table[lo * n + hi] = segment_score(&zeroth, &first, lo, hi);
        }
    }
    search(n, thresh_count, &|lo, hi| table[lo * n + hi])
}

fn search(nbins: usize, thresh_count: usize, score: &dyn Fn(usize, usize) -> f64) -> Vec<usize> {
    debug_assert!(thresh_count >= 1 && nbins > thresh_count);
    let mut current = vec![0usize; thresh_count];
    let mut best = vec![0usize; thresh_count];
    let mut max_sigma = 0.0;
    descend(
        nbins,
        thresh_count,
        score,
        0,
        0,
        &mut current,
        &mut best,
        &mut max_sigma,
    );
    best
}

/// Enumerate strictly increasing threshold tuples depth-first, keeping
/// the first tuple attaining the maximum summed score.
#[allow(clippy::too_many_arguments)]
fn descend(
    nbins: usize,
    thresh_count: usize,
    score: &dyn Fn(usize, usize) -> f64,
    bin_idx: usize,
    depth: usize,
    current: &mut [usize],
    best: &mut [usize],
    max_sigma: &mut f64,
) {
    if depth < thresh_count {
        // leave room for the deeper thresholds and a non-empty last class
        for idx in bin_idx..(nbins - thresh_count + depth) {
            current[depth] = idx;
            descend(
                nbins,
                thresh_count,
                score,
                idx + 1,
                depth + 1,
                current,
                best,
                max_sigma,
            );
        }
        return;
    }

    let mut sigma = score(0, current[0]) + score(current[thresh_count - 1] + 1, nbins - 1);
    for k in 0..thresh_count - 1 {
        sigma += score(current[k] + 1, current[k + 1]);
    }
    if sigma > *max_sigma {
        *max_sigma = sigma;
        best.copy_from_slice(current);
    }
}
