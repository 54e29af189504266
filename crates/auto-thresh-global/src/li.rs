//! Li's minimum cross-entropy threshold.
//!
//! An iterative fixed-point scheme: starting from a guess, split the
//! samples at the current threshold and move to the cross-entropy
//! stationary point of the two class means until the step falls below a
//! tolerance. Operates on raw samples, not a histogram, because the
//! tolerance depends on the gaps between distinct values.

use auto_thresh_core::{DynImage, ThresholdError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Hard cap on fixed-point iterations. The update is a contraction on
/// well-behaved histograms and converges in a handful of steps; hitting
/// the cap means the image made the iteration cycle.
pub const LI_MAX_ITER: usize = 4096;

/// Where the iteration starts.
pub enum InitialGuess<'a> {
    /// A threshold in image units. Must lie strictly inside the sample
    /// range.
    Value(f64),
    /// Computed from the min-shifted samples, e.g. a percentile. Useful
    /// for picking a different stationary point on multimodal images.
    Policy(&'a dyn Fn(&[f64]) -> f64),
}

/// Tuning knobs for [`li`]. The defaults reproduce the plain call:
/// mean-valued initial guess and a tolerance derived from the sample
/// spacing.
#[derive(Default)]
pub struct LiParams<'a> {
    /// Stop once the threshold moves less than this between iterations.
    /// Defaults to 0.5 for integer images and half the smallest gap
    /// between distinct values for float images.
    pub tolerance: Option<f64>,
    pub initial_guess: Option<InitialGuess<'a>>,
}

/// Li's iterative minimum cross-entropy threshold.
///
/// NaN samples are ignored. An image with a single distinct value (NaN
/// aside) returns that value; an image with only `inf` and `-inf` left
/// returns 0. `iter_callback` observes the initial guess and every
/// intermediate threshold, in image units.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(image, params, iter_callback),
        fields(samples = image.len())
    )
)]
pub fn li(
    image: &DynImage<'_>,
    params: &LiParams<'_>,
    mut iter_callback: Option<&mut dyn FnMut(f64)>,
) -> Result<f64, ThresholdError> {
    let not_nan: Vec<f64> = image
        .samples()
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect();
    let Some((&first, rest)) = not_nan.split_first() else {
        return Ok(f64::NAN);
    };
    if rest.iter().all(|&v| v == first) {
        return Ok(first);
    }

    let mut vals: Vec<f64> = not_nan.into_iter().filter(|v| v.is_finite()).collect();
    if vals.is_empty() {
        // only +inf and -inf survived; any threshold separates them
        return Ok(0.0);
    }

    let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // the update takes logarithms of the class means, so work on a
    // non-negative copy and shift back at the end
    for v in &mut vals {
        *v -= min;
    }

    let tolerance = params
        .tolerance
        .unwrap_or_else(|| default_tolerance(image.is_integral(), &vals));

    let mut t_next = match &params.initial_guess {
        None => vals.iter().sum::<f64>() / vals.len() as f64,
        Some(InitialGuess::Policy(f)) => f(&vals),
        Some(InitialGuess::Value(guess)) => {
            let shifted = guess - min;
            if !(shifted > 0.0 && shifted < max - min) {
                return Err(ThresholdError::InitialGuessOutOfRange {
                    guess: *guess,
                    min,
                    max,
                });
            }
            shifted
        }
    };
    let mut t_curr = -2.0 * tolerance;
    if let Some(cb) = iter_callback.as_mut() {
        cb(t_next + min);
    }

    let mut iterations = 0;
    while (t_next - t_curr).abs() > tolerance {
        iterations += 1;
        if iterations > LI_MAX_ITER {
            return Err(ThresholdError::NotConverged {
                iterations: LI_MAX_ITER,
            });
        }
        t_curr = t_next;

        let mut fore = (0.0, 0usize);
        let mut back = (0.0, 0usize);
        for &v in &vals {
            if v > t_curr {
                fore = (fore.0 + v, fore.1 + 1);
            } else {
                back = (back.0 + v, back.1 + 1);
            }
        }
        let mean_fore = fore.0 / fore.1 as f64;
        let mean_back = back.0 / back.1 as f64;
        if mean_back == 0.0 {
            break;
        }

        t_next = (mean_back - mean_fore) / (mean_back.ln() - mean_fore.ln());
        if t_next.is_nan() {
            t_next = 0.0;
        }
        if let Some(cb) = iter_callback.as_mut() {
            cb(t_next + min);
        }
    }
    log::debug!("li converged after {iterations} iterations");
    Ok(t_next + min)
}

fn default_tolerance(integral: bool, shifted: &[f64]) -> f64 {
    if integral {
        return 0.5;
    }
    let mut unique = shifted.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup();
    unique
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min)
        / 2.0
}
