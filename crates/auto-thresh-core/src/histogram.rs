use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DynImage, ThresholdError};

/// A discrete intensity histogram over uniformly spaced bins.
///
/// Invariants: `counts.len() == bin_centers.len() >= 1` and the centers are
/// strictly increasing with uniform spacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<f64>,
    pub bin_centers: Vec<f64>,
}

impl Histogram {
    pub fn new(counts: Vec<f64>, bin_centers: Vec<f64>) -> Self {
        debug_assert_eq!(counts.len(), bin_centers.len());
        debug_assert!(!counts.is_empty());
        Self {
            counts,
            bin_centers,
        }
    }

    /// Bare counts with implicit `0..n` bin centers (the `bincount`
    /// convention for integer data starting at zero).
    pub fn from_counts(counts: Vec<f64>) -> Self {
        let bin_centers = (0..counts.len()).map(|i| i as f64).collect();
        Self::new(counts, bin_centers)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Spacing between adjacent bin centers (1.0 for a single bin).
    pub fn bin_width(&self) -> f64 {
        if self.len() > 1 {
            self.bin_centers[1] - self.bin_centers[0]
        } else {
            1.0
        }
    }

    /// Counts rescaled to sum to one.
    pub fn normalized(&self) -> Histogram {
        let total: f64 = self.counts.iter().sum();
        let counts = if total > 0.0 {
            self.counts.iter().map(|&c| c / total).collect()
        } else {
            self.counts.clone()
        };
        Histogram::new(counts, self.bin_centers.clone())
    }

    /// Indices of the first and last bin with a nonzero count.
    pub fn nonzero_span(&self) -> Option<(usize, usize)> {
        let first = self.counts.iter().position(|&c| c != 0.0)?;
        let last = self.counts.iter().rposition(|&c| c != 0.0)?;
        Some((first, last))
    }

    /// Copy with leading and trailing zero-count bins removed.
    ///
    /// Prefix-sum selectors divide by cumulative class weights; zero bins at
    /// either end would turn those weights into 0/0.
    pub fn trimmed(&self) -> Histogram {
        match self.nonzero_span() {
            Some((first, last)) => Histogram::new(
                self.counts[first..=last].to_vec(),
                self.bin_centers[first..=last].to_vec(),
            ),
            None => self.clone(),
        }
    }
}

/// Options for the histogram builder.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HistogramOptions {
    /// Bin count for continuous data. Integer data always gets one bin per
    /// value between its observed minimum and maximum.
    pub nbins: usize,
    /// Rescale counts so they sum to one.
    pub normalize: bool,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            nbins: 256,
            normalize: false,
        }
    }
}

/// Build a histogram from image samples.
///
/// Integer images get one bin per value over `[min, max]` so the bin centers
/// are exactly the representable intensities. Float images are split into
/// `nbins` uniform bins over the observed range, with centers at the bin
/// midpoints. Non-finite samples are skipped.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(image), fields(samples = image.len()))
)]
pub fn histogram(
    image: &DynImage<'_>,
    opts: &HistogramOptions,
) -> Result<Histogram, ThresholdError> {
    image.warn_if_color();
    let finite: Vec<f64> = image
        .samples()
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    if finite.is_empty() {
        return Err(ThresholdError::EmptyImage);
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let hist = if image.is_integral() {
        bincount(&finite, min, max)
    } else if min == max {
        Histogram::new(vec![finite.len() as f64], vec![min])
    } else {
        uniform_bins(&finite, min, max, opts.nbins.max(1))
    };

    Ok(if opts.normalize {
        hist.normalized()
    } else {
        hist
    })
}

fn bincount(samples: &[f64], min: f64, max: f64) -> Histogram {
    let offset = min as i64;
    let nbins = (max as i64 - offset) as usize + 1;
    let mut counts = vec![0.0; nbins];
    for &v in samples {
        counts[(v as i64 - offset) as usize] += 1.0;
    }
    let bin_centers = (0..nbins).map(|i| (offset + i as i64) as f64).collect();
    Histogram::new(counts, bin_centers)
}

fn uniform_bins(samples: &[f64], min: f64, max: f64, nbins: usize) -> Histogram {
    let span = max - min;
    let mut counts = vec![0.0; nbins];
    for &v in samples {
        // samples at the upper edge land in the last bin
        let idx = (((v - min) / span) * nbins as f64) as usize;
        counts[idx.min(nbins - 1)] += 1.0;
    }
    let width = span / nbins as f64;
    let bin_centers = (0..nbins)
        .map(|i| min + (i as f64 + 0.5) * width)
        .collect();
    Histogram::new(counts, bin_centers)
}

/// Input to a histogram-domain selector: either raw pixels (histogrammed
/// internally) or a precomputed histogram. Exactly one of the two, by
/// construction.
#[derive(Clone, Debug)]
pub enum Source<'a> {
    Image(DynImage<'a>),
    Hist(&'a Histogram),
}

impl<'a> Source<'a> {
    /// Resolve to a histogram, building one from pixels when needed.
    ///
    /// `Histogram` fields are public, so a hand-built histogram may be
    /// empty; that is rejected here before any selector divides by a
    /// cumulative weight.
    pub fn resolve(&self, opts: &HistogramOptions) -> Result<Histogram, ThresholdError> {
        let hist = match self {
            Source::Image(image) => return histogram(image, opts),
            Source::Hist(hist) => *hist,
        };
        if hist.is_empty() {
            return Err(ThresholdError::EmptyImage);
        }
        Ok(if opts.normalize {
            hist.normalized()
        } else {
            hist.clone()
        })
    }

    /// The constant sample value, if this is an image with a single distinct
    /// value. Histogram sources never short-circuit.
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            Source::Image(image) => image.constant_value(),
            Source::Hist(_) => None,
        }
    }
}

impl<'a> From<DynImage<'a>> for Source<'a> {
    fn from(image: DynImage<'a>) -> Self {
        Source::Image(image)
    }
}

impl<'a> From<&'a Histogram> for Source<'a> {
    fn from(hist: &'a Histogram) -> Self {
        Source::Hist(hist)
    }
}

macro_rules! impl_source_from_view {
    ($t:ty) => {
        impl<'a, D: ndarray::Dimension> From<ndarray::ArrayView<'a, $t, D>> for Source<'a> {
            fn from(view: ndarray::ArrayView<'a, $t, D>) -> Self {
                Source::Image(DynImage::from(view))
            }
        }
    };
}

impl_source_from_view!(u8);
impl_source_from_view!(u16);
impl_source_from_view!(i32);
impl_source_from_view!(f32);
impl_source_from_view!(f64);
