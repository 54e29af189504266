/// Errors shared by the thresholding crates.
///
/// Numeric edge cases (NaN/Inf inputs) are defined outputs of the selectors,
/// never errors; every variant here is a genuine argument or algorithm
/// failure, raised synchronously with no partial result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("window has {got} extents but the image has {ndim} axes")]
    WindowDimensionMismatch { got: usize, ndim: usize },

    #[error("window extents must be odd (got {size} on axis {axis})")]
    EvenWindow { axis: usize, size: usize },

    #[error(
        "initial guess {guess} must be within the range of the image \
         (min {min}, max {max})"
    )]
    InitialGuessOutOfRange { guess: f64, min: f64, max: f64 },

    #[error(
        "after discretization the input has only {distinct} distinct values; \
         it cannot be split into {classes} classes"
    )]
    NotEnoughValues { distinct: usize, classes: usize },

    #[error("at least two classes are required (got {classes})")]
    InvalidClassCount { classes: usize },

    #[error("image contains no samples")]
    EmptyImage,

    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("unable to isolate two histogram maxima after {passes} smoothing passes")]
    NotBimodal { passes: usize },

    #[error("fixed-point iteration did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("no isodata fixed point found")]
    NoFixedPoint,

    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("expected a 2-D array, got {ndim} axes")]
    UnsupportedDimensionality { ndim: usize },
}
