//! Global threshold selectors.
//!
//! Each selector reduces an image (or a precomputed histogram, via
//! [`Source`](auto_thresh_core::Source)) to one threshold value, or to a
//! set of values for [`multiotsu`] and [`isodata_all`]. Binarization is
//! always `pixel > threshold`: the threshold itself belongs to the lower
//! class.

pub mod li;
pub mod multiotsu;
pub mod selectors;

pub use li::{li, InitialGuess, LiParams, LI_MAX_ITER};
pub use multiotsu::multiotsu;
pub use selectors::{isodata, isodata_all, mean, minimum, otsu, triangle, yen};
