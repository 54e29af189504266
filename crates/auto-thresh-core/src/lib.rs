//! Core types and windowed-statistic utilities for automatic thresholding.
//!
//! This crate carries everything the selector crates share:
//!
//! - [`DynImage`], a dtype-tagged borrowed view over N-dimensional pixel
//!   data;
//! - [`Histogram`] and the [`histogram`] builder, plus [`Source`] for
//!   passing either pixels or a precomputed histogram to a selector;
//! - [`WindowShape`] and the separable filters in [`filters`] used by the
//!   local thresholding pipeline;
//! - [`ThresholdError`], the shared error type;
//! - a small stderr [`logger`].

pub mod error;
pub mod filters;
pub mod histogram;
pub mod image;
pub mod logger;
pub mod window;

pub use error::ThresholdError;
pub use filters::BorderMode;
pub use histogram::{histogram, Histogram, HistogramOptions, Source};
pub use image::DynImage;
pub use window::WindowShape;
