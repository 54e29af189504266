//! High-level facade crate for the `auto-thresh-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the selector crates
//! - mask helpers for turning a threshold (or threshold surface) into a
//!   boolean mask
//! - (feature-gated) adapters between `image::GrayImage` buffers and the
//!   `ndarray` views the selectors consume.
//!
//! ## Quickstart
//!
//! ```no_run
//! use auto_thresh::{adapt, binarize, otsu, HistogramOptions, Source};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("page.png")?.decode()?.to_luma8();
//! let view = adapt::gray_view(&img)?;
//!
//! let t = otsu(&Source::from(view.clone()), &HistogramOptions::default())?;
//! let mask = binarize::apply_threshold(&view.into(), t);
//! println!("{} foreground pixels", mask.iter().filter(|&&m| m).count());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `auto_thresh::core`: histogram builder, image views, windowed filters.
//! - `auto_thresh::global`: Otsu, Yen, isodata, triangle, minimum, mean,
//!   Li and multi-Otsu selectors.
//! - `auto_thresh::local`: local mean/gaussian/median, Niblack and Sauvola
//!   threshold surfaces.
//! - `auto_thresh::adapt` (feature `image`): `GrayImage` conversions.

pub use auto_thresh_core as core;
pub use auto_thresh_global as global;
pub use auto_thresh_local as local;

pub use auto_thresh_core::{
    histogram, BorderMode, DynImage, Histogram, HistogramOptions, Source, ThresholdError,
    WindowShape,
};
pub use auto_thresh_global::{
    isodata, isodata_all, li, mean, minimum, multiotsu, otsu, triangle, yen, InitialGuess,
    LiParams,
};
pub use auto_thresh_local::{local_image, niblack_image, sauvola_image, LocalMethod};

pub mod binarize;

#[cfg(feature = "image")]
pub mod adapt;
