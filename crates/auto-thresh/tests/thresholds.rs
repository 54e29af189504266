//! End-to-end checks through the facade API.

use auto_thresh::{
    binarize, histogram, isodata, minimum, multiotsu, otsu, yen, BorderMode, DynImage, Histogram,
    HistogramOptions, LocalMethod, Source, WindowShape,
};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn opts() -> HistogramOptions {
    HistogramOptions::default()
}

/// Seeded bimodal test image: a dark mode around 60 and a bright mode
/// around 190.
fn bimodal_image(seed: u64) -> Array2<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((128, 128), |_| {
        if rng.gen_bool(0.65) {
            60 + rng.gen_range(0..25u8)
        } else {
            190 + rng.gen_range(0..25u8)
        }
    })
}

#[test]
fn selectors_agree_between_image_and_precomputed_histogram() {
    let img = bimodal_image(1);
    let hist = histogram(&DynImage::from(img.view()), &opts()).unwrap();

    let from_image = Source::from(img.view());
    let from_hist = Source::from(&hist);
    assert_eq!(
        otsu(&from_image, &opts()).unwrap(),
        otsu(&from_hist, &opts()).unwrap()
    );
    assert_eq!(
        yen(&from_image, &opts()).unwrap(),
        yen(&from_hist, &opts()).unwrap()
    );
    assert_eq!(
        isodata(&from_image, &opts()).unwrap(),
        isodata(&from_hist, &opts()).unwrap()
    );
    assert_eq!(
        minimum(&from_image, &opts()).unwrap(),
        minimum(&from_hist, &opts()).unwrap()
    );
    assert_eq!(
        multiotsu(&from_image, 2, &opts()).unwrap(),
        multiotsu(&from_hist, 2, &opts()).unwrap()
    );
}

#[test]
fn bare_counts_histograms_match_the_image_path() {
    // np.bincount-style counts start at zero even when the image has no
    // zeros; the selectors must agree with the image path regardless
    let img = Array1::from_vec(vec![1u8, 2]);
    let counts = Histogram::from_counts(vec![0.0, 1.0, 1.0]);
    assert_eq!(
        otsu(&Source::from(img.view()), &opts()).unwrap(),
        otsu(&Source::from(&counts), &opts()).unwrap()
    );
}

#[test]
fn two_class_multiotsu_is_otsu() {
    let img = bimodal_image(2);
    let t = otsu(&Source::from(img.view()), &opts()).unwrap();
    assert_eq!(multiotsu(&Source::from(img.view()), 2, &opts()).unwrap(), vec![t]);
}

#[test]
fn global_threshold_separates_a_bimodal_image() {
    let img = bimodal_image(3);
    let t = otsu(&Source::from(img.view()), &opts()).unwrap();
    let mask = binarize::apply_threshold(&DynImage::from(img.view()), t);
    let bright = img.iter().filter(|&&v| v >= 190).count();
    let foreground = mask.iter().filter(|&&m| m).count();
    assert_eq!(foreground, bright);
}

#[test]
fn multiotsu_bands_recover_three_classes() {
    let mut img = Array2::<u8>::from_elem((60, 60), 30);
    img.slice_mut(ndarray::s![20..40, ..]).fill(120);
    img.slice_mut(ndarray::s![40.., ..]).fill(220);
    let thresholds = multiotsu(&Source::from(img.view()), 3, &opts()).unwrap();
    assert_eq!(thresholds.len(), 2);

    let dyn_img = DynImage::from(img.view());
    let low = binarize::apply_band(&dyn_img, f64::NEG_INFINITY, thresholds[0]);
    let mid = binarize::apply_band(&dyn_img, thresholds[0], thresholds[1]);
    let high = binarize::apply_threshold(&dyn_img, thresholds[1]);
    assert_eq!(low.iter().filter(|&&m| m).count(), 1200);
    assert_eq!(mid.iter().filter(|&&m| m).count(), 1200);
    assert_eq!(high.iter().filter(|&&m| m).count(), 1200);
}

#[test]
fn local_thresholding_survives_an_illumination_gradient() {
    // vertical stripes under a strong horizontal illumination ramp: a
    // single global threshold cannot separate them, a windowed mean can
    let img = Array2::from_shape_fn((64, 64), |(_, j)| {
        let stripe = if (j / 4) % 2 == 0 { 0.0 } else { 40.0 };
        stripe + 2.5 * j as f64
    });
    let truth: Vec<bool> = img
        .indexed_iter()
        .map(|((_, j), _)| (j / 4) % 2 == 1)
        .collect();

    let dyn_img = DynImage::from(img.view());
    let surface = auto_thresh::local_image(
        &dyn_img,
        &WindowShape::from(7),
        LocalMethod::Mean,
        0.0,
        BorderMode::Reflect,
        None,
    )
    .unwrap();
    let local_mask = binarize::apply_surface(&dyn_img, surface.view()).unwrap();
    let local_errors = local_mask
        .iter()
        .zip(&truth)
        .filter(|(&m, &t)| m != t)
        .count();

    let t = otsu(&Source::from(img.view()), &opts()).unwrap();
    let global_mask = binarize::apply_threshold(&dyn_img, t);
    let global_errors = global_mask
        .iter()
        .zip(&truth)
        .filter(|(&m, &t)| m != t)
        .count();

    assert!(local_errors < global_errors / 4);
    // the ramp dominates the stripes, so the global mask is wrong on a
    // large share of pixels
    assert!(global_errors > img.len() / 5);
}

#[cfg(feature = "image")]
#[test]
fn gray_image_round_trip() {
    use auto_thresh::adapt;

    let img = bimodal_image(4);
    let gray = image::GrayImage::from_fn(128, 128, |x, y| {
        image::Luma([img[[y as usize, x as usize]]])
    });
    let view = adapt::gray_view(&gray).unwrap();
    let t = otsu(&Source::from(view.clone()), &opts()).unwrap();
    let mask = binarize::apply_threshold(&view.into(), t);
    let rendered = adapt::mask_to_gray(&mask).unwrap();
    assert_eq!(rendered.dimensions(), (128, 128));
    let foreground = mask.iter().filter(|&&m| m).count();
    let white = rendered.pixels().filter(|p| p.0[0] == 255).count();
    assert_eq!(foreground, white);
}
