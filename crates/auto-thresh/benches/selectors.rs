use auto_thresh::{
    li, multiotsu, niblack_image, otsu, yen, DynImage, HistogramOptions, LiParams, Source,
    WindowShape,
};
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn test_image() -> Array2<u8> {
    let mut rng = StdRng::seed_from_u64(1234);
    Array2::from_shape_fn((512, 512), |_| {
        if rng.gen_bool(0.7) {
            rng.gen_range(40..110u8)
        } else {
            rng.gen_range(160..230u8)
        }
    })
}

fn bench_selectors(c: &mut Criterion) {
    let img = test_image();
    let opts = HistogramOptions::default();

    c.bench_function("otsu_512", |b| {
        b.iter(|| otsu(&Source::from(img.view()), &opts).unwrap())
    });
    c.bench_function("yen_512", |b| {
        b.iter(|| yen(&Source::from(img.view()), &opts).unwrap())
    });
    c.bench_function("li_512", |b| {
        b.iter(|| li(&DynImage::from(img.view()), &LiParams::default(), None).unwrap())
    });
    c.bench_function("multiotsu3_512", |b| {
        b.iter(|| multiotsu(&Source::from(img.view()), 3, &opts).unwrap())
    });
    c.bench_function("niblack_512_w15", |b| {
        b.iter(|| niblack_image(&DynImage::from(img.view()), &WindowShape::from(15), 0.2).unwrap())
    });
}

criterion_group!(benches, bench_selectors);
criterion_main!(benches);
