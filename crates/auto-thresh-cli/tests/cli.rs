use assert_cmd::Command;
use predicates::prelude::*;

/// Two flat regions: 40 on the left half, 200 on the right.
fn bimodal_png(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("input.png");
    let img = image::GrayImage::from_fn(32, 16, |x, _| {
        image::Luma([if x < 16 { 40 } else { 200 }])
    });
    img.save(&path).unwrap();
    path
}

#[test]
fn otsu_prints_a_threshold_between_the_modes() {
    let dir = tempfile::tempdir().unwrap();
    let input = bimodal_png(&dir);
    let output = Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let t: f64 = String::from_utf8(output).unwrap().trim().parse().unwrap();
    assert!((40.0..200.0).contains(&t));
}

#[test]
fn mask_output_is_written_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = bimodal_png(&dir);
    let mask_path = dir.path().join("mask.png");
    Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg(&input)
        .args(["--method", "otsu", "-o"])
        .arg(&mask_path)
        .assert()
        .success();
    let mask = image::open(&mask_path).unwrap().to_luma8();
    assert_eq!(mask.dimensions(), (32, 16));
    // right half is foreground
    assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    assert_eq!(mask.get_pixel(31, 0).0[0], 255);
}

#[test]
fn json_summary_reports_foreground_count() {
    let dir = tempfile::tempdir().unwrap();
    let input = bimodal_png(&dir);
    Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg(&input)
        .args(["--method", "yen", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"foreground\":256"))
        .stdout(predicate::str::contains("\"total\":512"));
}

#[test]
fn local_methods_report_mask_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let input = bimodal_png(&dir);
    Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg(&input)
        .args(["--method", "niblack", "--block-size", "3", "-k", "0.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pixels above the local surface"));
}

#[test]
fn minimum_on_a_flat_image_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.png");
    image::GrayImage::from_pixel(16, 16, image::Luma([7]))
        .save(&path)
        .unwrap();
    Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg(&path)
        .args(["--method", "minimum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("two histogram maxima"));
}

#[test]
fn even_block_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = bimodal_png(&dir);
    Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg(&input)
        .args(["--method", "sauvola", "--block-size", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be odd"));
}

#[test]
fn missing_input_fails() {
    Command::cargo_bin("auto-thresh")
        .unwrap()
        .arg("does-not-exist.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
