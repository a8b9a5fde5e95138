//! End-to-end batch runs over generated photo directories.

use image::{Rgb, RgbImage};
use infobar_core::render::{AssetCache, BarGeometry};
use infobar_core::{BatchRunner, Config, JobOutcome};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn write_photo(dir: &Path, name: &str, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(dir.join(name)).unwrap();
}

fn config_for(out: &Path, workers: usize) -> Config {
    let mut config = Config::default();
    config.output.dir = out.to_path_buf();
    config.processing.max_workers = workers;
    config
}

#[tokio::test]
async fn test_corrupt_raw_fails_alone() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("roll");
    let out = dir.path().join("output");
    std::fs::create_dir(&input).unwrap();

    let sizes = [
        (320, 240),
        (240, 320),
        (300, 300),
        (640, 200),
        (200, 640),
        (123, 77),
        (77, 123),
        (500, 375),
        (375, 500),
    ];
    for (i, (w, h)) in sizes.iter().enumerate() {
        let ext = if i % 2 == 0 { "png" } else { "jpg" };
        write_photo(&input, &format!("frame_{i}.{ext}"), *w, *h);
    }
    std::fs::write(input.join("broken.cr2"), b"this is not a raw file".repeat(64)).unwrap();
    std::fs::write(input.join("notes.txt"), "ignored").unwrap();

    let finished = Arc::new(AtomicUsize::new(0));
    let counter = finished.clone();
    let runner = BatchRunner::new(&config_for(&out, 4), Arc::new(AssetCache::empty()));
    let report = runner
        .run(&input, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 10);
    assert_eq!(report.succeeded(), 9);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(finished.load(Ordering::SeqCst), 10);

    let failure = report
        .outcomes
        .iter()
        .find(|o| !o.is_success())
        .unwrap();
    match failure {
        JobOutcome::Failed { source, stage, .. } => {
            assert!(source.ends_with("broken.cr2"));
            assert_eq!(stage, "raw-decode");
        }
        JobOutcome::Written { .. } => unreachable!(),
    }

    let written = std::fs::read_dir(&out).unwrap().count();
    assert_eq!(written, 9);
    assert!(!out.join("broken.jpg").exists());

    for (i, (w, h)) in sizes.iter().enumerate() {
        let result = image::open(out.join(format!("frame_{i}.jpg"))).unwrap();
        let geometry = BarGeometry::for_source(*w, *h);
        assert_eq!(result.width(), *w);
        assert_eq!(result.height(), h + geometry.bar_height - geometry.feather);
    }
}

#[tokio::test]
async fn test_colliding_stems_write_once() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let out = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    write_photo(&input, "same.png", 100, 80);
    write_photo(&input, "same.jpg", 100, 80);
    write_photo(&input, "other.png", 90, 60);

    let report = BatchRunner::new(&config_for(&out, 32), Arc::new(AssetCache::empty()))
        .run(&input, |_| {})
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.skipped, 1);
    assert!(out.join("same.jpg").exists());
    assert!(out.join("other.jpg").exists());
}

#[tokio::test]
async fn test_rerun_overwrites_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let out = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    write_photo(&input, "a.png", 64, 48);

    let runner = BatchRunner::new(&config_for(&out, 2), Arc::new(AssetCache::empty()));
    let first = runner.run(&input, |_| {}).await.unwrap();
    let second = runner.run(&input, |_| {}).await.unwrap();

    assert_eq!(first.succeeded(), 1);
    assert_eq!(second.succeeded(), 1);
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
}
