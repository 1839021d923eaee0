//! File loading, frame capture and pixel access through the color model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{GenericImageView, Rgb, RgbImage, Rgba};
use ipl_core::format::{CV_8UC1, CV_8UC3};
use ipl_core::{Rect, Size};
use ipl_image::{Capture, Color, ColorModel, CpuImage, FileSequence, PixelAccess, load_image};
use ipl_native::{CpuBackend, Interpolation, LoadMode};
use tempfile::TempDir;

const REFERENCE: Rgb<u8> = Rgb([224, 134, 110]);

/// Writes a 64x48 PNG whose pixel (30, 20) is [`REFERENCE`].
fn reference_png(dir: &TempDir, name: &str) -> PathBuf {
    let mut img = RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 77]));
    img.put_pixel(30, 20, REFERENCE);
    let path = dir.path().join(name);
    img.save(&path).unwrap();
    path
}

fn load(backend: &Arc<CpuBackend>, path: &Path, mode: LoadMode) -> CpuImage {
    load_image(backend, path, mode).unwrap()
}

#[test]
fn color_load_exposes_rgb_with_opaque_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_png(&dir, "ref.png");
    let backend = Arc::new(CpuBackend::new());
    let img = load(&backend, &path, LoadMode::Color);

    assert_eq!(img.mat_type(), Some(CV_8UC3));
    assert_eq!(img.color_model().unwrap(), ColorModel::Rgba);
    assert_eq!(img.pixel_at(30, 20).unwrap(), Color::Rgba([224, 134, 110, 255]));
    assert_eq!(
        img.pixel_at(30, 20).unwrap().to_rgba16(),
        [224 * 0x101, 134 * 0x101, 110 * 0x101, 255 * 0x101]
    );

    // Storage is BGR: the raw scalar is the exposed color reversed.
    let raw = img.scalar_at((20, 30)).unwrap();
    assert_eq!(raw.values(), [110.0, 134.0, 224.0, 0.0]);
}

#[test]
fn grayscale_load_has_equal_components() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_png(&dir, "ref.png");
    let backend = Arc::new(CpuBackend::new());
    let img = load(&backend, &path, LoadMode::Grayscale);

    assert_eq!(img.mat_type(), Some(CV_8UC1));
    assert_eq!(img.color_model().unwrap(), ColorModel::Gray);
    for (x, y) in [(0, 0), (30, 20), (63, 47), (10, 40)] {
        let [r, g, b, a] = img.pixel_at(x, y).unwrap().to_rgba();
        assert!(r == g && g == b, "pixel ({x}, {y}) is not gray");
        assert_eq!(a, 255);
    }
}

#[test]
fn generic_view_matches_pixel_access() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_png(&dir, "ref.png");
    let backend = Arc::new(CpuBackend::new());
    let img = load(&backend, &path, LoadMode::Color);

    assert_eq!(img.dimensions(), (64, 48));
    assert_eq!(PixelAccess::bounds(&img), Rect::new(0, 0, 64, 48));
    assert_eq!(img.get_pixel(30, 20), Rgba([224, 134, 110, 255]));

    // Any `image` consumer can copy it out.
    let exported = image::RgbaImage::from_fn(64, 48, |x, y| img.get_pixel(x, y));
    assert_eq!(exported.get_pixel(63, 0), &Rgba([252, 0, 77, 255]));
}

#[test]
fn resize_loaded_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_png(&dir, "ref.png");
    let backend = Arc::new(CpuBackend::new());
    let img = load(&backend, &path, LoadMode::Color);

    let resized = img.resize(Size::new(320, 200), Interpolation::Nearest).unwrap();
    assert_eq!(resized.size(), Size::new(320, 200));
    assert_eq!(resized.bounds(), Rect::new(0, 0, 320, 200));
}

#[test]
fn split_loaded_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_png(&dir, "ref.png");
    let backend = Arc::new(CpuBackend::new());
    let img = load(&backend, &path, LoadMode::Color);

    let mut channels = img.split().unwrap();
    assert_eq!(channels.len(), 3);
    img.split_to(&mut channels).unwrap();
    // Planes are in storage order: blue first.
    assert_eq!(channels[0].pixel_at(30, 20).unwrap(), Color::Gray(110));
    assert_eq!(channels[2].pixel_at(30, 20).unwrap(), Color::Gray(224));
}

#[test]
fn missing_file_is_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(CpuBackend::new());
    let err = load_image(&backend, dir.path().join("missing.png"), LoadMode::Color).unwrap_err();
    assert!(err.is_load_error());
    assert_eq!(backend.live_buffers(), 0);
}

#[test]
fn capture_replays_frames_then_fails() {
    let dir = tempfile::tempdir().unwrap();
    let first = reference_png(&dir, "f0.png");
    let second = reference_png(&dir, "f1.png");
    let backend = Arc::new(CpuBackend::new());

    let mut capture = Capture::open(&backend, FileSequence::new([first, second], LoadMode::Color));
    let a = capture.query_frame().unwrap();
    let b = capture.query_frame().unwrap();
    assert_ne!(a.buffer_id(), b.buffer_id());
    assert_eq!(a.pixel_at(30, 20).unwrap(), b.pixel_at(30, 20).unwrap());
    assert_eq!(capture.frames(), 2);

    assert!(capture.query_frame().unwrap_err().is_load_error());
    drop((a, b));
    assert_eq!(backend.live_buffers(), 0);
}

#[test]
fn no_buffers_outlive_a_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_png(&dir, "ref.png");
    let backend = Arc::new(CpuBackend::new());
    {
        let img = load(&backend, &path, LoadMode::Color);
        let small = img.resize(Size::new(32, 24), Interpolation::Area).unwrap();
        let turned = small.rotate(45.0).unwrap();
        let soft = turned.gaussian_blur(3).unwrap();
        let remapped = soft.lut(&ipl_image::Lut::from_fn(|v| v / 2)).unwrap();
        let planes = remapped.split().unwrap();
        let copy = planes[1].duplicate().unwrap();
        assert_eq!(copy.size(), Size::new(32, 24));
    }
    assert_eq!(backend.live_buffers(), 0);
    assert_eq!(backend.allocated(), backend.released());
}
