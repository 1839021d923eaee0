//! Lifecycle and transform behavior against the CPU backend.

use std::sync::Arc;

use ipl_core::format::{CV_8UC1, CV_8UC3, CV_16SC1};
use ipl_core::{Error, Scalar, Size};
use ipl_image::{CpuImage, Image, Lut};
use ipl_native::{ColorConversion, CpuBackend, Interpolation};

fn backend() -> Arc<CpuBackend> {
    Arc::new(CpuBackend::new())
}

/// 3-channel image with channel values derived from the coordinates.
fn pattern(b: &Arc<CpuBackend>, w: u32, h: u32) -> CpuImage {
    let mut img = CpuImage::create(b, Size::new(w, h), CV_8UC3).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = Scalar::new((x * 7 % 256) as f64, (y * 5 % 256) as f64, ((x + y) % 256) as f64, 0.0);
            img.set_scalar_at(y, x, v).unwrap();
        }
    }
    img
}

#[test]
fn initialize_then_reinitialize_reports_new_shape() {
    let b = backend();
    let mut img = CpuImage::placeholder(&b);
    assert!(!img.is_initialized());

    img.reinitialize(Size::new(320, 200), CV_8UC3).unwrap();
    assert!(img.is_initialized());
    assert_eq!(img.size(), Size::new(320, 200));
    assert_eq!(img.mat_type(), Some(CV_8UC3));

    img.reinitialize(Size::new(10, 20), CV_8UC1).unwrap();
    img.reinitialize(Size::new(30, 40), CV_8UC3).unwrap();
    assert_eq!(img.size(), Size::new(30, 40));
    assert_eq!(img.mat_type(), Some(CV_8UC3));
    assert_eq!(b.live_buffers(), 1);
}

#[test]
fn to_variants_reuse_matching_destination() {
    let b = backend();
    let src = pattern(&b, 16, 12);
    let mut dest = CpuImage::placeholder(&b);

    src.resize_to(&mut dest, Size::new(8, 6), Interpolation::Linear).unwrap();
    let id = dest.buffer_id();
    let allocated = b.allocated();

    src.resize_to(&mut dest, Size::new(8, 6), Interpolation::Cubic).unwrap();
    assert_eq!(dest.buffer_id(), id);
    assert_eq!(b.allocated(), allocated);

    // Rotating writes a source-shaped result, so the 8x6 buffer is replaced.
    src.rotate_to(&mut dest, 90.0).unwrap();
    assert_ne!(dest.buffer_id(), id);
    assert_eq!(dest.size(), src.size());
    let id = dest.buffer_id();

    src.gaussian_blur_to(&mut dest, 3).unwrap();
    src.copy_to(&mut dest).unwrap();
    src.lut_to(&mut dest, &Lut::identity()).unwrap();
    assert_eq!(dest.buffer_id(), id);
}

#[test]
fn resize_hits_every_requested_size() {
    let b = backend();
    let src = pattern(&b, 40, 25);
    for interp in [
        Interpolation::Nearest,
        Interpolation::Linear,
        Interpolation::Area,
        Interpolation::Cubic,
        Interpolation::Lanczos4,
    ] {
        for size in [Size::new(320, 200), Size::new(1, 1), Size::new(7, 31)] {
            let out = src.resize(size, interp).unwrap();
            assert_eq!(out.size(), size);
            assert_eq!(out.mat_type(), Some(CV_8UC3));
        }
    }
    assert!(src.resize(Size::new(0, 5), Interpolation::Linear).is_err());
}

#[test]
fn rejected_resize_leaves_destination_alone() {
    let b = backend();
    let src = pattern(&b, 6, 4);
    let mut dest = src.resize(Size::new(3, 2), Interpolation::Linear).unwrap();
    let id = dest.buffer_id();

    let err = src.resize_to(&mut dest, Size::new(0, 2), Interpolation::Linear).unwrap_err();
    assert!(err.is_shape_error());
    assert!(dest.is_initialized());
    assert_eq!(dest.buffer_id(), id);
    assert_eq!(dest.size(), Size::new(3, 2));
}

#[test]
fn oversized_create_is_recoverable() {
    let b = backend();
    assert!(CpuImage::create(&b, Size::new(u32::MAX, u32::MAX), CV_8UC3).is_err());
    assert_eq!(b.allocated(), 0);
}

#[test]
fn rotate_by_zero_keeps_pixels() {
    let b = backend();
    let src = pattern(&b, 9, 7);
    let out = src.rotate(0.0).unwrap();
    for y in 0..7 {
        for x in 0..9 {
            assert_eq!(out.scalar_at((y, x)).unwrap(), src.scalar_at((y, x)).unwrap());
        }
    }
}

#[test]
fn rotate_fills_uncovered_corners_with_zero() {
    let b = backend();
    let mut src = CpuImage::create(&b, Size::new(20, 10), CV_8UC1).unwrap();
    for y in 0..10 {
        for x in 0..20 {
            src.set_scalar_at(y, x, Scalar::all(200.0)).unwrap();
        }
    }
    let out = src.rotate(90.0).unwrap();
    assert_eq!(out.size(), src.size());
    // A 20x10 frame turned a quarter leaves its left and right ends uncovered.
    assert_eq!(out.scalar_at((5, 0)).unwrap()[0], 0.0);
    assert_eq!(out.scalar_at((5, 19)).unwrap()[0], 0.0);
    assert_eq!(out.scalar_at((5, 10)).unwrap()[0], 200.0);
}

#[test]
fn gaussian_blur_rejects_even_radius() {
    let b = backend();
    let src = pattern(&b, 8, 8);
    let err = src.gaussian_blur(4).unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    let blurred = src.gaussian_blur(5).unwrap();
    assert_eq!(blurred.size(), src.size());
}

#[test]
fn lut_uniform_and_per_channel() {
    let b = backend();
    let src = pattern(&b, 6, 4);

    let inverted = src.lut(&Lut::from_fn(|v| 255 - v)).unwrap();
    let s = src.scalar_at((3, 5)).unwrap();
    let o = inverted.scalar_at((3, 5)).unwrap();
    for c in 0..3 {
        assert_eq!(o[c], 255.0 - s[c]);
    }

    let zero = [0u8; 256];
    let full = [255u8; 256];
    let ident = *Lut::identity().table(0);
    let out = src.lut(&Lut::per_channel(vec![zero, ident, full])).unwrap();
    assert_eq!(out.scalar_at((3, 5)).unwrap().values(), [0.0, s[1], 255.0, 0.0]);

    // Temporary tables never outlive the call.
    drop((out, inverted, src));
    assert_eq!(b.live_buffers(), 0);
}

#[test]
fn lut_with_wrong_table_count_leaves_destination_alone() {
    let b = backend();
    let src = pattern(&b, 4, 4);
    let mut dest = CpuImage::create(&b, Size::new(2, 2), CV_8UC1).unwrap();
    let id = dest.buffer_id();

    let err = src.lut_to(&mut dest, &Lut::per_channel(vec![[0; 256]; 2])).unwrap_err();
    assert!(matches!(err, Error::ChannelCountMismatch { expected: 3, actual: 2 }));
    assert_eq!(dest.buffer_id(), id);
    assert_eq!(dest.size(), Size::new(2, 2));
}

#[test]
fn placeholder_sources_are_rejected() {
    let b = backend();
    let empty = CpuImage::placeholder(&b);
    let mut dest = CpuImage::placeholder(&b);

    assert!(empty.resize(Size::new(2, 2), Interpolation::Linear).unwrap_err().is_uninitialized());
    assert!(empty.rotate(10.0).unwrap_err().is_uninitialized());
    assert!(empty.gaussian_blur(3).unwrap_err().is_uninitialized());
    assert!(empty.lut(&Lut::identity()).unwrap_err().is_uninitialized());
    assert!(empty.copy_to(&mut dest).unwrap_err().is_uninitialized());
    assert!(empty.split().unwrap_err().is_uninitialized());
    assert!(empty.duplicate().unwrap_err().is_uninitialized());
    assert!(!dest.is_initialized());
    assert_eq!(b.allocated(), 0);
}

#[test]
fn split_yields_one_plane_per_channel() {
    let b = backend();
    let src = pattern(&b, 5, 4);
    let mut planes = src.split().unwrap();
    assert_eq!(planes.len(), 3);
    for (c, plane) in planes.iter().enumerate() {
        assert_eq!(plane.size(), src.size());
        assert_eq!(plane.mat_type(), Some(CV_8UC1));
        assert_eq!(plane.scalar_at((2, 3)).unwrap()[0], src.scalar_at((2, 3)).unwrap()[c]);
    }

    let ids: Vec<_> = planes.iter().map(|p| p.buffer_id()).collect();
    src.split_to(&mut planes).unwrap();
    let again: Vec<_> = planes.iter().map(|p| p.buffer_id()).collect();
    assert_eq!(ids, again);

    planes.release();
    assert!(planes.iter().all(|p| !p.is_initialized()));
    drop(src);
    assert_eq!(b.live_buffers(), 0);
}

#[test]
fn split_to_mismatched_length_touches_nothing() {
    let b = backend();
    let src = pattern(&b, 5, 4);
    let mut dest = vec![
        CpuImage::create(&b, Size::new(1, 1), CV_8UC1).unwrap(),
        CpuImage::placeholder(&b),
    ];
    let before = b.allocated();

    let err = src.split_to(&mut dest).unwrap_err();
    assert!(matches!(err, Error::ChannelCountMismatch { expected: 3, actual: 2 }));
    assert_eq!(dest[0].size(), Size::new(1, 1));
    assert!(!dest[1].is_initialized());
    assert_eq!(b.allocated(), before);
}

#[test]
fn duplicate_is_deep() {
    let b = backend();
    let src = pattern(&b, 6, 6);
    let mut copy = src.duplicate().unwrap();
    assert_ne!(copy.buffer_id(), src.buffer_id());
    for (y, x) in [(0, 0), (3, 2), (5, 5)] {
        assert_eq!(copy.scalar_at((y, x)).unwrap(), src.scalar_at((y, x)).unwrap());
    }
    let before = src.scalar_at((1, 1)).unwrap();
    copy.set_scalar_at(1, 1, Scalar::all(3.0)).unwrap();
    assert_eq!(src.scalar_at((1, 1)).unwrap(), before);
}

#[test]
fn copy_to_reshapes_destination() {
    let b = backend();
    let src = pattern(&b, 6, 3);
    let mut dest = CpuImage::create(&b, Size::new(2, 2), CV_8UC1).unwrap();
    src.copy_to(&mut dest).unwrap();
    assert_eq!(dest.size(), Size::new(6, 3));
    assert_eq!(dest.mat_type(), Some(CV_8UC3));
    assert_eq!(dest.scalar_at((2, 5)).unwrap(), src.scalar_at((2, 5)).unwrap());
}

#[test]
fn convert_color_derives_channel_count() {
    let b = backend();
    let src = pattern(&b, 4, 4);
    let gray = src.convert_color(ColorConversion::BgrToGray).unwrap();
    assert_eq!(gray.mat_type(), Some(CV_8UC1));
    let back = gray.convert_color(ColorConversion::GrayToBgr).unwrap();
    assert_eq!(back.mat_type(), Some(CV_8UC3));

    let err = gray.convert_color(ColorConversion::BgrToRgb).unwrap_err();
    assert!(matches!(err, Error::ChannelCountMismatch { expected: 3, actual: 1 }));
}

#[test]
fn release_is_idempotent() {
    let b = backend();
    let mut img = pattern(&b, 3, 3);
    img.release();
    img.release();
    assert_eq!(b.released(), 1);
    assert!(img.scalar_at((0, 0)).unwrap_err().is_uninitialized());
    assert!(img.rotate(1.0).unwrap_err().is_uninitialized());

    // A released image can be brought back.
    img.reinitialize(Size::new(2, 2), CV_8UC1).unwrap();
    assert!(img.is_initialized());
}

#[test]
fn unsupported_types_fail_recoverably() {
    let b = backend();
    let mut img: CpuImage = Image::placeholder(&b);
    assert!(img.reinitialize(Size::new(2, 2), CV_16SC1).unwrap_err().is_type_error());
    assert!(!img.is_initialized());
    assert_eq!(b.allocated(), 0);
}
