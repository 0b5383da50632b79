use super::*;
use crate::assets::asset::AssetAnchor;

const GRAY: [u8; 4] = [90, 90, 90, 255];
const RED: [u8; 4] = [220, 20, 20, 255];

fn placement(target: Point, scale: f64, anchor: Point) -> Placement {
    Placement {
        affine: Affine::translate(target.to_vec2())
            * Affine::scale(scale)
            * Affine::translate(-anchor.to_vec2()),
        base_scale: scale,
        scale,
        rotation_rad: 0.0,
        target,
    }
}

fn half_scale_square() -> Placement {
    placement(Point::new(200.0, 150.0), 0.5, Point::new(200.0, 200.0))
}

fn sequential() -> Compositor {
    Compositor::new(CompositeConfig {
        parallel: false,
        ..CompositeConfig::default()
    })
}

#[test]
fn no_placement_leaves_frame_untouched() {
    let asset = HairstyleAsset::solid(400, 400, RED).unwrap();
    let mut frame = Frame::filled(400, 400, GRAY);
    let before = frame.clone();
    composite_onto(&mut frame, &asset, None).unwrap();
    assert_eq!(frame, before);
}

#[test]
fn opaque_asset_replaces_its_footprint() {
    let asset = HairstyleAsset::solid(400, 400, RED).unwrap();
    let mut frame = Frame::filled(400, 400, GRAY);
    composite_onto(&mut frame, &asset, Some(&half_scale_square())).unwrap();

    for (x, y) in [(200, 150), (100, 50), (101, 51), (299, 249), (150, 200)] {
        assert_eq!(frame.pixel(x, y), Some(RED), "({x}, {y})");
    }
    for (x, y) in [(10, 10), (98, 150), (200, 48), (302, 150), (200, 252), (399, 399)] {
        assert_eq!(frame.pixel(x, y), Some(GRAY), "({x}, {y})");
    }
}

#[test]
fn fully_transparent_asset_is_byte_identical_noop() {
    let asset = HairstyleAsset::solid(400, 400, [255, 255, 255, 0]).unwrap();
    let mut frame = Frame::filled(400, 400, GRAY);
    frame.data[4 * 1000] = 7;
    let before = frame.clone();
    composite_onto(&mut frame, &asset, Some(&half_scale_square())).unwrap();
    assert_eq!(frame, before);
}

#[test]
fn off_frame_parts_are_truncated() {
    let asset = HairstyleAsset::solid(100, 100, RED).unwrap();
    let mut frame = Frame::filled(64, 48, GRAY);
    let p = placement(Point::new(0.0, 0.0), 1.0, Point::new(50.0, 50.0));
    composite_onto(&mut frame, &asset, Some(&p)).unwrap();
    assert_eq!(frame.pixel(0, 0), Some(RED));
    assert_eq!(frame.pixel(48, 0), Some(RED));
    assert_eq!(frame.pixel(52, 0), Some(GRAY));
    assert_eq!(frame.data.len(), 64 * 48 * 4);

    let far = placement(Point::new(-500.0, -500.0), 1.0, Point::new(50.0, 50.0));
    let before = frame.clone();
    composite_onto(&mut frame, &asset, Some(&far)).unwrap();
    assert_eq!(frame, before);
}

#[test]
fn parallel_and_sequential_agree() {
    let mut px = Vec::new();
    for y in 0..64u32 {
        for x in 0..64u32 {
            px.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, 128, ((x + y) * 2) as u8]);
        }
    }
    let asset = HairstyleAsset::from_straight_rgba8(
        64,
        64,
        px,
        AssetAnchor::centered(64.0, 64.0),
    )
    .unwrap();
    let mut p = placement(Point::new(40.0, 30.0), 0.8, Point::new(32.0, 32.0));
    p.affine = Affine::translate((40.0, 30.0))
        * Affine::rotate(0.3)
        * Affine::scale(0.8)
        * Affine::translate((-32.0, -32.0));

    let mut a = Frame::filled(80, 60, GRAY);
    let mut b = a.clone();
    Compositor::default()
        .composite(&mut a, &asset, Some(&p))
        .unwrap();
    sequential().composite(&mut b, &asset, Some(&p)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, Frame::filled(80, 60, GRAY));
}

#[test]
fn strong_downscale_still_covers_centre() {
    let asset = HairstyleAsset::solid(400, 400, RED).unwrap();
    let mut frame = Frame::filled(200, 200, GRAY);
    let p = placement(Point::new(100.0, 100.0), 0.1, Point::new(200.0, 200.0));
    composite_onto(&mut frame, &asset, Some(&p)).unwrap();
    assert_eq!(frame.pixel(100, 100), Some(RED));
    assert_eq!(frame.pixel(10, 10), Some(GRAY));
}

#[test]
fn luminance_match_pulls_asset_toward_frame() {
    let asset = HairstyleAsset::solid(40, 40, [200, 200, 200, 255]).unwrap();
    let p = placement(Point::new(20.0, 20.0), 1.0, Point::new(20.0, 20.0));

    let mut plain = Frame::filled(40, 40, [50, 50, 50, 255]);
    composite_onto(&mut plain, &asset, Some(&p)).unwrap();
    assert_eq!(plain.pixel(20, 20), Some([200, 200, 200, 255]));

    let matched = Compositor::new(CompositeConfig {
        luminance_match: 1.0,
        ..CompositeConfig::default()
    });
    let mut frame = Frame::filled(40, 40, [50, 50, 50, 255]);
    matched.composite(&mut frame, &asset, Some(&p)).unwrap();
    let px = frame.pixel(20, 20).unwrap();
    assert!((i32::from(px[0]) - 50).abs() <= 1, "{px:?}");
}

#[test]
fn mismatched_frame_buffer_is_rejected() {
    let asset = HairstyleAsset::solid(4, 4, RED).unwrap();
    let mut frame = Frame::filled(4, 4, GRAY);
    frame.data.pop();
    let p = placement(Point::new(2.0, 2.0), 1.0, Point::new(2.0, 2.0));
    assert!(matches!(
        composite_onto(&mut frame, &asset, Some(&p)),
        Err(CoifError::Validation(_))
    ));
}

#[test]
fn mip_level_keeps_sampling_scale_near_native() {
    assert_eq!(mip_level(1.0), 0);
    assert_eq!(mip_level(0.5), 0);
    assert_eq!(mip_level(0.4), 1);
    assert_eq!(mip_level(0.25), 2);
    assert_eq!(mip_level(0.1), 3);
    assert_eq!(mip_level(0.0), 0);
    assert_eq!(mip_level(f64::NAN), 0);
}

#[test]
fn repeated_downscaled_frames_reuse_one_level() {
    let asset = HairstyleAsset::solid(400, 400, RED).unwrap();
    let p = placement(Point::new(100.0, 100.0), 0.1, Point::new(200.0, 200.0));

    let mut first = Frame::filled(200, 200, GRAY);
    composite_onto(&mut first, &asset, Some(&p)).unwrap();
    let level = asset.mip(3).unwrap() as *const _;

    let mut second = Frame::filled(200, 200, GRAY);
    composite_onto(&mut second, &asset, Some(&p)).unwrap();
    assert_eq!(first, second);
    assert!(std::ptr::eq(level, asset.mip(3).unwrap()));
    assert_eq!((asset.mip(3).unwrap().width, asset.mip(3).unwrap().height), (50, 50));
}
