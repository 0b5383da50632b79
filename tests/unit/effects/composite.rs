use super::*;

#[test]
fn transparent_source_is_identity() {
    let dst = [12, 34, 56, 255];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);

    let mut px = [1u8, 2, 3, 255];
    over_straight_in_place(&mut px, [0, 0, 0, 0]);
    assert_eq!(px, [1, 2, 3, 255]);
}

#[test]
fn opaque_source_replaces() {
    assert_eq!(over([9, 9, 9, 255], [200, 100, 50, 255]), [200, 100, 50, 255]);

    let mut px = [9u8, 9, 9, 255];
    over_straight_in_place(&mut px, [200, 100, 50, 255]);
    assert_eq!(px, [200, 100, 50, 255]);
}

#[test]
fn half_alpha_mixes_evenly_on_opaque_base() {
    // Straight white at alpha 128 is premultiplied to 128.
    let mut px = [0u8, 0, 0, 255];
    over_straight_in_place(&mut px, [128, 128, 128, 128]);
    assert_eq!(px, [128, 128, 128, 255]);

    let mut px = [200u8, 200, 200, 255];
    over_straight_in_place(&mut px, [0, 0, 0, 128]);
    // 200 * 127 / 255
    assert_eq!(px[0], 100);
    assert_eq!(px[3], 255);
}

#[test]
fn translucent_destination_roundtrips_through_premul() {
    let mut px = [255u8, 0, 0, 0];
    over_straight_in_place(&mut px, [0, 128, 0, 128]);
    assert_eq!(px, [0, 255, 0, 128]);
}

#[test]
fn premultiply_and_back() {
    assert_eq!(premultiply([255, 128, 0, 128]), [128, 64, 0, 128]);
    assert_eq!(unpremultiply([128, 64, 0, 128]), [255, 128, 0, 128]);
    assert_eq!(unpremultiply([7, 7, 7, 0]), [0, 0, 0, 0]);
}

#[test]
fn scale_color_stays_premultiplied() {
    assert_eq!(scale_color([100, 50, 10, 120], 2.0), [120, 100, 20, 120]);
    assert_eq!(scale_color([100, 50, 10, 120], 0.5), [50, 25, 5, 120]);
    assert_eq!(scale_color([100, 50, 10, 120], 1.0), [100, 50, 10, 120]);
}
