use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(200, 0), 0);
    assert_eq!(mul_div255_u8(200, 255), 200);
}

#[test]
fn luma_of_grey_is_grey() {
    assert!((luma(128, 128, 128) - 128.0).abs() < 1e-3);
    assert!((luma(255, 255, 255) - 255.0).abs() < 1e-3);
    assert_eq!(luma(0, 0, 0), 0.0);
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
}

#[test]
fn dist_is_euclidean() {
    let d = dist(kurbo::Point::new(1.0, 1.0), kurbo::Point::new(4.0, 5.0));
    assert!((d - 5.0).abs() < 1e-12);
}
