use super::*;

#[test]
fn frame_new_rejects_mismatched_buffer() {
    assert!(Frame::new(2, 2, vec![0u8; 16]).is_ok());
    assert!(Frame::new(2, 2, vec![0u8; 15]).is_err());
}

#[test]
fn frame_pixel_reads_row_major() {
    let mut f = Frame::filled(3, 2, [1, 2, 3, 255]);
    let idx = (3 + 2) * 4;
    f.data[idx..idx + 4].copy_from_slice(&[9, 8, 7, 6]);
    assert_eq!(f.pixel(2, 1), Some([9, 8, 7, 6]));
    assert_eq!(f.pixel(0, 0), Some([1, 2, 3, 255]));
    assert_eq!(f.pixel(3, 0), None);
    assert_eq!(f.pixel(0, 2), None);
}

#[test]
fn frame_image_roundtrip_keeps_bytes() {
    let f = Frame::filled(4, 3, [10, 20, 30, 255]);
    let img = f.clone().into_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(Frame::from_rgba_image(img), f);
}

#[test]
fn bounds_match_dimensions() {
    let f = Frame::filled(640, 480, [0, 0, 0, 255]);
    assert_eq!(f.bounds(), Rect::new(0.0, 0.0, 640.0, 480.0));
    assert!(!f.is_empty());
    assert!(Frame::filled(0, 4, [0; 4]).is_empty());
}
