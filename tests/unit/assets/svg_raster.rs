use super::*;

const RECT: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20">
  <rect x="0" y="0" width="40" height="20" fill="#000000"/>
</svg>"##;

#[test]
fn longest_side_matches_max_dim() {
    let (w, h, px) = rasterize_svg(RECT, 100).unwrap();
    assert_eq!((w, h), (100, 50));
    assert_eq!(px.len(), 100 * 50 * 4);
    // Interior pixel is opaque black.
    let mid = ((25 * 100 + 50) * 4) as usize;
    assert_eq!(&px[mid..mid + 4], &[0, 0, 0, 255]);
}

#[test]
fn malformed_svg_is_asset_error() {
    let err = rasterize_svg(b"<svg", 64).unwrap_err();
    assert!(err.is_asset());
}
