use super::*;

#[test]
fn mip_chain_halves_down_to_one_pixel() {
    let asset = HairstyleAsset::solid(400, 100, [220, 20, 20, 255]).unwrap();
    assert!(asset.mip(0).is_none());

    let sizes: Vec<_> = (1..=10)
        .map(|l| {
            let m = asset.mip(l).unwrap();
            (m.width, m.height)
        })
        .collect();
    assert_eq!(
        sizes,
        vec![
            (200, 50),
            (100, 25),
            (50, 12),
            (25, 6),
            (12, 3),
            (6, 1),
            (3, 1),
            (1, 1),
            (1, 1),
            (1, 1),
        ]
    );

    let m = asset.mip(2).unwrap();
    assert_eq!(m.rgba8_premul.len(), 100 * 25 * 4);
    assert_eq!(&m.rgba8_premul[..4], &[220, 20, 20, 255]);
}

#[test]
fn mip_chain_is_built_once_and_shared_by_clones() {
    let asset = HairstyleAsset::solid(64, 64, [0, 0, 0, 255]).unwrap();
    let copy = asset.clone();
    let a = asset.mip(2).unwrap();
    let b = copy.mip(2).unwrap();
    assert!(std::ptr::eq(a, b));
    assert!(std::ptr::eq(a, asset.mip(2).unwrap()));
}

#[test]
fn single_pixel_asset_has_no_mips() {
    let asset = HairstyleAsset::solid(1, 1, [0, 0, 0, 255]).unwrap();
    assert!(asset.mip(1).is_none());
    assert!(asset.mip(5).is_none());
}

#[test]
fn zero_area_and_short_buffers_are_rejected() {
    let anchor = AssetAnchor::centered(2.0, 2.0);
    assert!(HairstyleAsset::from_premul_rgba8(0, 2, vec![], anchor, MaskSource::Alpha).is_err());
    assert!(
        HairstyleAsset::from_premul_rgba8(2, 2, vec![0; 15], anchor, MaskSource::Alpha)
            .unwrap_err()
            .is_asset()
    );
}
