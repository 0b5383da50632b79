use super::*;

#[test]
fn normalize_rel_path_accepts_and_cleans() {
    assert_eq!(normalize_rel_path("male/fade.png").unwrap(), "male/fade.png");
    assert_eq!(normalize_rel_path("./male//fade.png").unwrap(), "male/fade.png");
    assert_eq!(normalize_rel_path("male\\fade.png").unwrap(), "male/fade.png");
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    for bad in ["", "  ", "/etc/passwd", "../secret.png", "a/../../b.png", "C:/x.png", "./."] {
        let err = normalize_rel_path(bad).unwrap_err();
        assert!(matches!(err, CoifError::Validation(_)), "{bad:?}");
    }
}

#[test]
fn asset_extensions_are_case_insensitive() {
    assert!(has_asset_extension(Path::new("a/B.PNG")));
    assert!(has_asset_extension(Path::new("x.svg")));
    assert!(!has_asset_extension(Path::new("x.anchor.json")));
    assert!(!has_asset_extension(Path::new("README")));
}

#[test]
fn memory_provider_roundtrip() {
    let provider = MemoryAssetProvider::new();
    provider
        .insert("./female/bob.png", HairstyleAsset::solid(4, 2, [1, 2, 3, 255]).unwrap())
        .unwrap();
    let asset = provider.load("female/bob.png").unwrap();
    assert_eq!((asset.width, asset.height), (4, 2));

    let err = provider.load("female/none.png").unwrap_err();
    assert!(err.is_asset());
}

#[test]
fn dir_provider_reports_missing_asset() {
    let provider = DirAssetProvider::with_root(std::env::temp_dir().join("coif_no_such_root"));
    let err = provider.load("male/fade.png").unwrap_err();
    assert!(err.is_asset());
    assert_eq!(provider.cached_len(), 0);
}
