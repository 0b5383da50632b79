use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CoifError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CoifError::decode("x").to_string().contains("decode error:"));
    assert!(CoifError::asset("x").to_string().contains("asset error:"));
    assert!(
        CoifError::detection("x")
            .to_string()
            .contains("detection error:")
    );
    assert!(
        CoifError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CoifError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn asset_errors_are_distinguishable() {
    assert!(CoifError::asset("missing").is_asset());
    assert!(!CoifError::detection("bad").is_asset());
    assert!(!CoifError::decode("bad").is_asset());
}
