use super::*;

#[test]
fn defaults_validate() {
    EngineConfig::default().validate().unwrap();
}

#[test]
fn empty_json_object_is_default() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn partial_section_keeps_other_defaults() {
    let cfg = EngineConfig::from_json_str(r#"{ "placement": { "width_ratio": 1.8 } }"#).unwrap();
    assert_eq!(cfg.placement.width_ratio, 1.8);
    assert_eq!(cfg.placement.max_base_scale, PlacementConfig::default().max_base_scale);
    assert_eq!(cfg.pose, PoseConfig::default());
}

#[test]
fn json_roundtrip_preserves_values() {
    let mut cfg = EngineConfig::default();
    cfg.session.max_sessions = 7;
    cfg.assets.fallback_dirs = vec!["custom".into(), "shared".into()];
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(EngineConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn malformed_json_is_serde_error() {
    let err = EngineConfig::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, CoifError::Serde(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let bad = [
        r#"{ "placement": { "width_ratio": 0.0 } }"#,
        r#"{ "placement": { "min_base_scale": 2.0, "max_base_scale": 1.0 } }"#,
        r#"{ "pose": { "face_width_pair": [5, 5] } }"#,
        r#"{ "pose": { "anchor_indices": [] } }"#,
        r#"{ "composite": { "jpeg_quality": 0 } }"#,
        r#"{ "composite": { "luminance_match": 1.5 } }"#,
        r#"{ "session": { "max_sessions": 0 } }"#,
    ];
    for json in bad {
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, CoifError::Validation(_)), "{json}");
    }
}

#[test]
fn required_landmarks_covers_highest_index() {
    assert_eq!(PoseConfig::default().required_landmarks(), 455);

    let pose = PoseConfig {
        anchor_indices: vec![3, 470],
        ..PoseConfig::default()
    };
    assert_eq!(pose.required_landmarks(), 471);
}

#[test]
fn session_durations() {
    let s = SessionConfig::default();
    assert_eq!(s.idle_ttl(), Duration::from_secs(1800));
    assert_eq!(s.sweep_interval(), Duration::from_secs(60));
}
