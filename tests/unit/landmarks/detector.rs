use super::*;

#[test]
fn no_face_detector_returns_empty() {
    let frame = Frame::filled(4, 4, [0, 0, 0, 255]);
    assert!(NoFaceDetector.detect(&frame).unwrap().is_empty());
}

#[test]
fn static_detector_replays_landmarks() {
    let lm = vec![Landmark::new(0.1, 0.2), Landmark::new(0.3, 0.4)];
    let det = StaticDetector::new(CoordinateSpace::Normalized, lm.clone());
    let frame = Frame::filled(2, 2, [0, 0, 0, 255]);
    assert_eq!(det.detect(&frame).unwrap(), lm);
    assert_eq!(det.detect(&frame).unwrap(), lm);
    assert_eq!(det.coordinate_space(), CoordinateSpace::Normalized);
}

#[test]
fn static_detector_parses_json() {
    let json = r#"{ "space": "pixel", "landmarks": [[10, 20], [30, 40, 1.5]] }"#;
    let det = StaticDetector::from_reader(json.as_bytes()).unwrap();
    assert_eq!(det.coordinate_space(), CoordinateSpace::Pixel);
    assert_eq!(det.landmarks().len(), 2);
    assert_eq!(det.landmarks()[1].z, Some(1.5));
}

#[test]
fn static_detector_defaults_to_normalized() {
    let det = StaticDetector::from_reader(r#"{ "landmarks": [] }"#.as_bytes()).unwrap();
    assert_eq!(det.coordinate_space(), CoordinateSpace::Normalized);
}

#[test]
fn missing_landmark_file_is_detection_error() {
    let err = StaticDetector::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, CoifError::Detection(_)));
}
