use super::*;

#[test]
fn normalized_ingest_scales_by_frame_size() {
    let raw = vec![Landmark::new(0.5, 0.25), Landmark::with_depth(1.0, 1.0, -0.1)];
    let set = LandmarkSet::ingest(raw, CoordinateSpace::Normalized, 640, 480);
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0).unwrap().point(), Point::new(320.0, 120.0));
    let p = set.get(1).unwrap();
    assert_eq!((p.x, p.y), (640.0, 480.0));
    assert!((p.z.unwrap() + 64.0).abs() < 1e-9);
}

#[test]
fn pixel_ingest_is_untouched() {
    let raw = vec![Landmark::new(12.0, 34.0)];
    let set = LandmarkSet::ingest(raw.clone(), CoordinateSpace::Pixel, 640, 480);
    assert_eq!(set.points(), raw.as_slice());
}

#[test]
fn empty_set_has_no_centroid() {
    let set = LandmarkSet::empty();
    assert!(set.is_empty());
    assert_eq!(set.centroid(), None);
    assert!(!set.has_depth());
}

#[test]
fn centroid_and_zoom() {
    let set = LandmarkSet::from_pixels(vec![Landmark::new(0.0, 0.0), Landmark::new(10.0, 20.0)]);
    assert_eq!(set.centroid(), Some(Point::new(5.0, 10.0)));
    let zoomed = set.scaled(2.0);
    assert_eq!(zoomed.centroid(), Some(Point::new(10.0, 20.0)));
}

#[test]
fn finiteness_and_depth_flags() {
    let set = LandmarkSet::from_pixels(vec![
        Landmark::with_depth(1.0, 2.0, 3.0),
        Landmark::with_depth(4.0, 5.0, 6.0),
    ]);
    assert!(set.has_depth());
    assert!(set.is_finite());

    let bad = LandmarkSet::from_pixels(vec![Landmark::new(f64::NAN, 1.0)]);
    assert!(!bad.is_finite());
}

#[test]
fn landmark_deserializes_from_arrays_and_objects() {
    let v: Vec<Landmark> =
        serde_json::from_str(r#"[[1, 2], [3, 4, 5], {"x": 6, "y": 7}, {"x": 8, "y": 9, "z": 1}]"#)
            .unwrap();
    assert_eq!(v[0], Landmark::new(1.0, 2.0));
    assert_eq!(v[1], Landmark::with_depth(3.0, 4.0, 5.0));
    assert_eq!(v[2], Landmark::new(6.0, 7.0));
    assert_eq!(v[3], Landmark::with_depth(8.0, 9.0, 1.0));

    assert!(serde_json::from_str::<Landmark>("[1]").is_err());
}
