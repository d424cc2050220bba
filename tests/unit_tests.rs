use class2yolo::annotation::{parse_annotation_line, read_annotation_file, to_yolo_lines};
use class2yolo::conversion::write_label_file;
use class2yolo::{
    create_dataset_yaml, BoundingBox, DatasetError, LabelLookup, LabelWriteMode, UNKNOWN_TOKEN,
};
use std::fs;
use std::path::Path;

fn bbox(label: &str, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> BoundingBox {
    BoundingBox {
        label: label.to_string(),
        x_min,
        y_min,
        x_max,
        y_max,
    }
}

#[test]
fn test_lookup_add_is_idempotent() {
    let mut lookup = LabelLookup::new(false);
    lookup.add("Cat");
    lookup.add("Dog");
    lookup.add("Cat");
    lookup.add("Fast food");

    assert_eq!(lookup.size(), 3);
    assert_eq!(lookup.index_of("Cat").unwrap(), 0);
    assert_eq!(lookup.index_of("Dog").unwrap(), 1);
    assert_eq!(lookup.index_of("Fast food").unwrap(), 2);
    assert_eq!(
        lookup.labels(),
        vec![("Cat", 0), ("Dog", 1), ("Fast food", 2)]
    );
    assert_eq!(lookup.label_at(1), Some("Dog"));
    assert_eq!(lookup.label_at(3), None);
}

#[test]
fn test_lookup_unknown_label() {
    let mut lookup = LabelLookup::new(false);
    lookup.add("Cat");
    match lookup.index_of("Dog") {
        Err(DatasetError::KeyNotFound { kind, key }) => {
            assert_eq!(kind, "label");
            assert_eq!(key, "Dog");
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
}

#[test]
fn test_lookup_with_unknown_token() {
    let mut lookup = LabelLookup::new(true);
    assert!(lookup.has_unknown_token());
    assert_eq!(lookup.size(), 1);

    lookup.add("Cat");
    lookup.add("Dog");

    assert_eq!(lookup.size(), 3);
    assert_eq!(lookup.index_of(UNKNOWN_TOKEN).unwrap(), 0);
    assert_eq!(lookup.index_of("Cat").unwrap(), 1);
    assert_eq!(lookup.index_of("Dog").unwrap(), 2);
    assert_eq!(lookup.index_of("Zebra").unwrap(), 0);
    assert!(!lookup.contains("Zebra"));
}

#[test]
fn test_parse_multi_word_label() {
    let parsed = parse_annotation_line("Fast  food 1 2.5 30 40", Path::new("a.txt"), 1)
        .unwrap()
        .unwrap();
    assert_eq!(parsed, bbox("Fast food", 1.0, 2.5, 30.0, 40.0));
}

#[test]
fn test_parse_blank_line() {
    assert!(parse_annotation_line("   ", Path::new("a.txt"), 1)
        .unwrap()
        .is_none());
}

#[test]
fn test_parse_rejects_malformed_lines() {
    let path = Path::new("a.txt");
    match parse_annotation_line("10 10 60 40", path, 3) {
        Err(DatasetError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected Parse error, got {:?}", other),
    }
    assert!(matches!(
        parse_annotation_line("Cat 10 ten 60 40", path, 1),
        Err(DatasetError::Parse { .. })
    ));
}

#[test]
fn test_read_annotation_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("img001.txt");
    fs::write(&path, "Cat 10 10 60 40\n\nFast food 0 0 5 5\n").unwrap();

    let boxes = read_annotation_file(&path).unwrap();
    assert_eq!(
        boxes,
        vec![
            bbox("Cat", 10.0, 10.0, 60.0, 40.0),
            bbox("Fast food", 0.0, 0.0, 5.0, 5.0)
        ]
    );

    let empty = temp_dir.path().join("empty.txt");
    fs::write(&empty, "").unwrap();
    assert!(read_annotation_file(&empty).unwrap().is_empty());

    let missing = temp_dir.path().join("missing.txt");
    assert!(matches!(
        read_annotation_file(&missing),
        Err(DatasetError::SampleNotFound { .. })
    ));
}

#[test]
fn test_to_yolo() {
    let yolo = bbox("Cat", 10.0, 10.0, 60.0, 40.0).to_yolo(0, 100, 50);

    assert_eq!(yolo.class_id, 0);
    assert_eq!(yolo.x_center, 0.35);
    assert_eq!(yolo.y_center, 0.5);
    assert_eq!(yolo.width, 0.5);
    assert_eq!(yolo.height, 0.6);
    assert_eq!(to_yolo_lines(&[yolo]), "0 0.35 0.5 0.5 0.6\n");

    // whole numbers are written without a fractional part
    let full_frame = bbox("Cat", 0.0, 0.0, 10.0, 10.0).to_yolo(0, 10, 10);
    assert_eq!(to_yolo_lines(&[full_frame]), "0 0.5 0.5 1 1\n");
}

#[test]
fn test_yolo_round_trip_geometry() {
    let cases = [
        (bbox("a", 10.0, 10.0, 60.0, 40.0), 100, 50),
        (bbox("b", 0.0, 0.0, 640.0, 480.0), 640, 480),
        (bbox("c", 13.7, 200.25, 99.1, 311.9), 1920, 1080),
        (bbox("d", 1.0, 1.0, 2.0, 3.0), 7, 3),
    ];

    for (original, width, height) in cases {
        let (x_min, y_min, x_max, y_max) = original
            .to_yolo(4, width, height)
            .to_pixel_corners(width, height);
        assert!((x_min - original.x_min).abs() < 1e-9);
        assert!((y_min - original.y_min).abs() < 1e-9);
        assert!((x_max - original.x_max).abs() < 1e-9);
        assert!((y_max - original.y_max).abs() < 1e-9);
    }
}

#[test]
fn test_write_label_file_modes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("img001.txt");
    let boxes = [bbox("Cat", 10.0, 10.0, 60.0, 40.0).to_yolo(0, 100, 50)];

    assert_eq!(LabelWriteMode::default(), LabelWriteMode::Append);

    write_label_file(&path, &boxes, LabelWriteMode::Append).unwrap();
    write_label_file(&path, &boxes, LabelWriteMode::Append).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0 0.35 0.5 0.5 0.6\n0 0.35 0.5 0.5 0.6\n"
    );

    write_label_file(&path, &boxes, LabelWriteMode::Truncate).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "0 0.35 0.5 0.5 0.6\n");

    let empty = temp_dir.path().join("empty.txt");
    write_label_file(&empty, &[], LabelWriteMode::Append).unwrap();
    assert_eq!(fs::read_to_string(&empty).unwrap(), "");
}

#[test]
fn test_create_dataset_yaml() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut lookup = LabelLookup::new(false);
    lookup.add("Cat");
    lookup.add("Fast food");

    let yaml_path = create_dataset_yaml(temp_dir.path(), ["test", "train"], &lookup).unwrap();
    let yaml_content = fs::read_to_string(yaml_path).unwrap();

    assert!(yaml_content.starts_with("path: "));
    assert!(yaml_content.contains("test: test/images\n"));
    assert!(yaml_content.contains("train: train/images\n"));
    assert!(yaml_content.contains("names:\n"));
    assert!(yaml_content.contains("    0: Cat\n"));
    assert!(yaml_content.contains("    1: Fast food\n"));
}
