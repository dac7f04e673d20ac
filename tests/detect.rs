use helmet_detect::{Error, HelmetDetector, PlaceholderDetector};
use image::RgbImage;

fn corners(image: &RgbImage) -> (u32, u32, u32, u32) {
    let result = PlaceholderDetector::new().detect(image).unwrap();
    let bbox = &result.boxes()[0];
    (bbox.x1(), bbox.y1(), bbox.x2(), bbox.y2())
}

#[test]
fn wide_image_gets_centered_box() {
    let image = RgbImage::new(200, 100);
    let result = PlaceholderDetector::new().detect(&image).unwrap();

    assert_eq!(result.label(), "Wearing Helmet");
    assert_eq!(result.confidence(), 92.0);
    assert_eq!(result.boxes().len(), 1);

    let bbox = &result.boxes()[0];
    assert_eq!((bbox.x1(), bbox.y1(), bbox.x2(), bbox.y2()), (75, 25, 125, 75));
    assert_eq!(bbox.label(), "helmet");
    assert_eq!(bbox.score(), 0.92);
}

#[test]
fn small_square_image() {
    // size = 5, cx = cy = 5, x1 = 5 - 2
    assert_eq!(corners(&RgbImage::new(10, 10)), (3, 3, 8, 8));
}

#[test]
fn box_stays_inside_and_centered_for_all_sizes() {
    for width in 1..=64 {
        for height in 1..=64 {
            let image = RgbImage::new(width, height);
            let result = PlaceholderDetector::new().detect(&image).unwrap();
            assert_eq!(result.boxes().len(), 1);
            let bbox = &result.boxes()[0];
            let (x1, y1, x2, y2) = (bbox.x1(), bbox.y1(), bbox.x2(), bbox.y2());
            assert!(x1 <= x2 && x2 < width, "{}x{}: x {}..{}", width, height, x1, x2);
            assert!(y1 <= y2 && y2 < height, "{}x{}: y {}..{}", width, height, y1, y2);

            let (cx, cy) = bbox.center();
            assert!((cx - width as f32 / 2.0).abs() <= 1.0, "{}x{}: cx {}", width, height, cx);
            assert!((cy - height as f32 / 2.0).abs() <= 1.0, "{}x{}: cy {}", width, height, cy);
        }
    }
}

#[test]
fn large_image() {
    assert_eq!(corners(&RgbImage::new(1920, 1080)), (690, 270, 1230, 810));
}

#[test]
fn detection_is_deterministic() {
    let detector = PlaceholderDetector::new();
    let image = RgbImage::from_fn(33, 17, |x, y| image::Rgb([x as u8, y as u8, 7]));
    assert_eq!(detector.detect(&image).unwrap(), detector.detect(&image).unwrap());

    // 只与尺寸有关，与像素内容无关
    let blank = RgbImage::new(33, 17);
    assert_eq!(detector.detect(&image).unwrap(), detector.detect(&blank).unwrap());
}

#[test]
fn zero_area_image_is_rejected() {
    let detector = PlaceholderDetector::new();
    assert!(matches!(
        detector.detect(&RgbImage::new(0, 10)),
        Err(Error::InvalidImage { width: 0, height: 10 })
    ));
    assert!(matches!(
        detector.detect(&RgbImage::new(10, 0)),
        Err(Error::InvalidImage { width: 10, height: 0 })
    ));
}

#[test]
fn raw_metadata_marks_placeholder() {
    let result = PlaceholderDetector::new().detect(&RgbImage::new(4, 4)).unwrap();
    assert_eq!(result.raw()["detector"], "placeholder");
    assert!(result.raw()["note"].as_str().unwrap().contains("dummy"));
}

#[test]
fn custom_decision_is_carried_through() {
    let detector = PlaceholderDetector::new()
        .with_label("No Helmet")
        .with_confidence(12.5);
    let result = detector.detect(&RgbImage::new(50, 50)).unwrap();
    assert_eq!(result.label(), "No Helmet");
    assert_eq!(result.confidence(), 12.5);
    assert_eq!(result.boxes()[0].score(), 0.125);
    // 类别标签固定为 helmet，与整体判定无关
    assert_eq!(result.boxes()[0].label(), "helmet");
}
