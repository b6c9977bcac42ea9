// tests/test_grid.rs - Interrogation grid generation and its configuration.
//
// Run with `cargo test --test test_grid`.

use piv_image::{generate_cartesian_grid, Error, GridOptions, Image, Point, Rect, Size, G8};

#[test]
fn grid_covers_image_with_contained_windows() {
    let image = Size::new(100, 100);
    let rects = generate_cartesian_grid(image, Size::new(20, 20), 0.5).unwrap();
    assert!(!rects.is_empty());

    let bounds = Rect::from_size(image);
    assert!(rects.iter().all(|r| r.within(&bounds)));
    assert!(rects.iter().all(|r| r.size == Size::new(20, 20)));

    // 1 + (100 - 20) / 10 = 9 on each axis
    assert_eq!(rects.len(), 81);
    assert_eq!(rects[0].origin, Point::new(0, 0));
    assert_eq!(rects[80].top_right(), Point::new(100, 100));
}

#[test]
fn grid_uses_image_size() {
    let img: Image<G8> = Image::new(64, 48);
    let rects = generate_cartesian_grid(img.size(), Size::new(32, 16), 0.5).unwrap();
    // x: 1 + 32 / 16 = 3, y: 1 + 32 / 8 = 5
    assert_eq!(rects.len(), 15);
    for rect in &rects {
        let window = img.view(*rect).unwrap();
        assert_eq!(window.size(), Size::new(32, 16));
    }
}

#[test]
fn grid_rejects_invalid_input() {
    let image = Size::new(100, 100);
    assert_eq!(
        generate_cartesian_grid(image, Size::new(200, 20), 0.5),
        Err(Error::WindowTooLarge {
            window: Size::new(200, 20),
            image,
        })
    );
    let err = generate_cartesian_grid(Size::default(), Size::new(20, 20), 0.5).unwrap_err();
    assert!(err.to_string().contains("image size must be non-zero"));
    let err = generate_cartesian_grid(image, Size::new(20, 20), 2.0).unwrap_err();
    assert!(err.to_string().contains("between 0.0 and 1.0"));
    let err = generate_cartesian_grid(image, Size::new(20, 20), 0.0).unwrap_err();
    assert!(matches!(err, Error::ZeroOverlap { .. }));
}

#[test]
fn grid_options_from_json() {
    let opts: GridOptions =
        serde_json::from_str(r#"{ "window": { "width": 20, "height": 20 }, "overlap": 0.5 }"#)
            .unwrap();
    assert_eq!(opts, GridOptions::new(Size::new(20, 20)).with_overlap(0.5));
    assert_eq!(opts.generate(Size::new(100, 100)).unwrap().len(), 81);

    let defaulted: GridOptions =
        serde_json::from_str(r#"{ "window": { "width": 16, "height": 8 } }"#).unwrap();
    assert_eq!(defaulted.overlap, 0.5);

    let json = serde_json::to_string(&opts).unwrap();
    let back: GridOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, opts);
}

#[test]
fn rect_serializes_as_origin_and_size() {
    let rect = Rect::new(Point::new(1, 1), Size::new(20, 20));
    let value = serde_json::to_value(rect).unwrap();
    assert_eq!(value["origin"]["x"], 1);
    assert_eq!(value["size"]["width"], 20);
    assert_eq!(rect.to_string(), "(1,1) -> [20,20]");
}
