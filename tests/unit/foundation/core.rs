use super::*;

#[test]
fn canvas_rejects_empty_axes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(3, 4).unwrap().pixel_count(), 12);
}

#[test]
fn display_size_rounds_and_keeps_one_pixel() {
    let c = Canvas::from_display_size(799.6, 0.2).unwrap();
    assert_eq!(c, Canvas { width: 800, height: 1 });
    assert!(Canvas::from_display_size(-1.0, 10.0).is_err());
    assert!(Canvas::from_display_size(f64::NAN, 10.0).is_err());
}

#[test]
fn contains_is_half_open() {
    let c = Canvas::new(2, 2).unwrap();
    assert!(c.contains(1, 1));
    assert!(!c.contains(2, 0));
    assert!(!c.contains(0, 2));
}

#[test]
fn cyan_opacity_matches_css_alpha() {
    assert_eq!(Rgba8::cyan(0.8), Rgba8::new(0, 255, 255, 204));
    assert_eq!(Rgba8::cyan(0.3), Rgba8::new(0, 255, 255, 77));
    assert_eq!(Rgba8::cyan(2.0).a, 255);
}
