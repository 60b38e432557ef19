use super::*;

fn class(r: u8, g: u8, b: u8, a: u8) -> PixelClass {
    classify(Rgba8::new(r, g, b, a), &CyanThresholds::default())
}

#[test]
fn marker_fills_are_marked() {
    assert_eq!(class(0, 255, 255, 204), PixelClass::Marked);
    assert_eq!(class(0, 255, 255, 77), PixelClass::Marked);
}

#[test]
fn thresholds_are_strict() {
    assert_eq!(class(0, 255, 255, 50), PixelClass::Unmarked);
    assert_eq!(class(0, 255, 255, 51), PixelClass::Marked);
    assert_eq!(class(0, 150, 255, 255), PixelClass::Unmarked);
    assert_eq!(class(0, 255, 150, 255), PixelClass::Unmarked);
    assert_eq!(class(150, 255, 255, 255), PixelClass::Unmarked);
    assert_eq!(class(149, 151, 151, 255), PixelClass::Marked);
}

#[test]
fn transparent_white_and_black_are_unmarked() {
    assert_eq!(class(0, 0, 0, 0), PixelClass::Unmarked);
    assert_eq!(class(255, 255, 255, 255), PixelClass::Unmarked);
    assert_eq!(class(0, 0, 0, 255), PixelClass::Unmarked);
}

#[test]
fn custom_thresholds_apply() {
    let t = CyanThresholds {
        min_alpha: 200,
        ..CyanThresholds::default()
    };
    assert_eq!(
        classify(Rgba8::new(0, 255, 255, 77), &t),
        PixelClass::Unmarked
    );
}

#[test]
fn mask_colors_are_pure() {
    assert_eq!(PixelClass::Marked.mask_color(), Rgba8::WHITE);
    assert_eq!(PixelClass::Unmarked.mask_color(), Rgba8::BLACK);
}
