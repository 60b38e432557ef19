use super::*;
use image::RgbaImage;

fn mask_with_white(w: u32, h: u32, white: u32) -> MaskBuffer {
    let mut img = RgbaImage::from_pixel(w, h, image::Rgba([0, 0, 0, 255]));
    for i in 0..white {
        img.put_pixel(i % w, i / w, image::Rgba([255, 255, 255, 255]));
    }
    MaskBuffer::from_image(img).unwrap()
}

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn missing_mask_is_rejected() {
    let err = MaskValidator::default()
        .validate(None, canvas(10, 10))
        .unwrap_err();
    assert!(matches!(err, InpaintError::Validation(_)));
}

#[test]
fn dimension_mismatch_is_rejected() {
    let mask = mask_with_white(20, 20, 300);
    assert!(
        MaskValidator::default()
            .validate(Some(&mask), canvas(20, 21))
            .is_err()
    );
}

#[test]
fn fewer_than_threshold_white_pixels_is_rejected_at_any_size() {
    let v = MaskValidator::default();
    for (w, h) in [(10, 10), (100, 100), (1000, 50)] {
        let mask = mask_with_white(w, h, 99);
        assert!(v.validate(Some(&mask), canvas(w, h)).is_err());
    }
}

#[test]
fn threshold_is_exclusive() {
    let v = MaskValidator::default();
    assert!(
        v.validate(Some(&mask_with_white(50, 50, 100)), canvas(50, 50))
            .is_err()
    );
    let stats = v
        .validate(Some(&mask_with_white(50, 50, 101)), canvas(50, 50))
        .unwrap();
    assert_eq!(stats.white, 101);
}
