use super::*;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn detects_natural_size_and_mime() {
    let img = OriginalImage::from_bytes(png(1000, 800)).unwrap();
    assert_eq!(img.natural_size(), Canvas::new(1000, 800).unwrap());
    assert_eq!(img.mime(), "image/png");
    assert_eq!(img.display_size(), Canvas::new(750, 600).unwrap());
}

#[test]
fn data_url_round_trip_keeps_bytes() {
    let img = OriginalImage::from_bytes(png(4, 3)).unwrap();
    let url = img.to_data_url();
    assert!(url.starts_with("data:image/png;base64,"));
    let again = OriginalImage::from_data_url(&url).unwrap();
    assert_eq!(again.bytes(), img.bytes());
    assert!(!img.base64().contains(','));
}

#[test]
fn rejects_garbage() {
    assert!(OriginalImage::from_bytes(b"not an image".to_vec()).is_err());
}

#[test]
fn fit_never_upscales() {
    let small = Canvas::new(100, 50).unwrap();
    assert_eq!(fit_within(small, DEFAULT_DISPLAY_BOX), small);
    let tall = Canvas::new(1000, 3000).unwrap();
    assert_eq!(
        fit_within(tall, DEFAULT_DISPLAY_BOX),
        Canvas::new(200, 600).unwrap()
    );
}
