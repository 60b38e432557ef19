use super::*;

const CYAN: [u8; 4] = [0, 255, 255, 204];

fn overlay(w: u32, h: u32) -> RgbaImage {
    RgbaImage::new(w, h)
}

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn mask_has_natural_dimensions_regardless_of_overlay_size() {
    let synth = MaskSynthesizer::default();
    for (ow, oh) in [(100, 80), (333, 17), (1000, 800), (1, 1)] {
        let mask = synth.synthesize(&overlay(ow, oh), canvas(1000, 800)).unwrap();
        assert_eq!(mask.size(), canvas(1000, 800));
    }
}

#[test]
fn every_pixel_is_pure_black_or_white() {
    let mut o = overlay(7, 5);
    // Mixed content: marker, anti-aliased edge, erased remnant, foreign color.
    o.put_pixel(0, 0, image::Rgba(CYAN));
    o.put_pixel(1, 0, image::Rgba([0, 255, 255, 40]));
    o.put_pixel(2, 0, image::Rgba([20, 160, 170, 90]));
    o.put_pixel(3, 0, image::Rgba([255, 255, 255, 255]));
    let mask = MaskSynthesizer::default()
        .synthesize(&o, canvas(23, 11))
        .unwrap();
    for px in mask.as_image().as_raw().chunks_exact(4) {
        assert!(px == [0, 0, 0, 255] || px == [255, 255, 255, 255], "{px:?}");
    }
}

#[test]
fn upscaling_uses_nearest_neighbour() {
    let mut o = overlay(2, 2);
    o.put_pixel(1, 0, image::Rgba(CYAN));
    let mask = MaskSynthesizer::default()
        .synthesize(&o, canvas(4, 4))
        .unwrap();
    let stats = mask.stats();
    assert_eq!(stats.white, 4);
    assert_eq!(mask.pixel(2, 0), Rgba8::WHITE);
    assert_eq!(mask.pixel(3, 1), Rgba8::WHITE);
    assert_eq!(mask.pixel(1, 0), Rgba8::BLACK);
    assert_eq!(mask.pixel(2, 2), Rgba8::BLACK);
}

#[test]
fn downscaling_samples_floor_of_scaled_coordinate() {
    let mut o = overlay(4, 1);
    o.put_pixel(2, 0, image::Rgba(CYAN));
    let mask = MaskSynthesizer::default()
        .synthesize(&o, canvas(2, 1))
        .unwrap();
    // out x=1 -> overlay x = floor(1 / 0.5) = 2.
    assert_eq!(mask.pixel(0, 0), Rgba8::BLACK);
    assert_eq!(mask.pixel(1, 0), Rgba8::WHITE);
}

#[test]
fn synthesis_is_idempotent() {
    let mut o = overlay(50, 40);
    for x in 10..30 {
        for y in 5..25 {
            o.put_pixel(x, y, image::Rgba(CYAN));
        }
    }
    let synth = MaskSynthesizer::default();
    let a = synth.synthesize(&o, canvas(123, 97)).unwrap();
    let b = synth.synthesize(&o, canvas(123, 97)).unwrap();
    assert_eq!(a.as_image().as_raw(), b.as_image().as_raw());
}

#[test]
fn empty_overlay_or_natural_size_is_rejected() {
    let synth = MaskSynthesizer::default();
    assert!(synth.synthesize(&overlay(0, 4), canvas(4, 4)).is_err());
    assert!(
        synth
            .synthesize(&overlay(4, 4), Canvas { width: 0, height: 4 })
            .is_err()
    );
}

#[test]
fn png_encoding_decodes_back_to_a_valid_mask() {
    let mut o = overlay(3, 3);
    o.put_pixel(1, 1, image::Rgba(CYAN));
    let mask = MaskSynthesizer::default()
        .synthesize(&o, canvas(3, 3))
        .unwrap();
    let decoded = MaskBuffer::decode(&mask.to_png().unwrap()).unwrap();
    assert_eq!(decoded, mask);
    assert!(mask.to_data_url().unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn from_image_rejects_gray_pixels() {
    let img = RgbaImage::from_pixel(2, 2, image::Rgba([128, 128, 128, 255]));
    assert!(MaskBuffer::from_image(img).is_err());
}

#[test]
fn stats_report_percentage() {
    let mut img = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
    img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
    let stats = MaskBuffer::from_image(img).unwrap().stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.white, 1);
    assert_eq!(stats.black, 3);
    assert!((stats.white_percentage() - 25.0).abs() < 1e-9);
}
