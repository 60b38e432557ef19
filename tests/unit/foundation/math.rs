use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn mul_div255_identities() {
    assert_eq!(mul_div255_u8(200, 255), 200);
    assert_eq!(mul_div255_u8(200, 0), 0);
}

#[test]
fn distance_is_euclidean() {
    let d = distance(kurbo::Point::new(0.0, 0.0), kurbo::Point::new(3.0, 4.0));
    assert!((d - 5.0).abs() < 1e-12);
}
