use super::*;

#[test]
fn strip_removes_prefix_and_keeps_bare_payload() {
    assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), "AAAA");
    assert_eq!(strip_data_url_prefix("AAAA"), "AAAA");
}

#[test]
fn data_url_decodes_mime_and_bytes() {
    let url = encode_data_url("image/png", &[1, 2, 3]);
    assert!(url.starts_with("data:image/png;base64,"));
    let (mime, bytes) = decode_data_url(&url).unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[test]
fn bare_base64_is_octet_stream() {
    let (mime, bytes) = decode_data_url(&encode_base64(b"hi")).unwrap();
    assert_eq!(mime, "application/octet-stream");
    assert_eq!(bytes, b"hi");
}

#[test]
fn non_base64_data_url_is_rejected() {
    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("data:image/png;base64,@@@").is_err());
}
