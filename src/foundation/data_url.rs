use base64::{Engine as _, engine::general_purpose};

use crate::foundation::error::{InpaintError, InpaintResult};

/// Strip a `data:<mime>;base64,` prefix, returning the bare base64 payload.
///
/// Strings without a comma are returned unchanged.
pub fn strip_data_url_prefix(s: &str) -> &str {
    match s.split_once(',') {
        Some((_, payload)) => payload,
        None => s,
    }
}

/// Encode bytes as bare base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Encode bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", encode_base64(bytes))
}

/// Decode a `data:` URL (or bare base64) into its MIME type and bytes.
///
/// Bare payloads report `application/octet-stream`.
pub fn decode_data_url(s: &str) -> InpaintResult<(String, Vec<u8>)> {
    let (mime, payload) = match s.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((header, payload)) => {
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                InpaintError::validation("only base64 data URLs are supported")
            })?;
            (mime.to_string(), payload)
        }
        None => ("application/octet-stream".to_string(), s),
    };
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| InpaintError::validation(format!("invalid base64 payload: {e}")))?;
    Ok((mime, bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/data_url.rs"]
mod tests;
