use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::data_url::{decode_data_url, encode_base64, encode_data_url};
use crate::foundation::error::{InpaintError, InpaintResult};

/// Largest on-screen box the editor shows an image in by default.
pub const DEFAULT_DISPLAY_BOX: Canvas = Canvas {
    width: 800,
    height: 600,
};

/// Uploaded source image. Immutable once loaded; replace it by loading a new one.
///
/// The encoded bytes are kept as-is so they can be resubmitted without re-encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OriginalImage {
    bytes: Arc<Vec<u8>>,
    mime: String,
    natural: Canvas,
    displayed: Canvas,
}

impl OriginalImage {
    /// Detect the format and natural size of `bytes`. The image is shown fitted into
    /// [`DEFAULT_DISPLAY_BOX`] until [`Self::with_display_size`] says otherwise.
    pub fn from_bytes(bytes: Vec<u8>) -> InpaintResult<Self> {
        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .context("detect image format")?;
        let format = reader
            .format()
            .ok_or_else(|| InpaintError::validation("unrecognized image format"))?;
        let (width, height) = reader
            .into_dimensions()
            .context("read image dimensions")?;
        let natural = Canvas::new(width, height)?;

        Ok(Self {
            mime: format.to_mime_type().to_string(),
            displayed: fit_within(natural, DEFAULT_DISPLAY_BOX),
            natural,
            bytes: Arc::new(bytes),
        })
    }

    /// Load from a `data:` URL or bare base64.
    pub fn from_data_url(s: &str) -> InpaintResult<Self> {
        let (_, bytes) = decode_data_url(s)?;
        Self::from_bytes(bytes)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> InpaintResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub fn with_display_size(mut self, displayed: Canvas) -> Self {
        self.displayed = displayed;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn natural_size(&self) -> Canvas {
        self.natural
    }

    pub fn display_size(&self) -> Canvas {
        self.displayed
    }

    /// Bare base64 payload, as the inpainting endpoint expects it.
    pub fn base64(&self) -> String {
        encode_base64(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        encode_data_url(&self.mime, &self.bytes)
    }
}

/// Scale `natural` down (never up) to fit inside `bounds`, keeping the aspect ratio.
pub fn fit_within(natural: Canvas, bounds: Canvas) -> Canvas {
    let sx = f64::from(bounds.width) / f64::from(natural.width);
    let sy = f64::from(bounds.height) / f64::from(natural.height);
    let scale = sx.min(sy).min(1.0);
    let dim = |v: u32| -> u32 { ((f64::from(v) * scale).round() as u32).max(1) };
    Canvas {
        width: dim(natural.width),
        height: dim(natural.height),
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
