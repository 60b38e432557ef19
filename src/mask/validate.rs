use crate::foundation::core::Canvas;
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::mask::synth::{MaskBuffer, MaskStats};

/// Gate that decides whether a mask may be submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskValidator {
    /// The white-pixel count must exceed this.
    pub min_white_pixels: u64,
}

impl Default for MaskValidator {
    fn default() -> Self {
        Self {
            min_white_pixels: 100,
        }
    }
}

impl MaskValidator {
    pub fn new(min_white_pixels: u64) -> Self {
        Self { min_white_pixels }
    }

    /// Validate `mask` against the source image's natural size.
    ///
    /// Returns the mask's pixel census on success. Any failure is a
    /// [`InpaintError::Validation`] carrying a user-facing message.
    pub fn validate(&self, mask: Option<&MaskBuffer>, natural: Canvas) -> InpaintResult<MaskStats> {
        let Some(mask) = mask else {
            return Err(InpaintError::validation(
                "No mask: paint or select the area you want to inpaint",
            ));
        };

        let size = mask.size();
        if size != natural {
            tracing::error!(mask = %size, natural = %natural, "mask dimensions do not match image");
            return Err(InpaintError::validation(format!(
                "Invalid mask: mask is {size} but the image is {natural}"
            )));
        }

        let stats = mask.stats();
        tracing::debug!(
            total = stats.total,
            white = stats.white,
            black = stats.black,
            white_pct = stats.white_percentage(),
            "mask validation"
        );
        if stats.white <= self.min_white_pixels {
            return Err(InpaintError::validation(format!(
                "Invalid mask: selection is empty or too small ({} white pixels, need more than {})",
                stats.white, self.min_white_pixels
            )));
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/validate.rs"]
mod tests;
