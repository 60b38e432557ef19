use crate::foundation::core::Rgba8;

/// Thresholds of the marker-color detector.
///
/// Defaults accept the cyan marker including anti-aliased and partially erased edges.
/// All comparisons are strict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CyanThresholds {
    /// Alpha must be greater than this.
    pub min_alpha: u8,
    /// Green must be greater than this.
    pub min_green: u8,
    /// Blue must be greater than this.
    pub min_blue: u8,
    /// Red must be less than this.
    pub max_red: u8,
}

impl Default for CyanThresholds {
    fn default() -> Self {
        Self {
            min_alpha: 50,
            min_green: 150,
            min_blue: 150,
            max_red: 150,
        }
    }
}

/// Classification of a single overlay pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Selected for inpainting (white in the mask).
    Marked,
    /// Preserved (black in the mask).
    Unmarked,
}

impl PixelClass {
    /// Mask color for this class.
    pub fn mask_color(self) -> Rgba8 {
        match self {
            Self::Marked => Rgba8::WHITE,
            Self::Unmarked => Rgba8::BLACK,
        }
    }
}

/// Classify a straight-alpha overlay pixel.
pub fn classify(px: Rgba8, thresholds: &CyanThresholds) -> PixelClass {
    let marked = px.a > thresholds.min_alpha
        && px.g > thresholds.min_green
        && px.b > thresholds.min_blue
        && px.r < thresholds.max_red;
    if marked {
        PixelClass::Marked
    } else {
        PixelClass::Unmarked
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/classify.rs"]
mod tests;
