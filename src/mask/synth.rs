use std::io::Cursor;

use anyhow::Context;
use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::data_url::encode_data_url;
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::mask::classify::{CyanThresholds, PixelClass, classify};

/// Binary inpainting mask at the source image's natural resolution.
///
/// Every pixel is exactly opaque black (preserve) or opaque white (inpaint).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskBuffer {
    image: RgbaImage,
}

/// Pixel census of a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskStats {
    pub total: u64,
    pub white: u64,
    pub black: u64,
}

impl MaskStats {
    pub fn white_percentage(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.white as f64 / self.total as f64) * 100.0
    }
}

impl MaskBuffer {
    /// All-black mask of the given size.
    pub fn black(size: Canvas) -> Self {
        Self {
            image: RgbaImage::from_pixel(
                size.width,
                size.height,
                image::Rgba(Rgba8::BLACK.to_array()),
            ),
        }
    }

    /// Adopt an RGBA image, rejecting any pixel that is not pure black or pure white.
    pub fn from_image(image: RgbaImage) -> InpaintResult<Self> {
        let black = Rgba8::BLACK.to_array();
        let white = Rgba8::WHITE.to_array();
        if let Some(idx) = image
            .as_raw()
            .chunks_exact(4)
            .position(|px| px != black && px != white)
        {
            return Err(InpaintError::validation(format!(
                "mask pixel {idx} is neither pure black nor pure white"
            )));
        }
        Ok(Self { image })
    }

    /// Decode a PNG (or any format `image` understands) into a mask.
    pub fn decode(bytes: &[u8]) -> InpaintResult<Self> {
        let img = image::load_from_memory(bytes).context("decode mask image")?;
        Self::from_image(img.to_rgba8())
    }

    pub fn size(&self) -> Canvas {
        let (width, height) = self.image.dimensions();
        Canvas { width, height }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        Rgba8::from_array(self.image.get_pixel(x, y).0)
    }

    pub fn stats(&self) -> MaskStats {
        let mut white = 0u64;
        let mut black = 0u64;
        for px in self.image.as_raw().chunks_exact(4) {
            match (px[0], px[1], px[2]) {
                (255, 255, 255) => white += 1,
                (0, 0, 0) => black += 1,
                _ => {}
            }
        }
        MaskStats {
            total: self.size().pixel_count(),
            white,
            black,
        }
    }

    pub fn white_pixel_count(&self) -> u64 {
        self.stats().white
    }

    pub fn to_png(&self) -> InpaintResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode mask png")?;
        Ok(buf)
    }

    pub fn to_data_url(&self) -> InpaintResult<String> {
        Ok(encode_data_url("image/png", &self.to_png()?))
    }
}

/// Rasterizes an overlay surface into a [`MaskBuffer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskSynthesizer {
    pub thresholds: CyanThresholds,
}

impl MaskSynthesizer {
    pub fn new(thresholds: CyanThresholds) -> Self {
        Self { thresholds }
    }

    /// Produce a mask of exactly `natural` size by nearest-neighbour sampling of `overlay`.
    #[tracing::instrument(
        skip(self, overlay),
        fields(overlay_w = overlay.width(), overlay_h = overlay.height())
    )]
    pub fn synthesize(&self, overlay: &RgbaImage, natural: Canvas) -> InpaintResult<MaskBuffer> {
        let overlay_size = Canvas::new(overlay.width(), overlay.height())?;
        let natural = Canvas::new(natural.width, natural.height)?;

        let scale_x = f64::from(natural.width) / f64::from(overlay_size.width);
        let scale_y = f64::from(natural.height) / f64::from(overlay_size.height);
        let xs = source_indices(natural.width, scale_x, overlay_size.width);
        let ys = source_indices(natural.height, scale_y, overlay_size.height);

        let mut mask = MaskBuffer::black(natural);
        let src = overlay.as_raw();
        let src_stride = overlay_size.width as usize * 4;
        let dst_stride = natural.width as usize * 4;
        let thresholds = self.thresholds;

        let dst: &mut [u8] = &mut mask.image;
        dst.par_chunks_exact_mut(dst_stride)
            .zip(ys.par_iter())
            .for_each(|(row, sy)| {
                let Some(sy) = *sy else { return };
                let src_row = &src[sy as usize * src_stride..(sy as usize + 1) * src_stride];
                for (px, sx) in row.chunks_exact_mut(4).zip(&xs) {
                    let class = match *sx {
                        Some(sx) => {
                            let i = sx as usize * 4;
                            let sp = &src_row[i..i + 4];
                            classify(Rgba8::new(sp[0], sp[1], sp[2], sp[3]), &thresholds)
                        }
                        None => PixelClass::Unmarked,
                    };
                    px.copy_from_slice(&class.mask_color().to_array());
                }
            });

        let stats = mask.stats();
        tracing::debug!(
            natural = %natural,
            white = stats.white,
            white_pct = stats.white_percentage(),
            "mask synthesized"
        );
        Ok(mask)
    }
}

/// For each output coordinate, the overlay coordinate it samples (`None` if out of bounds).
fn source_indices(out_len: u32, scale: f64, src_len: u32) -> Vec<Option<u32>> {
    (0..out_len)
        .map(|o| {
            let s = (f64::from(o) / scale).floor();
            (s >= 0.0 && s < f64::from(src_len)).then_some(s as u32)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/mask/synth.rs"]
mod tests;
