use std::io::Cursor;

use anyhow::Context;
use image::RgbaImage;
use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::InpaintResult;
use crate::raster::composite::Compose;
use crate::raster::coverage::{Rasterizer, Shape, StrokeStyle};

const CURVE_TOLERANCE: f64 = 0.1;

/// Transparent drawing layer the selection is painted onto, in straight RGBA8.
#[derive(Debug)]
pub struct OverlaySurface {
    pixels: RgbaImage,
    raster: Rasterizer,
}

impl OverlaySurface {
    pub fn new(size: Canvas) -> Self {
        Self {
            pixels: RgbaImage::new(size.width, size.height),
            raster: Rasterizer::new(),
        }
    }

    pub fn size(&self) -> Canvas {
        let (width, height) = self.pixels.dimensions();
        Canvas { width, height }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        Rgba8::from_array(self.pixels.get_pixel(x, y).0)
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.as_raw().chunks_exact(4).all(|px| px[3] == 0)
    }

    pub fn clear(&mut self) {
        let buf: &mut [u8] = &mut self.pixels;
        buf.fill(0);
    }

    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// Replace the contents with `pixels`, resampling (nearest) if the size differs.
    pub fn restore(&mut self, pixels: RgbaImage) {
        let size = self.size();
        self.pixels = if pixels.dimensions() == (size.width, size.height) {
            pixels
        } else {
            image::imageops::resize(
                &pixels,
                size.width,
                size.height,
                image::imageops::FilterType::Nearest,
            )
        };
    }

    pub fn stamp_circle(&mut self, center: Point, radius: f64, op: Compose) -> InpaintResult<()> {
        let path = kurbo::Circle::new(center, radius).to_path(CURVE_TOLERANCE);
        self.draw(&Shape::Fill(path), op)
    }

    /// Round-capped segment of width `2 * radius`.
    pub fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        radius: f64,
        op: Compose,
    ) -> InpaintResult<()> {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        self.draw(
            &Shape::Stroke(path, StrokeStyle::round(radius * 2.0)),
            op,
        )
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> InpaintResult<()> {
        self.draw(
            &Shape::Fill(rect.to_path(CURVE_TOLERANCE)),
            Compose::Paint(color),
        )
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) -> InpaintResult<()> {
        self.draw(&Shape::Fill(path.clone()), Compose::Paint(color))
    }

    pub fn stroke_path(
        &mut self,
        path: &BezPath,
        style: StrokeStyle,
        color: Rgba8,
    ) -> InpaintResult<()> {
        self.draw(&Shape::Stroke(path.clone(), style), Compose::Paint(color))
    }

    fn draw(&mut self, shape: &Shape, op: Compose) -> InpaintResult<()> {
        let size = self.size();
        let buf: &mut [u8] = &mut self.pixels;
        self.raster.composite(size, shape, buf, op)
    }

    pub fn to_png(&self) -> InpaintResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode overlay png")?;
        Ok(buf)
    }

    pub fn decode_png(bytes: &[u8]) -> InpaintResult<RgbaImage> {
        let img = image::load_from_memory(bytes).context("decode overlay image")?;
        Ok(img.to_rgba8())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/overlay.rs"]
mod tests;
