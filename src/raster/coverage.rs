use crate::foundation::core::{BezPath, Canvas};
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::raster::composite::{Compose, apply_rgba_coverage_in_place};

/// Stroke parameters for outline shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    /// Round caps and joins; otherwise butt caps with miter joins.
    pub round: bool,
    /// Dash pattern and offset, canvas `setLineDash` / `lineDashOffset` semantics.
    pub dash: Option<DashPattern>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashPattern {
    pub pattern: Vec<f64>,
    pub offset: f64,
}

impl StrokeStyle {
    pub fn round(width: f64) -> Self {
        Self {
            width,
            round: true,
            dash: None,
        }
    }

    pub fn dashed(width: f64, pattern: &[f64], offset: f64) -> Self {
        Self {
            width,
            round: false,
            dash: Some(DashPattern {
                pattern: pattern.to_vec(),
                offset,
            }),
        }
    }
}

/// Geometry handed to the rasterizer.
#[derive(Clone, Debug)]
pub enum Shape {
    Fill(BezPath),
    Stroke(BezPath, StrokeStyle),
}

/// Per-pixel anti-aliased coverage in `0..=255`, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub size: Canvas,
    pub alpha: Vec<u8>,
}

impl Coverage {
    pub fn covered_pixels(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0).count()
    }
}

/// Shape rasterizer backed by `vello_cpu`. The render context and target pixmap
/// are kept between calls and only reallocated when the surface size changes.
#[derive(Default)]
pub struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("has_ctx", &self.ctx.is_some())
            .field("has_pixmap", &self.pixmap.is_some())
            .finish()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize one shape into a coverage buffer of `size`.
    pub fn rasterize(&mut self, size: Canvas, shape: &Shape) -> InpaintResult<Coverage> {
        let pixmap = self.render(size, shape)?;
        // Opaque white paint: the premultiplied alpha channel is the coverage.
        let alpha = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();
        Ok(Coverage { size, alpha })
    }

    /// Rasterize one shape and apply it to `dst`, a straight RGBA8 buffer of `size`.
    pub fn composite(
        &mut self,
        size: Canvas,
        shape: &Shape,
        dst: &mut [u8],
        op: Compose,
    ) -> InpaintResult<()> {
        let pixmap = self.render(size, shape)?;
        apply_rgba_coverage_in_place(dst, pixmap.data_as_u8_slice(), op)
    }

    fn render(&mut self, size: Canvas, shape: &Shape) -> InpaintResult<&vello_cpu::Pixmap> {
        let (w, h) = surface_dims(size)?;
        let mut pixmap = match self.pixmap.take() {
            Some(pm) if pm.width() == w && pm.height() == h => pm,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        pixmap.data_as_u8_slice_mut().fill(0);

        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            match shape {
                Shape::Fill(path) => {
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
                Shape::Stroke(path, style) => {
                    ctx.set_stroke(stroke_to_cpu(style));
                    ctx.stroke_path(&bezpath_to_cpu(path));
                }
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        });
        Ok(&*self.pixmap.insert(pixmap))
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

fn surface_dims(size: Canvas) -> InpaintResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| InpaintError::validation("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| InpaintError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(InpaintError::validation("surface must be non-empty"));
    }
    Ok((w, h))
}

fn stroke_to_cpu(style: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    use vello_cpu::kurbo::{Cap, Join, Stroke};

    let mut stroke = Stroke::new(style.width);
    stroke = if style.round {
        stroke.with_caps(Cap::Round).with_join(Join::Round)
    } else {
        stroke.with_caps(Cap::Butt).with_join(Join::Miter)
    };
    if let Some(dash) = &style.dash {
        stroke = stroke.with_dashes(dash.offset, dash.pattern.iter().copied());
    }
    stroke
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/coverage.rs"]
mod tests;
