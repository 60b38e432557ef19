use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{InpaintError, InpaintResult};

/// A pointer or touch sample in on-screen (CSS) pixels, together with the
/// drawing surface's bounding rectangle at the time of the event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub client: Point,
    pub bounds: Rect,
}

impl PointerInput {
    pub fn new(client: Point, bounds: Rect) -> Self {
        Self { client, bounds }
    }

    /// Input for a surface displayed at the origin with 1:1 scaling of `size`.
    pub fn unscaled(x: f64, y: f64, size: Canvas) -> Self {
        Self {
            client: Point::new(x, y),
            bounds: size.to_rect(),
        }
    }
}

/// Map a client-space position into buffer pixel space.
///
/// Scale factors are derived from `bounds` on every call since the displayed
/// rectangle moves with layout, resize and scroll. No rounding is applied.
pub fn map_to_buffer(client: Point, bounds: Rect, buffer: Canvas) -> InpaintResult<Point> {
    let (w, h) = (bounds.width(), bounds.height());
    if !(w > 0.0 && h > 0.0) {
        return Err(InpaintError::validation(format!(
            "display bounds must be non-empty, got {w}x{h}"
        )));
    }
    let scale_x = f64::from(buffer.width) / w;
    let scale_y = f64::from(buffer.height) / h;
    Ok(Point::new(
        (client.x - bounds.x0) * scale_x,
        (client.y - bounds.y0) * scale_y,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/editor/coords.rs"]
mod tests;
