use image::RgbaImage;
use kurbo::Shape as _;

use crate::config::EditorConfig;
use crate::editor::ants::MarchingAnts;
use crate::editor::coords::{PointerInput, map_to_buffer};
use crate::editor::lasso::{LassoTrail, lasso_path};
use crate::editor::overlay::OverlaySurface;
use crate::editor::tools::{BrushMode, Tool};
use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::mask::synth::{MaskBuffer, MaskSynthesizer};
use crate::raster::composite::Compose;
use crate::raster::coverage::StrokeStyle;

const LASSO_PREVIEW_DASH: [f64; 2] = [4.0, 4.0];
const LASSO_PREVIEW_WIDTH: f64 = 2.0;

/// Result of feeding one pointer event to the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// No gesture was affected.
    Ignored,
    /// A gesture is in progress; the overlay shows a live preview.
    Drawing,
    /// A selection edit was committed and the mask regenerated.
    Committed,
    /// The gesture was too small to count and the overlay was restored.
    Discarded,
}

/// In-progress selection geometry. Lives from pointer-down to pointer-up.
#[derive(Debug)]
enum Gesture {
    Idle,
    Brush {
        last: Point,
    },
    Rectangle {
        anchor: Point,
        current: Point,
        base: RgbaImage,
    },
    Lasso {
        trail: LassoTrail,
        base: RgbaImage,
    },
}

/// Editing state for one loaded image: overlay, selection gesture and derived mask.
///
/// All mutation happens through `&mut self`; the mask is regenerated synchronously
/// right after every committed edit, so it always reflects the last completed one.
#[derive(Debug)]
pub struct EditorSession {
    natural: Canvas,
    config: EditorConfig,
    overlay: OverlaySurface,
    decorations: OverlaySurface,
    tool: Tool,
    brush_mode: BrushMode,
    brush_radius: f64,
    gesture: Gesture,
    outline: Option<BezPath>,
    ants: MarchingAnts,
    synthesizer: MaskSynthesizer,
    mask: Option<MaskBuffer>,
}

impl EditorSession {
    /// Start a session for an image of `natural` size shown at `display` size.
    pub fn new(natural: Canvas, display: Canvas, config: EditorConfig) -> InpaintResult<Self> {
        config.validate()?;
        let natural = Canvas::new(natural.width, natural.height)?;
        let display = Canvas::new(display.width, display.height)?;
        let max = config.max_natural_side;
        if natural.width > max || natural.height > max {
            return Err(InpaintError::validation(format!(
                "image size {natural} exceeds the {max}px limit"
            )));
        }
        if display.width > u32::from(u16::MAX) || display.height > u32::from(u16::MAX) {
            return Err(InpaintError::validation(format!(
                "display size {display} exceeds the drawable surface limit"
            )));
        }

        let brush_radius = config.clamp_brush_radius(config.brush_radius);
        let synthesizer = MaskSynthesizer::new(config.thresholds);
        Ok(Self {
            natural,
            overlay: OverlaySurface::new(display),
            decorations: OverlaySurface::new(display),
            config,
            tool: Tool::default(),
            brush_mode: BrushMode::default(),
            brush_radius,
            gesture: Gesture::Idle,
            outline: None,
            ants: MarchingAnts::default(),
            synthesizer,
            mask: None,
        })
    }

    pub fn natural_size(&self) -> Canvas {
        self.natural
    }

    pub fn display_size(&self) -> Canvas {
        self.overlay.size()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlaySurface {
        &self.overlay
    }

    /// Animated selection border layer. Never sampled into the mask.
    pub fn decorations(&self) -> &OverlaySurface {
        &self.decorations
    }

    pub fn mask(&self) -> Option<&MaskBuffer> {
        self.mask.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn brush_mode(&self) -> BrushMode {
        self.brush_mode
    }

    pub fn brush_radius(&self) -> f64 {
        self.brush_radius
    }

    pub fn ants_offset(&self) -> u8 {
        self.ants.offset()
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Switch tools. An unfinished gesture is finished first (see [`Self::cancel_gesture`]).
    pub fn set_tool(&mut self, tool: Tool) -> InpaintResult<()> {
        if tool != self.tool {
            self.cancel_gesture()?;
            self.tool = tool;
        }
        Ok(())
    }

    pub fn set_brush_mode(&mut self, mode: BrushMode) {
        self.brush_mode = mode;
    }

    pub fn set_brush_radius(&mut self, radius: f64) {
        self.brush_radius = self.config.clamp_brush_radius(radius);
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> InpaintResult<EditOutcome> {
        let p = self.map(input)?;
        if self.is_drawing() {
            self.cancel_gesture()?;
        }

        self.gesture = match self.tool {
            Tool::Brush => {
                self.overlay
                    .stamp_circle(p, self.brush_radius, self.brush_compose())?;
                Gesture::Brush { last: p }
            }
            Tool::Rectangle => Gesture::Rectangle {
                anchor: p,
                current: p,
                base: self.overlay.snapshot(),
            },
            Tool::Lasso => Gesture::Lasso {
                trail: LassoTrail::new(p, self.config.lasso_min_spacing_px),
                base: self.overlay.snapshot(),
            },
        };
        Ok(EditOutcome::Drawing)
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> InpaintResult<EditOutcome> {
        if !self.is_drawing() {
            return Ok(EditOutcome::Ignored);
        }
        let p = self.map(input)?;
        let compose = self.brush_compose();
        let radius = self.brush_radius;

        match &mut self.gesture {
            Gesture::Idle => return Ok(EditOutcome::Ignored),
            Gesture::Brush { last } => {
                let from = std::mem::replace(last, p);
                self.overlay.stroke_segment(from, p, radius, compose)?;
            }
            Gesture::Rectangle { current, .. } => {
                *current = p;
                self.render_rect_preview()?;
            }
            Gesture::Lasso { trail, .. } => {
                if trail.push(p) {
                    self.render_lasso_preview()?;
                }
            }
        }
        Ok(EditOutcome::Drawing)
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> InpaintResult<EditOutcome> {
        if !self.is_drawing() {
            return Ok(EditOutcome::Ignored);
        }
        let p = self.map(input)?;

        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => Ok(EditOutcome::Ignored),
            Gesture::Brush { .. } => {
                self.commit_brush()?;
                tracing::debug!("brush stroke committed");
                Ok(EditOutcome::Committed)
            }
            Gesture::Rectangle { anchor, base, .. } => {
                let (w, h) = (p.x - anchor.x, p.y - anchor.y);
                let min = self.config.rect_min_size_px;
                if w.abs() > min && h.abs() > min {
                    let rect = Rect::from_points(anchor, p);
                    self.overlay.clear();
                    self.overlay
                        .fill_rect(rect, Rgba8::cyan(self.config.paint_opacity))?;
                    self.outline = Some(rect.to_path(0.1));
                    self.render_decorations()?;
                    self.regenerate_mask()?;
                    tracing::debug!(?rect, area = rect.area(), "rectangle selection committed");
                    Ok(EditOutcome::Committed)
                } else {
                    self.overlay.restore(base);
                    self.render_decorations()?;
                    tracing::debug!(w, h, "rectangle selection too small, discarded");
                    Ok(EditOutcome::Discarded)
                }
            }
            Gesture::Lasso { trail, base } => {
                if trail.len() < self.config.lasso_min_points {
                    self.overlay.restore(base);
                    self.render_decorations()?;
                    tracing::debug!(points = trail.len(), "lasso too short, discarded");
                    return Ok(EditOutcome::Discarded);
                }
                let path = lasso_path(trail.points(), true);
                self.overlay.clear();
                self.overlay
                    .fill_path(&path, Rgba8::cyan(self.config.lasso_fill_opacity))?;
                self.outline = Some(path);
                self.render_decorations()?;
                self.regenerate_mask()?;
                tracing::debug!(points = trail.len(), "lasso selection committed");
                Ok(EditOutcome::Committed)
            }
        }
    }

    /// End an unfinished gesture without a pointer-up position.
    ///
    /// Brush strokes are already on the overlay and are committed; rectangle and
    /// lasso previews are rolled back.
    pub fn cancel_gesture(&mut self) -> InpaintResult<EditOutcome> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => Ok(EditOutcome::Ignored),
            Gesture::Brush { .. } => {
                self.commit_brush()?;
                Ok(EditOutcome::Committed)
            }
            Gesture::Rectangle { base, .. } | Gesture::Lasso { base, .. } => {
                self.overlay.restore(base);
                self.render_decorations()?;
                Ok(EditOutcome::Discarded)
            }
        }
    }

    /// Advance the marching-ants animation by one tick.
    pub fn tick(&mut self) -> InpaintResult<()> {
        self.ants.tick();
        self.render_decorations()
    }

    /// Wipe overlay, decorations, mask and any in-progress gesture.
    pub fn clear_all(&mut self) {
        self.gesture = Gesture::Idle;
        self.outline = None;
        self.overlay.clear();
        self.decorations.clear();
        self.mask = None;
        tracing::debug!("all selections cleared");
    }

    /// Replace the overlay with previously saved pixels and rebuild the mask.
    pub fn restore_overlay(&mut self, pixels: RgbaImage) -> InpaintResult<()> {
        self.gesture = Gesture::Idle;
        self.outline = None;
        self.decorations.clear();
        self.overlay.restore(pixels);
        if self.overlay.is_blank() {
            self.mask = None;
            Ok(())
        } else {
            self.regenerate_mask()
        }
    }

    /// Rebuild the mask from the current overlay.
    pub fn regenerate_mask(&mut self) -> InpaintResult<()> {
        let mask = self
            .synthesizer
            .synthesize(self.overlay.pixels(), self.natural)?;
        self.mask = Some(mask);
        Ok(())
    }

    /// Freehand edits invalidate the committed shape outline.
    fn commit_brush(&mut self) -> InpaintResult<()> {
        self.outline = None;
        self.render_decorations()?;
        self.regenerate_mask()
    }

    fn map(&self, input: PointerInput) -> InpaintResult<Point> {
        map_to_buffer(input.client, input.bounds, self.overlay.size())
    }

    fn brush_compose(&self) -> Compose {
        match self.brush_mode {
            BrushMode::Paint => Compose::Paint(Rgba8::cyan(self.config.paint_opacity)),
            BrushMode::Erase => Compose::Erase,
        }
    }

    fn render_rect_preview(&mut self) -> InpaintResult<()> {
        let Gesture::Rectangle {
            anchor, current, ..
        } = &self.gesture
        else {
            return Ok(());
        };
        let rect = Rect::from_points(*anchor, *current);
        self.overlay.clear();
        if rect.area() > 0.0 {
            self.overlay
                .fill_rect(rect, Rgba8::cyan(self.config.paint_opacity))?;
        }
        self.render_decorations()
    }

    fn render_lasso_preview(&mut self) -> InpaintResult<()> {
        let Gesture::Lasso { trail, .. } = &self.gesture else {
            return Ok(());
        };
        self.overlay.clear();
        if trail.len() > 1 {
            let path = lasso_path(trail.points(), false);
            self.overlay.stroke_path(
                &path,
                StrokeStyle::dashed(LASSO_PREVIEW_WIDTH, &LASSO_PREVIEW_DASH, 0.0),
                Rgba8::WHITE,
            )?;
        }
        self.render_decorations()
    }

    fn render_decorations(&mut self) -> InpaintResult<()> {
        let outline = match &self.gesture {
            Gesture::Rectangle {
                anchor, current, ..
            } => {
                let rect = Rect::from_points(*anchor, *current);
                (rect.area() > 0.0).then(|| rect.to_path(0.1))
            }
            Gesture::Lasso { .. } => None,
            Gesture::Idle | Gesture::Brush { .. } => self.outline.clone(),
        };
        self.decorations.clear();
        if let Some(path) = outline {
            self.decorations
                .stroke_path(&path, self.ants.stroke_style(), Rgba8::cyan(1.0))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
