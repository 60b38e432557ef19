use std::{fs::File, io::BufReader, path::Path};

use crate::editor::coords::PointerInput;
use crate::editor::session::{EditOutcome, EditorSession};
use crate::editor::tools::{BrushMode, Tool};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{InpaintError, InpaintResult};

/// Recorded editor input, replayable against an [`EditorSession`].
///
/// Positions are client coordinates relative to a surface shown at `display`
/// (the session's display size when omitted).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditScript {
    pub display: Option<Canvas>,
    pub events: Vec<ScriptEvent>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptEvent {
    Tool(Tool),
    BrushMode(BrushMode),
    BrushRadius(f64),
    Down([f64; 2]),
    Move([f64; 2]),
    Up([f64; 2]),
    Tick,
    Clear,
}

/// Commit/discard counts of a replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub committed: usize,
    pub discarded: usize,
}

impl EditScript {
    pub fn from_path(path: impl AsRef<Path>) -> InpaintResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            InpaintError::validation(format!("open edit script '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            InpaintError::serde(format!("parse edit script '{}': {e}", path.display()))
        })
    }

    pub fn replay(&self, session: &mut EditorSession) -> InpaintResult<ReplaySummary> {
        let bounds = self.display.unwrap_or(session.display_size()).to_rect();
        let at = |[x, y]: [f64; 2]| PointerInput::new(Point::new(x, y), bounds);
        let mut summary = ReplaySummary::default();

        for event in &self.events {
            let outcome = match event {
                ScriptEvent::Tool(tool) => {
                    session.set_tool(*tool)?;
                    continue;
                }
                ScriptEvent::BrushMode(mode) => {
                    session.set_brush_mode(*mode);
                    continue;
                }
                ScriptEvent::BrushRadius(r) => {
                    session.set_brush_radius(*r);
                    continue;
                }
                ScriptEvent::Down(p) => session.pointer_down(at(*p))?,
                ScriptEvent::Move(p) => session.pointer_move(at(*p))?,
                ScriptEvent::Up(p) => session.pointer_up(at(*p))?,
                ScriptEvent::Tick => {
                    session.tick()?;
                    continue;
                }
                ScriptEvent::Clear => {
                    session.clear_all();
                    continue;
                }
            };
            match outcome {
                EditOutcome::Committed => summary.committed += 1,
                EditOutcome::Discarded => summary.discarded += 1,
                EditOutcome::Drawing | EditOutcome::Ignored => {}
            }
        }
        if session.is_drawing() {
            tracing::warn!("edit script ended mid-gesture");
            match session.cancel_gesture()? {
                EditOutcome::Committed => summary.committed += 1,
                EditOutcome::Discarded => summary.discarded += 1,
                EditOutcome::Drawing | EditOutcome::Ignored => {}
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/script.rs"]
mod tests;
