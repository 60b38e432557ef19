use crate::config::InpaintConfig;
use crate::editor::overlay::OverlaySurface;
use crate::editor::session::EditorSession;
use crate::foundation::data_url::{decode_data_url, encode_data_url};
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::generation::api::{Delay, InpaintApi};
use crate::generation::request::{GenerationResult, InpaintRequest};
use crate::generation::settings::GenerationSettings;
use crate::generation::submitter::Submitter;
use crate::mask::synth::MaskStats;
use crate::mask::validate::MaskValidator;
use crate::persist::clock::Clock;
use crate::persist::store::{SessionPersistence, SessionSnapshot, SnapshotStorage};
use crate::source::OriginalImage;

/// The inpainting page's state: source image, editor, settings and last result.
///
/// Failed operations leave image, mask and settings untouched so the user can retry.
#[derive(Debug)]
pub struct Workspace {
    config: InpaintConfig,
    image: Option<OriginalImage>,
    editor: Option<EditorSession>,
    settings: GenerationSettings,
    result: Option<GenerationResult>,
}

impl Workspace {
    pub fn new(config: InpaintConfig) -> InpaintResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            image: None,
            editor: None,
            settings: GenerationSettings::default(),
            result: None,
        })
    }

    pub fn config(&self) -> &InpaintConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&OriginalImage> {
        self.image.as_ref()
    }

    pub fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorSession> {
        self.editor.as_mut()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GenerationSettings {
        &mut self.settings
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// Load (or replace) the source image. The overlay is recreated at the
    /// image's display size and any previous mask and result are dropped.
    pub fn load_image(&mut self, image: OriginalImage) -> InpaintResult<()> {
        let editor = self.editor_for(&image)?;
        tracing::info!(
            natural = %image.natural_size(),
            displayed = %image.display_size(),
            mime = image.mime(),
            "image loaded"
        );
        self.editor = Some(editor);
        self.image = Some(image);
        self.result = None;
        Ok(())
    }

    /// Fresh editor for `image` that keeps the current tool, brush mode and radius.
    fn editor_for(&self, image: &OriginalImage) -> InpaintResult<EditorSession> {
        let mut editor = EditorSession::new(
            image.natural_size(),
            image.display_size(),
            self.config.editor.clone(),
        )?;
        if let Some(prev) = &self.editor {
            editor.set_tool(prev.tool())?;
            editor.set_brush_mode(prev.brush_mode());
            editor.set_brush_radius(prev.brush_radius());
        }
        Ok(editor)
    }

    /// Drop the image, selection and result. Prompt and settings are kept.
    pub fn remove_image(&mut self) {
        self.image = None;
        self.editor = None;
        self.result = None;
        tracing::info!("image removed");
    }

    /// Validate everything and build the wire request. Never touches the network.
    pub fn prepare(&self) -> InpaintResult<InpaintRequest> {
        let (image, editor) = match (&self.image, &self.editor) {
            (Some(image), Some(editor)) => (image, editor),
            _ => return Err(InpaintError::validation("Please upload an image first")),
        };
        self.settings.validate()?;
        let stats = self.validate_mask(image, editor)?;
        tracing::info!(
            white = stats.white,
            white_pct = stats.white_percentage(),
            "mask accepted"
        );

        let mask = editor
            .mask()
            .ok_or_else(|| InpaintError::validation("No mask: paint or select an area first"))?;
        Ok(InpaintRequest::new(
            &image.base64(),
            &mask.to_data_url()?,
            &self.settings,
        ))
    }

    fn validate_mask(
        &self,
        image: &OriginalImage,
        editor: &EditorSession,
    ) -> InpaintResult<MaskStats> {
        MaskValidator::new(self.config.editor.min_white_pixels)
            .validate(editor.mask(), image.natural_size())
    }

    /// Validate, submit and poll. The result is recorded on success.
    pub fn generate<A: InpaintApi, D: Delay>(
        &mut self,
        submitter: &mut Submitter<A, D>,
    ) -> InpaintResult<GenerationResult> {
        let request = self.prepare()?;
        let result = submitter.generate(&request)?;
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Capture the current state for persistence. The timestamp is left at zero
    /// and stamped by [`SessionPersistence::save`].
    pub fn snapshot(&self) -> InpaintResult<SessionSnapshot> {
        let (mask_image, canvas_data) = match &self.editor {
            Some(editor) => (
                editor.mask().map(|m| m.to_data_url()).transpose()?,
                if editor.overlay().is_blank() {
                    None
                } else {
                    Some(encode_data_url("image/png", &editor.overlay().to_png()?))
                },
            ),
            None => (None, None),
        };
        Ok(SessionSnapshot {
            original_image: self.image.as_ref().map(OriginalImage::to_data_url),
            mask_image,
            result_image: self.result.as_ref().map(|r| r.sample.clone()),
            settings: self.settings.clone(),
            brush_size: self
                .editor
                .as_ref()
                .map_or(self.config.editor.brush_radius, EditorSession::brush_radius),
            selection_mode: self.editor.as_ref().map(EditorSession::tool).unwrap_or_default(),
            canvas_data,
            timestamp: 0,
        })
    }

    /// Rebuild the workspace from a snapshot. The mask is regenerated from the
    /// restored overlay rather than trusted from the snapshot. On error the
    /// workspace is left as it was.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> InpaintResult<()> {
        let image = snapshot
            .original_image
            .as_deref()
            .map(OriginalImage::from_data_url)
            .transpose()?;
        let editor = match &image {
            Some(image) => {
                let mut editor = self.editor_for(image)?;
                editor.set_tool(snapshot.selection_mode)?;
                editor.set_brush_radius(snapshot.brush_size);
                if let Some(canvas) = &snapshot.canvas_data {
                    let (_, png) = decode_data_url(canvas)?;
                    editor.restore_overlay(OverlaySurface::decode_png(&png)?)?;
                }
                Some(editor)
            }
            None => None,
        };

        self.image = image;
        self.editor = editor;
        self.settings = snapshot.settings;
        self.result = snapshot.result_image.map(|sample| GenerationResult {
            sample,
            seed: None,
            duration: None,
        });
        tracing::info!(has_image = self.image.is_some(), "workspace restored");
        Ok(())
    }

    /// Save a snapshot if there is an image, mask or result. Returns whether one was written.
    pub fn autosave<S: SnapshotStorage, C: Clock>(
        &self,
        persistence: &SessionPersistence<S, C>,
    ) -> InpaintResult<bool> {
        let snapshot = self.snapshot()?;
        if !snapshot.has_content() {
            return Ok(false);
        }
        persistence.save(&snapshot)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../tests/unit/workspace.rs"]
mod tests;
