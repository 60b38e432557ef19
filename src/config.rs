use std::{fs::File, io::BufReader, path::Path, path::PathBuf, time::Duration};

use crate::foundation::error::{InpaintError, InpaintResult};
use crate::mask::classify::CyanThresholds;

/// Complete crate configuration. Every field has a default, so partial JSON files are valid.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InpaintConfig {
    pub editor: EditorConfig,
    pub api: ApiConfig,
    pub poll: PollOpts,
    pub session: SessionOpts,
}

impl InpaintConfig {
    pub fn from_path(path: impl AsRef<Path>) -> InpaintResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            InpaintError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| InpaintError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> InpaintResult<()> {
        self.editor.validate()?;
        if self.poll.max_attempts == 0 {
            return Err(InpaintError::validation("poll.max_attempts must be > 0"));
        }
        Ok(())
    }
}

/// Drawing and mask tunables of the editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub brush_radius: f64,
    pub brush_radius_min: f64,
    pub brush_radius_max: f64,
    /// Opacity of brush and rectangle fills.
    pub paint_opacity: f64,
    /// Opacity of the closed lasso fill.
    pub lasso_fill_opacity: f64,
    /// A rectangle is committed only if both sides exceed this.
    pub rect_min_size_px: f64,
    /// Lasso samples closer than this to the previous sample are dropped.
    pub lasso_min_spacing_px: f64,
    /// Lasso gestures with fewer points are discarded.
    pub lasso_min_points: usize,
    pub thresholds: CyanThresholds,
    /// A mask must contain more white pixels than this to be submitted.
    pub min_white_pixels: u64,
    /// Images wider or taller than this are refused before any buffer is allocated.
    pub max_natural_side: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush_radius: 20.0,
            brush_radius_min: 5.0,
            brush_radius_max: 50.0,
            paint_opacity: 0.8,
            lasso_fill_opacity: 0.3,
            rect_min_size_px: 5.0,
            lasso_min_spacing_px: 5.0,
            lasso_min_points: 10,
            thresholds: CyanThresholds::default(),
            min_white_pixels: 100,
            max_natural_side: 16_384,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> InpaintResult<()> {
        if !(self.brush_radius_min > 0.0 && self.brush_radius_min <= self.brush_radius_max) {
            return Err(InpaintError::validation(
                "editor brush radius range must satisfy 0 < min <= max",
            ));
        }
        for (name, v) in [
            ("paint_opacity", self.paint_opacity),
            ("lasso_fill_opacity", self.lasso_fill_opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(InpaintError::validation(format!(
                    "editor {name} must be in [0, 1], got {v}"
                )));
            }
        }
        if self.max_natural_side == 0 {
            return Err(InpaintError::validation("editor max_natural_side must be > 0"));
        }
        Ok(())
    }

    pub fn clamp_brush_radius(&self, r: f64) -> f64 {
        r.clamp(self.brush_radius_min, self.brush_radius_max)
    }
}

/// Endpoints and credentials of the inpainting service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub fill_endpoint: String,
    pub finetune_endpoint: String,
    pub result_endpoint: String,
    /// Explicit key; takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            fill_endpoint: "https://api.bfl.ai/v1/flux-pro-1.0-fill".to_string(),
            finetune_endpoint: "https://api.us1.bfl.ai/v1/flux-pro-1.0-fill-finetuned"
                .to_string(),
            result_endpoint: "https://api.us1.bfl.ai/v1/get_result".to_string(),
            api_key: None,
            api_key_env: "FLUX_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Resolve the API key, falling back to the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Status polling cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PollOpts {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollOpts {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            max_attempts: 60,
        }
    }
}

impl PollOpts {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Where and for how long editor snapshots are kept.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    pub dir: PathBuf,
    pub max_age_secs: u64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".wildmind-inpaint"),
            max_age_secs: 24 * 60 * 60,
        }
    }
}

impl SessionOpts {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
