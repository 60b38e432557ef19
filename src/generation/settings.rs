use crate::foundation::error::{InpaintError, InpaintResult};

pub const PROMPT_MAX_CHARS: usize = 500;
pub const DEFAULT_GUIDANCE: f64 = 50.75;
pub const DEFAULT_FINETUNE_GUIDANCE: f64 = 60.0;

/// Encoding of the generated image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = InpaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(InpaintError::validation(format!(
                "unsupported output format '{other}'"
            ))),
        }
    }
}

/// User-editable parameters of one inpainting request.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub prompt: String,
    pub steps: u32,
    pub guidance: f64,
    pub seed: Option<u64>,
    pub safety_tolerance: u8,
    pub output_format: OutputFormat,
    pub prompt_upsampling: bool,
    pub use_finetune: bool,
    pub finetune_id: String,
    pub finetune_strength: f64,
    /// Completion callback, only forwarded to the finetune endpoint.
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            steps: 50,
            guidance: DEFAULT_GUIDANCE,
            seed: None,
            safety_tolerance: 2,
            output_format: OutputFormat::Jpeg,
            prompt_upsampling: false,
            use_finetune: false,
            finetune_id: "my-finetune".to_string(),
            finetune_strength: 1.1,
            webhook_url: None,
            webhook_secret: None,
        }
    }
}

impl GenerationSettings {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Switch between the regular and finetune endpoints. Guidance is reset to
    /// the selected endpoint's default.
    pub fn set_use_finetune(&mut self, on: bool) {
        self.use_finetune = on;
        self.guidance = if on {
            DEFAULT_FINETUNE_GUIDANCE
        } else {
            DEFAULT_GUIDANCE
        };
    }

    pub fn validate(&self) -> InpaintResult<()> {
        let prompt_len = self.prompt.trim().chars().count();
        if prompt_len == 0 {
            return Err(InpaintError::validation("Please enter a prompt"));
        }
        if prompt_len > PROMPT_MAX_CHARS {
            return Err(InpaintError::validation(format!(
                "Prompt must be between 1-{PROMPT_MAX_CHARS} characters"
            )));
        }
        if self.use_finetune && self.finetune_id.trim().is_empty() {
            return Err(InpaintError::validation(
                "Finetune ID is required when using finetune API",
            ));
        }
        if !(15..=50).contains(&self.steps) {
            return Err(InpaintError::validation(format!(
                "steps must be in 15..=50, got {}",
                self.steps
            )));
        }
        if !(1.5..=100.0).contains(&self.guidance) {
            return Err(InpaintError::validation(format!(
                "guidance must be in 1.5..=100, got {}",
                self.guidance
            )));
        }
        if self.safety_tolerance > 6 {
            return Err(InpaintError::validation(format!(
                "safety tolerance must be in 0..=6, got {}",
                self.safety_tolerance
            )));
        }
        if self.use_finetune && !(0.0..=2.0).contains(&self.finetune_strength) {
            return Err(InpaintError::validation(format!(
                "finetune strength must be in 0..=2, got {}",
                self.finetune_strength
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/settings.rs"]
mod tests;
