use crate::foundation::data_url::strip_data_url_prefix;
use crate::generation::settings::{GenerationSettings, OutputFormat};

/// Body of a fill submission.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InpaintRequest {
    pub image: String,
    pub mask: String,
    pub prompt: String,
    pub steps: u32,
    pub guidance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub output_format: OutputFormat,
    pub safety_tolerance: u8,
    pub prompt_upsampling: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub finetune: Option<FinetuneParams>,
}

/// Extra fields sent only to the finetune endpoint. Flattened into the request body.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FinetuneParams {
    pub use_finetune: bool,
    pub finetune_id: String,
    pub finetune_strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

impl InpaintRequest {
    /// Assemble a request. `image` and `mask` may be bare base64 or data URLs;
    /// any prefix is stripped.
    pub fn new(image: &str, mask: &str, settings: &GenerationSettings) -> Self {
        let finetune = settings.use_finetune.then(|| FinetuneParams {
            use_finetune: true,
            finetune_id: settings.finetune_id.trim().to_string(),
            finetune_strength: settings.finetune_strength,
            webhook_url: settings.webhook_url.clone(),
            webhook_secret: settings.webhook_secret.clone(),
        });
        Self {
            image: strip_data_url_prefix(image).to_string(),
            mask: strip_data_url_prefix(mask).to_string(),
            prompt: settings.prompt.trim().to_string(),
            steps: settings.steps,
            guidance: settings.guidance,
            seed: settings.seed,
            output_format: settings.output_format,
            safety_tolerance: settings.safety_tolerance,
            prompt_upsampling: settings.prompt_upsampling,
            finetune,
        }
    }

    pub fn uses_finetune(&self) -> bool {
        self.finetune.is_some()
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Reply to a fill submission.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct SubmitResponse {
    pub id: String,
    #[serde(default)]
    pub polling_url: Option<String>,
}

/// Finished generation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerationResult {
    /// URL of the generated image.
    pub sample: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Raw body of the status endpoint.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub result: Option<StatusResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct StatusResult {
    #[serde(default)]
    pub sample: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Interpreted job status.
#[derive(Clone, Debug, PartialEq)]
pub enum JobStatus {
    Pending,
    Ready(GenerationResult),
    Failed(Option<String>),
    /// Anything outside the known protocol, including `Ready` without a sample.
    Unknown(String),
}

impl StatusResponse {
    /// Classify the status, accepting any letter case.
    pub fn job_status(self) -> JobStatus {
        match self.status.to_ascii_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "ready" => match self.result {
                Some(StatusResult {
                    sample: Some(sample),
                    seed,
                    duration,
                }) if !sample.is_empty() => JobStatus::Ready(GenerationResult {
                    sample,
                    seed,
                    duration,
                }),
                _ => JobStatus::Unknown(format!("{} (no result sample)", self.status)),
            },
            "failed" => JobStatus::Failed(self.error.filter(|e| !e.trim().is_empty())),
            _ => JobStatus::Unknown(self.status),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/request.rs"]
mod tests;
