/// Convenience result type used across the crate.
pub type InpaintResult<T> = Result<T, InpaintError>;

/// Top-level error taxonomy used by editor and generation APIs.
#[derive(thiserror::Error, Debug)]
pub enum InpaintError {
    /// Invalid user input, settings, or mask. Never reaches the network.
    #[error("validation error: {0}")]
    Validation(String),

    /// A submission, polling, or download request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The remote job reported failure.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Polling hit the attempt cap without a terminal status.
    #[error("generation timed out after {attempts} status checks")]
    Timeout {
        /// Number of status checks performed.
        attempts: u32,
    },

    /// The status endpoint answered with a value outside the known protocol.
    #[error("unknown status: {0}")]
    UnknownStatus(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InpaintError {
    /// Build an [`InpaintError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`InpaintError::Network`] value.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Build an [`InpaintError::GenerationFailed`] value.
    pub fn generation_failed(msg: impl Into<String>) -> Self {
        Self::GenerationFailed(msg.into())
    }

    /// Build an [`InpaintError::UnknownStatus`] value.
    pub fn unknown_status(status: impl Into<String>) -> Self {
        Self::UnknownStatus(status.into())
    }

    /// Build an [`InpaintError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message suitable for showing to the person using the editor.
    ///
    /// Remote failure messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Network(msg) => msg.clone(),
            Self::GenerationFailed(msg) => msg.clone(),
            Self::Timeout { .. } => "Generation timed out. Please try again.".to_string(),
            Self::UnknownStatus(status) => format!("Unknown status: {status}"),
            Self::Serde(msg) => msg.clone(),
            Self::Other(err) => err.to_string(),
        }
    }
}

impl From<serde_json::Error> for InpaintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
