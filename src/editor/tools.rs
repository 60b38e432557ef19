/// Active selection tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Rectangle,
    Lasso,
}

/// Brush sub-mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    #[default]
    Paint,
    Erase,
}

impl std::str::FromStr for Tool {
    type Err = crate::InpaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brush" => Ok(Self::Brush),
            "rectangle" | "rect" => Ok(Self::Rectangle),
            "lasso" => Ok(Self::Lasso),
            other => Err(crate::InpaintError::validation(format!(
                "unknown selection tool '{other}'"
            ))),
        }
    }
}
