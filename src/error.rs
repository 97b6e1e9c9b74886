use thiserror::Error;

/// Errors that abort the analysis of a single document.
///
/// Reference-table failures never show up here: the loader degrades to an
/// empty table instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("document '{source_label}' is not valid UTF-8")]
    InvalidEncoding { source_label: String },

    #[error("document '{source_label}' has unsupported format '.{extension}'")]
    UnsupportedFormat {
        source_label: String,
        extension: String,
    },

    #[error("annotator failed: {0}")]
    Annotator(String),
}

impl AnalysisError {
    /// Whether the error was caused by the caller's input rather than the engine.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidEncoding { .. } | AnalysisError::UnsupportedFormat { .. }
        )
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
