use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Pipeline-level error type.
///
/// Only two variants abort a run: `MissingInput` for the job description
/// and `Io`. Everything else is a per-candidate skip handled inside the
/// batch loop.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    #[error("model response is not valid JSON: {source}; raw text: {raw}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("model response failed schema validation")]
    SchemaValidation,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
