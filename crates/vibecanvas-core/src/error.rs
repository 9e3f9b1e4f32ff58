//! Error types for the two generation steps
//!
//! Each step has its own error so a failure can always be attributed to the
//! request that produced it.

/// Failure of the metadata (title/description/palette) request
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metadata request returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response text missing, not JSON, or not the expected shape
    #[error("failed to parse vibe metadata: {0}")]
    Parse(String),
}

/// Failure of the image request
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("image request returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no image data found in response")]
    NoImageData,
}

/// Failure of a whole generation cycle, tagged with the step that failed
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Image(#[from] ImageError),

    /// The task running the pipeline panicked or was cancelled
    #[error("generation task stopped: {0}")]
    Interrupted(String),
}

impl GenerateError {
    /// Short name of the failing step, for logs.
    pub fn step(&self) -> &'static str {
        match self {
            GenerateError::Metadata(_) => "metadata",
            GenerateError::Image(_) => "image",
            GenerateError::Interrupted(_) => "task",
        }
    }
}
