pub mod config;
pub mod error;
pub mod gemini;
pub mod pipeline;
pub mod session;
pub mod vibe;

// Re-export main types for convenience
pub use config::Config;
pub use error::{GenerateError, ImageError, MetadataError};
pub use gemini::GeminiClient;
pub use pipeline::{generate, VibeModel};
pub use session::{Session, ViewState, GENERIC_ERROR_MESSAGE};
pub use vibe::{parse_hex_color, Rgb, VibeMetadata, VibeResult};
