use std::path::PathBuf;

use rgb_pipeline::{BackendError, RgbError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Unknown display preset: {0}")]
    UnknownPreset(String),

    #[error("Failed to parse config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid display config: {0}")]
    InvalidDisplay(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Image has {count} distinct colors, indexed sources allow 256")]
    TooManyColors { count: usize },

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] RgbError),

    #[error("Display error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
