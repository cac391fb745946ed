pub mod config;
pub mod display_preset;

pub use config::{DisplayConfig, PipelineConfig, VisualConfig, CONFIG_ENV, DEFAULT_PRESET};
pub use display_preset::DisplayPreset;
