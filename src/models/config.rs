use std::path::Path;

use rgb_pipeline::{ByteOrder, MemoryDisplay, Rgb16, RgbOptions, Visual, VisualClass, VisualId};
use serde::{Deserialize, Serialize};

use super::DisplayPreset;
use crate::error::SimError;

/// Environment variable naming a config file used when none is given on
/// the command line.
pub const CONFIG_ENV: &str = "RGBSIM_CONFIG";

/// Display simulated when neither a config nor a preset says otherwise.
pub const DEFAULT_PRESET: DisplayPreset = DisplayPreset::Pseudo8;

const PIXEL_SIZES: [u8; 6] = [1, 4, 8, 16, 24, 32];

/// Simulated display loaded from a YAML file.
///
/// ```yaml
/// preset: pseudo8
/// system_colors: ["#000000", "#ffffff"]
/// shared_memory: true
/// pipeline:
///   min_colors: 125
/// ```
///
/// `visuals` replaces the preset entirely when present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Name of a built-in display
    pub preset: Option<String>,

    /// Explicit visual list
    pub visuals: Vec<VisualConfig>,

    /// Id of the default visual; the first visual when unset
    pub default_visual: Option<u32>,

    /// Colors other clients hold in the default visual's system table
    pub system_colors: Vec<String>,

    /// Whether shared-memory surfaces can be created
    pub shared_memory: bool,

    /// Size limit for one shared-memory surface
    pub max_shared_bytes: Option<usize>,

    pub pipeline: PipelineConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preset: None,
            visuals: Vec::new(),
            default_visual: None,
            system_colors: Vec::new(),
            shared_memory: true,
            max_shared_bytes: None,
            pipeline: PipelineConfig::default(),
        }
    }
}

/// One visual of an explicit visual list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VisualConfig {
    pub id: u32,
    pub class: ClassName,
    pub depth: u8,
    pub bits_per_pixel: u8,

    /// Red, green and blue masks, for true and direct color
    #[serde(default)]
    pub masks: Option<[u32; 3]>,

    /// Host order when unset
    #[serde(default)]
    pub byte_order: Option<ByteOrderName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassName {
    StaticGray,
    GrayScale,
    StaticColor,
    PseudoColor,
    TrueColor,
    DirectColor,
}

impl From<ClassName> for VisualClass {
    fn from(name: ClassName) -> Self {
        match name {
            ClassName::StaticGray => VisualClass::StaticGray,
            ClassName::GrayScale => VisualClass::GrayScale,
            ClassName::StaticColor => VisualClass::StaticColor,
            ClassName::PseudoColor => VisualClass::PseudoColor,
            ClassName::TrueColor => VisualClass::TrueColor,
            ClassName::DirectColor => VisualClass::DirectColor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrderName {
    Lsb,
    Msb,
}

impl From<ByteOrderName> for ByteOrder {
    fn from(name: ByteOrderName) -> Self {
        match name {
            ByteOrderName::Lsb => ByteOrder::LsbFirst,
            ByteOrderName::Msb => ByteOrder::MsbFirst,
        }
    }
}

impl VisualConfig {
    pub fn to_visual(&self) -> Result<(Visual, u8), SimError> {
        if !PIXEL_SIZES.contains(&self.bits_per_pixel) {
            return Err(SimError::InvalidDisplay(format!(
                "visual {:#x}: {} bits per pixel is not supported",
                self.id, self.bits_per_pixel
            )));
        }
        if self.depth == 0 || self.depth > self.bits_per_pixel {
            return Err(SimError::InvalidDisplay(format!(
                "visual {:#x}: depth {} does not fit {} bits per pixel",
                self.id, self.depth, self.bits_per_pixel
            )));
        }
        let mut visual = Visual::new(self.id, self.class.into(), self.depth);
        if let Some([red, green, blue]) = self.masks {
            visual = visual.with_masks(red, green, blue);
        }
        if let Some(order) = self.byte_order {
            visual = visual.with_byte_order(order.into());
        }
        Ok((visual, self.bits_per_pixel))
    }
}

/// Pipeline options, see [`RgbOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub verbose: bool,
    pub install_private_table: bool,
    pub min_colors: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let options = RgbOptions::default();
        Self {
            verbose: options.verbose,
            install_private_table: options.install_private_table,
            min_colors: options.min_colors,
        }
    }
}

impl From<&PipelineConfig> for RgbOptions {
    fn from(config: &PipelineConfig) -> Self {
        RgbOptions::default()
            .verbose(config.verbose)
            .install_private_table(config.install_private_table)
            .min_colors(config.min_colors)
    }
}

impl DisplayConfig {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Load a config the user asked for by name; any failure is an error.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content).map_err(|e| SimError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.log_loaded(path);
        Ok(config)
    }

    /// Load a config found through the environment, falling back to the
    /// defaults when it cannot be read.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    config.log_loaded(path);
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Explicit path first, then [`CONFIG_ENV`], then the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SimError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Ok(Self::load_or_default(Path::new(&path))),
            _ => Ok(Self::default()),
        }
    }

    fn log_loaded(&self, path: &Path) {
        tracing::info!(
            path = %path.display(),
            preset = self.preset.as_deref().unwrap_or("-"),
            visuals = self.visuals.len(),
            system_colors = self.system_colors.len(),
            "Loaded configuration"
        );
    }

    /// Replace the displayed visuals with a preset's.
    pub fn with_preset(mut self, preset: DisplayPreset) -> Self {
        self.preset = Some(preset.name().to_string());
        self.visuals.clear();
        self.default_visual = None;
        self
    }

    pub fn preset(&self) -> Result<DisplayPreset, SimError> {
        match &self.preset {
            Some(name) => name.parse(),
            None => Ok(DEFAULT_PRESET),
        }
    }

    /// Visuals with bits per pixel, and the default visual.
    pub fn visuals(&self) -> Result<(Vec<(Visual, u8)>, VisualId), SimError> {
        if self.visuals.is_empty() {
            let preset = self.preset()?;
            return Ok((preset.visuals(), preset.default_visual()));
        }
        let visuals = self
            .visuals
            .iter()
            .map(VisualConfig::to_visual)
            .collect::<Result<Vec<_>, _>>()?;
        let default = match self.default_visual {
            Some(id) => VisualId(id),
            None => visuals[0].0.id,
        };
        if !visuals.iter().any(|(visual, _)| visual.id == default) {
            return Err(SimError::InvalidDisplay(format!(
                "default visual {default} is not in the visual list"
            )));
        }
        Ok((visuals, default))
    }

    pub fn system_colors(&self) -> Result<Vec<Rgb16>, SimError> {
        self.system_colors
            .iter()
            .map(|s| parse_hex_color(s).map(Rgb16::from_rgb24))
            .collect()
    }

    pub fn options(&self) -> RgbOptions {
        RgbOptions::from(&self.pipeline)
    }

    /// Build the in-memory display this config describes.
    pub fn build_display(&self) -> Result<MemoryDisplay, SimError> {
        let (visuals, default) = self.visuals()?;
        let mut display = MemoryDisplay::new(visuals, default).with_shared_memory(self.shared_memory);
        if let Some(bytes) = self.max_shared_bytes {
            display = display.with_max_shared_bytes(bytes);
        }
        let colors = self.system_colors()?;
        if !colors.is_empty() {
            let reserved = display.reserve_colors(default, &colors);
            tracing::debug!(requested = colors.len(), reserved, "Reserved system colors");
        }
        Ok(display)
    }
}

/// Parse `#rrggbb`, `0xrrggbb` or `rrggbb`.
pub fn parse_hex_color(s: &str) -> Result<u32, SimError> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if hex.len() != 6 {
        return Err(SimError::InvalidColor(s.to_string()));
    }
    u32::from_str_radix(hex, 16).map_err(|_| SimError::InvalidColor(s.to_string()))
}
