//! Configuration schema types for `jetpalette.toml`
//!
//! Defines the structure and validation rules for jetpalette configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::{is_buff_color, DEFAULT_BUFF_COLOR};
use crate::converter::ConvertOptions;

/// How composed commands are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain command text
    #[default]
    Text,
    /// Colored markup
    Html,
    /// Structured parts as JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}', expected text, html or json", other)),
        }
    }
}

/// When to color terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve against whether stdout is a terminal.
    pub fn enabled(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!("unknown color mode '{}', expected auto, always or never", other)),
        }
    }
}

/// Buff colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorsConfig {
    /// Color for buffs without a valid color of their own
    #[serde(default = "default_buff_color")]
    pub default_buff: String,
    /// Color of the starter equipment buffs
    #[serde(default = "default_equipment_color")]
    pub equipment: String,
    /// Color of the starter dice buffs
    #[serde(default = "default_dice_color")]
    pub dice: String,
}

fn default_buff_color() -> String {
    DEFAULT_BUFF_COLOR.to_string()
}

fn default_equipment_color() -> String {
    ConvertOptions::default().equipment_color
}

fn default_dice_color() -> String {
    ConvertOptions::default().dice_color
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            default_buff: default_buff_color(),
            equipment: default_equipment_color(),
            dice: default_dice_color(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub color: ColorMode,
}

/// Complete jetpalette.toml configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JetConfig {
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "colors.dice")
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "jetpalette.toml: '{}' {}", self.field, self.message)
    }
}

impl JetConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        [
            ("colors.default_buff", &self.colors.default_buff),
            ("colors.equipment", &self.colors.equipment),
            ("colors.dice", &self.colors.dice),
        ]
        .into_iter()
        .filter(|(_, value)| !is_buff_color(value))
        .map(|(field, value)| ConfigValidationError {
            field: field.to_string(),
            message: format!("must be a #RRGGBB color, got '{}'", value),
        })
        .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Starter buff colors for the converter.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions { equipment_color: self.colors.equipment.clone(), dice_color: self.colors.dice.clone() }
    }
}
