//! Printer and sheet tuning, loadable from TOML.
//!
//! Every field has a default from [`crate::consts`], so a config file only
//! needs the keys it changes:
//!
//! ```toml
//! darkness = 10
//! narrow = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{key} = {value} is out of range ({min}..={max})")]
    OutOfRange { key: &'static str, value: u32, min: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagConfig {
    /// Label width in dots.
    pub label_w: u32,
    /// Label height in dots.
    pub label_h: u32,
    pub label_gap: u32,
    pub pad: u32,
    pub font_px: f32,
    pub darkness: u8,
    pub speed: u8,
    /// Dots per narrow module on printed barcodes.
    pub narrow: u32,
    /// Printed bar height in dots.
    pub barcode_height: u32,
    pub invert_bits: bool,
    pub landscape: bool,
    /// Use the printer's own Code 39 generator instead of a GW bitmap.
    pub native_barcode: bool,

    pub sheet_barcode_w: f64,
    pub sheet_barcode_h: f64,
    pub bar_color: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            label_w: LABEL_W,
            label_h: LABEL_H,
            label_gap: LABEL_GAP,
            pad: PAD,
            font_px: FONT_PX,
            darkness: DARKNESS,
            speed: SPEED,
            narrow: NARROW,
            barcode_height: HEIGHT,
            invert_bits: INVERT_BITS,
            landscape: FORCE_LANDSCAPE,
            native_barcode: false,
            sheet_barcode_w: SHEET_BARCODE_W,
            sheet_barcode_h: SHEET_BARCODE_H,
            bar_color: BAR_COLOR.to_string(),
        }
    }
}

fn in_range(key: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { key, value, min, max })
    }
}

impl TagConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: TagConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("darkness", self.darkness as u32, 0, 15)?;
        in_range("speed", self.speed as u32, 1, 6)?;
        in_range("narrow", self.narrow, 1, 10)?;
        in_range("label_w", self.label_w, 1, 4096)?;
        in_range("label_h", self.label_h, 1, 4096)?;
        in_range("barcode_height", self.barcode_height, 1, self.label_h)?;
        Ok(())
    }
}
