//! Price tag records and the catalog file they come from.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutError;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("no tags to print")]
    NoTags,

    #[error("font data could not be parsed")]
    Font,

    #[error("tag {sku:?} has invalid price {price}")]
    InvalidPrice { sku: String, price: f64 },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTag {
    pub name: String,
    pub price: f64,
    pub sku: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub color: String,
}

impl PriceTag {
    pub fn new(name: impl Into<String>, price: f64, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            sku: sku.into(),
            sizes: Vec::new(),
            color: String::new(),
        }
    }

    pub fn display_price(&self) -> String {
        format_price(self.price)
    }

    /// "S M L · White", or whatever part is present.
    pub fn variant_line(&self) -> String {
        let sizes = self.sizes.join(" ");
        match (sizes.is_empty(), self.color.is_empty()) {
            (false, false) => format!("{sizes} · {}", self.color),
            (false, true) => sizes,
            (true, _) => self.color.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), TagError> {
        if self.price.is_finite() && self.price >= 0.0 {
            Ok(())
        } else {
            Err(TagError::InvalidPrice { sku: self.sku.clone(), price: self.price })
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Tags per row on a printed sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintLayout {
    TwoUp,
    #[default]
    FourUp,
}

impl PrintLayout {
    pub fn columns(self) -> usize {
        match self {
            PrintLayout::TwoUp => 2,
            PrintLayout::FourUp => 4,
        }
    }
}

impl FromStr for PrintLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2" => Ok(PrintLayout::TwoUp),
            "4" => Ok(PrintLayout::FourUp),
            other => Err(format!("unsupported layout {other:?}, expected 2 or 4")),
        }
    }
}

impl fmt::Display for PrintLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns())
    }
}

/// `[[tag]]` tables in a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "tag")]
    pub tags: Vec<PriceTag>,
}

impl Catalog {
    pub fn from_toml_str(s: &str) -> Result<Self, TagError> {
        let catalog: Catalog = toml::from_str(s)?;
        for tag in &catalog.tags {
            tag.validate()?;
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, TagError> {
        let text = std::fs::read_to_string(path).map_err(|source| TagError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_toml_str(&text)?;
        log::info!("loaded {} tags from {}", catalog.tags.len(), path.display());
        Ok(catalog)
    }
}
