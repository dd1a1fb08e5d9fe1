//! Element stream → absolute bar geometry on a canvas.

use thiserror::Error;

use crate::consts::{
    BAR_HEIGHT_FRACTION, LABEL_BASELINE_INSET, LABEL_FONT_FRACTION, MIN_BAR_WIDTH, WIDE_RATIO,
};
use crate::encoder::{encode, EncodedData};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid {what}: {value} (must be a positive finite number)")]
    InvalidArgument { what: &'static str, value: f64 },
}

/// A drawn bar, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeLayout {
    /// Bars only; spaces are the gaps between them.
    pub bars: Vec<BarGeometry>,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub narrow_width: f64,
    /// Sum of every element's advance. Equals `width` up to rounding.
    pub total_advance: f64,
}

impl BarcodeLayout {
    pub fn bar_height(&self) -> f64 {
        self.height * BAR_HEIGHT_FRACTION
    }

    pub fn label_font_size(&self) -> f64 {
        self.height * LABEL_FONT_FRACTION
    }

    pub fn label_baseline(&self) -> f64 {
        self.height - LABEL_BASELINE_INSET
    }

    pub fn wide_width(&self) -> f64 {
        self.narrow_width * WIDE_RATIO
    }
}

fn check_dimension(what: &'static str, value: f64) -> Result<f64, LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidArgument { what, value })
    }
}

/// Scale `encoded` to fill exactly `canvas_width`.
///
/// Drawn bars are widened to [`MIN_BAR_WIDTH`] when the canvas is tiny, but
/// never into the next bar; the cursor always advances by the true width.
pub fn layout(
    encoded: &EncodedData,
    canvas_width: f64,
    canvas_height: f64,
) -> Result<BarcodeLayout, LayoutError> {
    let width = check_dimension("canvas width", canvas_width)?;
    let height = check_dimension("canvas height", canvas_height)?;

    let units = encoded.total_units(WIDE_RATIO);
    let narrow = width / units;
    let advance = |i: usize| encoded.elements[i].units(WIDE_RATIO) * narrow;

    let mut bars = Vec::with_capacity(encoded.bar_count());
    let mut cursor = 0.0;
    for (i, element) in encoded.elements.iter().enumerate() {
        let w = advance(i);
        if element.is_bar {
            let room = if i + 1 < encoded.elements.len() {
                w + advance(i + 1)
            } else {
                width - cursor
            };
            let drawn = w.max(MIN_BAR_WIDTH).min(room).max(w);
            bars.push(BarGeometry { x: cursor, width: drawn });
        }
        cursor += w;
    }

    log::debug!(
        "layout {:?}: {} bars, narrow {:.4}, advance {:.4}/{}",
        encoded.label,
        bars.len(),
        narrow,
        cursor,
        width
    );

    Ok(BarcodeLayout {
        bars,
        label: encoded.label.clone(),
        width,
        height,
        narrow_width: narrow,
        total_advance: cursor,
    })
}

/// [`encode`] then [`layout`].
pub fn render(sku: &str, width: f64, height: f64) -> Result<BarcodeLayout, LayoutError> {
    layout(&encode(sku), width, height)
}
