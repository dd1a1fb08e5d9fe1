//! Vector output for screen previews and browser printing.

use std::fmt::Write;

use crate::consts::BAR_COLOR;
use crate::layout::{render, BarcodeLayout, LayoutError};

#[derive(Debug, Clone)]
pub struct SvgStyle {
    pub fill: String,
    pub font_family: String,
    pub show_label: bool,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            fill: BAR_COLOR.to_string(),
            font_family: "monospace".to_string(),
            show_label: true,
        }
    }
}

/// Short decimal: at most 3 places, no trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Bars and label as `<rect>`/`<text>` children, no `<svg>` wrapper.
pub(crate) fn write_barcode_body(out: &mut String, layout: &BarcodeLayout, style: &SvgStyle) {
    let bar_h = num(layout.bar_height());
    for bar in &layout.bars {
        let _ = write!(
            out,
            r#"<rect x="{}" y="0" width="{}" height="{}" fill="{}"/>"#,
            num(bar.x),
            num(bar.width),
            bar_h,
            style.fill
        );
    }
    if style.show_label {
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="{}" font-family="{}" fill="{}">{}</text>"#,
            num(layout.width / 2.0),
            num(layout.label_baseline()),
            num(layout.label_font_size()),
            style.font_family,
            style.fill,
            escape_xml(&layout.label)
        );
    }
}

pub fn render_svg(layout: &BarcodeLayout, style: &SvgStyle) -> String {
    let (w, h) = (num(layout.width), num(layout.height));
    let mut out = format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
    );
    write_barcode_body(&mut out, layout, style);
    out.push_str("</svg>");
    out
}

pub fn barcode_svg(sku: &str, width: f64, height: f64) -> Result<String, LayoutError> {
    Ok(render_svg(&render(sku, width, height)?, &SvgStyle::default()))
}
