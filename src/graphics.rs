use image::{DynamicImage, GrayImage, Luma};
use rusttype::{point, Font, Scale};
use ar_reshaper::{ArabicReshaper, ReshaperConfig};
use unicode_bidi::BidiInfo;

use crate::encoder::EncodedData;
use crate::layout::BarcodeLayout;
use crate::tag::TagError;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Visual-order string: BiDi runs, reshape and reverse RTL runs, keep LTR (digits, SKUs) as is.
fn bidi_then_shape(text: &str, reshaper: &ArabicReshaper) -> String {
    let info = BidiInfo::new(text, None);
    let Some(para) = info.paragraphs.first() else {
        return String::new();
    };
    let (levels, runs) = info.visual_runs(para, para.range.clone());

    let mut out = String::new();
    for (level, range) in levels.into_iter().zip(runs.into_iter()) {
        let slice = &text[range];
        if level.is_rtl() && slice.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
            out.extend(reshaper.reshape(slice).chars().rev());
        } else {
            out.push_str(slice);
        }
    }
    out
}

/// Render one line of tag text as a tight 1-bit image.
/// Width is just the glyphs plus `pad_lr` each side, so the caller can align it.
pub fn render_text_line_tight_1bit(
    text: &str,
    font_bytes: &[u8],
    font_px: f32,
    pad_lr: u32,
) -> Result<GrayImage, TagError> {
    let font = Font::try_from_bytes(font_bytes).ok_or(TagError::Font)?;
    let reshaper = ArabicReshaper::new(ReshaperConfig::default());
    let visual = bidi_then_shape(text, &reshaper);

    let scale = Scale::uniform(font_px);
    let vm = font.v_metrics(scale);
    let ascent = vm.ascent.ceil();
    let descent = vm.descent.floor();
    let line_h = (ascent - descent).ceil().max(1.0) as u32;

    let text_w = font
        .layout(&visual, scale, point(0.0, ascent))
        .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x))
        .max()
        .unwrap_or(0)
        .max(0) as u32;

    let w = (text_w + pad_lr * 2).max(2);
    let mut img = GrayImage::from_pixel(w, line_h, WHITE);

    // Draw twice with 1-px offset for bold. Hard threshold to avoid gray.
    for dx in [0.0f32, 1.0] {
        for g in font.layout(&visual, scale, point(pad_lr as f32 + dx, ascent)) {
            if let Some(bb) = g.pixel_bounding_box() {
                g.draw(|x, y, v| {
                    if v > 0.5 {
                        let px = x as i32 + bb.min.x;
                        let py = y as i32 + bb.min.y;
                        if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < line_h {
                            img.put_pixel(px as u32, py as u32, BLACK);
                        }
                    }
                });
            }
        }
    }

    Ok(img)
}

/// Bars of `layout` as a 1-bit bitmap, one pixel per canvas unit.
///
/// A column is black when its center falls inside a bar; every bar gets at
/// least one column. The label area below the bars is left white.
pub fn rasterize_barcode(layout: &BarcodeLayout) -> GrayImage {
    let w = layout.width.ceil() as u32;
    let h = layout.height.ceil() as u32;
    let bar_h = (layout.bar_height().round() as u32).clamp(1, h);
    let mut img = GrayImage::from_pixel(w, h, WHITE);

    for bar in &layout.bars {
        let first = (bar.x - 0.5).ceil().max(0.0) as u32;
        let end = (bar.x + bar.width - 0.5).ceil().max(0.0) as u32;
        let end = end.max(first + 1).min(w);
        for x in first.min(w.saturating_sub(1))..end {
            for y in 0..bar_h {
                img.put_pixel(x, y, BLACK);
            }
        }
    }
    img
}

/// Bars of `encoded` at whole-dot module widths, for printing.
///
/// Every bar and space is exactly `narrow` or `wide` dots, so the printed
/// ratio is `wide / narrow` rather than a rounded 2.5.
pub fn rasterize_modules(encoded: &EncodedData, narrow: u32, wide: u32, height: u32) -> GrayImage {
    let w = encoded.module_dots(narrow, wide).max(1);
    let h = height.max(1);
    let mut img = GrayImage::from_pixel(w, h, WHITE);

    let mut x = 0;
    for element in &encoded.elements {
        let step = if element.is_wide { wide } else { narrow };
        if element.is_bar {
            for px in x..(x + step).min(w) {
                for y in 0..h {
                    img.put_pixel(px, y, BLACK);
                }
            }
        }
        x += step;
    }
    img
}

/// Rotate 90 degrees clockwise to compensate for driver-locked landscape orientation.
pub fn rotate90(img: &GrayImage) -> GrayImage {
    DynamicImage::ImageLuma8(img.clone()).rotate90().to_luma8()
}
