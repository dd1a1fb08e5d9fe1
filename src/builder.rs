//! Price tag output: EPL2 print jobs (one label per tag) and SVG tag sheets.

use std::fmt::Write;

use image::GrayImage;

use crate::config::TagConfig;
use crate::encoder::encode;
use crate::epl::{
    ascii_text_command, ascii_text_width, code39_command, epl_line, gw_image, wide_dots,
};
use crate::graphics::{rasterize_modules, render_text_line_tight_1bit, rotate90};
use crate::layout::layout;
use crate::svg::{escape_xml, num, write_barcode_body, SvgStyle};
use crate::tag::{PriceTag, PrintLayout, TagError};

const LINE_GAP: u32 = 4;
const HRI_FONT: u8 = 2;

/// Resident font line heights in dots (fonts 1..=5 at 203 dpi).
fn resident_line_h(font: u8) -> u32 {
    match font {
        1 => 12,
        2 => 16,
        3 => 20,
        4 => 24,
        _ => 48,
    }
}

fn center(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}

/// Resident fonts are ASCII only. Separators get ASCII stand-ins, anything else becomes `?`.
fn to_ascii(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '·' | '•' | '–' | '—' => '-',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

struct LabelWriter<'a> {
    buf: Vec<u8>,
    config: &'a TagConfig,
    font: Option<&'a [u8]>,
    y: u32,
}

impl<'a> LabelWriter<'a> {
    fn new(config: &'a TagConfig, font: Option<&'a [u8]>) -> Self {
        Self { buf: Vec::new(), config, font, y: config.pad }
    }

    fn rotation(&self) -> u8 {
        if self.config.landscape { 1 } else { 0 }
    }

    /// Top-left of an element laid out at (x, y) with height `h` in portrait.
    /// Landscape turns the content 90° clockwise: (x, y) → (label_h − y − h, x),
    /// so the first line ends up rightmost and lines still read top to bottom.
    fn place(&self, x: u32, y: u32, h: u32) -> (u32, u32) {
        if self.config.landscape {
            (self.config.label_h.saturating_sub(y + h), x)
        } else {
            (x, y)
        }
    }

    fn begin(&mut self) {
        let c = self.config;
        self.y = c.pad;
        epl_line(&mut self.buf, "N");
        epl_line(&mut self.buf, &format!("q{}", c.label_w));
        epl_line(&mut self.buf, &format!("Q{},{}", c.label_h, c.label_gap));
        epl_line(&mut self.buf, &format!("D{}", c.darkness));
        epl_line(&mut self.buf, &format!("S{}", c.speed));
    }

    fn bitmap(&mut self, x: u32, img: &GrayImage) {
        let (px, py) = self.place(x, self.y, img.height());
        if self.config.landscape {
            gw_image(&mut self.buf, px, py, &rotate90(img), self.config.invert_bits);
        } else {
            gw_image(&mut self.buf, px, py, img, self.config.invert_bits);
        }
    }

    /// Centered text line: font bitmap when a font is loaded, resident font otherwise.
    fn text(&mut self, text: &str, font_px: f32, resident: u8) -> Result<(), TagError> {
        if text.is_empty() {
            return Ok(());
        }
        let h = match self.font {
            Some(font) => {
                let img = render_text_line_tight_1bit(text, font, font_px, 3)?;
                self.bitmap(center(self.config.label_w, img.width()), &img);
                img.height()
            }
            None => {
                let ascii = to_ascii(text);
                let x = center(self.config.label_w, ascii_text_width(resident, &ascii));
                let (px, py) = self.place(x, self.y, resident_line_h(resident));
                let cmd = ascii_text_command(px, py, self.rotation(), resident, &ascii);
                epl_line(&mut self.buf, &cmd);
                resident_line_h(resident)
            }
        };
        self.y += h + LINE_GAP;
        Ok(())
    }

    /// Code 39 for `sku`, narrowed module by module until it fits between the pads.
    /// Modules are whole dots (`narrow`, `wide_dots(narrow)`) on both paths.
    fn barcode(&mut self, sku: &str) -> Result<(), TagError> {
        let c = self.config;
        let encoded = encode(sku);
        let avail = c.label_w.saturating_sub(2 * c.pad);

        let narrow = (1..=c.narrow)
            .rev()
            .find(|n| encoded.module_dots(*n, wide_dots(*n)) <= avail)
            .unwrap_or_else(|| {
                log::warn!("barcode {:?} is wider than the label even at 1 dot", encoded.label);
                1
            });
        let wide = wide_dots(narrow);
        let x = center(c.label_w, encoded.module_dots(narrow, wide));

        if c.native_barcode {
            let (px, py) = self.place(x, self.y, c.barcode_height);
            let cmd = code39_command(
                px,
                py,
                self.rotation(),
                narrow,
                c.barcode_height,
                false,
                &encoded.label,
            );
            epl_line(&mut self.buf, &cmd);
        } else {
            let bars = rasterize_modules(&encoded, narrow, wide, c.barcode_height);
            self.bitmap(x, &bars);
        }
        self.y += c.barcode_height + LINE_GAP;

        let hri_x = center(c.label_w, ascii_text_width(HRI_FONT, &encoded.label));
        let (px, py) = self.place(hri_x, self.y, resident_line_h(HRI_FONT));
        let cmd = ascii_text_command(px, py, self.rotation(), HRI_FONT, &encoded.label);
        epl_line(&mut self.buf, &cmd);
        self.y += resident_line_h(HRI_FONT) + LINE_GAP;
        Ok(())
    }

    fn finish(&mut self) {
        if self.y > self.config.label_h {
            log::warn!("tag content runs to {} dots on a {}-dot label", self.y, self.config.label_h);
        }
        epl_line(&mut self.buf, "P1");
    }
}

/// Build one EPL2 job printing every tag on its own label.
/// - `font`: TTF bytes for name/price lines; `None` falls back to resident fonts.
/// Returns raw bytes ready to send to the printer.
pub fn build_epl_job(
    tags: &[PriceTag],
    font: Option<&[u8]>,
    config: &TagConfig,
) -> Result<Vec<u8>, TagError> {
    if tags.is_empty() {
        return Err(TagError::NoTags);
    }

    let mut w = LabelWriter::new(config, font);
    for tag in tags {
        w.begin();
        w.text(&tag.name, config.font_px, 3)?;
        w.text(&tag.display_price(), config.font_px * 1.3, 4)?;
        w.text(&tag.variant_line(), config.font_px * 0.6, 2)?;
        w.barcode(&tag.sku)?;
        w.finish();
    }
    log::info!("built EPL job: {} labels, {} bytes", tags.len(), w.buf.len());
    Ok(w.buf)
}

// Card geometry, sheet units
const CARD_PAD: f64 = 20.0;
const SHEET_GAP: f64 = 16.0;
const NAME_Y: f64 = 36.0;
const PRICE_Y: f64 = 72.0;
const SKU_Y: f64 = 92.0;
const VARIANT_Y: f64 = 110.0;
const BARCODE_Y: f64 = 122.0;

/// Printable sheet of tag cards, `print_layout.columns()` per row.
pub fn build_sheet_svg(
    tags: &[PriceTag],
    print_layout: PrintLayout,
    config: &TagConfig,
) -> Result<String, TagError> {
    if tags.is_empty() {
        return Err(TagError::NoTags);
    }

    let (bw, bh) = (config.sheet_barcode_w, config.sheet_barcode_h);
    let card_w = bw + 2.0 * CARD_PAD;
    let card_h = BARCODE_Y + bh + CARD_PAD;
    let cols = print_layout.columns().min(tags.len());
    let rows = tags.len().div_ceil(cols);
    let sheet_w = cols as f64 * card_w + (cols - 1) as f64 * SHEET_GAP;
    let sheet_h = rows as f64 * card_h + (rows - 1) as f64 * SHEET_GAP;

    let style = SvgStyle { fill: config.bar_color.clone(), ..SvgStyle::default() };
    let mid = num(card_w / 2.0);

    let (w, h) = (num(sheet_w), num(sheet_h));
    let mut out = format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
    );
    for (i, tag) in tags.iter().enumerate() {
        let barcode = layout(&encode(&tag.sku), bw, bh)?;
        let x = (i % cols) as f64 * (card_w + SHEET_GAP);
        let y = (i / cols) as f64 * (card_h + SHEET_GAP);

        let _ = write!(
            out,
            r##"<g class="tag" transform="translate({},{})"><rect x="0" y="0" width="{}" height="{}" rx="8" fill="#fff" stroke="#0000004d"/>"##,
            num(x),
            num(y),
            num(card_w),
            num(card_h)
        );
        let _ = write!(
            out,
            r#"<text x="{mid}" y="{}" text-anchor="middle" font-size="16" font-family="serif" font-weight="600">{}</text>"#,
            num(NAME_Y),
            escape_xml(&tag.name)
        );
        let _ = write!(
            out,
            r#"<text x="{mid}" y="{}" text-anchor="middle" font-size="30" font-family="serif" font-weight="700">{}</text>"#,
            num(PRICE_Y),
            escape_xml(&tag.display_price())
        );
        let _ = write!(
            out,
            r#"<text x="{mid}" y="{}" text-anchor="middle" font-size="11" font-family="monospace">{}</text>"#,
            num(SKU_Y),
            escape_xml(&tag.sku)
        );
        let variants = tag.variant_line();
        if !variants.is_empty() {
            let _ = write!(
                out,
                r#"<text x="{mid}" y="{}" text-anchor="middle" font-size="11">{}</text>"#,
                num(VARIANT_Y),
                escape_xml(&variants)
            );
        }
        let _ = write!(
            out,
            r#"<g transform="translate({},{})">"#,
            num(CARD_PAD),
            num(BARCODE_Y)
        );
        write_barcode_body(&mut out, &barcode, &style);
        out.push_str("</g></g>");
    }
    out.push_str("</svg>");

    log::info!("built tag sheet: {} tags, {} per row", tags.len(), cols);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn shirt() -> PriceTag {
        PriceTag {
            name: "Heritage Cotton Oxford Shirt".into(),
            price: 59.99,
            sku: "RT-482917".into(),
            sizes: vec!["S".into(), "M".into(), "L".into()],
            color: "White".into(),
        }
    }

    #[test]
    fn job_header_and_text() {
        let config = TagConfig { native_barcode: true, ..TagConfig::default() };
        let tags = [shirt(), PriceTag::new("Leather Crossbody Bag", 99.99, "RT-319846")];
        let job = build_epl_job(&tags, None, &config).unwrap();
        let text = String::from_utf8(job).unwrap();

        assert!(text.starts_with("N\r\nq440\r\nQ320,24\r\nD8\r\nS2\r\n"));
        assert_eq!(text.matches("\r\nP1\r\n").count(), 2);
        assert!(text.contains(",3,1,1,N,\"Heritage Cotton Oxford Shirt\""));
        assert!(text.contains("\"$59.99\""));
        assert!(text.contains("\"S M L - White\""));
        assert!(text.contains(",0,3,2,5,60,N,\"RT-482917\""));
        assert!(text.contains(",2,1,1,N,\"RT-319846\""));
    }

    #[test]
    fn bitmap_barcode_is_pixel_exact() {
        let job = build_epl_job(&[shirt()], None, &TagConfig::default()).unwrap();
        // 11 symbols * 13.5 + 10 gaps = 158.5 units, 2 dots each = 317 dots
        assert!(contains(&job, b"GW61,"));
        assert!(contains(&job, b",40,60\r\n"));
    }

    #[test]
    fn long_sku_drops_to_one_dot() {
        let config = TagConfig { native_barcode: true, ..TagConfig::default() };
        let tag = PriceTag::new("x", 1.0, "ABCDEFGHIJKLMNOPQRST");
        let text = String::from_utf8(build_epl_job(&[tag], None, &config).unwrap()).unwrap();
        assert!(text.contains(",0,3,1,3,60,N,\"ABCDEFGHIJKLMNOPQRST\""));
    }

    #[test]
    fn landscape_turns_content_clockwise() {
        let config = TagConfig { native_barcode: true, landscape: true, ..TagConfig::default() };
        let text = String::from_utf8(build_epl_job(&[shirt()], None, &config).unwrap()).unwrap();

        // name at y=10 (20 high), price at y=34 (24 high) on a 320-dot label
        assert!(text.contains("A290,24,1,3,1,1,N,\"Heritage Cotton Oxford Shirt\""));
        assert!(text.contains("A262,172,1,4,1,1,N,\"$59.99\""));
        assert!(text.contains(",1,3,2,5,60,N,\"RT-482917\""));

        // later lines sit further left
        let xs: Vec<u32> = text
            .lines()
            .filter_map(|l| l.strip_prefix('A'))
            .map(|l| l.split(',').next().unwrap().parse().unwrap())
            .collect();
        assert!(xs.windows(2).all(|p| p[0] > p[1]), "{xs:?}");
    }

    #[test]
    fn odd_narrow_bitmap_uses_whole_modules() {
        let config = TagConfig { narrow: 3, ..TagConfig::default() };
        let job = build_epl_job(&[shirt()], None, &config).unwrap();
        // 11 symbols * (6*3 + 3*8) + 10 gaps * 3 = 492 > 420, so 2 dots: 317 wide
        assert!(contains(&job, b"GW61,"));

        let tag = PriceTag::new("x", 1.0, "RT-4829");
        let job = build_epl_job(&[tag], None, &config).unwrap();
        // 9 symbols * 42 + 8 * 3 = 402 dots, 51 bytes per row
        assert!(contains(&job, b"GW19,"));
        assert!(contains(&job, b",51,60\r\n"));
    }

    #[test]
    fn long_sku_bitmap_drops_to_one_dot() {
        let tag = PriceTag::new("x", 1.0, "RT-48291712345");
        let job = build_epl_job(&[tag], None, &TagConfig::default()).unwrap();
        // 16 symbols * 15 + 15 gaps = 255 dots at narrow 1, wide 3
        assert!(contains(&job, b"GW92,"));
        assert!(contains(&job, b",32,60\r\n"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(build_epl_job(&[], None, &TagConfig::default()), Err(TagError::NoTags)));
        assert!(matches!(
            build_sheet_svg(&[], PrintLayout::TwoUp, &TagConfig::default()),
            Err(TagError::NoTags)
        ));
    }

    #[test]
    fn bad_font_fails_the_job() {
        let r = build_epl_job(&[shirt()], Some(&b"nope"[..]), &TagConfig::default());
        assert!(matches!(r, Err(TagError::Font)));
    }

    #[test]
    fn sheet_grid() {
        let tags = vec![shirt(); 5];
        let svg = build_sheet_svg(&tags, PrintLayout::FourUp, &TagConfig::default()).unwrap();
        assert_eq!(svg.matches(r#"class="tag""#).count(), 5);
        assert_eq!(svg.matches("<rect").count(), 5 + 5 * 55);
        // 4 cards of 220 + 3 gaps of 16; 2 rows of 197 + 1 gap
        assert!(svg.starts_with(r#"<svg width="928" height="410""#));
        assert!(svg.contains(r#"translate(236,0)"#));
        assert!(svg.contains(r#"translate(0,213)"#));
        assert!(svg.contains(">$59.99</text>"));
        assert!(svg.contains(">S M L · White</text>"));
    }

    #[test]
    fn sheet_narrower_than_layout() {
        let svg = build_sheet_svg(&[shirt()], PrintLayout::FourUp, &TagConfig::default()).unwrap();
        assert!(svg.starts_with(r#"<svg width="220" height="197""#));
    }

    #[test]
    fn zero_size_sheet_barcode_is_a_layout_error() {
        let config = TagConfig { sheet_barcode_w: 0.0, ..TagConfig::default() };
        assert!(matches!(
            build_sheet_svg(&[shirt()], PrintLayout::TwoUp, &config),
            Err(TagError::Layout(_))
        ));
    }
}
