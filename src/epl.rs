use image::GrayImage;

use crate::consts::WIDE_RATIO;
use crate::encoder::sanitize;

/// Append an EPL ASCII command line terminated with CRLF
pub fn epl_line(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

/// Convert a 1-bit image (Luma 0=black, 255=white) into row-packed bytes, MSB first.
/// Returns (width, height, rows)
pub fn image_to_row_bytes(img: &GrayImage, invert: bool) -> (u32, u32, Vec<u8>) {
    let (w, h) = (img.width(), img.height());
    let bpr = w.div_ceil(8) as usize;
    let mut out = vec![0u8; bpr * h as usize];

    for y in 0..h {
        for x in 0..w {
            if img.get_pixel(x, y).0[0] < 128 {
                let i = y as usize * bpr + (x as usize / 8);
                out[i] |= 1 << (7 - (x as usize % 8));
            }
        }
    }
    if invert {
        for b in &mut out {
            *b = !*b;
        }
    }
    (w, h, out)
}

/// Append GW header + raw binary rows + CRLF
pub fn gw_bytes(buf: &mut Vec<u8>, x: u32, y: u32, w: u32, h: u32, rows: &[u8]) {
    let bpr = w.div_ceil(8);
    epl_line(buf, &format!("GW{},{},{},{}", x, y, bpr, h));
    buf.extend_from_slice(rows);
    buf.extend_from_slice(b"\r\n");
}

/// Bitmap at (x, y), packed and appended as a GW block.
pub fn gw_image(buf: &mut Vec<u8>, x: u32, y: u32, img: &GrayImage, invert: bool) {
    let (w, h, rows) = image_to_row_bytes(img, invert);
    gw_bytes(buf, x, y, w, h, &rows);
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Wide module in dots for a narrow module, at least one dot wider.
pub fn wide_dots(narrow: u32) -> u32 {
    ((narrow as f64 * WIDE_RATIO).round() as u32).max(narrow + 1)
}

/// Printer-native Code 39 (`B` command, type 3). `data` is sanitized first.
pub fn code39_command(
    x: u32,
    y: u32,
    rotation: u8,
    narrow: u32,
    height: u32,
    human_readable: bool,
    data: &str,
) -> String {
    format!(
        "B{},{},{},3,{},{},{},{},\"{}\"",
        x,
        y,
        rotation,
        narrow,
        wide_dots(narrow),
        height,
        if human_readable { 'B' } else { 'N' },
        sanitize(data)
    )
}

/// Resident-font ASCII text (`A` command), no scaling. `rotation` is 0..=3 quarter turns.
pub fn ascii_text_command(x: u32, y: u32, rotation: u8, font: u8, text: &str) -> String {
    format!("A{},{},{},{},1,1,N,\"{}\"", x, y, rotation, font, quote(text))
}

/// Dot width of `text` in resident font `font` (fonts 1..=5 at 203 dpi).
pub fn ascii_text_width(font: u8, text: &str) -> u32 {
    let cell = match font {
        1 => 10,
        2 => 12,
        3 => 14,
        4 => 16,
        _ => 34,
    };
    cell * text.chars().count() as u32
}
