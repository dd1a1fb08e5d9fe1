// Barcode geometry
pub const WIDE_RATIO: f64 = 2.5;          // wide:narrow, standard Code 39 proportion
pub const MIN_BAR_WIDTH: f64 = 0.5;       // smallest drawn bar, canvas units
pub const BAR_HEIGHT_FRACTION: f64 = 0.75;
pub const LABEL_FONT_FRACTION: f64 = 0.17;
pub const LABEL_BASELINE_INSET: f64 = 2.0;
pub const BAR_COLOR: &str = "hsl(30, 22%, 14%)";

// Sheet card barcode (matches the on-screen tag preview)
pub const SHEET_BARCODE_W: f64 = 180.0;
pub const SHEET_BARCODE_H: f64 = 55.0;

// Label and printer tuning constants (203 dpi)
pub const LABEL_W: u32 = 440;             // dots (≈55 mm)
pub const LABEL_H: u32 = 320;             // dots (≈40 mm)
pub const LABEL_GAP: u32 = 24;

pub const PAD: u32 = 10;
pub const FONT_PX: f32 = 36.0;
pub const DARKNESS: u8 = 8;               // D0..D15
pub const SPEED: u8 = 2;                  // S1..S6

pub const NARROW: u32 = 2;                // dots per narrow module
pub const HEIGHT: u32 = 60;               // printed bar height, dots

pub const FORCE_LANDSCAPE: bool = false;  // rotate content if driver prints landscape
pub const INVERT_BITS: bool = true;       // flip GW bits → black text on white
