//! Code 39 character table.
//!
//! Each symbol is nine elements wide, alternating bar/space starting with a
//! bar. Exactly three of the nine are wide, which is what makes the
//! symbology self-checking.

use thiserror::Error;

use crate::consts::WIDE_RATIO;

/// Start/stop sentinel framing every payload.
pub const START_STOP: char = '*';

/// Elements per symbol.
pub const ELEMENTS_PER_SYMBOL: usize = 9;

/// Wide elements per symbol.
pub const WIDE_PER_SYMBOL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Narrow,
    Wide,
}

/// One drawn-or-skipped element of an encoded barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    pub is_bar: bool,
    pub is_wide: bool,
    /// Inter-character gap (always a narrow space).
    pub is_gap: bool,
}

impl Element {
    pub const GAP: Element = Element { is_bar: false, is_wide: false, is_gap: true };

    /// Width in narrow units for a given wide:narrow ratio.
    pub fn units(&self, ratio: f64) -> f64 {
        if self.is_wide { ratio } else { 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code39Symbol {
    pub character: char,
    pub pattern: [Width; ELEMENTS_PER_SYMBOL],
}

impl Code39Symbol {
    pub fn wide_count(&self) -> usize {
        self.pattern.iter().filter(|w| **w == Width::Wide).count()
    }

    /// Pattern as bar/space elements (even index = bar).
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.pattern.iter().enumerate().map(|(i, w)| Element {
            is_bar: i % 2 == 0,
            is_wide: *w == Width::Wide,
            is_gap: false,
        })
    }

    pub fn units(&self, ratio: f64) -> f64 {
        self.elements().map(|e| e.units(ratio)).sum()
    }
}

/// Width of one symbol in narrow units at the standard ratio (6 + 3 * 2.5).
pub fn units_per_symbol() -> f64 {
    (ELEMENTS_PER_SYMBOL - WIDE_PER_SYMBOL) as f64 + WIDE_PER_SYMBOL as f64 * WIDE_RATIO
}

// Patterns written B S B S B S B S B, 'w' = wide.
const fn pat(s: &[u8; ELEMENTS_PER_SYMBOL]) -> [Width; ELEMENTS_PER_SYMBOL] {
    let mut out = [Width::Narrow; ELEMENTS_PER_SYMBOL];
    let mut i = 0;
    while i < ELEMENTS_PER_SYMBOL {
        if s[i] == b'w' {
            out[i] = Width::Wide;
        }
        i += 1;
    }
    out
}

const fn sym(character: char, s: &[u8; ELEMENTS_PER_SYMBOL]) -> Code39Symbol {
    Code39Symbol { character, pattern: pat(s) }
}

pub static SYMBOLS: [Code39Symbol; 44] = [
    sym('0', b"nnnwwnwnn"),
    sym('1', b"wnnwnnnnw"),
    sym('2', b"nnwwnnnnw"),
    sym('3', b"wnwwnnnnn"),
    sym('4', b"nnnwwnnnw"),
    sym('5', b"wnnwwnnnn"),
    sym('6', b"nnwwwnnnn"),
    sym('7', b"nnnwnnwnw"),
    sym('8', b"wnnwnnwnn"),
    sym('9', b"nnwwnnwnn"),
    sym('A', b"wnnnnwnnw"),
    sym('B', b"nnwnnwnnw"),
    sym('C', b"wnwnnwnnn"),
    sym('D', b"nnnnwwnnw"),
    sym('E', b"wnnnwwnnn"),
    sym('F', b"nnwnwwnnn"),
    sym('G', b"nnnnnwwnw"),
    sym('H', b"wnnnnwwnn"),
    sym('I', b"nnwnnwwnn"),
    sym('J', b"nnnnwwwnn"),
    sym('K', b"wnnnnnnww"),
    sym('L', b"nnwnnnnww"),
    sym('M', b"wnwnnnnwn"),
    sym('N', b"nnnnwnnww"),
    sym('O', b"wnnnwnnwn"),
    sym('P', b"nnwnwnnwn"),
    sym('Q', b"nnnnnnwww"),
    sym('R', b"wnnnnnwwn"),
    sym('S', b"nnwnnnwwn"),
    sym('T', b"nnnnwnwwn"),
    sym('U', b"wwnnnnnnw"),
    sym('V', b"nwwnnnnnw"),
    sym('W', b"wwwnnnnnn"),
    sym('X', b"nwnnwnnnw"),
    sym('Y', b"wwnnwnnnn"),
    sym('Z', b"nwwnwnnnn"),
    sym('-', b"nwnnnnwnw"),
    sym('.', b"wwnnnnwnn"),
    sym(' ', b"nwwnnnwnn"),
    sym('$', b"nwnwnwnnn"),
    sym('/', b"nwnwnnnwn"),
    sym('+', b"nwnnnwnwn"),
    sym('%', b"nnnwnwnwn"),
    sym('*', b"nwnnwnwnn"),
];

pub fn lookup(c: char) -> Option<&'static Code39Symbol> {
    SYMBOLS.iter().find(|s| s.character == c)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbologyError {
    #[error("symbol '{character}' has {wide} wide elements, expected 3")]
    WideCount { character: char, wide: usize },

    #[error("symbol '{0}' appears more than once")]
    Duplicate(char),

    #[error("start/stop symbol '*' missing from table")]
    MissingSentinel,
}

/// Check the structural invariants of [`SYMBOLS`].
pub fn verify_table() -> Result<(), SymbologyError> {
    for (i, s) in SYMBOLS.iter().enumerate() {
        let wide = s.wide_count();
        if wide != WIDE_PER_SYMBOL {
            return Err(SymbologyError::WideCount { character: s.character, wide });
        }
        if SYMBOLS[..i].iter().any(|o| o.character == s.character) {
            return Err(SymbologyError::Duplicate(s.character));
        }
    }
    if lookup(START_STOP).is_none() {
        return Err(SymbologyError::MissingSentinel);
    }
    Ok(())
}
