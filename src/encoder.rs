//! SKU → Code 39 element stream.
//!
//! Encoding is total: anything outside the printable alphabet is dropped,
//! so every input yields at least the `**` frame.

use crate::symbology::{lookup, Element, START_STOP};

/// Characters kept by [`sanitize`].
pub fn is_supported(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | ' ')
}

/// Uppercase, then drop every character outside `0-9 A-Z - . space`.
pub fn sanitize(raw: &str) -> String {
    raw.to_uppercase().chars().filter(|c| is_supported(*c)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedData {
    /// Bars, spaces and inter-character gaps, left to right.
    pub elements: Vec<Element>,
    /// Sanitized SKU, without the `*` frame.
    pub label: String,
    /// Symbols actually encoded, sentinels included.
    pub char_count: usize,
}

impl EncodedData {
    pub fn framed(&self) -> String {
        format!("{START_STOP}{}{START_STOP}", self.label)
    }

    pub fn gap_count(&self) -> usize {
        self.char_count.saturating_sub(1)
    }

    pub fn bar_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_bar).count()
    }

    pub fn total_units(&self, ratio: f64) -> f64 {
        self.elements.iter().map(|e| e.units(ratio)).sum()
    }

    /// Printed width with whole-dot modules.
    pub fn module_dots(&self, narrow: u32, wide: u32) -> u32 {
        self.elements.iter().map(|e| if e.is_wide { wide } else { narrow }).sum()
    }

    /// `n`/`w` per element, symbols separated by the gap as `|`.
    pub fn pattern_string(&self) -> String {
        self.elements
            .iter()
            .map(|e| match (e.is_gap, e.is_wide) {
                (true, _) => '|',
                (false, true) => 'w',
                (false, false) => 'n',
            })
            .collect()
    }
}

pub fn encode(raw_sku: &str) -> EncodedData {
    let label = sanitize(raw_sku);
    let framed = format!("{START_STOP}{label}{START_STOP}");

    let mut elements = Vec::with_capacity(framed.len() * 10);
    let mut char_count = 0;
    for c in framed.chars() {
        let Some(symbol) = lookup(c) else {
            log::warn!("no Code 39 pattern for {c:?}, skipping");
            continue;
        };
        if char_count > 0 {
            elements.push(Element::GAP);
        }
        elements.extend(symbol.elements());
        char_count += 1;
    }

    log::debug!("encoded {framed:?}: {char_count} symbols, {} elements", elements.len());
    EncodedData { elements, label, char_count }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_uppercases_and_filters() {
        assert_eq!(sanitize("rt 482917!"), "RT 482917");
        assert_eq!(sanitize("héllo"), "HLLO");
        assert_eq!(sanitize("a/b$c+d%e"), "ABCDE");
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn sanitize_is_idempotent_and_closed() {
        for s in ["RT-482917", "rt 482917!", "héllo", "ß-straße", "ı.i", "\t\n*", ""] {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
            assert!(once.chars().all(is_supported), "{once:?}");
        }
    }

    #[test]
    fn every_sanitized_char_is_in_table() {
        let all: String = (0u8..=127).map(char::from).collect();
        for c in sanitize(&all).chars().chain(['*']) {
            let s = lookup(c).unwrap();
            assert_eq!(s.wide_count(), 3);
        }
    }

    #[test]
    fn encode_element_count() {
        let e = encode("RT-482917");
        assert_eq!(e.label, "RT-482917");
        assert_eq!(e.char_count, 11);
        assert_eq!(e.elements.len(), 11 * 9 + 10);
        assert_eq!(e.framed(), "*RT-482917*");
        assert_eq!(e.gap_count(), e.char_count - 1);
    }

    #[test]
    fn module_dots_counts_whole_modules() {
        let e = encode("");
        // 2 symbols of 6 narrow + 3 wide, plus one narrow gap
        assert_eq!(e.module_dots(1, 3), 2 * (6 + 9) + 1);
        assert_eq!(e.module_dots(2, 5), 2 * (12 + 15) + 2);
    }

    #[test]
    fn empty_sku_still_frames() {
        let e = encode("");
        assert_eq!(e.label, "");
        assert_eq!(e.char_count, 2);
        assert_eq!(e.elements.len(), 19);
        assert_eq!(e.bar_count(), 10);
        assert_eq!(e.gap_count(), 1);
        assert_eq!(e.pattern_string(), "nwnnwnwnn|nwnnwnwnn");
    }

    #[test]
    fn gaps_sit_between_symbols_only() {
        let e = encode("A");
        assert!(!e.elements.first().unwrap().is_gap);
        assert!(!e.elements.last().unwrap().is_gap);
        let gaps: Vec<usize> = e
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.is_gap)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(gaps, [9, 19]);
    }

    #[test]
    fn encode_is_deterministic() {
        assert_eq!(encode("rt-1"), encode("rt-1"));
    }
}
