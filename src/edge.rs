//! Turns successive per-column row bitmasks into key transitions

use crate::fmt::trace;
use crate::hw::EventSink;
use crate::keymap::KeypadGeometry;

/// Rows of one column that went down or up between two scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edges {
    pub press: u32,
    pub release: u32,
}

impl Edges {
    pub const fn between(current: u32, previous: u32) -> Self {
        let changed = current ^ previous;
        Edges {
            press: changed & current,
            release: changed & previous,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.press == 0 && self.release == 0
    }
}

/// Set bits of `mask`, lowest first
fn bits(mut mask: u32) -> impl Iterator<Item = usize> {
    core::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let bit = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(bit)
    })
}

/// Reports every transition between `previous` and `current`.
///
/// Columns are visited in ascending order. Within a column all presses are reported before any
/// release, each lowest row first. Rows without a key code are skipped.
pub fn report<S: EventSink, const ROWS: usize, const COLS: usize>(
    geometry: &KeypadGeometry<ROWS, COLS>,
    current: &[u32; COLS],
    previous: &[u32; COLS],
    sink: &mut S,
) {
    for (col, (current, previous)) in current.iter().zip(previous).enumerate() {
        let edges = Edges::between(*current, *previous);
        if edges.is_empty() {
            continue;
        }
        for row in bits(edges.press) {
            if let Some(code) = geometry.code(col, row) {
                trace!("key down {} at {},{}", code, col, row);
                sink.report_key(code, true);
            }
        }
        for row in bits(edges.release) {
            if let Some(code) = geometry.code(col, row) {
                trace!("key up {} at {},{}", code, col, row);
                sink.report_key(code, false);
            }
        }
    }
}
