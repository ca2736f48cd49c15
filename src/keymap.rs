//! Associates matrix positions with key codes

// Export as pub so that it can be used from macro
#[doc(hidden)]
pub use paste::paste;

/// A logical key code, numbered as in the Linux input event layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// Reserved code, never reported
    pub const RESERVED: KeyCode = KeyCode(0);
    /// Highest code the input layer accepts
    pub const MAX: KeyCode = KeyCode(0x2ff);

    /// Whether this code names a real key, as opposed to the reserved code or something out of
    /// range
    pub const fn is_valid(self) -> bool {
        self.0 != Self::RESERVED.0 && self.0 <= Self::MAX.0
    }
}

impl From<KeyCode> for u16 {
    fn from(code: KeyCode) -> Self {
        code.0
    }
}

/// Named codes, for use with [`make_keymap!`]
#[allow(missing_docs)]
pub mod codes {
    use super::KeyCode;

    pub const KEY_ESC: KeyCode = KeyCode(1);
    pub const KEY_1: KeyCode = KeyCode(2);
    pub const KEY_2: KeyCode = KeyCode(3);
    pub const KEY_3: KeyCode = KeyCode(4);
    pub const KEY_4: KeyCode = KeyCode(5);
    pub const KEY_5: KeyCode = KeyCode(6);
    pub const KEY_6: KeyCode = KeyCode(7);
    pub const KEY_7: KeyCode = KeyCode(8);
    pub const KEY_8: KeyCode = KeyCode(9);
    pub const KEY_9: KeyCode = KeyCode(10);
    pub const KEY_0: KeyCode = KeyCode(11);
    pub const KEY_BACKSPACE: KeyCode = KeyCode(14);
    pub const KEY_TAB: KeyCode = KeyCode(15);
    pub const KEY_LEFTBRACE: KeyCode = KeyCode(26);
    pub const KEY_ENTER: KeyCode = KeyCode(28);
    pub const KEY_A: KeyCode = KeyCode(30);
    pub const KEY_D: KeyCode = KeyCode(32);
    pub const KEY_LEFTSHIFT: KeyCode = KeyCode(42);
    pub const KEY_C: KeyCode = KeyCode(46);
    pub const KEY_B: KeyCode = KeyCode(48);
    pub const KEY_M: KeyCode = KeyCode(50);
    pub const KEY_SPACE: KeyCode = KeyCode(57);
    pub const KEY_CAPSLOCK: KeyCode = KeyCode(58);
    pub const KEY_HOME: KeyCode = KeyCode(102);
    pub const KEY_UP: KeyCode = KeyCode(103);
    pub const KEY_LEFT: KeyCode = KeyCode(105);
    pub const KEY_RIGHT: KeyCode = KeyCode(106);
    pub const KEY_END: KeyCode = KeyCode(107);
    pub const KEY_DOWN: KeyCode = KeyCode(108);
    pub const KEY_MUTE: KeyCode = KeyCode(113);
    pub const KEY_VOLUMEDOWN: KeyCode = KeyCode(114);
    pub const KEY_VOLUMEUP: KeyCode = KeyCode(115);
    pub const KEY_POWER: KeyCode = KeyCode(116);
    pub const KEY_MENU: KeyCode = KeyCode(139);
    pub const KEY_BACK: KeyCode = KeyCode(158);
    pub const KEY_CAMERA: KeyCode = KeyCode(212);
    pub const KEY_SEARCH: KeyCode = KeyCode(217);
    pub const KEY_SEND: KeyCode = KeyCode(231);
    pub const KEY_OK: KeyCode = KeyCode(0x160);
}

/// Which key (if any) sits at each crossing of the matrix.
///
/// Stored column-major, so the linear index of `(column, row)` is `column * ROWS + row`, which is
/// also the order in which the scanner reports rows within a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadGeometry<const ROWS: usize, const COLS: usize> {
    map: [[Option<KeyCode>; ROWS]; COLS],
}

impl<const ROWS: usize, const COLS: usize> KeypadGeometry<ROWS, COLS> {
    // Rows of a column are held in one `u32` bitmask
    const ROWS_FIT: () = assert!(ROWS > 0 && ROWS <= u32::BITS as usize);

    pub const fn new(map: [[Option<KeyCode>; ROWS]; COLS]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ROWS_FIT;
        KeypadGeometry { map }
    }

    /// Builds the geometry from a flat table indexed by `column * ROWS + row`. Codes which are
    /// not [valid](KeyCode::is_valid) leave their slot unused. Returns `None` if the table is not
    /// exactly `ROWS * COLS` long.
    pub fn from_linear(table: &[u16]) -> Option<Self> {
        if table.len() != ROWS * COLS {
            return None;
        }
        let map = core::array::from_fn(|col| {
            core::array::from_fn(|row| {
                Some(KeyCode(table[col * ROWS + row])).filter(|code| code.is_valid())
            })
        });
        Some(Self::new(map))
    }

    /// Mask with one bit set per row
    pub const fn row_mask(&self) -> u32 {
        u32::MAX >> (u32::BITS as usize - ROWS)
    }

    pub fn code(&self, col: usize, row: usize) -> Option<KeyCode> {
        self.map.get(col)?.get(row).copied().flatten()
    }

    /// Every wired key code, in linear-index order. Unused slots are skipped.
    pub fn codes(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.map.iter().flatten().filter_map(|code| *code)
    }
}

#[macro_export]
macro_rules! make_keymap {
    // To allow `make_keymap![...]` be the same as `make_keymap!([...])`
    ( $( [ $( $k:tt ),* $(,)? ] ),* $(,)? ) => {
        $crate::keymap::KeypadGeometry::new([ $( [ $( $crate::keymap::make_key!($k) ),* ] ),* ])
    };
}

#[rustfmt::skip]
#[macro_export]
macro_rules! make_key {
    // Not wired
    (_) => { ::core::option::Option::None };
    (NOP) => { ::core::option::Option::None };

    // Raw code
    ((code $n:literal)) => {
        ::core::option::Option::Some($crate::keymap::KeyCode($n))
    };

    // Have numbers translate to number keys
    ($n:literal) => {
        ::core::option::Option::Some(
            $crate::keymap::paste! { $crate::keymap::codes::[<KEY_ $n>] },
        )
    };

    // Fallback, `VolumeUp` is `KEY_VOLUMEUP`
    ($i:ident) => {
        ::core::option::Option::Some(
            $crate::keymap::paste! { $crate::keymap::codes::[<KEY_ $i:upper>] },
        )
    };
}

// Export the macros
pub use make_key;
pub use make_keymap;
