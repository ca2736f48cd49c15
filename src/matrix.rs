//! Decodes a keyboard matrix

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use fugit::MicrosDurationU32;
use heapless::Vec;

use crate::hw::Matrix;
use crate::keymap::KeypadGeometry;

/// Scans every column once, leaving one bitmask of pressed rows per column in `keys`.
///
/// Each column is driven active on its own and given `settle` before the rows are sampled. The
/// wiring is active-low, so the raw row levels are inverted: a set bit means the key at that row
/// is pressed. All columns are inactive again on return, also when a pin access fails part way.
/// `keys` is overwritten entirely, so nothing carries over between scans.
pub fn scan<M: Matrix, D: DelayUs<u32>, const ROWS: usize, const COLS: usize>(
    matrix: &mut M,
    delay: &mut D,
    settle: MicrosDurationU32,
    geometry: &KeypadGeometry<ROWS, COLS>,
    keys: &mut [u32; COLS],
) -> Result<(), M::Error> {
    let scanned = scan_columns(matrix, delay, settle, geometry, keys);
    if scanned.is_err() {
        // Best effort, the first error is the one worth reporting
        for column in 0..COLS {
            matrix.drive_column(column, false).ok();
        }
    }
    scanned
}

fn scan_columns<M: Matrix, D: DelayUs<u32>, const ROWS: usize, const COLS: usize>(
    matrix: &mut M,
    delay: &mut D,
    settle: MicrosDurationU32,
    geometry: &KeypadGeometry<ROWS, COLS>,
    keys: &mut [u32; COLS],
) -> Result<(), M::Error> {
    for column in 0..COLS {
        matrix.drive_column(column, false)?;
    }

    for (column, key) in keys.iter_mut().enumerate() {
        matrix.drive_column(column, true)?;
        delay.delay_us(settle.ticks());
        *key = !matrix.read_rows()? & geometry.row_mask();
        matrix.drive_column(column, false)?;
    }
    Ok(())
}

/// A matrix on plain GPIO pins: columns are push-pull outputs driven low when active, rows are
/// pulled-up inputs which read low while a key in the active column is held.
pub struct PinMatrix<InputPinT, OutputPinT, const ROWS: usize, const COLS: usize> {
    rows: Vec<InputPinT, ROWS>,
    columns: Vec<OutputPinT, COLS>,
}

impl<E, InputPinT, OutputPinT, const ROWS: usize, const COLS: usize>
    PinMatrix<InputPinT, OutputPinT, ROWS, COLS>
where
    InputPinT: InputPin<Error = E>,
    OutputPinT: OutputPin<Error = E>,
{
    // Row levels are read into one `u32`
    const ROWS_FIT: () = assert!(ROWS <= u32::BITS as usize);

    /// Takes the pins and releases every column
    pub fn new(
        rows: Vec<InputPinT, ROWS>,
        columns: Vec<OutputPinT, COLS>,
    ) -> Result<Self, E> {
        #[allow(clippy::let_unit_value)]
        let () = Self::ROWS_FIT;
        let mut matrix = PinMatrix { rows, columns };
        for column in matrix.columns.iter_mut() {
            column.set_high()?;
        }
        Ok(matrix)
    }

    pub fn release(self) -> (Vec<InputPinT, ROWS>, Vec<OutputPinT, COLS>) {
        (self.rows, self.columns)
    }
}

impl<E, InputPinT, OutputPinT, const ROWS: usize, const COLS: usize> Matrix
    for PinMatrix<InputPinT, OutputPinT, ROWS, COLS>
where
    InputPinT: InputPin<Error = E>,
    OutputPinT: OutputPin<Error = E>,
{
    type Error = E;

    fn drive_column(&mut self, column: usize, active: bool) -> Result<(), E> {
        match self.columns.get_mut(column) {
            Some(pin) => pin.set_state((!active).into()),
            None => Ok(()),
        }
    }

    fn read_rows(&mut self) -> Result<u32, E> {
        let mut levels = 0;
        for (row, pin) in self.rows.iter().enumerate() {
            if pin.is_high()? {
                levels |= 1 << row;
            }
        }
        Ok(levels)
    }
}
