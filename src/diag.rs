//! Instantaneous "is anything held" readout, for factory key tests. It reads the lines directly
//! and knows nothing about the poller or the discrete key handlers.

use core::fmt;

use crate::hw::{AuxKey, LineLevels, Matrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyStatus {
    Press,
    Release,
}

impl KeyStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Press => "PRESS",
            KeyStatus::Release => "RELEASE",
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Press` if any row in `rows` or the power or ok line reads low.
///
/// All `columns` are driven for the row read, so a key held anywhere in a column pulls its row
/// down, and are released again afterwards.
pub fn diagnose<E, M, L>(
    matrix: &mut M,
    lines: &mut L,
    columns: usize,
    rows: u32,
) -> Result<KeyStatus, E>
where
    M: Matrix<Error = E>,
    L: LineLevels<Error = E>,
{
    let levels = read_all_columns(matrix, columns)?;
    let held = (!levels & rows) != 0
        || !lines.is_high(AuxKey::Power)?
        || !lines.is_high(AuxKey::Ok)?;
    Ok(if held {
        KeyStatus::Press
    } else {
        KeyStatus::Release
    })
}

fn read_all_columns<M: Matrix>(matrix: &mut M, columns: usize) -> Result<u32, M::Error> {
    let mut driven = Ok(());
    for column in 0..columns {
        driven = matrix.drive_column(column, true);
        if driven.is_err() {
            break;
        }
    }
    let levels = driven.and_then(|()| matrix.read_rows());
    for column in 0..columns {
        matrix.drive_column(column, false).ok();
    }
    levels
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mock::{Call, MockError, MockLines, MockMatrix};
    use std::string::ToString;

    #[test]
    fn all_high_is_release() {
        let mut matrix = MockMatrix::<1>::new();
        let mut lines = MockLines::default();
        assert_eq!(
            diagnose(&mut matrix, &mut lines, 1, 0b111),
            Ok(KeyStatus::Release)
        );
    }

    #[test]
    fn any_line_low_is_press() {
        let mut matrix = MockMatrix::<1>::new();
        let mut lines = MockLines::default();

        matrix.idle_levels = !0b010;
        assert_eq!(diagnose(&mut matrix, &mut lines, 1, 0b111), Ok(KeyStatus::Press));
        // Rows outside the mask don't count
        matrix.idle_levels = !0b1000;
        assert_eq!(
            diagnose(&mut matrix, &mut lines, 1, 0b111),
            Ok(KeyStatus::Release)
        );

        lines.ok = false;
        assert_eq!(diagnose(&mut matrix, &mut lines, 1, 0b111), Ok(KeyStatus::Press));
        lines.ok = true;
        lines.power = false;
        assert_eq!(diagnose(&mut matrix, &mut lines, 1, 0b111), Ok(KeyStatus::Press));
        lines.power = true;

        // Volume keys are not part of the readout
        lines.volume_up = false;
        lines.volume_down = false;
        assert_eq!(
            diagnose(&mut matrix, &mut lines, 1, 0b111),
            Ok(KeyStatus::Release)
        );
    }

    #[test]
    fn displays_as_sysfs_text() {
        assert_eq!(KeyStatus::Press.to_string(), "PRESS");
        assert_eq!(KeyStatus::Release.to_string(), "RELEASE");
    }

    #[test]
    fn held_matrix_key_reads_as_press() {
        let mut matrix = MockMatrix::<3>::new();
        let mut lines = MockLines::default();
        matrix.press(2, 1);

        assert_eq!(diagnose(&mut matrix, &mut lines, 3, 0b111), Ok(KeyStatus::Press));
        assert_eq!(matrix.widest_read, 3);
        assert_eq!(matrix.active(), None);

        matrix.release(2, 1);
        assert_eq!(
            diagnose(&mut matrix, &mut lines, 3, 0b111),
            Ok(KeyStatus::Release)
        );
    }

    #[test]
    fn columns_released_after_failed_read() {
        let mut matrix = MockMatrix::<2>::new();
        let mut lines = MockLines::default();
        matrix.fail_reads = true;

        assert_eq!(
            diagnose(&mut matrix, &mut lines, 2, 0b111),
            Err(MockError(Call::ReadRows))
        );
        assert_eq!(matrix.active(), None);
    }
}
