//! Fake hardware shared by the module tests

extern crate std;

use embedded_hal::blocking::delay::DelayUs;
use fugit::MillisDurationU32;
use std::vec::Vec;

use crate::hw::{
    AuxKey, Controller, IrqSource, LineLevels, Matrix, PollTimer, Pull, Register, Trigger,
};

/// A keypad with `COLS` columns. Keys are held with [`MockMatrix::press`]; reading the rows gives
/// low levels for the held keys of every active column.
pub struct MockMatrix<const COLS: usize> {
    held: [u32; COLS],
    active: u32,
    /// Row levels with no key held
    pub idle_levels: u32,
    pub scans: usize,
    /// Most columns seen driven at once by a row read
    pub widest_read: u32,
    /// Row reads fail while set
    pub fail_reads: bool,
}

impl<const COLS: usize> MockMatrix<COLS> {
    pub fn new() -> Self {
        MockMatrix {
            held: [0; COLS],
            active: 0,
            idle_levels: u32::MAX,
            scans: 0,
            widest_read: 0,
            fail_reads: false,
        }
    }

    pub fn press(&mut self, col: usize, row: usize) {
        self.held[col] |= 1 << row;
    }

    pub fn release(&mut self, col: usize, row: usize) {
        self.held[col] &= !(1 << row);
    }

    pub fn hold(&mut self, held: [u32; COLS]) {
        self.held = held;
    }

    pub fn active(&self) -> Option<usize> {
        (self.active != 0).then(|| self.active.trailing_zeros() as usize)
    }
}

impl<const COLS: usize> Matrix for MockMatrix<COLS> {
    type Error = MockError;

    fn drive_column(&mut self, column: usize, active: bool) -> Result<(), MockError> {
        if active {
            self.active |= 1 << column;
        } else {
            self.active &= !(1 << column);
        }
        Ok(())
    }

    fn read_rows(&mut self) -> Result<u32, MockError> {
        if self.fail_reads {
            return Err(MockError(Call::ReadRows));
        }
        self.widest_read = self.widest_read.max(self.active.count_ones());
        if self.active == 1 {
            self.scans += 1;
        }
        let mut levels = self.idle_levels;
        for (col, held) in self.held.iter().enumerate() {
            if self.active & (1 << col) != 0 {
                levels &= !held;
            }
        }
        Ok(levels)
    }
}

#[derive(Default)]
pub struct MockDelay {
    pub total_us: u32,
}

impl DelayUs<u32> for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += us;
    }
}

/// Levels of the discrete key lines, all released (high) to begin with
pub struct MockLines {
    pub power: bool,
    pub ok: bool,
    pub volume_up: bool,
    pub volume_down: bool,
}

impl Default for MockLines {
    fn default() -> Self {
        MockLines {
            power: true,
            ok: true,
            volume_up: true,
            volume_down: true,
        }
    }
}

impl MockLines {
    pub fn set(&mut self, key: AuxKey, high: bool) {
        match key {
            AuxKey::Power => self.power = high,
            AuxKey::Ok => self.ok = high,
            AuxKey::VolumeUp => self.volume_up = high,
            AuxKey::VolumeDown => self.volume_down = high,
        }
    }
}

impl LineLevels for MockLines {
    type Error = MockError;

    fn is_high(&mut self, key: AuxKey) -> Result<bool, MockError> {
        Ok(match key {
            AuxKey::Power => self.power,
            AuxKey::Ok => self.ok,
            AuxKey::VolumeUp => self.volume_up,
            AuxKey::VolumeDown => self.volume_down,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Enable(IrqSource),
    Disable(IrqSource),
    Ack(IrqSource),
    Request(IrqSource),
    Free(IrqSource),
    ClockOn,
    ClockOff,
    Pull(AuxKey, Pull),
    Trigger(AuxKey, Trigger),
    Read(Register),
    Write(Register, u32),
    Init,
    /// A row read of [`MockMatrix`]
    ReadRows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub Call);

/// Records every call. Registers read back what was last written, starting from their
/// [`MockController::reset_value`].
#[derive(Default)]
pub struct MockController {
    pub calls: Vec<Call>,
    pub registers: [Option<u32>; 5],
    pub clock_on: bool,
    pub matrix_enabled: bool,
    /// The call that fails, if any
    pub fail_on: Option<Call>,
}

impl MockController {
    pub fn reset_value(register: Register) -> u32 {
        0x1000 + register as u32
    }

    pub fn register(&self, register: Register) -> u32 {
        self.registers[register as usize].unwrap_or(Self::reset_value(register))
    }

    fn record(&mut self, call: Call) -> Result<(), MockError> {
        self.calls.push(call);
        if self.fail_on == Some(call) {
            Err(MockError(call))
        } else {
            Ok(())
        }
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        core::mem::take(&mut self.calls)
    }
}

impl Controller for MockController {
    type Error = MockError;

    fn enable_interrupt(&mut self, source: IrqSource) -> Result<(), MockError> {
        self.record(Call::Enable(source))?;
        if source == IrqSource::Matrix {
            self.matrix_enabled = true;
        }
        Ok(())
    }

    fn disable_interrupt(&mut self, source: IrqSource) -> Result<(), MockError> {
        self.record(Call::Disable(source))?;
        if source == IrqSource::Matrix {
            self.matrix_enabled = false;
        }
        Ok(())
    }

    fn acknowledge(&mut self, source: IrqSource) -> Result<(), MockError> {
        self.record(Call::Ack(source))
    }

    fn request_interrupt(&mut self, source: IrqSource) -> Result<(), MockError> {
        self.record(Call::Request(source))
    }

    fn free_interrupt(&mut self, source: IrqSource) {
        self.calls.push(Call::Free(source));
    }

    fn clock_enable(&mut self) -> Result<(), MockError> {
        self.record(Call::ClockOn)?;
        self.clock_on = true;
        Ok(())
    }

    fn clock_disable(&mut self) {
        self.calls.push(Call::ClockOff);
        self.clock_on = false;
    }

    fn set_pull(&mut self, key: AuxKey, pull: Pull) -> Result<(), MockError> {
        self.record(Call::Pull(key, pull))
    }

    fn set_trigger(&mut self, key: AuxKey, trigger: Trigger) -> Result<(), MockError> {
        self.record(Call::Trigger(key, trigger))
    }

    fn read_register(&mut self, register: Register) -> Result<u32, MockError> {
        self.record(Call::Read(register))?;
        Ok(self.register(register))
    }

    fn write_register(&mut self, register: Register, value: u32) -> Result<(), MockError> {
        self.record(Call::Write(register, value))?;
        self.registers[register as usize] = Some(value);
        Ok(())
    }

    fn init_controller(&mut self) -> Result<(), MockError> {
        self.record(Call::Init)
    }
}

#[derive(Default)]
pub struct MockTimer {
    pub pending: Option<MillisDurationU32>,
    pub schedules: Vec<MillisDurationU32>,
    pub cancels: usize,
}

impl PollTimer for MockTimer {
    fn schedule(&mut self, after: MillisDurationU32) {
        self.pending = Some(after);
        self.schedules.push(after);
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.cancels += 1;
    }
}

#[derive(Default)]
pub struct MockTouch {
    pub releases: usize,
}

impl crate::hw::TouchNotifier for MockTouch {
    fn forced_release(&mut self) {
        self.releases += 1;
    }
}
