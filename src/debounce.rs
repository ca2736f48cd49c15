//! Interrupt-armed debounce polling of the matrix.
//!
//! The matrix interrupt only says that something changed. Its handler masks the interrupt and
//! arms a timer; every expiry of that timer scans the whole matrix, reports the transitions since
//! the previous scan and re-arms itself for as long as any key is held. Once a scan comes back
//! empty the interrupt is unmasked again and the poller goes idle.

use embedded_hal::blocking::delay::DelayUs;
use fugit::{ExtU32, MicrosDurationU32, MillisDurationU32};

use crate::edge;
use crate::fmt::{debug, trace};
use crate::hw::{Controller, EventSink, IrqSource, Matrix, PollTimer};
use crate::keymap::KeypadGeometry;
use crate::matrix::scan;

/// Pressed-row bitmasks per column, from the latest scan and the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState<const COLS: usize> {
    pub current: [u32; COLS],
    pub previous: [u32; COLS],
}

impl<const COLS: usize> Default for ScanState<COLS> {
    fn default() -> Self {
        ScanState {
            current: [0; COLS],
            previous: [0; COLS],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollState {
    /// Matrix interrupt unmasked, no poll scheduled
    Idle,
    /// Matrix interrupt masked, a poll is scheduled
    Polling,
}

pub struct KeypadEngine<const ROWS: usize, const COLS: usize> {
    geometry: KeypadGeometry<ROWS, COLS>,
    settle_delay: MicrosDurationU32,
    poll_interval: MillisDurationU32,
    scan: ScanState<COLS>,
    armed: bool,
}

impl<const ROWS: usize, const COLS: usize> KeypadEngine<ROWS, COLS> {
    pub fn new(
        geometry: KeypadGeometry<ROWS, COLS>,
        settle_delay: MicrosDurationU32,
        poll_interval: MillisDurationU32,
    ) -> Self {
        KeypadEngine {
            geometry,
            settle_delay,
            poll_interval,
            scan: ScanState::default(),
            armed: false,
        }
    }

    pub fn geometry(&self) -> &KeypadGeometry<ROWS, COLS> {
        &self.geometry
    }

    pub fn scan_state(&self) -> &ScanState<COLS> {
        &self.scan
    }

    pub fn state(&self) -> PollState {
        if self.armed {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    /// Top half of the matrix interrupt: mask it, schedule a poll straight away and acknowledge.
    ///
    /// Arming an already armed poller only brings its next tick forward.
    pub fn matrix_interrupt<C: Controller, T: PollTimer>(
        &mut self,
        controller: &mut C,
        timer: &mut T,
    ) -> Result<(), C::Error> {
        controller.disable_interrupt(IrqSource::Matrix)?;
        if !self.armed {
            debug!("matrix poll armed");
        }
        self.armed = true;
        timer.schedule(0.millis());
        controller.acknowledge(IrqSource::Matrix)
    }

    /// One debounce tick, run from the poll timer.
    ///
    /// Scans the matrix, reports the transitions since the last tick and then either re-arms the
    /// timer (some key is still held) or unmasks the matrix interrupt and goes idle. A tick that
    /// arrives while idle does nothing.
    ///
    /// If the scan or the unmask fails the poller stays armed and the next tick is scheduled as
    /// usual, so it tries again rather than leaving the interrupt masked with nothing pending.
    pub fn poll<E, M, D, C, T, S>(
        &mut self,
        matrix: &mut M,
        delay: &mut D,
        controller: &mut C,
        timer: &mut T,
        sink: &mut S,
    ) -> Result<PollState, E>
    where
        M: Matrix<Error = E>,
        D: DelayUs<u32>,
        C: Controller<Error = E>,
        T: PollTimer,
        S: EventSink,
    {
        if !self.armed {
            trace!("stale poll tick");
            return Ok(PollState::Idle);
        }

        if let Err(e) = scan(
            matrix,
            delay,
            self.settle_delay,
            &self.geometry,
            &mut self.scan.current,
        ) {
            timer.schedule(self.poll_interval);
            return Err(e);
        }
        edge::report(&self.geometry, &self.scan.current, &self.scan.previous, sink);
        self.scan.previous = self.scan.current;

        if self.any_held() {
            timer.schedule(self.poll_interval);
            return Ok(PollState::Polling);
        }

        // Only disarm once the interrupt is live again, or nothing would ever wake the poller
        if let Err(e) = controller.enable_interrupt(IrqSource::Matrix) {
            timer.schedule(self.poll_interval);
            return Err(e);
        }
        self.armed = false;
        debug!("matrix poll idle");
        Ok(PollState::Idle)
    }

    /// Restarts polling after a resume if keys were held going into suspend, since their release
    /// may have happened while the controller could not see it
    pub fn resume<C: Controller, T: PollTimer>(
        &mut self,
        controller: &mut C,
        timer: &mut T,
    ) -> Result<(), C::Error> {
        if !self.any_held() {
            return Ok(());
        }
        controller.disable_interrupt(IrqSource::Matrix)?;
        self.armed = true;
        timer.schedule(0.millis());
        debug!("matrix poll rearmed after resume");
        Ok(())
    }

    fn any_held(&self) -> bool {
        self.scan.previous.iter().any(|column| *column != 0)
    }

    /// Stops polling without unmasking the interrupt, for suspend and teardown
    pub fn halt<T: PollTimer>(&mut self, timer: &mut T) {
        timer.cancel();
        self.armed = false;
    }
}
