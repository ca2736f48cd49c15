//! The whole keypad: matrix poller, discrete keys and power handling behind one owner, with the
//! bring-up and teardown of the hardware they run on.

use embedded_hal::blocking::delay::DelayUs;
use heapless::Vec;

use crate::config::KeypadConfig;
use crate::debounce::{KeypadEngine, PollState};
use crate::diag::{diagnose, KeyStatus};
use crate::discrete::{DiscreteKey, SleepRecovery};
use crate::error::InitError;
use crate::fmt::{debug, info, warning};
use crate::hw::{
    AuxKey, Controller, EventSink, IrqSource, LineLevels, Matrix, PollTimer, Pull, TouchNotifier,
    Trigger,
};
use crate::keymap::{KeyCode, KeypadGeometry};
use crate::power::{PowerCoordinator, PowerState};

/// Every interrupt the keypad requests, in the order it requests them
const REQUEST_ORDER: [IrqSource; 5] = [
    IrqSource::Line(AuxKey::ALL[0]),
    IrqSource::Line(AuxKey::ALL[1]),
    IrqSource::Line(AuxKey::ALL[2]),
    IrqSource::Line(AuxKey::ALL[3]),
    IrqSource::Matrix,
];

fn slot(key: AuxKey) -> usize {
    match key {
        AuxKey::VolumeDown => 0,
        AuxKey::VolumeUp => 1,
        AuxKey::Ok => 2,
        AuxKey::Power => 3,
    }
}

/// Frees what was requested, newest first, and stops the clock
fn unwind<C: Controller>(controller: &mut C, requested: &[IrqSource]) {
    for source in requested.iter().rev() {
        controller.free_interrupt(*source);
    }
    controller.clock_disable();
}

fn setup_line<C: Controller>(controller: &mut C, key: AuxKey) -> Result<(), C::Error> {
    controller.set_pull(key, Pull::None)?;
    controller.set_trigger(key, Trigger::BothEdges)?;
    controller.request_interrupt(IrqSource::Line(key))
}

pub struct Keypad<const ROWS: usize, const COLS: usize> {
    engine: KeypadEngine<ROWS, COLS>,
    /// Indexed in [`AuxKey::ALL`] order
    keys: [DiscreteKey; 4],
    power: PowerCoordinator,
    sleep: SleepRecovery,
    config: KeypadConfig,
}

impl<const ROWS: usize, const COLS: usize> Keypad<ROWS, COLS> {
    /// Brings the keypad up: clock, controller, the discrete lines with their interrupts and
    /// finally the matrix interrupt. On failure everything done so far is undone in reverse.
    pub fn init<C: Controller>(
        geometry: KeypadGeometry<ROWS, COLS>,
        config: KeypadConfig,
        controller: &mut C,
    ) -> Result<Self, InitError<C::Error>> {
        if let Err(e) = controller.clock_enable() {
            warning!("keypad clock enable failed");
            return Err(InitError::Clock(e));
        }
        if let Err(e) = controller.init_controller() {
            warning!("keypad controller init failed");
            unwind(controller, &[]);
            return Err(InitError::Controller(e));
        }

        let mut requested: Vec<IrqSource, 5> = Vec::new();
        for key in AuxKey::ALL {
            if let Err(e) = setup_line(controller, key) {
                warning!("{} line setup failed", key);
                unwind(controller, &requested);
                return Err(InitError::Line(key, e));
            }
            requested.push(IrqSource::Line(key)).ok();
            debug!("{} line ready", key);
        }

        if let Err(e) = controller.request_interrupt(IrqSource::Matrix) {
            warning!("keypad irq request failed");
            unwind(controller, &requested);
            return Err(InitError::MatrixInterrupt(e));
        }
        requested.push(IrqSource::Matrix).ok();
        if let Err(e) = controller.enable_interrupt(IrqSource::Matrix) {
            warning!("keypad irq enable failed");
            unwind(controller, &requested);
            return Err(InitError::MatrixEnable(e));
        }

        info!("keypad {}x{} up", ROWS, COLS);
        Ok(Keypad {
            engine: KeypadEngine::new(geometry, config.settle_delay, config.poll_interval),
            keys: AuxKey::ALL.map(|key| DiscreteKey::new(key, config.aux_codes.get(key))),
            power: PowerCoordinator::new(),
            sleep: SleepRecovery::new(),
            config,
        })
    }

    /// Masks the matrix interrupt, stops polling, frees every interrupt and stops the clock.
    ///
    /// Everything is released even if masking fails; that error is returned afterwards.
    pub fn teardown<C: Controller, T: PollTimer>(
        mut self,
        controller: &mut C,
        timer: &mut T,
    ) -> Result<(), C::Error> {
        let masked = controller.disable_interrupt(IrqSource::Matrix);
        self.engine.halt(timer);
        unwind(controller, &REQUEST_ORDER);
        info!("keypad down");
        masked
    }

    pub fn engine(&self) -> &KeypadEngine<ROWS, COLS> {
        &self.engine
    }

    pub fn power(&self) -> &PowerCoordinator {
        &self.power
    }

    pub fn sleep(&self) -> &SleepRecovery {
        &self.sleep
    }

    pub fn config(&self) -> &KeypadConfig {
        &self.config
    }

    /// Every code the keypad can report: the wired matrix slots, then the discrete keys
    pub fn capabilities(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.engine
            .geometry()
            .codes()
            .chain(self.keys.iter().map(DiscreteKey::code))
    }

    pub fn matrix_interrupt<C: Controller, T: PollTimer>(
        &mut self,
        controller: &mut C,
        timer: &mut T,
    ) -> Result<(), C::Error> {
        self.engine.matrix_interrupt(controller, timer)
    }

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
        self.engine.poll(matrix, delay, controller, timer, sink)
    }

    pub fn line_interrupt<L, S, T>(
        &mut self,
        key: AuxKey,
        lines: &mut L,
        sink: &mut S,
        touch: &mut T,
    ) -> Result<(), L::Error>
    where
        L: LineLevels,
        S: EventSink,
        T: TouchNotifier,
    {
        self.keys[slot(key)].interrupt(lines, &self.sleep, sink, touch)
    }

    /// Powers the keypad down and stops any polling in progress. Does nothing unless active.
    ///
    /// Polling only stops once the power down went through, so a failed suspend leaves the
    /// keypad working as before.
    pub fn suspend<C: Controller, T: PollTimer>(
        &mut self,
        controller: &mut C,
        timer: &mut T,
    ) -> Result<(), C::Error> {
        if !self.power.is_active() {
            return Ok(());
        }
        self.power.suspend(controller, &self.sleep)?;
        self.engine.halt(timer);
        Ok(())
    }

    /// Powers the keypad back up. Does nothing unless suspended.
    ///
    /// If matrix keys were down going into suspend the poller is restarted straight away, to pick
    /// up releases the controller missed while it was off.
    pub fn resume<C: Controller, T: PollTimer>(
        &mut self,
        controller: &mut C,
        timer: &mut T,
    ) -> Result<(), C::Error> {
        if !matches!(self.power.state(), PowerState::Suspended(_)) {
            return Ok(());
        }
        self.power.resume(controller)?;
        self.engine.resume(controller, timer)
    }

    pub fn diagnose<E, M, L>(&self, matrix: &mut M, lines: &mut L) -> Result<KeyStatus, E>
    where
        M: Matrix<Error = E>,
        L: LineLevels<Error = E>,
    {
        diagnose(matrix, lines, COLS, self.config.diagnostic_rows)
    }
}
