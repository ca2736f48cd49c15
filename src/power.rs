//! Suspend and resume of the keypad block

use crate::discrete::SleepRecovery;
use crate::fmt::debug;
use crate::hw::{Controller, IrqSource, Register};

/// Register contents kept across a suspend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// In the order of [`Register::GPIO`]
    gpio: [u32; 4],
    filter_divider: u32,
}

impl Snapshot {
    fn take<C: Controller>(controller: &mut C) -> Result<Self, C::Error> {
        let mut gpio = [0; 4];
        for (value, register) in gpio.iter_mut().zip(Register::GPIO) {
            *value = controller.read_register(register)?;
        }
        Ok(Snapshot {
            gpio,
            filter_divider: controller.read_register(Register::FilterDivider)?,
        })
    }

    fn restore_gpio<C: Controller>(&self, controller: &mut C) -> Result<(), C::Error> {
        for (value, register) in self.gpio.iter().zip(Register::GPIO) {
            controller.write_register(register, *value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Power<State> {
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Active;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suspending {
    snapshot: Snapshot,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suspended {
    snapshot: Snapshot,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resuming;

impl Power<Active> {
    fn suspend(&self, snapshot: Snapshot) -> Power<Suspending> {
        Power {
            state: Suspending { snapshot },
        }
    }
}

impl Power<Suspending> {
    fn settle(&self) -> Power<Suspended> {
        Power {
            state: Suspended {
                snapshot: self.state.snapshot,
            },
        }
    }
}

impl Power<Suspended> {
    fn resume(&self) -> Power<Resuming> {
        Power { state: Resuming }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state.snapshot
    }
}

impl Power<Resuming> {
    fn settle(&self) -> Power<Active> {
        Power { state: Active }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Active(Power<Active>),
    Suspending(Power<Suspending>),
    Suspended(Power<Suspended>),
    Resuming(Power<Resuming>),
}

#[derive(Debug)]
pub struct PowerCoordinator {
    state: PowerState,
}

impl Default for PowerCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerCoordinator {
    pub const fn new() -> Self {
        PowerCoordinator {
            state: PowerState::Active(Power { state: Active }),
        }
    }

    pub fn state(&self) -> &PowerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PowerState::Active(_))
    }

    /// Saves the pin configuration, masks the matrix interrupt, stops the clock and marks the
    /// sleep so the discrete keys can look for lost edges. Does nothing unless active.
    pub fn suspend<C: Controller>(
        &mut self,
        controller: &mut C,
        sleep: &SleepRecovery,
    ) -> Result<(), C::Error> {
        let PowerState::Active(power) = &self.state else {
            return Ok(());
        };

        let snapshot = Snapshot::take(controller)?;
        controller.disable_interrupt(IrqSource::Matrix)?;
        controller.clock_disable();
        sleep.arm();

        let suspending = power.suspend(snapshot);
        self.state = PowerState::Suspending(suspending);
        self.state = PowerState::Suspended(suspending.settle());
        debug!("keypad suspended");
        Ok(())
    }

    /// Restarts the clock, brings the controller back to its operating configuration, restores
    /// the saved registers and unmasks the matrix interrupt. Does nothing unless suspended.
    ///
    /// The sleep flag is left for the discrete keys to clear.
    pub fn resume<C: Controller>(&mut self, controller: &mut C) -> Result<(), C::Error> {
        let PowerState::Suspended(power) = &self.state else {
            return Ok(());
        };
        let snapshot = *power.snapshot();

        controller.clock_enable()?;
        controller.init_controller()?;
        controller.write_register(Register::FilterDivider, snapshot.filter_divider)?;
        snapshot.restore_gpio(controller)?;
        controller.enable_interrupt(IrqSource::Matrix)?;

        let resuming = power.resume();
        self.state = PowerState::Resuming(resuming);
        self.state = PowerState::Active(resuming.settle());
        debug!("keypad resumed");
        Ok(())
    }
}
