//! The discrete keys (power, ok, volume up and down). Each has its own both-edges interrupt and
//! reports straight to the event sink, bypassing the matrix poller.

use crate::fmt::{info, trace};
use crate::hw::{AuxKey, EventSink, LineLevels, TouchNotifier};
use crate::keymap::KeyCode;

pub mod pins;
pub mod recovery;

pub use pins::AuxPins;
pub use recovery::SleepRecovery;

/// What a line last read as. Lines start out `Unknown` so that the first reading never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineStatus {
    #[default]
    Unknown,
    Pressed,
    Released,
}

impl LineStatus {
    /// The lines are active-low
    pub fn from_level(high: bool) -> Self {
        if high {
            LineStatus::Released
        } else {
            LineStatus::Pressed
        }
    }
}

/// Interrupt handler state for one discrete key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscreteKey {
    key: AuxKey,
    code: KeyCode,
    last: LineStatus,
}

impl DiscreteKey {
    pub fn new(key: AuxKey, code: KeyCode) -> Self {
        DiscreteKey {
            key,
            code,
            last: LineStatus::Unknown,
        }
    }

    pub fn key(&self) -> AuxKey {
        self.key
    }

    pub fn code(&self) -> KeyCode {
        self.code
    }

    pub fn last(&self) -> LineStatus {
        self.last
    }

    /// Whether this key tries to make up for an edge lost while asleep. Only power and ok do;
    /// nothing wakes the system on the volume keys.
    pub fn recovers_from_sleep(&self) -> bool {
        matches!(self.key, AuxKey::Power | AuxKey::Ok)
    }

    /// Handles one interrupt of this key's line.
    ///
    /// Every edge interrupts, so each call reports exactly one transition: the one the current
    /// level implies. The first power or ok interrupt after a suspend takes the sleep flag; if
    /// its line still reads the same as before the suspend, the opposite edge must have been
    /// lost while interrupts were off, and that one is reported first. Only a single lost edge
    /// can be made up for this way.
    pub fn interrupt<L, S, T>(
        &mut self,
        lines: &mut L,
        sleep: &SleepRecovery,
        sink: &mut S,
        touch: &mut T,
    ) -> Result<(), L::Error>
    where
        L: LineLevels,
        S: EventSink,
        T: TouchNotifier,
    {
        let status = LineStatus::from_level(lines.is_high(self.key)?);
        let pressed = status == LineStatus::Pressed;

        if self.recovers_from_sleep() && sleep.take() && status == self.last {
            info!("{} edge lost in sleep, reporting {}", self.key, !pressed);
            sink.report_key(self.code, !pressed);
        }

        trace!("{} {}", self.key, pressed);
        sink.report_key(self.code, pressed);

        if self.key == AuxKey::Ok && pressed {
            touch.forced_release();
        }

        self.last = status;
        Ok(())
    }
}
