use fugit::{ExtU32, MicrosDurationU32, MillisDurationU32};

use crate::hw::AuxKey;
use crate::keymap::codes::{KEY_CAPSLOCK, KEY_LEFTBRACE, KEY_LEFTSHIFT, KEY_M};
use crate::keymap::KeyCode;

/// Codes reported by the discrete keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AuxCodes {
    pub power: KeyCode,
    pub ok: KeyCode,
    pub volume_up: KeyCode,
    pub volume_down: KeyCode,
}

impl AuxCodes {
    pub fn get(&self, key: AuxKey) -> KeyCode {
        match key {
            AuxKey::Power => self.power,
            AuxKey::Ok => self.ok,
            AuxKey::VolumeUp => self.volume_up,
            AuxKey::VolumeDown => self.volume_down,
        }
    }
}

impl Default for AuxCodes {
    /// The codes the platform key layout expects for these keys
    fn default() -> Self {
        AuxCodes {
            power: KEY_LEFTBRACE,
            ok: KEY_M,
            volume_up: KEY_CAPSLOCK,
            volume_down: KEY_LEFTSHIFT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadConfig {
    /// Time a column is held active before its rows are sampled
    pub settle_delay: MicrosDurationU32,
    /// Time between debounce polls while any matrix key is down
    pub poll_interval: MillisDurationU32,
    /// Row lines included in the diagnostic readout
    pub diagnostic_rows: u32,
    pub aux_codes: AuxCodes,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        KeypadConfig {
            settle_delay: 100.micros(),
            poll_interval: 100.millis(),
            diagnostic_rows: 0b111,
            aux_codes: AuxCodes::default(),
        }
    }
}
