use core::fmt;

use crate::hw::AuxKey;

const ENOENT: i32 = 2;
const EIO: i32 = 5;
const ENXIO: i32 = 6;
const ENOMEM: i32 = 12;
const EBUSY: i32 = 16;

/// Why bringing the keypad up failed. Whatever was set up before the failing step has already
/// been undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    /// The keypad clock could not be started
    Clock(E),
    /// The matrix controller registers could not be set up
    Controller(E),
    /// A discrete key line could not be configured or its interrupt requested
    Line(AuxKey, E),
    /// The matrix interrupt could not be requested
    MatrixInterrupt(E),
    /// The matrix interrupt could not be enabled
    MatrixEnable(E),
}

impl<E> InitError<E> {
    /// Negative errno, distinct per failing step
    pub fn code(&self) -> i32 {
        match self {
            InitError::Clock(_) => -ENOENT,
            InitError::Controller(_) => -ENOMEM,
            InitError::Line(..) => -EIO,
            InitError::MatrixInterrupt(_) => -ENXIO,
            InitError::MatrixEnable(_) => -EBUSY,
        }
    }

    pub fn source(&self) -> &E {
        match self {
            InitError::Clock(e)
            | InitError::Controller(e)
            | InitError::Line(_, e)
            | InitError::MatrixInterrupt(e)
            | InitError::MatrixEnable(e) => e,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Clock(e) => write!(f, "failed to enable keypad clock: {:?}", e),
            InitError::Controller(e) => write!(f, "failed to set up keypad controller: {:?}", e),
            InitError::Line(key, e) => write!(f, "failed to set up {:?} key line: {:?}", key, e),
            InitError::MatrixInterrupt(e) => write!(f, "failed to request keypad irq: {:?}", e),
            InitError::MatrixEnable(e) => write!(f, "failed to enable keypad irq: {:?}", e),
        }
    }
}
