//! The capabilities the keypad core needs from the platform. The core never touches registers
//! itself; everything goes through these traits.

use fugit::MillisDurationU32;

use crate::keymap::KeyCode;

/// One of the discrete, GPIO-wired keys outside the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuxKey {
    Power,
    Ok,
    VolumeUp,
    VolumeDown,
}

impl AuxKey {
    /// In the order the board brings them up
    pub const ALL: [AuxKey; 4] = [
        AuxKey::VolumeDown,
        AuxKey::VolumeUp,
        AuxKey::Ok,
        AuxKey::Power,
    ];
}

/// Interrupt sources the core enables, disables and acknowledges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqSource {
    /// The matrix controller's key-change interrupt
    Matrix,
    /// The external interrupt of a discrete key line
    Line(AuxKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Rising,
    Falling,
    BothEdges,
}

/// Configuration registers saved across suspend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    RowGpioCon,
    ColGpioCon,
    RowGpioPud,
    ColGpioPud,
    /// Debounce filter clock divider of the matrix controller
    FilterDivider,
}

impl Register {
    /// Pin function and pull state of the row and column lines
    pub const GPIO: [Register; 4] = [
        Register::RowGpioCon,
        Register::ColGpioCon,
        Register::RowGpioPud,
        Register::ColGpioPud,
    ];
}

/// Row and column lines of the matrix
pub trait Matrix {
    type Error;

    /// Drive `column` active (`true`) or back to inactive
    fn drive_column(&mut self, column: usize, active: bool) -> Result<(), Self::Error>;

    /// Raw electrical levels of the row lines, bit `n` set when row `n` is high
    fn read_rows(&mut self) -> Result<u32, Self::Error>;
}

/// Levels of the discrete key lines
pub trait LineLevels {
    type Error;

    /// Whether the line of `key` is electrically high
    fn is_high(&mut self, key: AuxKey) -> Result<bool, Self::Error>;
}

/// Interrupt, clock and register control of the keypad block
pub trait Controller {
    type Error;

    fn enable_interrupt(&mut self, source: IrqSource) -> Result<(), Self::Error>;
    fn disable_interrupt(&mut self, source: IrqSource) -> Result<(), Self::Error>;
    fn acknowledge(&mut self, source: IrqSource) -> Result<(), Self::Error>;

    /// Attach the core's handler to `source`
    fn request_interrupt(&mut self, source: IrqSource) -> Result<(), Self::Error>;
    fn free_interrupt(&mut self, source: IrqSource);

    fn clock_enable(&mut self) -> Result<(), Self::Error>;
    fn clock_disable(&mut self);

    fn set_pull(&mut self, key: AuxKey, pull: Pull) -> Result<(), Self::Error>;
    fn set_trigger(&mut self, key: AuxKey, trigger: Trigger) -> Result<(), Self::Error>;

    fn read_register(&mut self, register: Register) -> Result<u32, Self::Error>;
    fn write_register(&mut self, register: Register, value: u32) -> Result<(), Self::Error>;

    /// Put the matrix controller registers to their operating values and release all columns
    fn init_controller(&mut self) -> Result<(), Self::Error>;
}

/// The one-shot timer that runs the debounce poll in deferred context
pub trait PollTimer {
    /// (Re)arm the timer to fire after `after`, replacing any pending expiry
    fn schedule(&mut self, after: MillisDurationU32);
    fn cancel(&mut self);
}

/// A logical key transition, as handed to the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub code: KeyCode,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn down(code: KeyCode) -> Self {
        KeyEvent {
            code,
            pressed: true,
        }
    }

    pub const fn up(code: KeyCode) -> Self {
        KeyEvent {
            code,
            pressed: false,
        }
    }
}

/// Consumer of key transitions
pub trait EventSink {
    fn report_key(&mut self, code: KeyCode, pressed: bool);
}

/// Collects events into a fixed buffer. Events past capacity are dropped.
impl<const N: usize> EventSink for heapless::Vec<KeyEvent, N> {
    fn report_key(&mut self, code: KeyCode, pressed: bool) {
        self.push(KeyEvent { code, pressed }).ok();
    }
}

/// Queues events for another context to drain. Events past capacity are dropped.
impl<const N: usize> EventSink for heapless::Deque<KeyEvent, N> {
    fn report_key(&mut self, code: KeyCode, pressed: bool) {
        self.push_back(KeyEvent { code, pressed }).ok();
    }
}

/// The touch screen driver, told when the ok key goes down so it can release whatever touch it
/// is tracking
pub trait TouchNotifier {
    fn forced_release(&mut self);
}

/// For boards without a touch screen
impl TouchNotifier for () {
    fn forced_release(&mut self) {}
}
