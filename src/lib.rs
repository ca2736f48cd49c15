//! Keypad core for S3C/S5P style SoCs: an interrupt-armed, timer-polled matrix scanner with
//! debouncing and edge detection, four discrete GPIO keys with recovery of edges lost in sleep,
//! and the suspend/resume handling of the keypad block.
//!
//! All hardware access goes through the traits in [`hw`], so the platform glue decides how
//! registers, interrupts and timers are reached.
#![no_std]

mod fmt;

pub mod config;
pub mod debounce;
pub mod diag;
pub mod discrete;
pub mod edge;
pub mod error;
pub mod hw;
pub mod keymap;
pub mod keypad;
pub mod matrix;
pub mod power;

#[cfg(test)]
mod mock;

pub use config::{AuxCodes, KeypadConfig};
pub use debounce::{KeypadEngine, PollState};
pub use diag::KeyStatus;
pub use error::InitError;
pub use hw::{AuxKey, KeyEvent};
pub use keymap::{KeyCode, KeypadGeometry};
pub use keypad::Keypad;
