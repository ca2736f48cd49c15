use core::sync::atomic::{AtomicBool, Ordering};

/// Set while the system has slept with the discrete key interrupts masked.
///
/// The first power or ok key interrupt after resume takes it, and uses it to decide whether an
/// edge was lost during sleep. It is shared between the suspend path and those interrupt
/// handlers, so it lives in an atomic and can sit in a `static`.
#[derive(Debug, Default)]
pub struct SleepRecovery {
    pending: AtomicBool,
}

impl SleepRecovery {
    pub const fn new() -> Self {
        SleepRecovery {
            pending: AtomicBool::new(false),
        }
    }

    /// Called on the way into suspend
    pub fn arm(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Clears the flag, returning whether it was set. Of two handlers racing for it only one
    /// sees `true`.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}
