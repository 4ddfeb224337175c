//! Helpers shared by unit tests

use parking_lot::{const_mutex, Mutex, MutexGuard};

static SERIAL: Mutex<()> = const_mutex(());

/// Serializes tests that touch the scale registry or the live-bundle slot
pub(crate) fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock()
}
