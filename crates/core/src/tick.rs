// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use core::sync::atomic::{AtomicU32, Ordering};

/// Monotonic millisecond counter.
///
/// The periodic timer interrupt is the only writer ([`Ticks::tick`]); the
/// main loop only reads. A single word-sized atomic is all the sharing that
/// needs, so this can live in a `static`.
#[derive(Debug, Default)]
pub struct Ticks {
    millis: AtomicU32,
}

impl Ticks {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(millis: u32) -> Self {
        Self {
            millis: AtomicU32::new(millis),
        }
    }

    /// Advance by one millisecond. Called from the timer interrupt.
    pub fn tick(&self) -> u32 {
        self.millis.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn now(&self) -> u32 {
        self.millis.load(Ordering::Relaxed)
    }

    pub fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start)
    }

    /// Block until at least `delay` milliseconds have passed, calling `idle`
    /// between polls (`wfi` on the target, a short sleep on the host).
    ///
    /// Never returns early, including across the `u32` rollover.
    pub fn sleep_ms(&self, delay: u32, mut idle: impl FnMut()) {
        let start = self.now();
        while self.elapsed_since(start) < delay {
            idle();
        }
    }
}
