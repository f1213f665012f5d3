// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The application loop: blink a status output and print the uptime.

use crate::tick::Ticks;
use core::fmt;

/// A digital output used as the heartbeat signal (an LED on the board).
pub trait Indicator {
    fn set_high(&mut self);
    fn toggle(&mut self);
}

#[derive(Debug)]
pub struct Heartbeat<P> {
    led: P,
    interval_ms: u32,
    beats: u32,
}

impl<P: Indicator> Heartbeat<P> {
    /// Takes ownership of the output and drives it high.
    pub fn new(mut led: P, interval_ms: u32) -> Self {
        led.set_high();
        Self {
            led,
            interval_ms,
            beats: 0,
        }
    }

    /// One loop iteration: toggle the output, sleep one interval, then print
    /// `Tic-tac <millis>` to `out`.
    pub fn beat<W: fmt::Write>(
        &mut self,
        ticks: &Ticks,
        out: &mut W,
        idle: impl FnMut(),
    ) -> fmt::Result {
        self.led.toggle();
        ticks.sleep_ms(self.interval_ms, idle);
        self.beats = self.beats.wrapping_add(1);
        writeln!(out, "Tic-tac {}", ticks.now())
    }

    pub fn beats(&self) -> u32 {
        self.beats
    }

    pub fn led(&self) -> &P {
        &self.led
    }
}
