// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Compile-time configuration shared by the firmware and the host harness.

/// Slots in the console line buffer. One slot stays free, so a line holds at
/// most `LINE_BUFFER_CAPACITY - 1` bytes including its terminator.
pub const LINE_BUFFER_CAPACITY: usize = 127;

/// Serial bit rate of the console link.
pub const BAUD_RATE: u32 = 115_200;

/// Millisecond tick rate driven by the periodic timer.
pub const TICK_HZ: u32 = 1_000;

/// Heartbeat toggle period.
pub const HEARTBEAT_INTERVAL_MS: u32 = 1_000;

/// Control codes understood by the line editor and emitted as feedback.
pub mod ascii {
    pub const BEL: u8 = 0x07;
    pub const BS: u8 = 0x08;
    pub const LF: u8 = b'\n';
    pub const CR: u8 = b'\r';
    /// Ctrl-U
    pub const NAK: u8 = 0x15;
    /// Ctrl-W
    pub const ETB: u8 = 0x17;
    pub const DEL: u8 = 0x7f;
    pub const NUL: u8 = 0x00;
}
